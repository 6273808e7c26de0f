use tracing::{error, info};

/// Fire-and-forget user notification channel (rendered as toasts by the
/// client shell). Never a control-flow dependency: implementations must not
/// fail and callers never wait on them.
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that emits through `tracing`, for headless hosts and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!(notice = "success", "{message}");
    }

    fn error(&self, message: &str) {
        error!(notice = "error", "{message}");
    }
}
