use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info, warn};
use uuid::Uuid;

use eduquery_core::models::user::{Role, User, UserPatch};
use eduquery_core::notify::Notifier;

use crate::error::AuthError;
use crate::store::{AccountStore, AuthEvent, ProfileRecord};

/// Route side effect invoked after a successful sign-in or sign-out.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// Navigator that only logs, for headless hosts and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        debug!(path, "navigation requested");
    }
}

/// Where the session currently stands.
///
/// `Uninitialized → Checking → {Authenticated, Anonymous}` at bootstrap;
/// afterwards sign-in and sign-out flip between the last two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Checking,
    Authenticated,
    Anonymous,
}

/// Process-wide view of "who is logged in". One instance exists per running
/// client, owned by the [`SessionManager`].
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// `Some` exactly when `phase` is [`SessionPhase::Authenticated`].
    pub user: Option<User>,
    /// True only while a session check or credential operation is in flight.
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            user: None,
            loading: false,
            error: None,
        }
    }
}

struct Inner {
    state: SessionState,
    events: Option<broadcast::Receiver<AuthEvent>>,
    closed: bool,
    next_ticket: u64,
    applied_ticket: u64,
}

impl Inner {
    /// Stamp a state write with the moment its operation was triggered.
    fn begin_write(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    /// Apply a state mutation, unless a newer write has already landed or the
    /// manager was shut down while the operation was in flight. Returns
    /// whether the write was applied.
    fn apply_write(&mut self, ticket: u64, f: impl FnOnce(&mut SessionState)) -> bool {
        if self.closed {
            debug!(ticket, "dropping session write after shutdown");
            return false;
        }
        if ticket < self.applied_ticket {
            debug!(
                ticket,
                applied = self.applied_ticket,
                "dropping stale session write"
            );
            return false;
        }
        self.applied_ticket = ticket;
        f(&mut self.state);
        true
    }
}

/// Single source of truth for the authenticated user, synchronized with an
/// injected [`AccountStore`].
///
/// All methods take `&self`; callers on the one logical thread may hold the
/// manager in an `Arc` and share it between the UI and the event loop.
pub struct SessionManager<S: AccountStore> {
    store: S,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    inner: Mutex<Inner>,
}

impl<S: AccountStore> SessionManager<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            notifier,
            navigator,
            inner: Mutex::new(Inner {
                state: SessionState::new(),
                events: None,
                closed: false,
                next_ticket: 0,
                applied_ticket: 0,
            }),
        }
    }

    /// Snapshot of the current session state.
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    /// Bootstrap the session from the store and register the auth-change
    /// subscription. Only the first call does anything; later calls are
    /// no-ops, so a remounting host can never double-subscribe.
    ///
    /// Store failures degrade to a signed-out state with the error recorded;
    /// startup is never blocked on the store.
    pub async fn initialize(&self) {
        let ticket = {
            let mut inner = self.inner.lock().await;
            if inner.state.phase != SessionPhase::Uninitialized {
                debug!("session already initialized");
                return;
            }
            inner.state.phase = SessionPhase::Checking;
            inner.state.loading = true;
            inner.begin_write()
        };

        let outcome = self.check_session().await;

        let mut inner = self.inner.lock().await;
        inner.state.loading = false;
        match outcome {
            Ok(Some(user)) => {
                info!(user_id = %user.id, "session restored");
                inner.apply_write(ticket, |s| {
                    s.phase = SessionPhase::Authenticated;
                    s.user = Some(user);
                    s.error = None;
                });
            }
            Ok(None) => {
                inner.apply_write(ticket, |s| {
                    s.phase = SessionPhase::Anonymous;
                    s.user = None;
                    s.error = None;
                });
            }
            Err(err) => {
                warn!(error = %err, "session bootstrap failed");
                let message = err.to_string();
                inner.apply_write(ticket, |s| {
                    s.phase = SessionPhase::Anonymous;
                    s.user = None;
                    s.error = Some(message);
                });
            }
        }
        if inner.events.is_none() {
            inner.events = Some(self.store.subscribe());
        }
    }

    async fn check_session(&self) -> Result<Option<User>, AuthError> {
        match self.store.current_session().await? {
            Some(session) => Ok(Some(self.resolve_account(session.user_id).await?)),
            None => Ok(None),
        }
    }

    /// Credential sign-in. On success the session becomes authenticated and
    /// the host is routed to the dashboard; on failure the error is recorded,
    /// notified, and returned so the calling form can react.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let ticket = self.start_operation().await;
        let outcome = self.sign_in_inner(email, password).await;

        let mut inner = self.inner.lock().await;
        inner.state.loading = false;
        match outcome {
            Ok(user) => {
                info!(user_id = %user.id, "signed in");
                let applied = inner.apply_write(ticket, |s| {
                    s.phase = SessionPhase::Authenticated;
                    s.user = Some(user);
                    s.error = None;
                });
                drop(inner);
                if applied {
                    self.notifier.success("Successfully signed in!");
                    self.navigator.navigate("/dashboard");
                }
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                let applied = inner.apply_write(ticket, |s| s.error = Some(message.clone()));
                drop(inner);
                if applied {
                    self.notifier.error(&message);
                }
                Err(err)
            }
        }
    }

    async fn sign_in_inner(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let session = self.store.sign_in(email, password).await?;
        self.resolve_account(session.user_id).await
    }

    /// Create a credential account and its profile row. If the profile insert
    /// fails, the freshly created account is deleted so no orphaned account
    /// is left behind; session state is only touched on full success.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<(), AuthError> {
        if email.is_empty() || password.is_empty() || full_name.is_empty() {
            return Err(AuthError::Validation("all fields are required".to_string()));
        }

        let ticket = self.start_operation().await;
        let outcome = self.sign_up_inner(email, password, full_name).await;

        let mut inner = self.inner.lock().await;
        inner.state.loading = false;
        match outcome {
            Ok(user) => {
                info!(user_id = %user.id, "signed up");
                let applied = inner.apply_write(ticket, |s| {
                    s.phase = SessionPhase::Authenticated;
                    s.user = Some(user);
                    s.error = None;
                });
                drop(inner);
                if applied {
                    self.notifier.success("Account created successfully!");
                }
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                let applied = inner.apply_write(ticket, |s| s.error = Some(message.clone()));
                drop(inner);
                if applied {
                    self.notifier.error(&message);
                }
                Err(err)
            }
        }
    }

    async fn sign_up_inner(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<User, AuthError> {
        let session = self.store.sign_up(email, password, full_name).await?;

        if let Err(profile_err) = self
            .store
            .create_profile(session.user_id, email, full_name)
            .await
        {
            warn!(
                user_id = %session.user_id,
                error = %profile_err,
                "profile creation failed, deleting account"
            );
            let rollback = self.store.delete_account(session.user_id).await.err();
            if let Some(rollback_err) = &rollback {
                warn!(user_id = %session.user_id, error = %rollback_err, "account rollback failed");
            }
            return Err(AuthError::SignUpRollback {
                reason: profile_err.to_string(),
                rollback: rollback.map(|e| e.to_string()),
            });
        }

        self.resolve_account(session.user_id).await
    }

    /// Sign out and clear the session. On store failure the authenticated
    /// state is left in place and the error surfaced.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let ticket = self.start_operation().await;
        let outcome = self.store.sign_out().await;

        let mut inner = self.inner.lock().await;
        inner.state.loading = false;
        match outcome {
            Ok(()) => {
                info!("signed out");
                let applied = inner.apply_write(ticket, |s| {
                    s.phase = SessionPhase::Anonymous;
                    s.user = None;
                    s.error = None;
                });
                drop(inner);
                if applied {
                    self.navigator.navigate("/");
                    self.notifier.success("Successfully signed out");
                }
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                let applied = inner.apply_write(ticket, |s| s.error = Some(message.clone()));
                drop(inner);
                if applied {
                    self.notifier.error(&message);
                }
                Err(err)
            }
        }
    }

    /// Persist the mutable profile fields, then merge them into local state
    /// optimistically. Fails without a store call when nobody is signed in.
    pub async fn update_profile(&self, patch: &UserPatch) -> Result<(), AuthError> {
        let (user_id, ticket) = {
            let mut inner = self.inner.lock().await;
            let Some(user_id) = inner.state.user.as_ref().map(|u| u.id) else {
                return Err(AuthError::NotSignedIn);
            };
            inner.state.loading = true;
            inner.state.error = None;
            (user_id, inner.begin_write())
        };

        let outcome = self.store.update_profile(user_id, patch).await;

        let mut inner = self.inner.lock().await;
        inner.state.loading = false;
        match outcome {
            Ok(()) => {
                inner.apply_write(ticket, |s| {
                    if let Some(user) = s.user.as_mut() {
                        user.apply(patch);
                    }
                });
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                let applied = inner.apply_write(ticket, |s| s.error = Some(message.clone()));
                drop(inner);
                if applied {
                    self.notifier.error(&message);
                }
                Err(err)
            }
        }
    }

    /// Drain pending auth-change notifications and apply each one. The host's
    /// event loop calls this; nothing runs in the background.
    pub async fn process_events(&self) {
        loop {
            let (event, ticket) = {
                let mut inner = self.inner.lock().await;
                if inner.closed {
                    return;
                }
                let Some(events) = inner.events.as_mut() else {
                    return;
                };
                match events.try_recv() {
                    Ok(event) => {
                        let ticket = inner.begin_write();
                        (event, ticket)
                    }
                    Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                        warn!(missed, "auth event channel lagged");
                        continue;
                    }
                    Err(_) => return,
                }
            };
            self.handle_event(event, ticket).await;
        }
    }

    async fn handle_event(&self, event: AuthEvent, ticket: u64) {
        match event {
            AuthEvent::SignedIn { user_id } => match self.resolve_account(user_id).await {
                Ok(user) => {
                    let mut inner = self.inner.lock().await;
                    inner.apply_write(ticket, |s| {
                        s.phase = SessionPhase::Authenticated;
                        s.user = Some(user);
                        s.error = None;
                    });
                }
                Err(err) => {
                    warn!(user_id = %user_id, error = %err, "failed to resolve account for auth event");
                    let message = err.to_string();
                    let mut inner = self.inner.lock().await;
                    let applied = inner.apply_write(ticket, |s| {
                        s.phase = SessionPhase::Anonymous;
                        s.user = None;
                        s.error = Some(message.clone());
                    });
                    drop(inner);
                    if applied {
                        self.notifier.error(&message);
                    }
                }
            },
            AuthEvent::SignedOut => {
                let mut inner = self.inner.lock().await;
                inner.apply_write(ticket, |s| {
                    s.phase = SessionPhase::Anonymous;
                    s.user = None;
                });
            }
        }
    }

    /// Tear down the subscription. Any in-flight operation resolving after
    /// this point must not touch state; `apply_write` enforces that.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        inner.closed = true;
        inner.events = None;
    }

    /// Fetch the profile row and validate its role. A missing row triggers
    /// the remote provisioning procedure and exactly one refetch; a second
    /// miss or an unknown role is surfaced as-is, never papered over with a
    /// default.
    async fn resolve_account(&self, user_id: Uuid) -> Result<User, AuthError> {
        let record = match self.store.fetch_profile(user_id).await {
            Ok(record) => record,
            Err(AuthError::ProfileNotFound(_)) => {
                info!(user_id = %user_id, "profile missing, provisioning");
                self.store.provision_profile(user_id).await?;
                self.store.fetch_profile(user_id).await?
            }
            Err(err) => return Err(err),
        };
        user_from_record(record)
    }

    async fn start_operation(&self) -> u64 {
        let mut inner = self.inner.lock().await;
        inner.state.loading = true;
        inner.state.error = None;
        inner.begin_write()
    }
}

fn user_from_record(record: ProfileRecord) -> Result<User, AuthError> {
    let Some(role_name) = record.role else {
        return Err(AuthError::InvalidRole("<missing>".to_string()));
    };
    let role = Role::from_str(&role_name).map_err(|_| AuthError::InvalidRole(role_name.clone()))?;
    Ok(User {
        id: record.id,
        email: record.email,
        full_name: record.full_name,
        role,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}
