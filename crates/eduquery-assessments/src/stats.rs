//! Aggregate statistics derived from submission history.

use eduquery_core::models::submission::{AssessmentSubmission, SubmissionStatus};

/// Mean score across completed submissions. `None` before anything has been
/// completed, so a fresh assessment never reports a zero average.
pub fn average_score(submissions: &[AssessmentSubmission]) -> Option<f64> {
    let completed: Vec<_> = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Completed)
        .collect();
    if completed.is_empty() {
        return None;
    }
    let total: f64 = completed.iter().map(|s| s.score).sum();
    Some(total / completed.len() as f64)
}

/// Fraction of submissions that reached the completed state.
pub fn completion_rate(submissions: &[AssessmentSubmission]) -> Option<f64> {
    if submissions.is_empty() {
        return None;
    }
    let completed = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Completed)
        .count();
    Some(completed as f64 / submissions.len() as f64)
}

/// Mean time spent across all submissions, in seconds.
pub fn average_time(submissions: &[AssessmentSubmission]) -> Option<f64> {
    if submissions.is_empty() {
        return None;
    }
    let total: f64 = submissions.iter().map(|s| f64::from(s.time_spent)).sum();
    Some(total / submissions.len() as f64)
}

/// Total time spent across all submissions, in seconds.
pub fn total_time_spent(submissions: &[AssessmentSubmission]) -> u64 {
    submissions.iter().map(|s| u64::from(s.time_spent)).sum()
}
