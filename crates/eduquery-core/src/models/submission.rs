use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SubmissionStatus {
    InProgress,
    Completed,
    Graded,
    Late,
    PendingReview,
}

/// A student's answer to one question within a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionResponse {
    pub question_id: Uuid,
    pub answer: String,
    pub is_correct: Option<bool>,
    pub points: Option<u32>,
    pub feedback: Option<String>,
    /// Seconds.
    pub time_spent: u32,
}

/// A completed or in-progress attempt at an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentSubmission {
    pub id: Uuid,
    pub assessment_id: Uuid,
    pub student_id: Uuid,
    pub answers: Vec<QuestionResponse>,
    pub score: f64,
    pub started_at: jiff::Timestamp,
    pub submitted_at: Option<jiff::Timestamp>,
    /// Seconds.
    pub time_spent: u32,
    pub status: SubmissionStatus,
    pub feedback: Option<String>,
    pub graded_by: Option<Uuid>,
    pub graded_at: Option<jiff::Timestamp>,
}

/// Per-question grading input for the store's grading procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionGrade {
    pub question_id: Uuid,
    pub points: u32,
    pub feedback: Option<String>,
}
