use tracing::info;
use uuid::Uuid;

use eduquery_core::models::assessment::{Assessment, AssessmentMetadata};
use eduquery_core::models::submission::{AssessmentSubmission, QuestionGrade, SubmissionStatus};

use crate::editor::AssessmentDraft;
use crate::error::AssessmentError;
use crate::stats;

/// The external assessments/questions persistence service.
///
/// Injected where needed so tests can supply in-memory doubles. `fetch`
/// returns the assessment with its question list expanded; `create` assigns
/// the identifier; `submit` and `grade` are remote procedures on the store.
pub trait AssessmentStore {
    /// Persist a new assessment; returns the assigned identifier.
    async fn create(&self, draft: &AssessmentDraft) -> Result<Uuid, AssessmentError>;

    /// Read one assessment with its question list expanded.
    async fn fetch(&self, id: Uuid) -> Result<Assessment, AssessmentError>;

    /// Overwrite an existing assessment with the draft's content.
    async fn update(&self, id: Uuid, draft: &AssessmentDraft) -> Result<(), AssessmentError>;

    async fn delete(&self, id: Uuid) -> Result<(), AssessmentError>;

    /// Record a completed attempt.
    async fn submit(&self, submission: &AssessmentSubmission) -> Result<(), AssessmentError>;

    /// Apply per-question grades to a submission.
    async fn grade(
        &self,
        submission_id: Uuid,
        grades: &[QuestionGrade],
    ) -> Result<(), AssessmentError>;

    async fn submissions_for(
        &self,
        assessment_id: Uuid,
    ) -> Result<Vec<AssessmentSubmission>, AssessmentError>;

    /// Patch a persisted assessment's metadata block only, leaving the
    /// editable content alone.
    async fn update_metadata(
        &self,
        id: Uuid,
        metadata: &AssessmentMetadata,
    ) -> Result<(), AssessmentError>;
}

/// Record a completed attempt, then refresh the parent assessment's
/// aggregate metadata from its submission history.
pub async fn submit_attempt<S: AssessmentStore>(
    store: &S,
    submission: &AssessmentSubmission,
) -> Result<(), AssessmentError> {
    store.submit(submission).await?;
    info!(
        submission_id = %submission.id,
        assessment_id = %submission.assessment_id,
        "attempt submitted"
    );
    refresh_metadata(store, submission.assessment_id).await
}

/// Recompute average score, completion rate, average time, and attempt count
/// from the store's submission history and persist the result.
pub async fn refresh_metadata<S: AssessmentStore>(
    store: &S,
    assessment_id: Uuid,
) -> Result<(), AssessmentError> {
    let submissions = store.submissions_for(assessment_id).await?;
    let assessment = store.fetch(assessment_id).await?;

    let mut metadata = assessment.metadata;
    metadata.average_score = stats::average_score(&submissions);
    metadata.completion_rate = stats::completion_rate(&submissions);
    metadata.average_time = stats::average_time(&submissions);
    metadata.attempt_count = submissions.len() as u32;

    store.update_metadata(assessment_id, &metadata).await
}

/// A student's standing on one assessment.
#[derive(Debug, Clone)]
pub struct StudentProgress {
    pub completed: usize,
    pub total: usize,
    pub score: Option<f64>,
    pub time_spent: u64,
    pub submissions: Vec<AssessmentSubmission>,
}

pub async fn student_progress<S: AssessmentStore>(
    store: &S,
    student_id: Uuid,
    assessment_id: Uuid,
) -> Result<StudentProgress, AssessmentError> {
    let submissions: Vec<_> = store
        .submissions_for(assessment_id)
        .await?
        .into_iter()
        .filter(|s| s.student_id == student_id)
        .collect();

    Ok(StudentProgress {
        completed: submissions
            .iter()
            .filter(|s| s.status == SubmissionStatus::Completed)
            .count(),
        total: submissions.len(),
        score: stats::average_score(&submissions),
        time_spent: stats::total_time_spent(&submissions),
        submissions,
    })
}
