use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use eduquery_core::models::assessment::{
    Assessment, AssessmentMetadata, AssessmentQuestion, AssessmentSettings, AssessmentType,
    SettingsPatch,
};
use eduquery_core::models::question::Question;
use eduquery_core::notify::Notifier;

use crate::error::AssessmentError;
use crate::service::AssessmentStore;

/// An in-memory assessment being edited. `id` and `metadata` stay empty
/// until the first successful save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentDraft {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub assessment_type: AssessmentType,
    pub subject: String,
    pub grade_level: String,
    pub questions: Vec<AssessmentQuestion>,
    pub time_limit: Option<u32>,
    pub due_date: Option<jiff::civil::Date>,
    pub settings: AssessmentSettings,
    pub metadata: Option<AssessmentMetadata>,
    pub created_by: Uuid,
}

impl AssessmentDraft {
    pub fn new(created_by: Uuid) -> Self {
        Self {
            id: None,
            title: String::new(),
            description: None,
            assessment_type: AssessmentType::Quiz,
            subject: String::new(),
            grade_level: String::new(),
            questions: Vec::new(),
            time_limit: None,
            due_date: None,
            settings: AssessmentSettings::default(),
            metadata: None,
            created_by,
        }
    }

    /// Sum of the question point values. Derived, never stored separately;
    /// stores read this when persisting `total_points`.
    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

/// Editing surface over a single [`AssessmentDraft`].
///
/// Exactly one editor owns a draft at a time; there is no collaborative
/// editing. After every mutation `questions[i].order == i` holds for all i.
pub struct AssessmentEditor {
    draft: AssessmentDraft,
    saving: bool,
    notifier: Arc<dyn Notifier>,
}

impl AssessmentEditor {
    /// Start a fresh draft with default settings and no questions.
    pub fn new(created_by: Uuid, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            draft: AssessmentDraft::new(created_by),
            saving: false,
            notifier,
        }
    }

    /// Resume editing a persisted assessment.
    pub fn from_assessment(assessment: Assessment, notifier: Arc<dyn Notifier>) -> Self {
        let draft = AssessmentDraft {
            id: Some(assessment.id),
            title: assessment.title,
            description: assessment.description,
            assessment_type: assessment.assessment_type,
            subject: assessment.subject,
            grade_level: assessment.grade_level,
            questions: assessment.questions,
            time_limit: assessment.time_limit,
            due_date: assessment.due_date,
            settings: assessment.settings,
            metadata: Some(assessment.metadata),
            created_by: assessment.created_by,
        };
        Self {
            draft,
            saving: false,
            notifier,
        }
    }

    pub fn draft(&self) -> &AssessmentDraft {
        &self.draft
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_type(&mut self, assessment_type: AssessmentType) {
        self.draft.assessment_type = assessment_type;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.draft.description = description;
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.draft.subject = subject.into();
    }

    pub fn set_grade_level(&mut self, grade_level: impl Into<String>) {
        self.draft.grade_level = grade_level.into();
    }

    /// Time limit in minutes; `None` means untimed.
    pub fn set_time_limit(&mut self, minutes: Option<u32>) {
        self.draft.time_limit = minutes;
    }

    pub fn set_due_date(&mut self, due_date: Option<jiff::civil::Date>) {
        self.draft.due_date = due_date;
    }

    /// Append a question-bank entry to the end of the list, taking its
    /// default point value. Returns the new slot's id.
    pub fn add_question(&mut self, question: &Question) -> Uuid {
        let entry = AssessmentQuestion {
            id: Uuid::new_v4(),
            question_id: question.id,
            order: self.draft.questions.len() as u32,
            points: question.points,
            required: true,
        };
        let id = entry.id;
        self.draft.questions.push(entry);
        debug!(
            question_id = %question.id,
            total_points = self.draft.total_points(),
            "question added"
        );
        id
    }

    /// Remove a question slot and close the gap in the order indices.
    /// Returns false when no slot matches.
    pub fn remove_question(&mut self, id: Uuid) -> bool {
        let before = self.draft.questions.len();
        self.draft.questions.retain(|q| q.id != id);
        if self.draft.questions.len() == before {
            return false;
        }
        self.renumber();
        debug!(total_points = self.draft.total_points(), "question removed");
        true
    }

    /// Move a question to `target_index` (clamped to the valid range),
    /// shifting the slots in between. A move that resolves to the question's
    /// current position leaves the draft untouched. Returns false when no
    /// slot matches.
    pub fn reorder_question(&mut self, id: Uuid, target_index: usize) -> bool {
        let Some(from) = self.draft.questions.iter().position(|q| q.id == id) else {
            return false;
        };
        let to = target_index.min(self.draft.questions.len() - 1);
        if from == to {
            return true;
        }
        let moved = self.draft.questions.remove(from);
        self.draft.questions.insert(to, moved);
        self.renumber();
        true
    }

    fn renumber(&mut self) {
        for (index, question) in self.draft.questions.iter_mut().enumerate() {
            question.order = index as u32;
        }
    }

    /// Shallow-merge partial settings into the draft.
    pub fn update_settings(&mut self, patch: &SettingsPatch) {
        self.draft.settings.apply(patch);
    }

    /// Check that the draft is saveable. Does not mutate.
    pub fn validate_for_save(&self) -> Result<(), AssessmentError> {
        if self.draft.title.trim().is_empty() {
            return Err(AssessmentError::Validation(
                "Please enter a title for the assessment".to_string(),
            ));
        }
        if self.draft.questions.is_empty() {
            return Err(AssessmentError::Validation(
                "Please add at least one question".to_string(),
            ));
        }
        Ok(())
    }

    /// Persist the draft. The first save takes the store-assigned identifier
    /// and initial metadata; each later save bumps the version by exactly
    /// one. A failed persist leaves the in-memory draft exactly as it was.
    pub async fn save<S: AssessmentStore>(&mut self, store: &S) -> Result<Uuid, AssessmentError> {
        if let Err(err) = self.validate_for_save() {
            self.notifier.error(&err.to_string());
            return Err(err);
        }

        self.saving = true;
        let outcome = self.persist(store).await;
        self.saving = false;

        match outcome {
            Ok(id) => {
                info!(assessment_id = %id, "assessment saved");
                self.notifier.success("Assessment saved successfully");
                Ok(id)
            }
            Err(err) => {
                self.notifier.error("Failed to save assessment");
                Err(err)
            }
        }
    }

    async fn persist<S: AssessmentStore>(&mut self, store: &S) -> Result<Uuid, AssessmentError> {
        // Mutate a copy and commit it only after the store accepts the write,
        // so a failed persist cannot leave a half-applied draft.
        let mut candidate = self.draft.clone();
        match candidate.id {
            None => {
                candidate.metadata = Some(AssessmentMetadata::initial());
                let id = store.create(&candidate).await?;
                candidate.id = Some(id);
                self.draft = candidate;
                Ok(id)
            }
            Some(id) => {
                match candidate.metadata.as_mut() {
                    Some(metadata) => metadata.version += 1,
                    None => candidate.metadata = Some(AssessmentMetadata::initial()),
                }
                store.update(id, &candidate).await?;
                self.draft = candidate;
                Ok(id)
            }
        }
    }
}
