use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AssessmentType {
    Quiz,
    Test,
    Exam,
    Homework,
    Practice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AssessmentStatus {
    Draft,
    Published,
    Archived,
    Scheduled,
}

/// One slot in an assessment's ordered question list.
///
/// `order` is the zero-based position and is kept dense (`0..n-1`, matching
/// list position) at all times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentQuestion {
    pub id: Uuid,
    pub question_id: Uuid,
    pub order: u32,
    pub points: u32,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentSettings {
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
    pub show_feedback: bool,
    pub show_explanation: bool,
    pub allow_retries: bool,
    /// Only meaningful while `allow_retries` is true; consumers ignore it
    /// otherwise.
    pub max_retries: Option<u32>,
    pub passing_score: Option<u32>,
    pub show_timer: bool,
    pub require_proctoring: Option<bool>,
    pub access_code: Option<String>,
    pub allow_pause: bool,
    pub show_progress: bool,
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self {
            shuffle_questions: false,
            shuffle_options: false,
            show_feedback: true,
            show_explanation: true,
            allow_retries: false,
            max_retries: None,
            passing_score: None,
            show_timer: true,
            require_proctoring: None,
            access_code: None,
            allow_pause: true,
            show_progress: true,
        }
    }
}

/// Partial settings update. Each field is merged independently; absent
/// fields leave the current value in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingsPatch {
    pub shuffle_questions: Option<bool>,
    pub shuffle_options: Option<bool>,
    pub show_feedback: Option<bool>,
    pub show_explanation: Option<bool>,
    pub allow_retries: Option<bool>,
    pub max_retries: Option<u32>,
    pub passing_score: Option<u32>,
    pub show_timer: Option<bool>,
    pub require_proctoring: Option<bool>,
    pub access_code: Option<String>,
    pub allow_pause: Option<bool>,
    pub show_progress: Option<bool>,
}

impl AssessmentSettings {
    /// Shallow-merge a patch, field by field.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.shuffle_questions {
            self.shuffle_questions = v;
        }
        if let Some(v) = patch.shuffle_options {
            self.shuffle_options = v;
        }
        if let Some(v) = patch.show_feedback {
            self.show_feedback = v;
        }
        if let Some(v) = patch.show_explanation {
            self.show_explanation = v;
        }
        if let Some(v) = patch.allow_retries {
            self.allow_retries = v;
        }
        if let Some(v) = patch.max_retries {
            self.max_retries = Some(v);
        }
        if let Some(v) = patch.passing_score {
            self.passing_score = Some(v);
        }
        if let Some(v) = patch.show_timer {
            self.show_timer = v;
        }
        if let Some(v) = patch.require_proctoring {
            self.require_proctoring = Some(v);
        }
        if let Some(v) = &patch.access_code {
            self.access_code = Some(v.clone());
        }
        if let Some(v) = patch.allow_pause {
            self.allow_pause = v;
        }
        if let Some(v) = patch.show_progress {
            self.show_progress = v;
        }
    }
}

/// Aggregate statistics and versioning info, distinct from the editable
/// content. Initialized on an assessment's first save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentMetadata {
    pub average_score: Option<f64>,
    pub completion_rate: Option<f64>,
    pub average_time: Option<f64>,
    pub attempt_count: u32,
    pub status: AssessmentStatus,
    pub version: u32,
    pub last_modified_by: Option<Uuid>,
}

impl AssessmentMetadata {
    /// Metadata for a draft's first save.
    pub fn initial() -> Self {
        Self {
            average_score: None,
            completion_rate: None,
            average_time: None,
            attempt_count: 0,
            status: AssessmentStatus::Draft,
            version: 1,
            last_modified_by: None,
        }
    }
}

/// A persisted assessment, as read back from the store with its question
/// list expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assessment {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub assessment_type: AssessmentType,
    pub subject: String,
    pub grade_level: String,
    pub questions: Vec<AssessmentQuestion>,
    /// Always the sum of `questions[i].points`; recomputed on every save.
    pub total_points: u32,
    /// Minutes.
    pub time_limit: Option<u32>,
    pub due_date: Option<jiff::civil::Date>,
    pub settings: AssessmentSettings,
    pub metadata: AssessmentMetadata,
    pub created_by: Uuid,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}
