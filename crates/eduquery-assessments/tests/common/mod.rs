#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

use eduquery_assessments::editor::AssessmentDraft;
use eduquery_assessments::error::AssessmentError;
use eduquery_assessments::service::AssessmentStore;
use eduquery_core::models::assessment::{Assessment, AssessmentMetadata};
use eduquery_core::models::question::{Question, QuestionDifficulty, QuestionType};
use eduquery_core::models::submission::{AssessmentSubmission, QuestionGrade, SubmissionStatus};
use eduquery_core::notify::Notifier;

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingNotifier {
    pub fn count(&self, kind: &str) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(("success", message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(("error", message.to_string()));
    }
}

/// In-memory stand-in for the external persistence service.
pub struct MemoryStore {
    pub assessments: Mutex<HashMap<Uuid, Assessment>>,
    pub submissions: Mutex<Vec<AssessmentSubmission>>,
    pub fail_writes: bool,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            assessments: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            fail_writes: false,
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let mut store = Self::new();
        store.fail_writes = true;
        store
    }

    fn materialize(id: Uuid, draft: &AssessmentDraft) -> Assessment {
        Assessment {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            assessment_type: draft.assessment_type,
            subject: draft.subject.clone(),
            grade_level: draft.grade_level.clone(),
            questions: draft.questions.clone(),
            total_points: draft.total_points(),
            time_limit: draft.time_limit,
            due_date: draft.due_date,
            settings: draft.settings.clone(),
            metadata: draft
                .metadata
                .clone()
                .unwrap_or_else(AssessmentMetadata::initial),
            created_by: draft.created_by,
            created_at: jiff::Timestamp::now(),
            updated_at: jiff::Timestamp::now(),
        }
    }
}

impl AssessmentStore for MemoryStore {
    async fn create(&self, draft: &AssessmentDraft) -> Result<Uuid, AssessmentError> {
        if self.fail_writes {
            return Err(AssessmentError::Store("write rejected".to_string()));
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        let id = Uuid::new_v4();
        self.assessments
            .lock()
            .unwrap()
            .insert(id, Self::materialize(id, draft));
        Ok(id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Assessment, AssessmentError> {
        self.assessments
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(AssessmentError::NotFound(id))
    }

    async fn update(&self, id: Uuid, draft: &AssessmentDraft) -> Result<(), AssessmentError> {
        if self.fail_writes {
            return Err(AssessmentError::Store("write rejected".to_string()));
        }
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut assessments = self.assessments.lock().unwrap();
        if !assessments.contains_key(&id) {
            return Err(AssessmentError::NotFound(id));
        }
        assessments.insert(id, Self::materialize(id, draft));
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AssessmentError> {
        self.assessments
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(AssessmentError::NotFound(id))
    }

    async fn submit(&self, submission: &AssessmentSubmission) -> Result<(), AssessmentError> {
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }

    async fn grade(
        &self,
        submission_id: Uuid,
        grades: &[QuestionGrade],
    ) -> Result<(), AssessmentError> {
        let mut submissions = self.submissions.lock().unwrap();
        let Some(submission) = submissions.iter_mut().find(|s| s.id == submission_id) else {
            return Err(AssessmentError::SubmissionNotFound(submission_id));
        };
        for response in submission.answers.iter_mut() {
            if let Some(grade) = grades.iter().find(|g| g.question_id == response.question_id) {
                response.points = Some(grade.points);
                response.feedback = grade.feedback.clone();
            }
        }
        submission.status = SubmissionStatus::Graded;
        Ok(())
    }

    async fn submissions_for(
        &self,
        assessment_id: Uuid,
    ) -> Result<Vec<AssessmentSubmission>, AssessmentError> {
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.assessment_id == assessment_id)
            .cloned()
            .collect())
    }

    async fn update_metadata(
        &self,
        id: Uuid,
        metadata: &AssessmentMetadata,
    ) -> Result<(), AssessmentError> {
        let mut assessments = self.assessments.lock().unwrap();
        let Some(assessment) = assessments.get_mut(&id) else {
            return Err(AssessmentError::NotFound(id));
        };
        assessment.metadata = metadata.clone();
        Ok(())
    }
}

pub fn bank_question(points: u32) -> Question {
    Question {
        id: Uuid::new_v4(),
        content: "What is 6 x 7?".to_string(),
        question_type: QuestionType::ShortAnswer,
        difficulty: QuestionDifficulty::Easy,
        subject: "Mathematics".to_string(),
        topic: "Multiplication".to_string(),
        grade_level: "5".to_string(),
        options: None,
        correct_answer: "42".to_string(),
        explanation: None,
        points,
        created_by: Uuid::new_v4(),
        created_at: jiff::Timestamp::now(),
        updated_at: jiff::Timestamp::now(),
    }
}

pub fn submission(
    assessment_id: Uuid,
    student_id: Uuid,
    score: f64,
    status: SubmissionStatus,
    time_spent: u32,
) -> AssessmentSubmission {
    AssessmentSubmission {
        id: Uuid::new_v4(),
        assessment_id,
        student_id,
        answers: Vec::new(),
        score,
        started_at: jiff::Timestamp::now(),
        submitted_at: Some(jiff::Timestamp::now()),
        time_spent,
        status,
        feedback: None,
        graded_by: None,
        graded_at: None,
    }
}
