use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::plans::PlanId;
use super::state::ApplicationStatus;

/// Identifier wrapper for employer accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployerId(pub String);

/// Identifier wrapper for seeker profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeekerId(pub String);

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Employer record tracked by the quota ledger.
///
/// `posts_used` never exceeds the assigned plan's limit after a successful
/// mutation and never drops below zero; both bounds are enforced at the store
/// seam, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerAccount {
    pub id: EmployerId,
    pub company_name: String,
    pub plan: PlanId,
    pub posts_used: u32,
}

/// Seeker profile as the engine sees it. `cv_key` is an opaque pointer into
/// external file storage; the bytes never pass through this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekerProfile {
    pub id: SeekerId,
    pub full_name: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub cv_key: Option<String>,
}

impl SeekerProfile {
    pub fn has_cv(&self) -> bool {
        self.cv_key.is_some()
    }
}

/// Employer-supplied fields for a new posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub category: String,
    pub location: String,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub screening_questions: Vec<String>,
}

/// A published job. Created only through the quota-checked posting operation
/// and deleted only through the operation that releases the owner's slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub employer: EmployerId,
    pub title: String,
    pub category: String,
    pub location: String,
    pub required_skills: Vec<String>,
    pub screening_questions: Vec<String>,
    pub posted_at: DateTime<Utc>,
}

/// Seeker-supplied input for an application submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub seeker_id: SeekerId,
    pub job_id: JobId,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// An application, identified by its (seeker, job) pair. At most one exists
/// per pair; answers align positionally with the job's screening questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub seeker: SeekerId,
    pub job: JobId,
    pub status: ApplicationStatus,
    pub answers: Vec<String>,
    pub cover_letter: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// One screening question paired with the applicant's positional answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningAnswerView {
    pub question: String,
    pub answer: String,
}

/// Applicant row returned to the owning employer: application state joined
/// with a snapshot of the seeker's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSnapshot {
    pub seeker: SeekerId,
    pub full_name: String,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub cv_key: Option<String>,
    pub status: ApplicationStatus,
    pub screening: Vec<ScreeningAnswerView>,
    pub cover_letter: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl ApplicantSnapshot {
    pub fn from_parts(profile: &SeekerProfile, job: &JobPosting, application: &Application) -> Self {
        let screening = job
            .screening_questions
            .iter()
            .zip(application.answers.iter())
            .map(|(question, answer)| ScreeningAnswerView {
                question: question.clone(),
                answer: answer.clone(),
            })
            .collect();

        Self {
            seeker: profile.id.clone(),
            full_name: profile.full_name.clone(),
            skills: profile.skills.clone(),
            education: profile.education.clone(),
            cv_key: profile.cv_key.clone(),
            status: application.status,
            screening,
            cover_letter: application.cover_letter.clone(),
            submitted_at: application.submitted_at,
        }
    }
}
