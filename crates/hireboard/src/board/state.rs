use serde::{Deserialize, Serialize};

/// Lifecycle status of an application. The "no application" state is
/// represented by record absence; once submitted, a seeker cannot withdraw or
/// re-apply, and each employer review outcome is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }

    /// True for the employer-set terminal statuses.
    pub const fn is_review_outcome(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Shortlisted | ApplicationStatus::Rejected | ApplicationStatus::Hired
        )
    }
}

/// Invalid transition attempts, raised before any state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("application was already reviewed as '{current}'")]
    AlreadyReviewed { current: &'static str },
    #[error("'{requested}' is not a valid review outcome")]
    NotReviewOutcome { requested: &'static str },
}

/// Validate an employer-driven move out of `Applied`.
pub fn review_transition(
    current: ApplicationStatus,
    next: ApplicationStatus,
) -> Result<(), TransitionError> {
    if !next.is_review_outcome() {
        return Err(TransitionError::NotReviewOutcome {
            requested: next.label(),
        });
    }
    if current != ApplicationStatus::Applied {
        return Err(TransitionError::AlreadyReviewed {
            current: current.label(),
        });
    }
    Ok(())
}

/// Screening questions that must always carry a non-blank answer when a job
/// enables screening.
pub const MANDATORY_ANSWERS: usize = 2;

/// Answer-count mismatch raised before the application is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("screening requires {expected} answer(s), received {received}")]
pub struct ScreeningGateError {
    pub expected: usize,
    pub received: usize,
}

/// Guard for the submission transition: a job with screening questions
/// requires exactly that many positional answers, and the first
/// [`MANDATORY_ANSWERS`] of them must be non-blank.
pub fn validate_screening_answers(
    questions: &[String],
    answers: &[String],
) -> Result<(), ScreeningGateError> {
    if questions.is_empty() {
        return Ok(());
    }

    let mismatch = ScreeningGateError {
        expected: questions.len(),
        received: answers.len(),
    };

    if answers.len() != questions.len() {
        return Err(mismatch);
    }

    let mandatory = questions.len().min(MANDATORY_ANSWERS);
    let blanks = answers[..mandatory]
        .iter()
        .filter(|answer| answer.trim().is_empty())
        .count();
    if blanks > 0 {
        return Err(ScreeningGateError {
            expected: questions.len(),
            received: questions.len() - blanks,
        });
    }

    Ok(())
}
