use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, warn};

use super::domain::{
    ApplicantSnapshot, Application, ApplicationRequest, EmployerId, JobDraft, JobId, JobPosting,
    SeekerId, SeekerProfile,
};
use super::matching::{self, CategoryKeywords};
use super::plans::PlanCatalog;
use super::quota::{QuotaError, QuotaLedger};
use super::repository::{
    BoardStore, NotificationAudience, NotificationIntent, NotificationPublisher, RepositoryError,
};
use super::state::{
    self, ApplicationStatus, ScreeningGateError, TransitionError,
};

/// Upper bound on screening prompts per posting.
pub const MAX_SCREENING_QUESTIONS: usize = 3;

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// Employer-side talent pool filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TalentPoolFilter {
    Keyword(String),
    Category(String),
}

/// Service orchestrating the quota ledger, skill matcher, and application
/// state machine. The only component with externally visible side effects:
/// persisted writes plus best-effort notification intents emitted strictly
/// after the primary write commits.
pub struct BoardService<R, N> {
    ledger: QuotaLedger<R>,
    store: Arc<R>,
    notifications: Arc<N>,
    categories: CategoryKeywords,
}

impl<R, N> BoardService<R, N>
where
    R: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(store: Arc<R>, notifications: Arc<N>, catalog: PlanCatalog) -> Self {
        Self::with_categories(store, notifications, catalog, CategoryKeywords::standard())
    }

    pub fn with_categories(
        store: Arc<R>,
        notifications: Arc<N>,
        catalog: PlanCatalog,
        categories: CategoryKeywords,
    ) -> Self {
        let ledger = QuotaLedger::new(catalog, store.clone());
        Self {
            ledger,
            store,
            notifications,
            categories,
        }
    }

    pub fn ledger(&self) -> &QuotaLedger<R> {
        &self.ledger
    }

    /// Publish a job under the employer's plan quota.
    ///
    /// The counter is only touched after the job write succeeds. The
    /// increment itself is conditional: if a concurrent post consumed the
    /// last slot in between, the just-written job is removed again and the
    /// caller sees the same quota rejection it would have seen up front, so
    /// two simultaneous posts at `quota - 1` produce exactly one success.
    pub fn post_job(
        &self,
        employer_id: &EmployerId,
        draft: JobDraft,
    ) -> Result<JobPosting, BoardError> {
        if draft.screening_questions.len() > MAX_SCREENING_QUESTIONS {
            return Err(BoardError::TooManyScreeningQuestions {
                max: MAX_SCREENING_QUESTIONS,
            });
        }

        let account = self
            .store
            .fetch_employer(employer_id)?
            .ok_or(BoardError::NotFound)?;
        if !self.ledger.can_post(employer_id)? {
            let plan = self.ledger.plan_for(&account)?;
            return Err(BoardError::QuotaExceeded {
                limit: plan.monthly_post_limit,
                plan_name: plan.display_name.clone(),
            });
        }

        let job = JobPosting {
            id: next_job_id(),
            employer: employer_id.clone(),
            title: draft.title,
            category: draft.category,
            location: draft.location,
            required_skills: draft.required_skills,
            screening_questions: draft.screening_questions,
            posted_at: Utc::now(),
        };
        let job = self.store.insert_job(job)?;

        match self.ledger.record_post(employer_id) {
            Ok(_) => {}
            Err(QuotaError::LimitReached { limit, plan_name }) => {
                // Lost the race for the last slot; take the posting back out.
                if let Err(err) = self.store.remove_job(&job.id) {
                    error!(job = %job.id.0, %err, "failed to roll back over-quota posting");
                    return Err(BoardError::InconsistentState(format!(
                        "job {} persisted without a counted slot",
                        job.id.0
                    )));
                }
                return Err(BoardError::QuotaExceeded { limit, plan_name });
            }
            Err(err) => {
                error!(job = %job.id.0, %err, "posting counter update failed after job write");
                return Err(BoardError::InconsistentState(format!(
                    "job {} persisted without a counted slot",
                    job.id.0
                )));
            }
        }

        let mut details = BTreeMap::new();
        details.insert("job_id".to_string(), job.id.0.clone());
        details.insert("title".to_string(), job.title.clone());
        details.insert("company".to_string(), account.company_name.clone());
        self.emit(NotificationIntent {
            template: "job_published".to_string(),
            audience: NotificationAudience::AllSeekers,
            details,
        });

        Ok(job)
    }

    /// Delete an owned posting and release its quota slot. Deleting an id
    /// that no longer exists reports not-found with no counter change.
    pub fn delete_job(&self, employer_id: &EmployerId, job_id: &JobId) -> Result<u32, BoardError> {
        let job = self.store.fetch_job(job_id)?.ok_or(BoardError::NotFound)?;
        if &job.employer != employer_id {
            return Err(BoardError::Forbidden);
        }

        if self.store.remove_job(job_id)?.is_none() {
            // Deleted underneath us between fetch and remove.
            return Err(BoardError::NotFound);
        }

        Ok(self.ledger.release_slot(employer_id)?)
    }

    /// Submit an application, running the state machine's intake guards in
    /// order before anything is written.
    pub fn submit_application(
        &self,
        request: ApplicationRequest,
    ) -> Result<Application, BoardError> {
        let job = self
            .store
            .fetch_job(&request.job_id)?
            .ok_or(BoardError::NotFound)?;
        let seeker = self
            .store
            .fetch_seeker(&request.seeker_id)?
            .ok_or(BoardError::NotFound)?;

        if !seeker.has_cv() {
            return Err(BoardError::CvMissing);
        }

        state::validate_screening_answers(&job.screening_questions, &request.answers)?;

        if self
            .store
            .fetch_application(&request.seeker_id, &request.job_id)?
            .is_some()
        {
            return Err(BoardError::DuplicateApplication);
        }

        let application = Application {
            seeker: request.seeker_id,
            job: request.job_id,
            status: ApplicationStatus::Applied,
            answers: request.answers,
            cover_letter: request.cover_letter,
            submitted_at: Utc::now(),
        };
        let application = match self.store.insert_application(application) {
            Ok(stored) => stored,
            // A racing submission for the same pair reads as a duplicate.
            Err(RepositoryError::Conflict) => return Err(BoardError::DuplicateApplication),
            Err(err) => return Err(err.into()),
        };

        let mut details = BTreeMap::new();
        details.insert("job_id".to_string(), job.id.0.clone());
        details.insert("title".to_string(), job.title.clone());
        details.insert("seeker".to_string(), seeker.full_name.clone());
        self.emit(NotificationIntent {
            template: "application_received".to_string(),
            audience: NotificationAudience::Employer(job.employer.clone()),
            details,
        });

        Ok(application)
    }

    /// Move an application out of `Applied` into an employer review outcome.
    pub fn review_application(
        &self,
        employer_id: &EmployerId,
        seeker_id: &SeekerId,
        job_id: &JobId,
        next: ApplicationStatus,
    ) -> Result<Application, BoardError> {
        let job = self.store.fetch_job(job_id)?.ok_or(BoardError::NotFound)?;
        if &job.employer != employer_id {
            return Err(BoardError::Forbidden);
        }

        let application = self
            .store
            .fetch_application(seeker_id, job_id)?
            .ok_or(BoardError::NotFound)?;
        state::review_transition(application.status, next)?;

        let updated = self
            .store
            .update_application_status(seeker_id, job_id, next)?;

        let mut details = BTreeMap::new();
        details.insert("job_id".to_string(), job.id.0.clone());
        details.insert("title".to_string(), job.title.clone());
        details.insert("status".to_string(), next.label().to_string());
        self.emit(NotificationIntent {
            template: "application_status".to_string(),
            audience: NotificationAudience::Seeker(seeker_id.clone()),
            details,
        });

        Ok(updated)
    }

    /// Applicant list for an owned posting, ordered by submission time, with
    /// each seeker's profile snapshot and positional screening answers.
    pub fn applicants_for_job(
        &self,
        employer_id: &EmployerId,
        job_id: &JobId,
    ) -> Result<Vec<ApplicantSnapshot>, BoardError> {
        let job = self.store.fetch_job(job_id)?.ok_or(BoardError::NotFound)?;
        if &job.employer != employer_id {
            return Err(BoardError::Forbidden);
        }

        let mut applications = self.store.applications_for_job(job_id)?;
        applications.sort_by_key(|application| application.submitted_at);

        let mut snapshots = Vec::with_capacity(applications.len());
        for application in &applications {
            let profile = self
                .store
                .fetch_seeker(&application.seeker)?
                .ok_or_else(|| {
                    BoardError::InconsistentState(format!(
                        "application references missing seeker {}",
                        application.seeker.0
                    ))
                })?;
            snapshots.push(ApplicantSnapshot::from_parts(&profile, &job, application));
        }

        Ok(snapshots)
    }

    /// Jobs matching the seeker's skills, excluding ones already applied to.
    pub fn shortlist_for_seeker(
        &self,
        seeker_id: &SeekerId,
    ) -> Result<Vec<JobPosting>, BoardError> {
        let profile = self
            .store
            .fetch_seeker(seeker_id)?
            .ok_or(BoardError::NotFound)?;

        let jobs = self.store.list_jobs()?;
        let applied: HashSet<JobId> = self
            .store
            .applications_for_seeker(seeker_id)?
            .into_iter()
            .map(|application| application.job)
            .collect();

        Ok(matching::shortlist(&profile, &jobs, &applied))
    }

    /// Employer-side seeker filtering by keyword or category. An unknown
    /// category yields an empty pool rather than an error.
    pub fn talent_pool(
        &self,
        employer_id: &EmployerId,
        filter: TalentPoolFilter,
    ) -> Result<Vec<SeekerProfile>, BoardError> {
        self.store
            .fetch_employer(employer_id)?
            .ok_or(BoardError::NotFound)?;

        let seekers = self.store.list_seekers()?;
        let pool = seekers
            .into_iter()
            .filter(|seeker| match &filter {
                TalentPoolFilter::Keyword(keyword) => {
                    matching::skills_contain_keyword(&seeker.skills, keyword)
                }
                TalentPoolFilter::Category(category) => {
                    self.categories.seeker_matches(category, &seeker.skills)
                }
            })
            .collect();

        Ok(pool)
    }

    /// Fire-and-forget: runs after the primary write committed, holds no
    /// locks, and a delivery failure is logged and dropped rather than
    /// surfaced or retried.
    fn emit(&self, intent: NotificationIntent) {
        let template = intent.template.clone();
        if let Err(err) = self.notifications.publish(intent) {
            warn!(%template, %err, "notification intent dropped");
        }
    }
}

/// Error raised by the posting & application service.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("posting limit {limit} reached on {plan_name}")]
    QuotaExceeded { limit: u32, plan_name: String },
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("an application for this job already exists")]
    DuplicateApplication,
    #[error("a CV must be on file before applying")]
    CvMissing,
    #[error(transparent)]
    MissingScreeningAnswers(#[from] ScreeningGateError),
    #[error("a posting may carry at most {max} screening questions")]
    TooManyScreeningQuestions { max: usize },
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("posting counter diverged from stored jobs: {0}")]
    InconsistentState(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl BoardError {
    /// Stable discriminant used in wire payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            BoardError::QuotaExceeded { .. } => "quota_exceeded",
            BoardError::Forbidden => "forbidden",
            BoardError::NotFound => "not_found",
            BoardError::DuplicateApplication => "duplicate_application",
            BoardError::CvMissing => "cv_missing",
            BoardError::MissingScreeningAnswers(_) => "missing_screening_answers",
            BoardError::TooManyScreeningQuestions { .. } => "too_many_screening_questions",
            BoardError::Transition(_) => "invalid_transition",
            BoardError::InconsistentState(_) => "inconsistent_state",
            BoardError::Repository(_) => "repository",
        }
    }
}

impl From<QuotaError> for BoardError {
    fn from(value: QuotaError) -> Self {
        match value {
            QuotaError::LimitReached { limit, plan_name } => {
                BoardError::QuotaExceeded { limit, plan_name }
            }
            QuotaError::UnknownEmployer => BoardError::NotFound,
            QuotaError::UnknownPlan(plan) => BoardError::InconsistentState(format!(
                "employer references unknown plan '{plan}'"
            )),
            QuotaError::Repository(err) => BoardError::Repository(err),
        }
    }
}
