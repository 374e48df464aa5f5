use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    Application, EmployerAccount, EmployerId, JobId, JobPosting, SeekerId, SeekerProfile,
};
use super::state::ApplicationStatus;

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Employer accounts plus the posting counter. The counter primitives carry
/// the only cross-request correctness guarantee in the system:
/// `increment_posts_if_below` must be a conditional update serialized per
/// employer id (compare-and-swap or equivalent row-level locking), never a
/// read followed by a separate write. Contention is scoped to one employer;
/// it must not block posts by other employers.
pub trait EmployerDirectory: Send + Sync {
    fn fetch_employer(&self, id: &EmployerId) -> Result<Option<EmployerAccount>, RepositoryError>;

    /// Increment the employer's posting count iff it is currently below
    /// `cap`. Returns the new count on success, `None` when the cap was
    /// already reached (no write happens in that case).
    fn increment_posts_if_below(
        &self,
        id: &EmployerId,
        cap: u32,
    ) -> Result<Option<u32>, RepositoryError>;

    /// Decrement the posting count, flooring at zero. Returns the new count.
    fn decrement_posts(&self, id: &EmployerId) -> Result<u32, RepositoryError>;
}

/// Job postings, keyed by job id.
pub trait JobRepository: Send + Sync {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    /// Remove and return the job, or `None` if it was never there (or already
    /// deleted) so callers can report not-found without touching the counter.
    fn remove_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn list_jobs(&self) -> Result<Vec<JobPosting>, RepositoryError>;
    fn jobs_by_employer(&self, employer: &EmployerId) -> Result<Vec<JobPosting>, RepositoryError>;
}

/// Seeker profiles. Profile writes happen elsewhere; the engine only reads.
pub trait SeekerDirectory: Send + Sync {
    fn fetch_seeker(&self, id: &SeekerId) -> Result<Option<SeekerProfile>, RepositoryError>;
    fn list_seekers(&self) -> Result<Vec<SeekerProfile>, RepositoryError>;
}

/// Applications, keyed by their composite (seeker, job) identity.
pub trait ApplicationRepository: Send + Sync {
    /// Insert, failing with [`RepositoryError::Conflict`] when an application
    /// for the same (seeker, job) pair already exists.
    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn fetch_application(
        &self,
        seeker: &SeekerId,
        job: &JobId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn update_application_status(
        &self,
        seeker: &SeekerId,
        job: &JobId,
        status: ApplicationStatus,
    ) -> Result<Application, RepositoryError>;
    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError>;
    fn applications_for_seeker(
        &self,
        seeker: &SeekerId,
    ) -> Result<Vec<Application>, RepositoryError>;
}

/// Everything the posting & application service needs from persistence.
pub trait BoardStore:
    EmployerDirectory + JobRepository + SeekerDirectory + ApplicationRepository
{
}

impl<T> BoardStore for T where
    T: EmployerDirectory + JobRepository + SeekerDirectory + ApplicationRepository
{
}

/// Who a notification intent is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAudience {
    AllSeekers,
    Employer(EmployerId),
    Seeker(SeekerId),
}

/// A "send notification" intent. Delivery is somebody else's problem; the
/// engine never awaits confirmation and never retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationIntent {
    pub template: String,
    pub audience: NotificationAudience,
    pub details: BTreeMap<String, String>,
}

/// Trait describing the outbound notification hook (e.g., a mail queue).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, intent: NotificationIntent) -> Result<(), NotificationError>;
}

/// Notification dispatch error. Terminal at the point of emission.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
