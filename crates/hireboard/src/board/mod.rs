//! Job-board posting quota and application lifecycle engine.
//!
//! The modules here own the invariants the rest of the platform leans on:
//! per-employer posting limits enforced through a conditional counter update,
//! at-most-one application per (seeker, job) pair, and employer-only review
//! transitions. Everything with an external side effect funnels through
//! [`BoardService`]; notification intents are emitted after the primary write
//! commits and are never awaited for correctness.

pub mod domain;
pub mod matching;
pub mod plans;
pub mod quota;
pub mod repository;
pub mod router;
pub mod service;
pub mod state;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantSnapshot, Application, ApplicationRequest, EmployerAccount, EmployerId, JobDraft,
    JobId, JobPosting, ScreeningAnswerView, SeekerId, SeekerProfile,
};
pub use matching::CategoryKeywords;
pub use plans::{Plan, PlanCatalog, PlanId, UNLIMITED_POSTS};
pub use quota::{QuotaError, QuotaLedger};
pub use repository::{
    ApplicationRepository, BoardStore, EmployerDirectory, JobRepository, NotificationAudience,
    NotificationError, NotificationIntent, NotificationPublisher, RepositoryError, SeekerDirectory,
};
pub use router::board_router;
pub use service::{BoardError, BoardService, TalentPoolFilter, MAX_SCREENING_QUESTIONS};
pub use state::{ApplicationStatus, ScreeningGateError, TransitionError};
