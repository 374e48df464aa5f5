use std::sync::Arc;

use super::domain::{EmployerAccount, EmployerId};
use super::plans::{Plan, PlanCatalog};
use super::repository::{EmployerDirectory, RepositoryError};

/// Tracks each employer's consumed posting slots against their plan's limit.
///
/// The ledger is the single source of truth for posting capacity; there is no
/// client-side mirror of the counter. All mutations go through the directory's
/// conditional primitives so concurrent posts by the same employer serialize.
pub struct QuotaLedger<R> {
    catalog: PlanCatalog,
    directory: Arc<R>,
}

impl<R: EmployerDirectory> QuotaLedger<R> {
    pub fn new(catalog: PlanCatalog, directory: Arc<R>) -> Self {
        Self { catalog, directory }
    }

    pub fn catalog(&self) -> &PlanCatalog {
        &self.catalog
    }

    /// Resolve the employer's plan, treating a dangling plan reference as a
    /// data fault rather than a quota answer.
    pub fn plan_for(&self, account: &EmployerAccount) -> Result<&Plan, QuotaError> {
        self.catalog
            .get(&account.plan)
            .ok_or_else(|| QuotaError::UnknownPlan(account.plan.0.clone()))
    }

    /// True iff the employer may publish one more job right now. Unlimited
    /// plans answer without consulting the counter.
    pub fn can_post(&self, employer: &EmployerId) -> Result<bool, QuotaError> {
        let account = self.account(employer)?;
        let plan = self.plan_for(&account)?;
        if plan.is_unlimited() {
            return Ok(true);
        }
        Ok(account.posts_used < plan.monthly_post_limit)
    }

    /// Consume one posting slot. Invoked only after the job write succeeded.
    /// Returns the new count; a cap hit under concurrency surfaces as
    /// [`QuotaError::LimitReached`] without any counter write. Unlimited
    /// plans still maintain the counter for reporting.
    pub fn record_post(&self, employer: &EmployerId) -> Result<u32, QuotaError> {
        let account = self.account(employer)?;
        let plan = self.plan_for(&account)?;
        let cap = if plan.is_unlimited() {
            u32::MAX
        } else {
            plan.monthly_post_limit
        };

        match self.directory.increment_posts_if_below(employer, cap)? {
            Some(count) => Ok(count),
            None => Err(QuotaError::LimitReached {
                limit: plan.monthly_post_limit,
                plan_name: plan.display_name.clone(),
            }),
        }
    }

    /// Release one slot after a deletion. Floors at zero: over-deleting (for
    /// example after a manual data correction) never drives the count
    /// negative.
    pub fn release_slot(&self, employer: &EmployerId) -> Result<u32, QuotaError> {
        self.account(employer)?;
        Ok(self.directory.decrement_posts(employer)?)
    }

    fn account(&self, employer: &EmployerId) -> Result<EmployerAccount, QuotaError> {
        self.directory
            .fetch_employer(employer)?
            .ok_or(QuotaError::UnknownEmployer)
    }
}

/// Error raised by the quota ledger.
#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("employer not found")]
    UnknownEmployer,
    #[error("employer references plan '{0}' which is not in the catalog")]
    UnknownPlan(String),
    #[error("posting limit {limit} reached on {plan_name}")]
    LimitReached { limit: u32, plan_name: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
