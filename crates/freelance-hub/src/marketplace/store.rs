use super::domain::{
    Account, AccountId, Application, ApplicationId, FreelancerAccount, Job, JobId,
    RecruiterAccount,
};

/// Storage abstraction so the lifecycle and dashboard modules can be
/// exercised against any backend. Entities are written whole; there is no
/// transaction spanning multiple calls, so callers that need multi-entity
/// consistency issue the writes sequentially and accept partial effects on
/// failure.
pub trait MarketplaceStore: Send + Sync {
    fn insert_account(&self, account: Account) -> Result<Account, StoreError>;
    fn update_account(&self, account: Account) -> Result<(), StoreError>;
    fn fetch_account(&self, id: &AccountId) -> Result<Option<Account>, StoreError>;
    /// Email lookup across both roles; the namespace is shared.
    fn account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    fn freelancers(&self) -> Result<Vec<FreelancerAccount>, StoreError>;
    fn recruiters(&self) -> Result<Vec<RecruiterAccount>, StoreError>;

    fn insert_job(&self, job: Job) -> Result<Job, StoreError>;
    fn update_job(&self, job: Job) -> Result<(), StoreError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;
    fn delete_job(&self, id: &JobId) -> Result<(), StoreError>;
    fn jobs(&self) -> Result<Vec<Job>, StoreError>;
    fn jobs_by_recruiter(&self, recruiter_id: &AccountId) -> Result<Vec<Job>, StoreError>;

    fn insert_application(&self, application: Application) -> Result<Application, StoreError>;
    fn update_application(&self, application: Application) -> Result<(), StoreError>;
    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    /// The (job, freelancer) pair lookup backing the duplicate-application check.
    fn application_for(
        &self,
        job_id: &JobId,
        freelancer_id: &AccountId,
    ) -> Result<Option<Application>, StoreError>;
    fn applications_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, StoreError>;
    fn applications_by_freelancer(
        &self,
        freelancer_id: &AccountId,
    ) -> Result<Vec<Application>, StoreError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
