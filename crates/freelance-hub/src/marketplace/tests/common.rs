use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::marketplace::domain::{
    Account, AccountId, Application, ApplicationId, FreelancerAccount, Job, JobDraft, JobId,
    RecruiterAccount, Role,
};
use crate::marketplace::lifecycle::MarketplaceService;
use crate::marketplace::memory::InMemoryStore;
use crate::marketplace::policy::Principal;
use crate::marketplace::router::{marketplace_router, MarketplaceState};
use crate::marketplace::store::{MarketplaceStore, StoreError};

pub(super) fn build_service() -> (MarketplaceService<InMemoryStore>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    (MarketplaceService::new(store.clone()), store)
}

pub(super) fn build_router() -> (axum::Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let state = Arc::new(MarketplaceState::new(store.clone()));
    (marketplace_router(state), store)
}

pub(super) fn recruiter_account(id: &str) -> RecruiterAccount {
    RecruiterAccount {
        id: AccountId(id.to_string()),
        name: "Sarah Johnson".to_string(),
        email: format!("{id}@techcorp.example"),
        password_hash: "unused".to_string(),
        location: Some("San Francisco, USA".to_string()),
        bio: None,
        company: "TechCorp Inc.".to_string(),
        experience: Some("5+ years in tech recruitment".to_string()),
        total_listings: 0,
        successful_hires: 0,
        active_listings: Vec::new(),
    }
}

pub(super) fn freelancer_account(id: &str) -> FreelancerAccount {
    FreelancerAccount {
        id: AccountId(id.to_string()),
        name: "John Smith".to_string(),
        email: format!("{id}@example.com"),
        password_hash: "unused".to_string(),
        location: Some("New York, USA".to_string()),
        bio: Some("Full-stack developer".to_string()),
        skills: vec!["Rust".to_string(), "Go".to_string()],
        rating: 4.8,
        total_earnings: "0 USD".to_string(),
        hours_worked: 0,
        active_projects: Vec::new(),
        recommended_jobs: Vec::new(),
    }
}

pub(super) fn insert_recruiter(store: &InMemoryStore, id: &str) -> Principal {
    store
        .insert_account(Account::Recruiter(recruiter_account(id)))
        .expect("recruiter inserts");
    Principal {
        id: AccountId(id.to_string()),
        role: Role::Recruiter,
    }
}

pub(super) fn insert_freelancer(store: &InMemoryStore, id: &str) -> Principal {
    store
        .insert_account(Account::Freelancer(freelancer_account(id)))
        .expect("freelancer inserts");
    Principal {
        id: AccountId(id.to_string()),
        role: Role::Freelancer,
    }
}

pub(super) fn job_draft() -> JobDraft {
    JobDraft {
        title: "Build marketplace API".to_string(),
        description: "Implement the JSON API for the hiring flow".to_string(),
        location: Some("Remote".to_string()),
        skills_required: vec!["Rust".to_string(), "Axum".to_string()],
        budget: "$2,500".to_string(),
        deadline: "2025-12-01".to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store whose every operation fails, for surfacing-unhandled-error paths.
pub(super) struct UnavailableStore;

fn unavailable<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("store offline".to_string()))
}

impl MarketplaceStore for UnavailableStore {
    fn insert_account(&self, _account: Account) -> Result<Account, StoreError> {
        unavailable()
    }
    fn update_account(&self, _account: Account) -> Result<(), StoreError> {
        unavailable()
    }
    fn fetch_account(&self, _id: &AccountId) -> Result<Option<Account>, StoreError> {
        unavailable()
    }
    fn account_by_email(&self, _email: &str) -> Result<Option<Account>, StoreError> {
        unavailable()
    }
    fn freelancers(&self) -> Result<Vec<FreelancerAccount>, StoreError> {
        unavailable()
    }
    fn recruiters(&self) -> Result<Vec<RecruiterAccount>, StoreError> {
        unavailable()
    }
    fn insert_job(&self, _job: Job) -> Result<Job, StoreError> {
        unavailable()
    }
    fn update_job(&self, _job: Job) -> Result<(), StoreError> {
        unavailable()
    }
    fn fetch_job(&self, _id: &JobId) -> Result<Option<Job>, StoreError> {
        unavailable()
    }
    fn delete_job(&self, _id: &JobId) -> Result<(), StoreError> {
        unavailable()
    }
    fn jobs(&self) -> Result<Vec<Job>, StoreError> {
        unavailable()
    }
    fn jobs_by_recruiter(&self, _recruiter_id: &AccountId) -> Result<Vec<Job>, StoreError> {
        unavailable()
    }
    fn insert_application(&self, _application: Application) -> Result<Application, StoreError> {
        unavailable()
    }
    fn update_application(&self, _application: Application) -> Result<(), StoreError> {
        unavailable()
    }
    fn fetch_application(&self, _id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        unavailable()
    }
    fn application_for(
        &self,
        _job_id: &JobId,
        _freelancer_id: &AccountId,
    ) -> Result<Option<Application>, StoreError> {
        unavailable()
    }
    fn applications_by_job(&self, _job_id: &JobId) -> Result<Vec<Application>, StoreError> {
        unavailable()
    }
    fn applications_by_freelancer(
        &self,
        _freelancer_id: &AccountId,
    ) -> Result<Vec<Application>, StoreError> {
        unavailable()
    }
}

/// Delegating store that fails `update_account` for one account id, to
/// exercise the accepted partial-write failure mode of multi-entity
/// operations.
pub(super) struct FailAccountUpdate {
    pub(super) inner: InMemoryStore,
    pub(super) fail_for: AccountId,
}

impl MarketplaceStore for FailAccountUpdate {
    fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        self.inner.insert_account(account)
    }
    fn update_account(&self, account: Account) -> Result<(), StoreError> {
        if *account.id() == self.fail_for {
            return Err(StoreError::Unavailable("account write refused".to_string()));
        }
        self.inner.update_account(account)
    }
    fn fetch_account(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        self.inner.fetch_account(id)
    }
    fn account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.inner.account_by_email(email)
    }
    fn freelancers(&self) -> Result<Vec<FreelancerAccount>, StoreError> {
        self.inner.freelancers()
    }
    fn recruiters(&self) -> Result<Vec<RecruiterAccount>, StoreError> {
        self.inner.recruiters()
    }
    fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        self.inner.insert_job(job)
    }
    fn update_job(&self, job: Job) -> Result<(), StoreError> {
        self.inner.update_job(job)
    }
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        self.inner.fetch_job(id)
    }
    fn delete_job(&self, id: &JobId) -> Result<(), StoreError> {
        self.inner.delete_job(id)
    }
    fn jobs(&self) -> Result<Vec<Job>, StoreError> {
        self.inner.jobs()
    }
    fn jobs_by_recruiter(&self, recruiter_id: &AccountId) -> Result<Vec<Job>, StoreError> {
        self.inner.jobs_by_recruiter(recruiter_id)
    }
    fn insert_application(&self, application: Application) -> Result<Application, StoreError> {
        self.inner.insert_application(application)
    }
    fn update_application(&self, application: Application) -> Result<(), StoreError> {
        self.inner.update_application(application)
    }
    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        self.inner.fetch_application(id)
    }
    fn application_for(
        &self,
        job_id: &JobId,
        freelancer_id: &AccountId,
    ) -> Result<Option<Application>, StoreError> {
        self.inner.application_for(job_id, freelancer_id)
    }
    fn applications_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, StoreError> {
        self.inner.applications_by_job(job_id)
    }
    fn applications_by_freelancer(
        &self,
        freelancer_id: &AccountId,
    ) -> Result<Vec<Application>, StoreError> {
        self.inner.applications_by_freelancer(freelancer_id)
    }
}
