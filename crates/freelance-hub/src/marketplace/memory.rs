use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{
    Account, AccountId, Application, ApplicationId, FreelancerAccount, Job, JobId,
    RecruiterAccount,
};
use super::store::{MarketplaceStore, StoreError};

/// Mutex-guarded in-memory store backing the service binary and the tests.
/// Individual operations are serialized per map; nothing locks across a
/// read-modify-write sequence, so lost updates between concurrent requests
/// remain possible (a documented limitation of the design, not a bug).
#[derive(Default, Clone)]
pub struct InMemoryStore {
    accounts: Arc<Mutex<HashMap<AccountId, Account>>>,
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
    applications: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl MarketplaceStore for InMemoryStore {
    fn insert_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut guard = self.accounts.lock().expect("account mutex poisoned");
        if guard.contains_key(account.id()) {
            return Err(StoreError::Conflict);
        }
        guard.insert(account.id().clone(), account.clone());
        Ok(account)
    }

    fn update_account(&self, account: Account) -> Result<(), StoreError> {
        let mut guard = self.accounts.lock().expect("account mutex poisoned");
        if !guard.contains_key(account.id()) {
            return Err(StoreError::NotFound);
        }
        guard.insert(account.id().clone(), account);
        Ok(())
    }

    fn fetch_account(&self, id: &AccountId) -> Result<Option<Account>, StoreError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn account_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard
            .values()
            .find(|account| account.email().eq_ignore_ascii_case(email))
            .cloned())
    }

    fn freelancers(&self) -> Result<Vec<FreelancerAccount>, StoreError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard
            .values()
            .filter_map(|account| match account {
                Account::Freelancer(freelancer) => Some(freelancer.clone()),
                Account::Recruiter(_) => None,
            })
            .collect())
    }

    fn recruiters(&self) -> Result<Vec<RecruiterAccount>, StoreError> {
        let guard = self.accounts.lock().expect("account mutex poisoned");
        Ok(guard
            .values()
            .filter_map(|account| match account {
                Account::Recruiter(recruiter) => Some(recruiter.clone()),
                Account::Freelancer(_) => None,
            })
            .collect())
    }

    fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update_job(&self, job: Job) -> Result<(), StoreError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        if !guard.contains_key(&job.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(job.id.clone(), job);
        Ok(())
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete_job(&self, id: &JobId) -> Result<(), StoreError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        match guard.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    fn jobs(&self) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn jobs_by_recruiter(&self, recruiter_id: &AccountId) -> Result<Vec<Job>, StoreError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard
            .values()
            .filter(|job| job.recruiter_id == *recruiter_id)
            .cloned()
            .collect())
    }

    fn insert_application(&self, application: Application) -> Result<Application, StoreError> {
        let mut guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        if guard.contains_key(&application.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<(), StoreError> {
        let mut guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        if !guard.contains_key(&application.id) {
            return Err(StoreError::NotFound);
        }
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch_application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        let guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn application_for(
        &self,
        job_id: &JobId,
        freelancer_id: &AccountId,
    ) -> Result<Option<Application>, StoreError> {
        let guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        Ok(guard
            .values()
            .find(|application| {
                application.job_id == *job_id && application.freelancer_id == *freelancer_id
            })
            .cloned())
    }

    fn applications_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, StoreError> {
        let guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| application.job_id == *job_id)
            .cloned()
            .collect())
    }

    fn applications_by_freelancer(
        &self,
        freelancer_id: &AccountId,
    ) -> Result<Vec<Application>, StoreError> {
        let guard = self
            .applications
            .lock()
            .expect("application mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| application.freelancer_id == *freelancer_id)
            .cloned()
            .collect())
    }
}
