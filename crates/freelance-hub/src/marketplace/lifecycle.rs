use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Account, AccountId, ActiveListing, ActiveProject, Application, ApplicationId,
    ApplicationStatus, ApplicationWithApplicant, ApplicationWithJob, FreelancerAccount,
    FreelancerCard, FreelancerProfileUpdate, FreelancerView, Job, JobDraft, JobId, JobStatus,
    JobSummary, JobUpdate, ProjectStatus, RecruiterAccount, RecruiterCard, RecruiterProfileUpdate,
    RecruiterView, Role,
};
use super::policy::{ensure_job_owner, Principal, PolicyError};
use super::search::{FreelancerSearch, JobSearch};
use super::store::{MarketplaceStore, StoreError};

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Errors raised by marketplace operations.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error("already applied to this job")]
    DuplicateApplication,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns every Job and Application state transition together with the
/// denormalized side effects those transitions imply (recruiter listing
/// caches and hire counts, freelancer project lists).
///
/// Multi-entity operations issue their writes sequentially with no
/// transaction and no rollback: a failure mid-sequence surfaces as an error
/// with the completed effects left in place.
pub struct MarketplaceService<S> {
    store: Arc<S>,
}

impl<S> MarketplaceService<S>
where
    S: MarketplaceStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    // ── Job lifecycle ──────────────────────────────────────────────────

    /// Post a new job. Creates the Job record, then appends a listing
    /// snapshot to the recruiter and bumps `total_listings`.
    pub fn post_job(
        &self,
        principal: &Principal,
        draft: JobDraft,
    ) -> Result<Job, MarketplaceError> {
        principal.require_role(Role::Recruiter)?;
        let mut recruiter = self.fetch_recruiter(&principal.id)?;
        validate_job_draft(&draft)?;

        let company = if recruiter.company.trim().is_empty() {
            "Company".to_string()
        } else {
            recruiter.company.clone()
        };

        let job = Job {
            id: next_job_id(),
            recruiter_id: recruiter.id.clone(),
            recruiter_name: recruiter.name.clone(),
            title: draft.title,
            description: draft.description,
            company,
            location: draft.location,
            skills_required: draft.skills_required,
            budget: draft.budget,
            deadline: draft.deadline,
            status: JobStatus::Active,
            applications: Vec::new(),
            created_at: Utc::now(),
        };

        let job = self.store.insert_job(job)?;

        recruiter.active_listings.push(ActiveListing {
            job_id: job.id.clone(),
            title: job.title.clone(),
            skills_required: job.skills_required.clone(),
            budget: job.budget.clone(),
            deadline: job.deadline.clone(),
        });
        recruiter.total_listings += 1;
        self.store.update_account(Account::Recruiter(recruiter))?;

        info!(job_id = %job.id.0, recruiter_id = %job.recruiter_id.0, "job posted");
        Ok(job)
    }

    /// Update an owned job, re-syncing the recruiter's listing cache entry.
    /// A missing cache entry is skipped, not repaired.
    pub fn update_job(
        &self,
        principal: &Principal,
        job_id: &JobId,
        update: JobUpdate,
    ) -> Result<Job, MarketplaceError> {
        principal.require_role(Role::Recruiter)?;
        let mut job = self
            .store
            .fetch_job(job_id)?
            .ok_or(MarketplaceError::NotFound("job"))?;
        ensure_job_owner(&job, principal)?;

        if let Some(title) = update.title {
            job.title = title;
        }
        if let Some(description) = update.description {
            job.description = description;
        }
        if let Some(location) = update.location {
            job.location = Some(location);
        }
        if let Some(skills_required) = update.skills_required {
            job.skills_required = skills_required;
        }
        if let Some(budget) = update.budget {
            job.budget = budget;
        }
        if let Some(deadline) = update.deadline {
            job.deadline = deadline;
        }
        if let Some(status) = update.status {
            job.status = status;
        }

        self.store.update_job(job.clone())?;

        let mut recruiter = self.fetch_recruiter(&principal.id)?;
        match recruiter
            .active_listings
            .iter_mut()
            .find(|listing| listing.job_id == job.id)
        {
            Some(listing) => {
                *listing = ActiveListing {
                    job_id: job.id.clone(),
                    title: job.title.clone(),
                    skills_required: job.skills_required.clone(),
                    budget: job.budget.clone(),
                    deadline: job.deadline.clone(),
                };
                self.store.update_account(Account::Recruiter(recruiter))?;
            }
            None => {
                warn!(job_id = %job.id.0, "no listing cache entry to refresh, skipping sync");
            }
        }

        Ok(job)
    }

    /// Delete an owned job and strip its listing cache entry. Applications
    /// referencing the job are left in place (no cascade).
    pub fn delete_job(
        &self,
        principal: &Principal,
        job_id: &JobId,
    ) -> Result<(), MarketplaceError> {
        principal.require_role(Role::Recruiter)?;
        let job = self
            .store
            .fetch_job(job_id)?
            .ok_or(MarketplaceError::NotFound("job"))?;
        ensure_job_owner(&job, principal)?;

        self.store.delete_job(job_id)?;

        let mut recruiter = self.fetch_recruiter(&principal.id)?;
        recruiter
            .active_listings
            .retain(|listing| listing.job_id != *job_id);
        self.store.update_account(Account::Recruiter(recruiter))?;

        info!(job_id = %job_id.0, "job deleted");
        Ok(())
    }

    // ── Application lifecycle ──────────────────────────────────────────

    /// Submit an application. One per (job, freelancer) pair, enforced by an
    /// existence check before insert.
    pub fn apply(
        &self,
        principal: &Principal,
        job_id: &JobId,
        cover_letter: String,
    ) -> Result<Application, MarketplaceError> {
        principal.require_role(Role::Freelancer)?;
        let mut job = self
            .store
            .fetch_job(job_id)?
            .ok_or(MarketplaceError::NotFound("job"))?;

        if self.store.application_for(job_id, &principal.id)?.is_some() {
            return Err(MarketplaceError::DuplicateApplication);
        }

        let application = Application {
            id: next_application_id(),
            job_id: job.id.clone(),
            freelancer_id: principal.id.clone(),
            cover_letter,
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
        };
        let application = self.store.insert_application(application)?;

        job.applications.push(application.id.clone());
        self.store.update_job(job)?;

        info!(
            application_id = %application.id.0,
            job_id = %job_id.0,
            "application submitted"
        );
        Ok(application)
    }

    /// Transition an application to accepted or rejected. The status write is
    /// unconditional: callers treat accepted and rejected as final, but
    /// nothing blocks a later re-write. On accepted, the recruiter's hire
    /// counter and the freelancer's project list are updated as two further
    /// independent writes.
    pub fn set_application_status(
        &self,
        principal: &Principal,
        application_id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, MarketplaceError> {
        principal.require_role(Role::Recruiter)?;
        if status == ApplicationStatus::Pending {
            return Err(MarketplaceError::Validation(
                "status must be accepted or rejected".to_string(),
            ));
        }

        let mut application = self
            .store
            .fetch_application(application_id)?
            .ok_or(MarketplaceError::NotFound("application"))?;
        let job = self
            .store
            .fetch_job(&application.job_id)?
            .ok_or(MarketplaceError::NotFound("job"))?;
        ensure_job_owner(&job, principal)?;

        application.status = status;
        self.store.update_application(application.clone())?;

        if status == ApplicationStatus::Accepted {
            let mut recruiter = self.fetch_recruiter(&principal.id)?;
            recruiter.successful_hires += 1;
            self.store.update_account(Account::Recruiter(recruiter))?;

            let mut freelancer = self.fetch_freelancer(&application.freelancer_id)?;
            freelancer.active_projects.push(ActiveProject {
                job_id: job.id.clone(),
                title: job.title.clone(),
                client: job.company.clone(),
                due_date: job.deadline.clone(),
                status: ProjectStatus::InProgress,
                progress: 0,
            });
            self.store.update_account(Account::Freelancer(freelancer))?;

            info!(application_id = %application.id.0, "application accepted");
        }

        Ok(application)
    }

    /// Advance a freelancer's project snapshot. Hitting 100 also marks the
    /// project completed.
    pub fn update_project_progress(
        &self,
        principal: &Principal,
        project_id: &JobId,
        progress: u8,
    ) -> Result<Vec<ActiveProject>, MarketplaceError> {
        principal.require_role(Role::Freelancer)?;
        if progress > 100 {
            return Err(MarketplaceError::Validation(
                "progress must be between 0 and 100".to_string(),
            ));
        }

        let mut freelancer = self.fetch_freelancer(&principal.id)?;
        let project = freelancer
            .active_projects
            .iter_mut()
            .find(|project| project.job_id == *project_id)
            .ok_or(MarketplaceError::NotFound("project"))?;

        project.progress = progress;
        if progress == 100 {
            project.status = ProjectStatus::Completed;
        }

        let projects = freelancer.active_projects.clone();
        self.store.update_account(Account::Freelancer(freelancer))?;
        Ok(projects)
    }

    // ── Job and application reads ──────────────────────────────────────

    /// Public newest-first listing of active jobs.
    pub fn active_jobs(&self) -> Result<Vec<Job>, MarketplaceError> {
        let mut jobs: Vec<Job> = self
            .store
            .jobs()?
            .into_iter()
            .filter(|job| job.status == JobStatus::Active)
            .collect();
        sort_newest_first(&mut jobs);
        Ok(jobs)
    }

    pub fn job(&self, job_id: &JobId) -> Result<Job, MarketplaceError> {
        self.store
            .fetch_job(job_id)?
            .ok_or(MarketplaceError::NotFound("job"))
    }

    /// Substring/skill filtering over active jobs. Plain filtering, no
    /// relevance ranking.
    pub fn search_jobs(&self, search: &JobSearch) -> Result<Vec<Job>, MarketplaceError> {
        let mut jobs: Vec<Job> = self
            .store
            .jobs()?
            .into_iter()
            .filter(|job| job.status == JobStatus::Active && search.matches(job))
            .collect();
        sort_newest_first(&mut jobs);
        Ok(jobs)
    }

    /// A recruiter's own postings, newest first.
    pub fn recruiter_jobs(&self, principal: &Principal) -> Result<Vec<Job>, MarketplaceError> {
        principal.require_role(Role::Recruiter)?;
        let mut jobs = self.store.jobs_by_recruiter(&principal.id)?;
        sort_newest_first(&mut jobs);
        Ok(jobs)
    }

    /// Applications for one owned job, each with the applicant's public card.
    pub fn applications_for_job(
        &self,
        principal: &Principal,
        job_id: &JobId,
    ) -> Result<Vec<ApplicationWithApplicant>, MarketplaceError> {
        principal.require_role(Role::Recruiter)?;
        let job = self
            .store
            .fetch_job(job_id)?
            .ok_or(MarketplaceError::NotFound("job"))?;
        ensure_job_owner(&job, principal)?;

        let applications = self.store.applications_by_job(job_id)?;
        self.with_applicants(applications)
    }

    /// Every application across all of the recruiter's jobs.
    pub fn applications_for_recruiter(
        &self,
        principal: &Principal,
    ) -> Result<Vec<ApplicationWithApplicant>, MarketplaceError> {
        principal.require_role(Role::Recruiter)?;
        let mut applications = Vec::new();
        for job in self.store.jobs_by_recruiter(&principal.id)? {
            applications.extend(self.store.applications_by_job(&job.id)?);
        }
        self.with_applicants(applications)
    }

    /// The freelancer's own applications, each with a job summary when the
    /// posting still exists. Orphaned applications (job deleted) stay
    /// retrievable with `job: None`.
    pub fn my_applications(
        &self,
        principal: &Principal,
    ) -> Result<Vec<ApplicationWithJob>, MarketplaceError> {
        principal.require_role(Role::Freelancer)?;
        let applications = self.store.applications_by_freelancer(&principal.id)?;
        let mut rows = Vec::with_capacity(applications.len());
        for application in applications {
            let job = self
                .store
                .fetch_job(&application.job_id)?
                .as_ref()
                .map(JobSummary::from);
            rows.push(ApplicationWithJob { application, job });
        }
        rows.sort_by(|a, b| b.application.applied_at.cmp(&a.application.applied_at));
        Ok(rows)
    }

    // ── Profiles and directories ───────────────────────────────────────

    pub fn update_freelancer_profile(
        &self,
        principal: &Principal,
        update: FreelancerProfileUpdate,
    ) -> Result<FreelancerView, MarketplaceError> {
        principal.require_role(Role::Freelancer)?;
        let mut freelancer = self.fetch_freelancer(&principal.id)?;

        if let Some(name) = update.name {
            freelancer.name = name;
        }
        if let Some(bio) = update.bio {
            freelancer.bio = Some(bio);
        }
        if let Some(location) = update.location {
            freelancer.location = Some(location);
        }
        if let Some(skills) = update.skills {
            freelancer.skills = skills;
        }

        self.store
            .update_account(Account::Freelancer(freelancer.clone()))?;
        Ok(freelancer.into())
    }

    pub fn update_recruiter_profile(
        &self,
        principal: &Principal,
        update: RecruiterProfileUpdate,
    ) -> Result<RecruiterView, MarketplaceError> {
        principal.require_role(Role::Recruiter)?;
        let mut recruiter = self.fetch_recruiter(&principal.id)?;

        if let Some(name) = update.name {
            recruiter.name = name;
        }
        if let Some(company) = update.company {
            recruiter.company = company;
        }
        if let Some(bio) = update.bio {
            recruiter.bio = Some(bio);
        }
        if let Some(location) = update.location {
            recruiter.location = Some(location);
        }
        if let Some(experience) = update.experience {
            recruiter.experience = Some(experience);
        }

        self.store
            .update_account(Account::Recruiter(recruiter.clone()))?;
        Ok(recruiter.into())
    }

    pub fn freelancer(&self, id: &AccountId) -> Result<FreelancerView, MarketplaceError> {
        self.fetch_freelancer(id).map(FreelancerView::from)
    }

    pub fn freelancers(&self) -> Result<Vec<FreelancerCard>, MarketplaceError> {
        let mut cards: Vec<FreelancerCard> = self
            .store
            .freelancers()?
            .into_iter()
            .map(FreelancerCard::from)
            .collect();
        cards.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(cards)
    }

    pub fn search_freelancers(
        &self,
        search: &FreelancerSearch,
    ) -> Result<Vec<FreelancerCard>, MarketplaceError> {
        let mut cards: Vec<FreelancerCard> = self
            .store
            .freelancers()?
            .into_iter()
            .filter(|freelancer| search.matches(freelancer))
            .map(FreelancerCard::from)
            .collect();
        cards.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(cards)
    }

    pub fn recruiter(&self, id: &AccountId) -> Result<RecruiterView, MarketplaceError> {
        self.fetch_recruiter(id).map(RecruiterView::from)
    }

    pub fn recruiters(&self) -> Result<Vec<RecruiterCard>, MarketplaceError> {
        let mut cards: Vec<RecruiterCard> = self
            .store
            .recruiters()?
            .into_iter()
            .map(RecruiterCard::from)
            .collect();
        cards.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(cards)
    }

    // ── Internal lookups ───────────────────────────────────────────────

    pub(crate) fn fetch_recruiter(
        &self,
        id: &AccountId,
    ) -> Result<RecruiterAccount, MarketplaceError> {
        match self.store.fetch_account(id)? {
            Some(Account::Recruiter(recruiter)) => Ok(recruiter),
            _ => Err(MarketplaceError::NotFound("recruiter")),
        }
    }

    pub(crate) fn fetch_freelancer(
        &self,
        id: &AccountId,
    ) -> Result<FreelancerAccount, MarketplaceError> {
        match self.store.fetch_account(id)? {
            Some(Account::Freelancer(freelancer)) => Ok(freelancer),
            _ => Err(MarketplaceError::NotFound("freelancer")),
        }
    }

    fn with_applicants(
        &self,
        mut applications: Vec<Application>,
    ) -> Result<Vec<ApplicationWithApplicant>, MarketplaceError> {
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        let mut rows = Vec::with_capacity(applications.len());
        for application in applications {
            let applicant = match self.store.fetch_account(&application.freelancer_id)? {
                Some(Account::Freelancer(freelancer)) => Some(FreelancerCard::from(freelancer)),
                _ => None,
            };
            rows.push(ApplicationWithApplicant {
                application,
                applicant,
            });
        }
        Ok(rows)
    }
}

fn validate_job_draft(draft: &JobDraft) -> Result<(), MarketplaceError> {
    let mut missing = Vec::new();
    if draft.title.trim().is_empty() {
        missing.push("title");
    }
    if draft.description.trim().is_empty() {
        missing.push("description");
    }
    if draft.budget.trim().is_empty() {
        missing.push("budget");
    }
    if draft.deadline.trim().is_empty() {
        missing.push("deadline");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MarketplaceError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

fn sort_newest_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.0.cmp(&a.id.0))
    });
}
