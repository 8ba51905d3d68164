use serde::Serialize;

use super::domain::{
    AccountId, Application, ApplicationId, ApplicationStatus, Job, JobStatus,
};
use super::lifecycle::{MarketplaceError, MarketplaceService};
use super::store::MarketplaceStore;

/// Summary statistics for a recruiter's dashboard. The listing and hire
/// counters are read straight off the recruiter record; the rest is counted
/// over the store on every call, with no cache to invalidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruiterStats {
    pub total_listings: u32,
    pub successful_hires: u32,
    pub total_applications: usize,
    pub pending_applications: usize,
    pub accepted_applications: usize,
    pub active_jobs: usize,
    pub completed_jobs: usize,
}

/// A job the freelancer has applied to, flattened with that freelancer's own
/// application status and id.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardJob {
    #[serde(flatten)]
    pub job: Job,
    pub application_status: ApplicationStatus,
    pub application_id: ApplicationId,
}

impl<S> MarketplaceService<S>
where
    S: MarketplaceStore,
{
    /// Recompute recruiter statistics from the current store state.
    pub fn recruiter_stats(
        &self,
        recruiter_id: &AccountId,
    ) -> Result<RecruiterStats, MarketplaceError> {
        let recruiter = self.fetch_recruiter(recruiter_id)?;
        let jobs = self.store().jobs_by_recruiter(recruiter_id)?;

        let mut total_applications = 0;
        let mut pending_applications = 0;
        let mut accepted_applications = 0;
        for job in &jobs {
            let applications = self.store().applications_by_job(&job.id)?;
            total_applications += applications.len();
            pending_applications += count_status(&applications, ApplicationStatus::Pending);
            accepted_applications += count_status(&applications, ApplicationStatus::Accepted);
        }

        let active_jobs = jobs.iter().filter(|job| job.status == JobStatus::Active).count();
        let completed_jobs = jobs
            .iter()
            .filter(|job| job.status == JobStatus::Completed)
            .count();

        Ok(RecruiterStats {
            total_listings: recruiter.total_listings,
            successful_hires: recruiter.successful_hires,
            total_applications,
            pending_applications,
            accepted_applications,
            active_jobs,
            completed_jobs,
        })
    }

    /// Every job the freelancer has an application against, newest first.
    /// Jobs deleted since the application was made are skipped; the
    /// application itself remains retrievable through `my_applications`.
    pub fn freelancer_dashboard_jobs(
        &self,
        freelancer_id: &AccountId,
    ) -> Result<Vec<DashboardJob>, MarketplaceError> {
        self.fetch_freelancer(freelancer_id)?;
        let applications = self.store().applications_by_freelancer(freelancer_id)?;

        let mut rows = Vec::with_capacity(applications.len());
        for application in applications {
            if let Some(job) = self.store().fetch_job(&application.job_id)? {
                rows.push(DashboardJob {
                    job,
                    application_status: application.status,
                    application_id: application.id,
                });
            }
        }
        rows.sort_by(|a, b| {
            b.job
                .created_at
                .cmp(&a.job.created_at)
                .then_with(|| b.job.id.0.cmp(&a.job.id.0))
        });
        Ok(rows)
    }
}

fn count_status(applications: &[Application], status: ApplicationStatus) -> usize {
    applications
        .iter()
        .filter(|application| application.status == status)
        .count()
}
