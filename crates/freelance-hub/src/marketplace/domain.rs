use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for accounts (either role).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// The two sides of the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Freelancer,
    Recruiter,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Freelancer => "freelancer",
            Role::Recruiter => "recruiter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "freelancer" => Some(Role::Freelancer),
            "recruiter" => Some(Role::Recruiter),
            _ => None,
        }
    }
}

/// Lifecycle status of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Active,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

/// Lifecycle status of an application. Accepted and rejected are terminal in
/// intended use, though nothing guards against a later re-write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Progress status of a freelancer's active project snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
        }
    }
}

/// Denormalized job summary stored on the owning recruiter, re-synced by the
/// same operations that mutate the job itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveListing {
    pub job_id: JobId,
    pub title: String,
    pub skills_required: Vec<String>,
    pub budget: String,
    pub deadline: String,
}

/// Denormalized progress snapshot stored on the hired freelancer. Created by
/// accepting an application, advanced by progress updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveProject {
    pub job_id: JobId,
    pub title: String,
    pub client: String,
    pub due_date: String,
    pub status: ProjectStatus,
    pub progress: u8,
}

/// Denormalized match suggestion stored on a freelancer. Populated by seed
/// data only; no runtime operation maintains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedJob {
    pub job_id: JobId,
    pub title: String,
    pub company: String,
    pub salary: String,
    pub match_label: String,
    pub skills: Vec<String>,
}

/// Freelancer-side account record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreelancerAccount {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub rating: f32,
    pub total_earnings: String,
    pub hours_worked: u32,
    pub active_projects: Vec<ActiveProject>,
    pub recommended_jobs: Vec<RecommendedJob>,
}

/// Recruiter-side account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterAccount {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub company: String,
    pub experience: Option<String>,
    pub total_listings: u32,
    pub successful_hires: u32,
    pub active_listings: Vec<ActiveListing>,
}

/// Unified account record. The two roles share one email namespace but
/// nothing else; the sum type keeps the role-specific fields apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Account {
    Freelancer(FreelancerAccount),
    Recruiter(RecruiterAccount),
}

impl Account {
    pub fn id(&self) -> &AccountId {
        match self {
            Account::Freelancer(account) => &account.id,
            Account::Recruiter(account) => &account.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Account::Freelancer(account) => &account.email,
            Account::Recruiter(account) => &account.email,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Account::Freelancer(account) => &account.name,
            Account::Recruiter(account) => &account.name,
        }
    }

    pub fn password_hash(&self) -> &str {
        match self {
            Account::Freelancer(account) => &account.password_hash,
            Account::Recruiter(account) => &account.password_hash,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Account::Freelancer(_) => Role::Freelancer,
            Account::Recruiter(_) => Role::Recruiter,
        }
    }
}

/// A recruiter-owned work posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub recruiter_id: AccountId,
    pub recruiter_name: String,
    pub title: String,
    pub description: String,
    pub company: String,
    pub location: Option<String>,
    pub skills_required: Vec<String>,
    /// Free text (e.g. "$2,500"), never parsed.
    pub budget: String,
    /// Free text, not validated as a date.
    pub deadline: String,
    pub status: JobStatus,
    pub applications: Vec<ApplicationId>,
    pub created_at: DateTime<Utc>,
}

/// A freelancer's request to perform a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub freelancer_id: AccountId,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

/// Fields a recruiter supplies when posting a job. The company is taken from
/// the recruiter record, not the draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    pub budget: String,
    pub deadline: String,
}

/// Partial update for an existing job; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub skills_required: Option<Vec<String>>,
    pub budget: Option<String>,
    pub deadline: Option<String>,
    pub status: Option<JobStatus>,
}

/// Partial profile update for a freelancer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreelancerProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
}

/// Partial profile update for a recruiter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecruiterProfileUpdate {
    pub name: Option<String>,
    pub company: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
}

/// Password-free freelancer payload for API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreelancerView {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub rating: f32,
    pub total_earnings: String,
    pub hours_worked: u32,
    pub active_projects: Vec<ActiveProject>,
    pub recommended_jobs: Vec<RecommendedJob>,
}

impl From<FreelancerAccount> for FreelancerView {
    fn from(account: FreelancerAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: Role::Freelancer,
            location: account.location,
            bio: account.bio,
            skills: account.skills,
            rating: account.rating,
            total_earnings: account.total_earnings,
            hours_worked: account.hours_worked,
            active_projects: account.active_projects,
            recommended_jobs: account.recommended_jobs,
        }
    }
}

/// Password-free recruiter payload for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruiterView {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub company: String,
    pub experience: Option<String>,
    pub total_listings: u32,
    pub successful_hires: u32,
    pub active_listings: Vec<ActiveListing>,
}

impl From<RecruiterAccount> for RecruiterView {
    fn from(account: RecruiterAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: Role::Recruiter,
            location: account.location,
            bio: account.bio,
            company: account.company,
            experience: account.experience,
            total_listings: account.total_listings,
            successful_hires: account.successful_hires,
            active_listings: account.active_listings,
        }
    }
}

/// Password-free view of either account variant.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AccountView {
    Freelancer(FreelancerView),
    Recruiter(RecruiterView),
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        match account {
            Account::Freelancer(account) => AccountView::Freelancer(account.into()),
            Account::Recruiter(account) => AccountView::Recruiter(account.into()),
        }
    }
}

/// Public directory card for a freelancer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreelancerCard {
    pub id: AccountId,
    pub name: String,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub rating: f32,
    pub location: Option<String>,
}

impl From<FreelancerAccount> for FreelancerCard {
    fn from(account: FreelancerAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            bio: account.bio,
            skills: account.skills,
            rating: account.rating,
            location: account.location,
        }
    }
}

/// Public directory card for a recruiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruiterCard {
    pub id: AccountId,
    pub name: String,
    pub company: String,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub total_listings: u32,
    pub successful_hires: u32,
}

impl From<RecruiterAccount> for RecruiterCard {
    fn from(account: RecruiterAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            company: account.company,
            location: account.location,
            bio: account.bio,
            total_listings: account.total_listings,
            successful_hires: account.successful_hires,
        }
    }
}

/// Compact job reference attached to a freelancer's application listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub budget: String,
    pub deadline: String,
    pub recruiter_id: AccountId,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            budget: job.budget.clone(),
            deadline: job.deadline.clone(),
            recruiter_id: job.recruiter_id.clone(),
        }
    }
}

/// Application row enriched with the applicant's public card, for recruiter
/// review screens.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithApplicant {
    #[serde(flatten)]
    pub application: Application,
    pub applicant: Option<FreelancerCard>,
}

/// Application row enriched with a job summary, for the freelancer's own
/// listing. `job` is `None` when the posting has since been deleted.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<JobSummary>,
}
