use serde::Deserialize;

use super::domain::{FreelancerAccount, Job};

/// Conjunctive filters over the active-job listing. Each provided filter
/// must match; an empty search matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSearch {
    pub query: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: Option<String>,
}

impl JobSearch {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(query) = nonblank(&self.query) {
            if !contains_ignore_case(&job.title, query)
                && !contains_ignore_case(&job.description, query)
            {
                return false;
            }
        }

        if !self.skills.is_empty() {
            let any_overlap = self.skills.iter().any(|wanted| {
                job.skills_required
                    .iter()
                    .any(|skill| skill.eq_ignore_ascii_case(wanted))
            });
            if !any_overlap {
                return false;
            }
        }

        if let Some(location) = nonblank(&self.location) {
            let job_location = job.location.as_deref().unwrap_or("");
            if !contains_ignore_case(job_location, location) {
                return false;
            }
        }

        true
    }
}

/// Conjunctive filters over the freelancer directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FreelancerSearch {
    pub query: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub location: Option<String>,
}

impl FreelancerSearch {
    pub fn matches(&self, freelancer: &FreelancerAccount) -> bool {
        if let Some(query) = nonblank(&self.query) {
            let bio = freelancer.bio.as_deref().unwrap_or("");
            if !contains_ignore_case(&freelancer.name, query) && !contains_ignore_case(bio, query) {
                return false;
            }
        }

        if !self.skills.is_empty() {
            let any_overlap = self.skills.iter().any(|wanted| {
                freelancer
                    .skills
                    .iter()
                    .any(|skill| skill.eq_ignore_ascii_case(wanted))
            });
            if !any_overlap {
                return false;
            }
        }

        if let Some(location) = nonblank(&self.location) {
            let freelancer_location = freelancer.location.as_deref().unwrap_or("");
            if !contains_ignore_case(freelancer_location, location) {
                return false;
            }
        }

        true
    }
}

fn nonblank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
