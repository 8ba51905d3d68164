use super::domain::{AccountId, Job, Role};

/// Authenticated caller identity, supplied per request by the identity
/// collaborator (the excluded session layer). The core never resolves
/// credentials itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: AccountId,
    pub role: Role,
}

impl Principal {
    pub fn require_role(&self, role: Role) -> Result<(), PolicyError> {
        if self.role == role {
            Ok(())
        } else {
            Err(PolicyError::Forbidden(format!(
                "access denied: {} only",
                role.label()
            )))
        }
    }
}

/// Access violations raised before any guarded operation runs.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
}

/// Owner check applied to every job mutation and applicant read.
pub fn ensure_job_owner(job: &Job, principal: &Principal) -> Result<(), PolicyError> {
    if job.recruiter_id == principal.id {
        Ok(())
    } else {
        Err(PolicyError::Forbidden(
            "access denied: not the owner of this job".to_string(),
        ))
    }
}

/// Self check for the owner-only dashboard routes.
pub fn ensure_self(principal: &Principal, account_id: &AccountId) -> Result<(), PolicyError> {
    if principal.id == *account_id {
        Ok(())
    } else {
        Err(PolicyError::Forbidden(
            "access denied: not your dashboard".to_string(),
        ))
    }
}
