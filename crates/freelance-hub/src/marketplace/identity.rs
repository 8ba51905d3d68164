use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    Account, AccountId, AccountView, FreelancerAccount, RecruiterAccount, Role,
};
use super::policy::Principal;
use super::store::{MarketplaceStore, StoreError};

static ACCOUNT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_account_id() -> AccountId {
    let id = ACCOUNT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AccountId(format!("acc-{id:06}"))
}

/// Registration payload. Role-specific fields are optional and only read for
/// the matching role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub company: Option<String>,
}

/// Login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Errors raised by registration and login.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("{0}")]
    Validation(String),
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Account registration and credential verification.
///
/// Passwords are stored as salted Argon2 hashes in PHC string format.
pub struct IdentityService<S> {
    store: Arc<S>,
}

impl<S> IdentityService<S>
where
    S: MarketplaceStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create an account for either role. The email namespace is shared
    /// across freelancers and recruiters.
    pub fn register(&self, registration: Registration) -> Result<AccountView, IdentityError> {
        let name = registration.name.trim();
        let email = registration.email.trim();
        if name.is_empty() || email.is_empty() || registration.password.trim().is_empty() {
            return Err(IdentityError::Validation(
                "name, email, and password are required".to_string(),
            ));
        }

        if self.store.account_by_email(email)?.is_some() {
            return Err(IdentityError::EmailTaken);
        }

        let password_hash = hash_password(&registration.password)?;
        let id = next_account_id();
        let account = match registration.role {
            Role::Freelancer => Account::Freelancer(FreelancerAccount {
                id,
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                location: registration.location,
                bio: registration.bio,
                skills: registration.skills,
                rating: 0.0,
                total_earnings: "0 USD".to_string(),
                hours_worked: 0,
                active_projects: Vec::new(),
                recommended_jobs: Vec::new(),
            }),
            Role::Recruiter => Account::Recruiter(RecruiterAccount {
                id,
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                location: registration.location,
                bio: registration.bio,
                company: registration.company.unwrap_or_default(),
                experience: None,
                total_listings: 0,
                successful_hires: 0,
                active_listings: Vec::new(),
            }),
        };

        let stored = self.store.insert_account(account)?;
        info!(
            account_id = %stored.id().0,
            role = stored.role().label(),
            "account registered"
        );
        Ok(stored.into())
    }

    /// Resolve credentials to a principal. Unknown email and wrong password
    /// are indistinguishable to the caller.
    pub fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<(Principal, AccountView), IdentityError> {
        let account = self
            .store
            .account_by_email(credentials.email.trim())?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !verify_password(&credentials.password, account.password_hash()) {
            return Err(IdentityError::InvalidCredentials);
        }

        let principal = Principal {
            id: account.id().clone(),
            role: account.role(),
        };
        Ok((principal, account.into()))
    }
}

pub(crate) fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| IdentityError::PasswordHash(err.to_string()))
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
