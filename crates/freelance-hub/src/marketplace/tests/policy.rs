use super::common::*;
use crate::marketplace::domain::{AccountId, Role};
use crate::marketplace::policy::{ensure_job_owner, ensure_self, PolicyError, Principal};

fn principal(id: &str, role: Role) -> Principal {
    Principal {
        id: AccountId(id.to_string()),
        role,
    }
}

#[test]
fn require_role_matches() {
    let recruiter = principal("rec-1", Role::Recruiter);
    assert!(recruiter.require_role(Role::Recruiter).is_ok());

    match recruiter.require_role(Role::Freelancer) {
        Err(PolicyError::Forbidden(message)) => {
            assert_eq!(message, "access denied: freelancer only");
        }
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[test]
fn ensure_job_owner_checks_recruiter_id() {
    let (service, store) = build_service();
    let owner = insert_recruiter(&store, "rec-1");
    let job = service.post_job(&owner, job_draft()).expect("posts");

    assert!(ensure_job_owner(&job, &owner).is_ok());

    let other = principal("rec-2", Role::Recruiter);
    match ensure_job_owner(&job, &other) {
        Err(PolicyError::Forbidden(message)) => assert!(message.contains("owner")),
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[test]
fn ensure_self_checks_account_id() {
    let me = principal("fre-1", Role::Freelancer);
    assert!(ensure_self(&me, &AccountId("fre-1".to_string())).is_ok());
    assert!(matches!(
        ensure_self(&me, &AccountId("fre-2".to_string())),
        Err(PolicyError::Forbidden(_))
    ));
}
