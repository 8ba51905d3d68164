use std::sync::Arc;

use super::common::*;
use crate::marketplace::domain::{AccountView, Role};
use crate::marketplace::identity::{Credentials, IdentityError, IdentityService, Registration};
use crate::marketplace::store::MarketplaceStore;

fn registration(role: Role) -> Registration {
    Registration {
        name: "Emma Wilson".to_string(),
        email: "emma@example.com".to_string(),
        password: "correct horse battery staple".to_string(),
        role,
        location: Some("London, UK".to_string()),
        bio: None,
        skills: vec!["UI/UX Design".to_string()],
        company: Some("Innovate Design Studio".to_string()),
    }
}

#[test]
fn register_then_login_round_trip() {
    let (_service, store) = build_service();
    let identity = IdentityService::new(Arc::new((*store).clone()));

    let view = identity
        .register(registration(Role::Freelancer))
        .expect("registers");
    let id = match &view {
        AccountView::Freelancer(view) => view.id.clone(),
        AccountView::Recruiter(_) => panic!("expected freelancer view"),
    };

    let (principal, _account) = identity
        .login(&Credentials {
            email: "emma@example.com".to_string(),
            password: "correct horse battery staple".to_string(),
        })
        .expect("logs in");

    assert_eq!(principal.id, id);
    assert_eq!(principal.role, Role::Freelancer);
}

#[test]
fn stored_password_is_a_salted_hash() {
    let (_service, store) = build_service();
    let identity = IdentityService::new(Arc::new((*store).clone()));

    identity
        .register(registration(Role::Freelancer))
        .expect("registers");

    let account = store
        .account_by_email("emma@example.com")
        .expect("lookup")
        .expect("present");
    let hash = account.password_hash();
    assert_ne!(hash, "correct horse battery staple");
    assert!(hash.starts_with("$argon2"), "PHC string expected, got {hash}");
}

#[test]
fn account_views_never_serialize_the_password() {
    let (_service, store) = build_service();
    let identity = IdentityService::new(Arc::new((*store).clone()));

    let view = identity
        .register(registration(Role::Recruiter))
        .expect("registers");
    let payload = serde_json::to_string(&view).expect("serializes");
    assert!(!payload.contains("password"));
    assert!(!payload.contains("$argon2"));
}

#[test]
fn email_namespace_is_shared_across_roles() {
    let (_service, store) = build_service();
    let identity = IdentityService::new(Arc::new((*store).clone()));

    identity
        .register(registration(Role::Freelancer))
        .expect("first registration succeeds");

    match identity.register(registration(Role::Recruiter)) {
        Err(IdentityError::EmailTaken) => {}
        other => panic!("expected email taken, got {other:?}"),
    }

    // Only the first account exists.
    assert!(store.recruiters().unwrap().is_empty());
    assert_eq!(store.freelancers().unwrap().len(), 1);
}

#[test]
fn wrong_password_is_invalid_credentials() {
    let (_service, store) = build_service();
    let identity = IdentityService::new(Arc::new((*store).clone()));

    identity
        .register(registration(Role::Freelancer))
        .expect("registers");

    match identity.login(&Credentials {
        email: "emma@example.com".to_string(),
        password: "wrong".to_string(),
    }) {
        Err(IdentityError::InvalidCredentials) => {}
        other => panic!("expected invalid credentials, got {other:?}"),
    }
}

#[test]
fn unknown_email_is_indistinguishable_from_wrong_password() {
    let (_service, store) = build_service();
    let identity = IdentityService::new(Arc::new((*store).clone()));

    match identity.login(&Credentials {
        email: "nobody@example.com".to_string(),
        password: "whatever".to_string(),
    }) {
        Err(IdentityError::InvalidCredentials) => {}
        other => panic!("expected invalid credentials, got {other:?}"),
    }
}

#[test]
fn blank_fields_fail_validation() {
    let (_service, store) = build_service();
    let identity = IdentityService::new(Arc::new((*store).clone()));

    let mut incomplete = registration(Role::Freelancer);
    incomplete.password = "   ".to_string();

    match identity.register(incomplete) {
        Err(IdentityError::Validation(message)) => {
            assert!(message.contains("password"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
