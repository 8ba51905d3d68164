//! Integration specifications for the marketplace hiring workflow.
//!
//! Scenarios run end-to-end through the public service facade and the HTTP
//! router, covering the full post → apply → accept → progress arc without
//! reaching into private modules.

mod common {
    use std::sync::Arc;

    use freelance_hub::marketplace::{
        Account, AccountId, FreelancerAccount, InMemoryStore, JobDraft, MarketplaceService,
        MarketplaceStore, Principal, RecruiterAccount, Role,
    };

    pub(super) fn build_service() -> (MarketplaceService<InMemoryStore>, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        (MarketplaceService::new(store.clone()), store)
    }

    pub(super) fn seed_recruiter(store: &InMemoryStore, id: &str, company: &str) -> Principal {
        store
            .insert_account(Account::Recruiter(RecruiterAccount {
                id: AccountId(id.to_string()),
                name: "Sarah Johnson".to_string(),
                email: format!("{id}@techcorp.example"),
                password_hash: "unused".to_string(),
                location: None,
                bio: None,
                company: company.to_string(),
                experience: None,
                total_listings: 0,
                successful_hires: 0,
                active_listings: Vec::new(),
            }))
            .expect("recruiter inserts");
        Principal {
            id: AccountId(id.to_string()),
            role: Role::Recruiter,
        }
    }

    pub(super) fn seed_freelancer(store: &InMemoryStore, id: &str) -> Principal {
        store
            .insert_account(Account::Freelancer(FreelancerAccount {
                id: AccountId(id.to_string()),
                name: "John Smith".to_string(),
                email: format!("{id}@example.com"),
                password_hash: "unused".to_string(),
                location: None,
                bio: None,
                skills: vec!["Go".to_string()],
                rating: 0.0,
                total_earnings: "0 USD".to_string(),
                hours_worked: 0,
                active_projects: Vec::new(),
                recommended_jobs: Vec::new(),
            }))
            .expect("freelancer inserts");
        Principal {
            id: AccountId(id.to_string()),
            role: Role::Freelancer,
        }
    }

    pub(super) fn go_job_draft() -> JobDraft {
        JobDraft {
            title: "Port billing service to Go".to_string(),
            description: "Rewrite the billing worker".to_string(),
            location: None,
            skills_required: vec!["Go".to_string()],
            budget: "$100".to_string(),
            deadline: "2025-11-30".to_string(),
        }
    }
}

mod hiring_flow {
    use super::common::*;
    use freelance_hub::marketplace::{
        Account, ApplicationStatus, MarketplaceStore, ProjectStatus,
    };

    #[test]
    fn post_apply_accept_updates_all_three_records() {
        let (service, store) = build_service();
        let recruiter = seed_recruiter(&store, "rec-100", "TechCorp Inc.");
        let freelancer = seed_freelancer(&store, "fre-100");

        let job = service
            .post_job(&recruiter, go_job_draft())
            .expect("job posts");
        let application = service
            .apply(&freelancer, &job.id, "hi".to_string())
            .expect("application submits");
        assert_eq!(application.status, ApplicationStatus::Pending);

        let accepted = service
            .set_application_status(&recruiter, &application.id, ApplicationStatus::Accepted)
            .expect("acceptance succeeds");
        assert_eq!(accepted.status, ApplicationStatus::Accepted);

        let stored_recruiter = match store.fetch_account(&recruiter.id).unwrap().unwrap() {
            Account::Recruiter(account) => account,
            other => panic!("expected recruiter, got {other:?}"),
        };
        assert_eq!(stored_recruiter.successful_hires, 1);

        let stored_freelancer = match store.fetch_account(&freelancer.id).unwrap().unwrap() {
            Account::Freelancer(account) => account,
            other => panic!("expected freelancer, got {other:?}"),
        };
        assert_eq!(stored_freelancer.active_projects.len(), 1);
        assert_eq!(stored_freelancer.active_projects[0].title, job.title);
        assert_eq!(stored_freelancer.active_projects[0].progress, 0);
    }

    #[test]
    fn progress_to_completion_closes_the_project() {
        let (service, store) = build_service();
        let recruiter = seed_recruiter(&store, "rec-101", "TechCorp Inc.");
        let freelancer = seed_freelancer(&store, "fre-101");

        let job = service
            .post_job(&recruiter, go_job_draft())
            .expect("job posts");
        let application = service
            .apply(&freelancer, &job.id, "hi".to_string())
            .expect("application submits");
        service
            .set_application_status(&recruiter, &application.id, ApplicationStatus::Accepted)
            .expect("acceptance succeeds");

        let projects = service
            .update_project_progress(&freelancer, &job.id, 40)
            .expect("progress updates");
        assert_eq!(projects[0].status, ProjectStatus::InProgress);

        let projects = service
            .update_project_progress(&freelancer, &job.id, 100)
            .expect("progress completes");
        assert_eq!(projects[0].status, ProjectStatus::Completed);
    }

    #[test]
    fn stats_and_dashboards_reflect_the_flow() {
        let (service, store) = build_service();
        let recruiter = seed_recruiter(&store, "rec-102", "TechCorp Inc.");
        let freelancer = seed_freelancer(&store, "fre-102");

        let job = service
            .post_job(&recruiter, go_job_draft())
            .expect("job posts");
        let application = service
            .apply(&freelancer, &job.id, "hi".to_string())
            .expect("application submits");

        let stats = service.recruiter_stats(&recruiter.id).expect("stats");
        assert_eq!(stats.total_listings, 1);
        assert_eq!(stats.pending_applications, 1);
        assert_eq!(stats.active_jobs, 1);

        service
            .set_application_status(&recruiter, &application.id, ApplicationStatus::Accepted)
            .expect("acceptance succeeds");

        let stats = service.recruiter_stats(&recruiter.id).expect("stats");
        assert_eq!(stats.pending_applications, 0);
        assert_eq!(stats.accepted_applications, 1);
        assert_eq!(stats.successful_hires, 1);

        let dashboard = service
            .freelancer_dashboard_jobs(&freelancer.id)
            .expect("dashboard");
        assert_eq!(dashboard.len(), 1);
        assert_eq!(dashboard[0].application_status, ApplicationStatus::Accepted);
        assert_eq!(dashboard[0].job.id, job.id);
    }
}

mod http_surface {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use freelance_hub::marketplace::{
        marketplace_router, InMemoryStore, MarketplaceState, PRINCIPAL_ID_HEADER,
        PRINCIPAL_ROLE_HEADER,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn json_request(
        method: &str,
        uri: &str,
        principal: Option<(&str, &str)>,
        body: Value,
    ) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some((id, role)) = principal {
            builder = builder
                .header(PRINCIPAL_ID_HEADER, id)
                .header(PRINCIPAL_ROLE_HEADER, role);
        }
        builder
            .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
            .expect("request")
    }

    #[tokio::test]
    async fn full_hiring_arc_over_http() {
        let store = Arc::new(InMemoryStore::default());
        let router = marketplace_router(Arc::new(MarketplaceState::new(store)));

        // Register both sides.
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({
                    "name": "Sarah Johnson",
                    "email": "sarah@techcorp.example",
                    "password": "a long enough password",
                    "role": "recruiter",
                    "company": "TechCorp Inc.",
                }),
            ))
            .await
            .expect("register recruiter");
        assert_eq!(response.status(), StatusCode::CREATED);
        let recruiter = read_json(response).await;
        let recruiter_id = recruiter
            .get("id")
            .and_then(Value::as_str)
            .expect("recruiter id")
            .to_string();

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({
                    "name": "John Smith",
                    "email": "john@example.com",
                    "password": "a long enough password",
                    "role": "freelancer",
                    "skills": ["Go"],
                }),
            ))
            .await
            .expect("register freelancer");
        assert_eq!(response.status(), StatusCode::CREATED);
        let freelancer = read_json(response).await;
        let freelancer_id = freelancer
            .get("id")
            .and_then(Value::as_str)
            .expect("freelancer id")
            .to_string();

        // Post, apply, accept.
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/jobs",
                Some((&recruiter_id, "recruiter")),
                json!({
                    "title": "Port billing service to Go",
                    "description": "Rewrite the billing worker",
                    "skills_required": ["Go"],
                    "budget": "$100",
                    "deadline": "2025-11-30",
                }),
            ))
            .await
            .expect("post job");
        assert_eq!(response.status(), StatusCode::CREATED);
        let job = read_json(response).await;
        let job_id = job.get("id").and_then(Value::as_str).expect("job id");

        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/jobs/{job_id}/apply"),
                Some((&freelancer_id, "freelancer")),
                json!({ "cover_letter": "hi" }),
            ))
            .await
            .expect("apply");
        assert_eq!(response.status(), StatusCode::CREATED);
        let application = read_json(response).await;
        let application_id = application
            .get("id")
            .and_then(Value::as_str)
            .expect("application id");

        let response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/v1/applications/{application_id}"),
                Some((&recruiter_id, "recruiter")),
                json!({ "status": "accepted" }),
            ))
            .await
            .expect("accept");
        assert_eq!(response.status(), StatusCode::OK);

        // Both dashboards agree on the outcome.
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/recruiters/{recruiter_id}/dashboard-stats"))
                    .header(PRINCIPAL_ID_HEADER, recruiter_id.as_str())
                    .header(PRINCIPAL_ROLE_HEADER, "recruiter")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("stats");
        assert_eq!(response.status(), StatusCode::OK);
        let stats = read_json(response).await;
        assert_eq!(stats.get("successful_hires").and_then(Value::as_u64), Some(1));
        assert_eq!(stats.get("total_listings").and_then(Value::as_u64), Some(1));

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!(
                        "/api/v1/freelancers/{freelancer_id}/dashboard-jobs"
                    ))
                    .header(PRINCIPAL_ID_HEADER, freelancer_id.as_str())
                    .header(PRINCIPAL_ROLE_HEADER, "freelancer")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("dashboard jobs");
        assert_eq!(response.status(), StatusCode::OK);
        let rows = read_json(response).await;
        assert_eq!(
            rows.pointer("/0/application_status").and_then(Value::as_str),
            Some("accepted")
        );
        assert_eq!(
            rows.pointer("/0/title").and_then(Value::as_str),
            Some("Port billing service to Go")
        );
    }
}
