use std::sync::Arc;

use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{async_trait, Json, Router};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    AccountId, ApplicationId, ApplicationStatus, FreelancerProfileUpdate, JobDraft, JobId,
    JobUpdate, RecruiterProfileUpdate, Role,
};
use super::identity::{Credentials, IdentityError, IdentityService, Registration};
use super::lifecycle::{MarketplaceError, MarketplaceService};
use super::policy::{ensure_self, Principal, PolicyError};
use super::search::{FreelancerSearch, JobSearch};
use super::store::{MarketplaceStore, StoreError};

/// Shared router state: the lifecycle manager and the identity service over
/// one store.
pub struct MarketplaceState<S> {
    pub marketplace: MarketplaceService<S>,
    pub identity: IdentityService<S>,
}

impl<S> MarketplaceState<S>
where
    S: MarketplaceStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            marketplace: MarketplaceService::new(store.clone()),
            identity: IdentityService::new(store),
        }
    }
}

/// Header carrying the authenticated account id, injected by the identity
/// collaborator in front of this service.
pub const PRINCIPAL_ID_HEADER: &str = "x-principal-id";
/// Header carrying the authenticated role.
pub const PRINCIPAL_ROLE_HEADER: &str = "x-principal-role";

#[async_trait]
impl<T> FromRequestParts<T> for Principal
where
    T: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &T) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(PRINCIPAL_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let role = parts
            .headers
            .get(PRINCIPAL_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(Role::parse);

        match (id, role) {
            (Some(id), Some(role)) => Ok(Principal {
                id: AccountId(id.to_string()),
                role,
            }),
            _ => Err(error_response(
                StatusCode::UNAUTHORIZED,
                "not authenticated",
            )),
        }
    }
}

/// Router builder exposing the marketplace JSON API.
pub fn marketplace_router<S>(state: Arc<MarketplaceState<S>>) -> Router
where
    S: MarketplaceStore + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<S>))
        .route("/api/v1/auth/login", post(login_handler::<S>))
        .route(
            "/api/v1/jobs",
            get(active_jobs_handler::<S>).post(post_job_handler::<S>),
        )
        .route("/api/v1/jobs/search", get(search_jobs_handler::<S>))
        .route(
            "/api/v1/jobs/:id",
            get(job_handler::<S>)
                .put(update_job_handler::<S>)
                .delete(delete_job_handler::<S>),
        )
        .route("/api/v1/jobs/:id/apply", post(apply_handler::<S>))
        .route(
            "/api/v1/jobs/:id/applications",
            get(job_applications_handler::<S>),
        )
        .route(
            "/api/v1/applications",
            get(recruiter_applications_handler::<S>),
        )
        .route(
            "/api/v1/applications/:id",
            put(application_status_handler::<S>),
        )
        .route("/api/v1/freelancers", get(freelancers_handler::<S>))
        .route(
            "/api/v1/freelancers/search",
            get(search_freelancers_handler::<S>),
        )
        .route(
            "/api/v1/freelancers/profile",
            put(update_freelancer_profile_handler::<S>),
        )
        .route(
            "/api/v1/freelancers/projects/:id",
            put(project_progress_handler::<S>),
        )
        .route(
            "/api/v1/freelancers/applications/my",
            get(my_applications_handler::<S>),
        )
        .route("/api/v1/freelancers/:id", get(freelancer_handler::<S>))
        .route(
            "/api/v1/freelancers/:id/dashboard-jobs",
            get(freelancer_dashboard_jobs_handler::<S>),
        )
        .route("/api/v1/recruiters", get(recruiters_handler::<S>))
        .route(
            "/api/v1/recruiters/profile",
            put(update_recruiter_profile_handler::<S>),
        )
        .route(
            "/api/v1/recruiters/jobs/my",
            get(recruiter_jobs_handler::<S>),
        )
        .route("/api/v1/recruiters/:id", get(recruiter_handler::<S>))
        .route(
            "/api/v1/recruiters/:id/dashboard-stats",
            get(recruiter_stats_handler::<S>),
        )
        .with_state(state)
}

// ── Request payloads ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyRequest {
    #[serde(default)]
    pub(crate) cover_letter: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    pub(crate) status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressUpdateRequest {
    pub(crate) progress: u8,
}

/// Query-string form of the search filters; `skills` is a comma-separated
/// list.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    pub(crate) query: Option<String>,
    pub(crate) skills: Option<String>,
    pub(crate) location: Option<String>,
}

impl SearchParams {
    fn skills_list(&self) -> Vec<String> {
        self.skills
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|skill| !skill.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn into_job_search(self) -> JobSearch {
        let skills = self.skills_list();
        JobSearch {
            query: self.query,
            skills,
            location: self.location,
        }
    }

    fn into_freelancer_search(self) -> FreelancerSearch {
        let skills = self.skills_list();
        FreelancerSearch {
            query: self.query,
            skills,
            location: self.location,
        }
    }
}

pub(crate) async fn register_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Json(registration): Json<Registration>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.identity.register(registration) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => identity_error_response(error),
    }
}

pub(crate) async fn login_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Json(credentials): Json<Credentials>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.identity.login(&credentials) {
        Ok((principal, account)) => (
            StatusCode::OK,
            Json(json!({
                "principal": { "id": principal.id.0, "role": principal.role },
                "account": account,
            })),
        )
            .into_response(),
        Err(error) => identity_error_response(error),
    }
}

// ── Jobs ───────────────────────────────────────────────────────────────

pub(crate) async fn active_jobs_handler<S>(State(state): State<Arc<MarketplaceState<S>>>) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.active_jobs() {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn search_jobs_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.search_jobs(&params.into_job_search()) {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn job_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.job(&JobId(id)) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn post_job_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Json(draft): Json<JobDraft>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.post_job(&principal, draft) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn update_job_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Path(id): Path<String>,
    Json(update): Json<JobUpdate>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.update_job(&principal, &JobId(id), update) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn delete_job_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Path(id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.delete_job(&principal, &JobId(id)) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "job deleted" })),
        )
            .into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn apply_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Path(id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state
        .marketplace
        .apply(&principal, &JobId(id), request.cover_letter)
    {
        Ok(application) => (StatusCode::CREATED, Json(application)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn job_applications_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Path(id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state
        .marketplace
        .applications_for_job(&principal, &JobId(id))
    {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

// ── Applications ───────────────────────────────────────────────────────

pub(crate) async fn recruiter_applications_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.applications_for_recruiter(&principal) {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn application_status_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Path(id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state
        .marketplace
        .set_application_status(&principal, &ApplicationId(id), request.status)
    {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

// ── Freelancers ────────────────────────────────────────────────────────

pub(crate) async fn freelancers_handler<S>(State(state): State<Arc<MarketplaceState<S>>>) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.freelancers() {
        Ok(cards) => (StatusCode::OK, Json(cards)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn search_freelancers_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state
        .marketplace
        .search_freelancers(&params.into_freelancer_search())
    {
        Ok(cards) => (StatusCode::OK, Json(cards)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn freelancer_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.freelancer(&AccountId(id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn update_freelancer_profile_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Json(update): Json<FreelancerProfileUpdate>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state
        .marketplace
        .update_freelancer_profile(&principal, update)
    {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn project_progress_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Path(id): Path<String>,
    Json(request): Json<ProgressUpdateRequest>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state
        .marketplace
        .update_project_progress(&principal, &JobId(id), request.progress)
    {
        Ok(projects) => (StatusCode::OK, Json(projects)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn my_applications_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.my_applications(&principal) {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn freelancer_dashboard_jobs_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Path(id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let freelancer_id = AccountId(id);
    if let Err(error) = ensure_self(&principal, &freelancer_id) {
        return marketplace_error_response(MarketplaceError::Policy(error));
    }
    match state.marketplace.freelancer_dashboard_jobs(&freelancer_id) {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

// ── Recruiters ─────────────────────────────────────────────────────────

pub(crate) async fn recruiters_handler<S>(State(state): State<Arc<MarketplaceState<S>>>) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.recruiters() {
        Ok(cards) => (StatusCode::OK, Json(cards)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn recruiter_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    Path(id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.recruiter(&AccountId(id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn update_recruiter_profile_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Json(update): Json<RecruiterProfileUpdate>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state
        .marketplace
        .update_recruiter_profile(&principal, update)
    {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn recruiter_jobs_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    match state.marketplace.recruiter_jobs(&principal) {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

pub(crate) async fn recruiter_stats_handler<S>(
    State(state): State<Arc<MarketplaceState<S>>>,
    principal: Principal,
    Path(id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
{
    let recruiter_id = AccountId(id);
    if let Err(error) = ensure_self(&principal, &recruiter_id) {
        return marketplace_error_response(MarketplaceError::Policy(error));
    }
    match state.marketplace.recruiter_stats(&recruiter_id) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => marketplace_error_response(error),
    }
}

// ── Error mapping ──────────────────────────────────────────────────────

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) fn marketplace_error_response(error: MarketplaceError) -> Response {
    let status = match &error {
        MarketplaceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MarketplaceError::NotFound(_) => StatusCode::NOT_FOUND,
        MarketplaceError::Policy(PolicyError::Unauthorized) => StatusCode::UNAUTHORIZED,
        MarketplaceError::Policy(PolicyError::Forbidden(_)) => StatusCode::FORBIDDEN,
        MarketplaceError::DuplicateApplication => StatusCode::CONFLICT,
        MarketplaceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        MarketplaceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        MarketplaceError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &error.to_string())
}

pub(crate) fn identity_error_response(error: IdentityError) -> Response {
    let status = match &error {
        IdentityError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        IdentityError::EmailTaken => StatusCode::CONFLICT,
        IdentityError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        IdentityError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        IdentityError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        IdentityError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        IdentityError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &error.to_string())
}
