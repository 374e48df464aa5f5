use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationRequest, EmployerId, JobDraft, JobId, SeekerId};
use super::repository::{BoardStore, NotificationPublisher, RepositoryError};
use super::service::{BoardError, BoardService, TalentPoolFilter};
use super::state::ApplicationStatus;

/// Router builder exposing the posting and application endpoints.
pub fn board_router<R, N>(service: Arc<BoardService<R, N>>) -> Router
where
    R: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/jobs", post(post_job_handler::<R, N>))
        .route(
            "/api/v1/employers/:employer_id/jobs/:job_id",
            delete(delete_job_handler::<R, N>),
        )
        .route(
            "/api/v1/employers/:employer_id/jobs/:job_id/applicants",
            get(applicants_handler::<R, N>),
        )
        .route(
            "/api/v1/employers/:employer_id/jobs/:job_id/applicants/:seeker_id/status",
            post(review_handler::<R, N>),
        )
        .route("/api/v1/applications", post(submit_handler::<R, N>))
        .route(
            "/api/v1/seekers/:seeker_id/shortlist",
            get(shortlist_handler::<R, N>),
        )
        .route(
            "/api/v1/employers/:employer_id/talent-pool",
            get(talent_pool_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostJobRequest {
    pub(crate) employer_id: EmployerId,
    #[serde(flatten)]
    pub(crate) draft: JobDraft,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    pub(crate) status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TalentPoolQuery {
    pub(crate) keyword: Option<String>,
    pub(crate) category: Option<String>,
}

pub(crate) async fn post_job_handler<R, N>(
    State(service): State<Arc<BoardService<R, N>>>,
    axum::Json(request): axum::Json<PostJobRequest>,
) -> Response
where
    R: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    match service.post_job(&request.employer_id, request.draft) {
        Ok(job) => (StatusCode::CREATED, axum::Json(job)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn delete_job_handler<R, N>(
    State(service): State<Arc<BoardService<R, N>>>,
    Path((employer_id, job_id)): Path<(String, String)>,
) -> Response
where
    R: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    let employer = EmployerId(employer_id);
    let job = JobId(job_id);
    match service.delete_job(&employer, &job) {
        Ok(posts_used) => (
            StatusCode::OK,
            axum::Json(json!({ "deleted": job.0, "posts_used": posts_used })),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<BoardService<R, N>>>,
    axum::Json(request): axum::Json<ApplicationRequest>,
) -> Response
where
    R: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit_application(request) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn applicants_handler<R, N>(
    State(service): State<Arc<BoardService<R, N>>>,
    Path((employer_id, job_id)): Path<(String, String)>,
) -> Response
where
    R: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    match service.applicants_for_job(&EmployerId(employer_id), &JobId(job_id)) {
        Ok(snapshots) => (StatusCode::OK, axum::Json(snapshots)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn review_handler<R, N>(
    State(service): State<Arc<BoardService<R, N>>>,
    Path((employer_id, job_id, seeker_id)): Path<(String, String, String)>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    R: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    match service.review_application(
        &EmployerId(employer_id),
        &SeekerId(seeker_id),
        &JobId(job_id),
        request.status,
    ) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn shortlist_handler<R, N>(
    State(service): State<Arc<BoardService<R, N>>>,
    Path(seeker_id): Path<String>,
) -> Response
where
    R: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    match service.shortlist_for_seeker(&SeekerId(seeker_id)) {
        Ok(jobs) => (StatusCode::OK, axum::Json(jobs)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn talent_pool_handler<R, N>(
    State(service): State<Arc<BoardService<R, N>>>,
    Path(employer_id): Path<String>,
    Query(query): Query<TalentPoolQuery>,
) -> Response
where
    R: BoardStore + 'static,
    N: NotificationPublisher + 'static,
{
    let filter = match (query.keyword, query.category) {
        (Some(keyword), _) => TalentPoolFilter::Keyword(keyword),
        (None, Some(category)) => TalentPoolFilter::Category(category),
        (None, None) => {
            let payload = json!({
                "error_kind": "bad_request",
                "error": "either 'keyword' or 'category' must be provided",
            });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.talent_pool(&EmployerId(employer_id), filter) {
        Ok(pool) => (StatusCode::OK, axum::Json(pool)).into_response(),
        Err(err) => error_response(&err),
    }
}

/// Map a service error to its wire shape. Quota rejections carry the plan
/// name and limit so callers can render an upgrade prompt; authorization
/// failures reveal nothing beyond "forbidden".
pub(crate) fn error_response(err: &BoardError) -> Response {
    let status = match err {
        BoardError::QuotaExceeded { .. } => StatusCode::PAYMENT_REQUIRED,
        BoardError::Forbidden => StatusCode::FORBIDDEN,
        BoardError::NotFound => StatusCode::NOT_FOUND,
        BoardError::DuplicateApplication => StatusCode::CONFLICT,
        BoardError::CvMissing
        | BoardError::MissingScreeningAnswers(_)
        | BoardError::TooManyScreeningQuestions { .. }
        | BoardError::Transition(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BoardError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        BoardError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        BoardError::InconsistentState(_) | BoardError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let mut payload = json!({
        "error_kind": err.kind(),
        "error": err.to_string(),
    });
    match err {
        BoardError::QuotaExceeded { limit, plan_name } => {
            payload["limit"] = json!(limit);
            payload["plan_name"] = json!(plan_name);
        }
        BoardError::MissingScreeningAnswers(gate) => {
            payload["expected"] = json!(gate.expected);
            payload["received"] = json!(gate.received);
        }
        BoardError::Forbidden => {
            payload["error"] = json!("forbidden");
        }
        _ => {}
    }

    (status, axum::Json(payload)).into_response()
}
