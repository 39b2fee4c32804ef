use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{async_trait, extract::FromRequestParts, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::analysis::TranscriptAnalyzer;
use super::domain::{
    ApplicationId, ApplicationStatus, Caller, InterviewId, InterviewMode, JobDraft, JobId,
    JobStatus, JobUpdate, Role, UserId,
};
use super::repository::{JobFilter, NotificationPublisher};
use super::service::{HiringError, HiringService, HiringStore, InterviewInvite};

/// Router builder exposing the hiring HTTP surface.
///
/// Caller identity arrives through `x-caller-id` / `x-caller-role` headers,
/// attached by the authentication middleware that fronts this service.
pub fn hiring_router<S, N, A>(service: Arc<HiringService<S, N, A>>) -> Router
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    Router::new()
        .route(
            "/api/jobs",
            get(list_jobs_handler::<S, N, A>).post(create_job_handler::<S, N, A>),
        )
        .route("/api/jobs/employer/mine", get(my_jobs_handler::<S, N, A>))
        .route(
            "/api/jobs/:job_id",
            get(get_job_handler::<S, N, A>)
                .put(update_job_handler::<S, N, A>)
                .delete(delete_job_handler::<S, N, A>),
        )
        .route("/api/applications", post(apply_handler::<S, N, A>))
        .route(
            "/api/applications/mine",
            get(my_applications_handler::<S, N, A>),
        )
        .route(
            "/api/applications/job/:job_id",
            get(job_applications_handler::<S, N, A>),
        )
        .route(
            "/api/applications/:application_id/status",
            put(update_status_handler::<S, N, A>),
        )
        .route("/api/interviews", post(create_interview_handler::<S, N, A>))
        .route(
            "/api/interviews/mine",
            get(my_interviews_handler::<S, N, A>),
        )
        .route(
            "/api/interviews/:interview_id",
            get(get_interview_handler::<S, N, A>),
        )
        .route(
            "/api/interviews/:interview_id/analyze",
            post(analyze_handler::<S, N, A>),
        )
        .with_state(service)
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-caller-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let role = parts
            .headers
            .get("x-caller-role")
            .and_then(|value| value.to_str().ok())
            .and_then(Role::parse);

        match (id, role) {
            (Some(id), Some(role)) => Ok(Caller {
                id: UserId(id.to_string()),
                role,
            }),
            _ => Err(failure(
                StatusCode::UNAUTHORIZED,
                "Not authorized, missing caller identity",
            )),
        }
    }
}

fn success<T: Serialize>(status: StatusCode, data: &T) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

fn success_list<T: Serialize>(items: &[T]) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "success": true, "count": items.len(), "data": items })),
    )
        .into_response()
}

fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}

fn error_response(err: HiringError) -> Response {
    let status = match &err {
        HiringError::JobNotFound
        | HiringError::ApplicationNotFound
        | HiringError::InterviewNotFound
        | HiringError::ProfileNotFound => StatusCode::NOT_FOUND,
        HiringError::Forbidden => StatusCode::FORBIDDEN,
        // Conflicting apply races surface as 409, not the legacy 400.
        HiringError::DuplicateApplication => StatusCode::CONFLICT,
        HiringError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        HiringError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    failure(status, &err.to_string())
}

fn require_role(caller: &Caller, role: Role) -> Result<(), Response> {
    if caller.role == role {
        Ok(())
    } else {
        Err(failure(
            StatusCode::FORBIDDEN,
            &format!("Route restricted to {} accounts", role.label()),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobsQuery {
    search: Option<String>,
    location: Option<String>,
    /// Comma-separated skill list.
    skills: Option<String>,
    status: Option<JobStatus>,
}

impl JobsQuery {
    fn into_filter(self) -> JobFilter {
        JobFilter {
            search: self.search,
            location: self.location,
            skills: self
                .skills
                .map(|raw| {
                    raw.split(',')
                        .map(|skill| skill.trim().to_string())
                        .filter(|skill| !skill.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            status: self.status,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApplyRequest {
    job_id: JobId,
    #[serde(default)]
    cover_letter: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateStatusRequest {
    status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateInterviewRequest {
    application_id: ApplicationId,
    scheduled_date: DateTime<Utc>,
    #[serde(rename = "type", default)]
    mode: InterviewMode,
    #[serde(default)]
    location: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeRequest {
    transcript: String,
}

async fn create_job_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
    Json(draft): Json<JobDraft>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    if let Err(response) = require_role(&caller, Role::Employer) {
        return response;
    }
    match service.create_job(&caller, draft) {
        Ok(job) => success(StatusCode::CREATED, &job),
        Err(err) => error_response(err),
    }
}

async fn list_jobs_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    Query(query): Query<JobsQuery>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    match service.list_jobs(&query.into_filter()) {
        Ok(jobs) => success_list(&jobs),
        Err(err) => error_response(err),
    }
}

async fn my_jobs_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    if let Err(response) = require_role(&caller, Role::Employer) {
        return response;
    }
    match service.my_jobs(&caller) {
        Ok(jobs) => success_list(&jobs),
        Err(err) => error_response(err),
    }
}

async fn get_job_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    match service.get_job(&JobId(job_id)) {
        Ok(job) => success(StatusCode::OK, &job),
        Err(err) => error_response(err),
    }
}

async fn update_job_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
    Path(job_id): Path<String>,
    Json(update): Json<JobUpdate>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    if let Err(response) = require_role(&caller, Role::Employer) {
        return response;
    }
    match service.update_job(&caller, &JobId(job_id), update) {
        Ok(job) => success(StatusCode::OK, &job),
        Err(err) => error_response(err),
    }
}

async fn delete_job_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
    Path(job_id): Path<String>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    if let Err(response) = require_role(&caller, Role::Employer) {
        return response;
    }
    match service.delete_job(&caller, &JobId(job_id)) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "Job deleted successfully" })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

async fn apply_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    if let Err(response) = require_role(&caller, Role::JobSeeker) {
        return response;
    }
    match service.apply(&caller, &request.job_id, request.cover_letter) {
        Ok(application) => success(StatusCode::CREATED, &application),
        Err(err) => error_response(err),
    }
}

async fn my_applications_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    if let Err(response) = require_role(&caller, Role::JobSeeker) {
        return response;
    }
    match service.my_applications(&caller) {
        Ok(applications) => success_list(&applications),
        Err(err) => error_response(err),
    }
}

async fn job_applications_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
    Path(job_id): Path<String>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    if let Err(response) = require_role(&caller, Role::Employer) {
        return response;
    }
    match service.job_applications(&caller, &JobId(job_id)) {
        Ok(applications) => success_list(&applications),
        Err(err) => error_response(err),
    }
}

async fn update_status_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
    Path(application_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    if let Err(response) = require_role(&caller, Role::Employer) {
        return response;
    }
    match service.update_status(&caller, &ApplicationId(application_id), request.status) {
        Ok(application) => success(StatusCode::OK, &application),
        Err(err) => error_response(err),
    }
}

async fn create_interview_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
    Json(request): Json<CreateInterviewRequest>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    if let Err(response) = require_role(&caller, Role::Employer) {
        return response;
    }
    let invite = InterviewInvite {
        application_id: request.application_id,
        scheduled_date: request.scheduled_date,
        mode: request.mode,
        location: request.location,
    };
    match service.create_interview(&caller, invite) {
        Ok(interview) => success(StatusCode::CREATED, &interview),
        Err(err) => error_response(err),
    }
}

async fn analyze_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
    Path(interview_id): Path<String>,
    Json(request): Json<AnalyzeRequest>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    match service
        .submit_transcript(&caller, &InterviewId(interview_id), request.transcript)
        .await
    {
        Ok(interview) => success(StatusCode::OK, &interview),
        Err(err) => error_response(err),
    }
}

async fn my_interviews_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    match service.my_interviews(&caller) {
        Ok(interviews) => success_list(&interviews),
        Err(err) => error_response(err),
    }
}

async fn get_interview_handler<S, N, A>(
    State(service): State<Arc<HiringService<S, N, A>>>,
    caller: Caller,
    Path(interview_id): Path<String>,
) -> Response
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    match service.get_interview(&caller, &InterviewId(interview_id)) {
        Ok(interview) => success(StatusCode::OK, &interview),
        Err(err) => error_response(err),
    }
}
