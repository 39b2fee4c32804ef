use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationId, Interview, InterviewId, Job, JobId, JobStatus, Role, UserId,
    UserProfile,
};

/// Query filter for the public job listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    /// Case-insensitive substring match against title or description.
    pub search: Option<String>,
    /// Case-insensitive substring match against location.
    pub location: Option<String>,
    /// Jobs requiring any of these skills (normalized equality).
    pub skills: Vec<String>,
    /// Defaults to `active` when absent.
    pub status: Option<JobStatus>,
}

/// Storage seam for job postings. `increment_applications` must be atomic
/// with respect to concurrent applies; callers never read-modify-write the
/// counter themselves.
pub trait JobStore: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn update_job(&self, job: Job) -> Result<(), RepositoryError>;
    fn delete_job(&self, id: &JobId) -> Result<(), RepositoryError>;
    /// Matching jobs, newest first.
    fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, RepositoryError>;
    /// Employer's jobs, newest first.
    fn jobs_by_employer(&self, employer: &UserId) -> Result<Vec<Job>, RepositoryError>;
    fn increment_applications(&self, id: &JobId) -> Result<(), RepositoryError>;
}

/// Storage seam for applications. `insert_application` is a conditional
/// create: it must fail with [`RepositoryError::Conflict`] when an
/// application for the same (job, candidate) pair already exists, which is
/// how concurrent duplicate applies are resolved.
pub trait ApplicationStore: Send + Sync {
    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn fetch_application(&self, id: &ApplicationId)
        -> Result<Option<Application>, RepositoryError>;
    fn update_application(&self, application: Application) -> Result<(), RepositoryError>;
    /// Candidate's applications, newest first.
    fn applications_by_candidate(
        &self,
        candidate: &UserId,
    ) -> Result<Vec<Application>, RepositoryError>;
    /// Applications for one job, match score descending, ties newest first.
    fn applications_by_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError>;
}

/// Storage seam for interviews.
pub trait InterviewStore: Send + Sync {
    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError>;
    fn fetch_interview(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError>;
    fn update_interview(&self, interview: Interview) -> Result<(), RepositoryError>;
    /// Interviews where the user participates in the given role, newest first.
    fn interviews_by_participant(
        &self,
        user: &UserId,
        role: Role,
    ) -> Result<Vec<Interview>, RepositoryError>;
}

/// Read-side view of user accounts; the workflows snapshot profile fields
/// from here instead of holding a reference into the auth system.
pub trait ProfileDirectory: Send + Sync {
    fn fetch_profile(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Notification categories surfaced in the user-facing feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewApplication,
    InterviewInvite,
    InterviewComplete,
    StatusUpdate,
}

/// Outbound notification payload. Delivery is best effort: the workflows log
/// and discard publisher failures instead of failing the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
}

/// Trait describing outbound notification hooks (in-app feed, e-mail, etc.).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
