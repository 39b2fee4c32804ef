//! Hiring workflows: job postings, skill-matched applications, and
//! AI-analyzed interviews.
//!
//! `matching` is the pure scoring core; `service` composes the storage,
//! notification, and analyzer seams into the application and interview
//! lifecycles; `router` exposes the JSON HTTP surface.

pub mod analysis;
pub mod domain;
pub mod matching;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use analysis::{AnalysisError, AnalysisRequest, GeminiAnalyzer, TranscriptAnalyzer};
pub use domain::{
    AiDecision, AnalysisOutcome, Application, ApplicationId, ApplicationStatus, Caller, Interview,
    InterviewAnalysis, InterviewId, InterviewMode, InterviewStatus, Job, JobDraft, JobId,
    JobStatus, JobUpdate, Role, UserId, UserProfile,
};
pub use matching::{match_score, skills_breakdown, SkillsBreakdown};
pub use repository::{
    ApplicationStore, InterviewStore, JobFilter, JobStore, Notification, NotificationKind,
    NotificationPublisher, NotifyError, ProfileDirectory, RepositoryError,
};
pub use router::hiring_router;
pub use service::{HiringError, HiringService, HiringStore, InterviewInvite};
