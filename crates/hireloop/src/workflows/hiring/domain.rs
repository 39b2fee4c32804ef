use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for published jobs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for scheduled interviews.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterviewId(pub String);

/// Identifier wrapper for user accounts (candidates and employers alike).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Role attached to every request by the outer auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    JobSeeker,
    Employer,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jobseeker" => Some(Self::JobSeeker),
            "employer" => Some(Self::Employer),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Role::JobSeeker => "jobseeker",
            Role::Employer => "employer",
        }
    }
}

/// Caller identity consumed by the workflows. Token validation happens
/// upstream; the domain only ever sees an id and a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub role: Role,
}

/// Profile snapshot served by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Publication state of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Draft,
    Closed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Draft => "draft",
            JobStatus::Closed => "closed",
        }
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A published job posting. The owning employer is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub location: String,
    pub salary: String,
    pub employer_id: UserId,
    pub employer_name: String,
    pub company_name: String,
    pub status: JobStatus,
    pub applications_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Employer-supplied fields for a new posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub location: String,
    pub salary: String,
}

/// Partial update applied to an existing posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub status: Option<JobStatus>,
}

/// Lifecycle of a job application.
///
/// `applied` is the entry state. `rejected` and `hired` are terminal.
/// A direct `applied -> hired` move is deliberately legal: employers may hire
/// without an interview round. Backward moves and edits to terminal states
/// are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    InterviewInvited,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::InterviewInvited => "interview_invited",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Hired)
    }

    /// Whether an employer-driven status update from `self` to `to` is legal.
    /// Re-asserting the current status is treated as an idempotent no-op.
    pub fn can_transition(self, to: ApplicationStatus) -> bool {
        if self == to {
            return true;
        }
        match self {
            ApplicationStatus::Applied => matches!(
                to,
                ApplicationStatus::InterviewInvited
                    | ApplicationStatus::Rejected
                    | ApplicationStatus::Hired
            ),
            ApplicationStatus::InterviewInvited => {
                matches!(to, ApplicationStatus::Rejected | ApplicationStatus::Hired)
            }
            ApplicationStatus::Rejected | ApplicationStatus::Hired => false,
        }
    }
}

/// A candidate's request to be considered for one job.
///
/// Candidate name/email/skills are snapshotted at apply time so the record
/// stays stable when the profile is edited later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub candidate_id: UserId,
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_skills: Vec<String>,
    pub match_score: u8,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of an interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::InProgress => "in_progress",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
        }
    }
}

/// How the interview is conducted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewMode {
    Online,
    Offline,
}

impl Default for InterviewMode {
    fn default() -> Self {
        Self::Online
    }
}

/// Verdict produced by the transcript analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiDecision {
    Yes,
    No,
    Maybe,
    Pending,
}

impl AiDecision {
    pub const fn label(self) -> &'static str {
        match self {
            AiDecision::Yes => "Yes",
            AiDecision::No => "No",
            AiDecision::Maybe => "Maybe",
            AiDecision::Pending => "Pending",
        }
    }
}

/// Structured evaluation returned by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewAnalysis {
    pub decision: AiDecision,
    pub score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendation: String,
}

/// Outcome of the transcript analysis step, kept as a tagged value so a
/// genuine `Pending` verdict stays distinguishable from an unreachable
/// analyzer. Views still render the legacy Pending/0 defaults for both
/// non-analyzed variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Pending,
    Analyzed { analysis: InterviewAnalysis },
    Unavailable { reason: String },
}

impl AnalysisOutcome {
    pub fn decision(&self) -> AiDecision {
        match self {
            AnalysisOutcome::Analyzed { analysis } => analysis.decision,
            AnalysisOutcome::Pending | AnalysisOutcome::Unavailable { .. } => AiDecision::Pending,
        }
    }

    pub fn score(&self) -> u8 {
        match self {
            AnalysisOutcome::Analyzed { analysis } => analysis.score,
            AnalysisOutcome::Pending | AnalysisOutcome::Unavailable { .. } => 0,
        }
    }
}

/// A scheduled evaluation session tied to one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: InterviewId,
    pub job_id: JobId,
    pub candidate_id: UserId,
    pub employer_id: UserId,
    pub application_id: ApplicationId,
    pub transcript: String,
    pub analysis: AnalysisOutcome,
    pub scheduled_date: DateTime<Utc>,
    pub mode: InterviewMode,
    pub location: String,
    pub status: InterviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Interview {
    pub fn is_participant(&self, user: &UserId) -> bool {
        &self.candidate_id == user || &self.employer_id == user
    }
}
