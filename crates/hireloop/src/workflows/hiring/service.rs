use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::analysis::{AnalysisRequest, TranscriptAnalyzer};
use super::domain::{
    AnalysisOutcome, Application, ApplicationId, ApplicationStatus, Caller, Interview,
    InterviewId, InterviewMode, InterviewStatus, Job, JobDraft, JobId, JobStatus, JobUpdate,
};
use super::matching::match_score;
use super::repository::{
    ApplicationStore, InterviewStore, JobFilter, JobStore, Notification, NotificationKind,
    NotificationPublisher, ProfileDirectory, RepositoryError,
};

/// Storage bound for the hiring workflows; the shipped infra implements all
/// four seams over one backing store.
pub trait HiringStore:
    JobStore + ApplicationStore + InterviewStore + ProfileDirectory
{
}

impl<T> HiringStore for T where T: JobStore + ApplicationStore + InterviewStore + ProfileDirectory {}

/// Service facade composing storage, notifications, and the analyzer.
pub struct HiringService<S, N, A> {
    store: Arc<S>,
    notifier: Arc<N>,
    analyzer: Arc<A>,
}

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static INTERVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

fn next_interview_id() -> InterviewId {
    let id = INTERVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InterviewId(format!("itv-{id:06}"))
}

/// Parameters for scheduling an interview.
#[derive(Debug, Clone)]
pub struct InterviewInvite {
    pub application_id: ApplicationId,
    pub scheduled_date: DateTime<Utc>,
    pub mode: InterviewMode,
    pub location: String,
}

impl<S, N, A> HiringService<S, N, A>
where
    S: HiringStore + 'static,
    N: NotificationPublisher + 'static,
    A: TranscriptAnalyzer + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, analyzer: Arc<A>) -> Self {
        Self {
            store,
            notifier,
            analyzer,
        }
    }

    /// Publish a new job posting for the calling employer.
    pub fn create_job(&self, caller: &Caller, draft: JobDraft) -> Result<Job, HiringError> {
        let profile = self
            .store
            .fetch_profile(&caller.id)?
            .ok_or(HiringError::ProfileNotFound)?;

        let job = Job {
            id: next_job_id(),
            title: draft.title,
            description: draft.description,
            required_skills: draft.required_skills,
            location: draft.location,
            salary: draft.salary,
            employer_id: caller.id.clone(),
            employer_name: profile.name.clone(),
            company_name: profile.company_name.unwrap_or(profile.name),
            status: JobStatus::Active,
            applications_count: 0,
            created_at: Utc::now(),
        };

        let stored = self.store.insert_job(job)?;
        info!(job = %stored.id.0, employer = %caller.id.0, "job published");
        Ok(stored)
    }

    /// Public job listing, filtered and newest first.
    pub fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, HiringError> {
        Ok(self.store.list_jobs(filter)?)
    }

    pub fn get_job(&self, id: &JobId) -> Result<Job, HiringError> {
        self.store.fetch_job(id)?.ok_or(HiringError::JobNotFound)
    }

    /// The calling employer's own postings, newest first.
    pub fn my_jobs(&self, caller: &Caller) -> Result<Vec<Job>, HiringError> {
        Ok(self.store.jobs_by_employer(&caller.id)?)
    }

    /// Apply caller-supplied edits to an owned posting.
    pub fn update_job(
        &self,
        caller: &Caller,
        id: &JobId,
        update: JobUpdate,
    ) -> Result<Job, HiringError> {
        let mut job = self.store.fetch_job(id)?.ok_or(HiringError::JobNotFound)?;
        if job.employer_id != caller.id {
            return Err(HiringError::Forbidden);
        }

        if let Some(title) = update.title {
            job.title = title;
        }
        if let Some(description) = update.description {
            job.description = description;
        }
        if let Some(required_skills) = update.required_skills {
            job.required_skills = required_skills;
        }
        if let Some(location) = update.location {
            job.location = location;
        }
        if let Some(salary) = update.salary {
            job.salary = salary;
        }
        if let Some(status) = update.status {
            job.status = status;
        }

        self.store.update_job(job.clone())?;
        Ok(job)
    }

    pub fn delete_job(&self, caller: &Caller, id: &JobId) -> Result<(), HiringError> {
        let job = self.store.fetch_job(id)?.ok_or(HiringError::JobNotFound)?;
        if job.employer_id != caller.id {
            return Err(HiringError::Forbidden);
        }
        self.store.delete_job(id)?;
        info!(job = %id.0, "job deleted");
        Ok(())
    }

    /// Submit an application for a job on behalf of the calling candidate.
    ///
    /// Snapshots the candidate profile, computes the match score, and relies
    /// on the store's conditional insert to reject a duplicate
    /// (job, candidate) pair before the counter is touched.
    pub fn apply(
        &self,
        caller: &Caller,
        job_id: &JobId,
        cover_letter: String,
    ) -> Result<Application, HiringError> {
        let job = self
            .store
            .fetch_job(job_id)?
            .ok_or(HiringError::JobNotFound)?;

        let candidate = self
            .store
            .fetch_profile(&caller.id)?
            .ok_or(HiringError::ProfileNotFound)?;

        let score = match_score(&job.required_skills, &candidate.skills);

        let application = Application {
            id: next_application_id(),
            job_id: job.id.clone(),
            candidate_id: caller.id.clone(),
            candidate_name: candidate.name.clone(),
            candidate_email: candidate.email,
            candidate_skills: candidate.skills,
            match_score: score,
            status: ApplicationStatus::Applied,
            cover_letter,
            created_at: Utc::now(),
        };

        let stored = self
            .store
            .insert_application(application)
            .map_err(|err| match err {
                RepositoryError::Conflict => HiringError::DuplicateApplication,
                other => HiringError::Repository(other),
            })?;

        self.store.increment_applications(&job.id)?;

        info!(
            application = %stored.id.0,
            job = %job.id.0,
            score = stored.match_score,
            "application submitted"
        );

        self.notify(Notification {
            user_id: job.employer_id.clone(),
            kind: NotificationKind::NewApplication,
            message: format!("New application from {} for {}", candidate.name, job.title),
            related_id: Some(stored.id.0.clone()),
        });

        Ok(stored)
    }

    /// The calling candidate's applications, newest first.
    pub fn my_applications(&self, caller: &Caller) -> Result<Vec<Application>, HiringError> {
        Ok(self.store.applications_by_candidate(&caller.id)?)
    }

    /// Applications for an owned job, ranked by match score then recency.
    pub fn job_applications(
        &self,
        caller: &Caller,
        job_id: &JobId,
    ) -> Result<Vec<Application>, HiringError> {
        let job = self
            .store
            .fetch_job(job_id)?
            .ok_or(HiringError::JobNotFound)?;
        if job.employer_id != caller.id {
            return Err(HiringError::Forbidden);
        }
        Ok(self.store.applications_by_job(job_id)?)
    }

    /// Employer-driven status update, validated against the transition graph.
    pub fn update_status(
        &self,
        caller: &Caller,
        application_id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<Application, HiringError> {
        let mut application = self
            .store
            .fetch_application(application_id)?
            .ok_or(HiringError::ApplicationNotFound)?;

        let job = self
            .store
            .fetch_job(&application.job_id)?
            .ok_or(HiringError::JobNotFound)?;
        if job.employer_id != caller.id {
            return Err(HiringError::Forbidden);
        }

        if !application.status.can_transition(status) {
            return Err(HiringError::InvalidTransition {
                from: application.status.label(),
                to: status.label(),
            });
        }

        application.status = status;
        self.store.update_application(application.clone())?;

        self.notify(Notification {
            user_id: application.candidate_id.clone(),
            kind: NotificationKind::StatusUpdate,
            message: format!(
                "Your application status for {} has been updated to: {}",
                job.title,
                status.label()
            ),
            related_id: Some(application.id.0.clone()),
        });

        Ok(application)
    }

    /// Schedule an interview for an owned application. The linked application
    /// is forced to `interview_invited` regardless of its prior status.
    pub fn create_interview(
        &self,
        caller: &Caller,
        invite: InterviewInvite,
    ) -> Result<Interview, HiringError> {
        let mut application = self
            .store
            .fetch_application(&invite.application_id)?
            .ok_or(HiringError::ApplicationNotFound)?;

        let job = self
            .store
            .fetch_job(&application.job_id)?
            .ok_or(HiringError::JobNotFound)?;
        if job.employer_id != caller.id {
            return Err(HiringError::Forbidden);
        }

        let interview = Interview {
            id: next_interview_id(),
            job_id: job.id.clone(),
            candidate_id: application.candidate_id.clone(),
            employer_id: caller.id.clone(),
            application_id: application.id.clone(),
            transcript: String::new(),
            analysis: AnalysisOutcome::Pending,
            scheduled_date: invite.scheduled_date,
            mode: invite.mode,
            location: invite.location,
            status: InterviewStatus::Scheduled,
            completed_at: None,
            created_at: Utc::now(),
        };

        let stored = self.store.insert_interview(interview)?;

        application.status = ApplicationStatus::InterviewInvited;
        self.store.update_application(application.clone())?;

        info!(interview = %stored.id.0, application = %application.id.0, "interview scheduled");

        self.notify(Notification {
            user_id: application.candidate_id.clone(),
            kind: NotificationKind::InterviewInvite,
            message: format!("You have been invited to interview for {}", job.title),
            related_id: Some(stored.id.0.clone()),
        });

        Ok(stored)
    }

    /// Persist a transcript and run the analyzer over it.
    ///
    /// The transcript and the `in_progress` status are saved no matter what
    /// the analyzer does. A successful analysis completes the interview; a
    /// failed one records the reason and leaves the verdict pending. The
    /// employer is notified in both branches.
    pub async fn submit_transcript(
        &self,
        caller: &Caller,
        interview_id: &InterviewId,
        transcript: String,
    ) -> Result<Interview, HiringError> {
        let mut interview = self
            .store
            .fetch_interview(interview_id)?
            .ok_or(HiringError::InterviewNotFound)?;

        if !interview.is_participant(&caller.id) {
            return Err(HiringError::Forbidden);
        }

        let job = self
            .store
            .fetch_job(&interview.job_id)?
            .ok_or(HiringError::JobNotFound)?;

        interview.transcript = transcript.clone();
        interview.status = InterviewStatus::InProgress;

        let outcome = self
            .analyzer
            .analyze(AnalysisRequest {
                transcript,
                job_description: job.description.clone(),
                required_skills: job.required_skills.clone(),
            })
            .await;

        match outcome {
            Ok(analysis) => {
                interview.analysis = AnalysisOutcome::Analyzed { analysis };
                interview.status = InterviewStatus::Completed;
                interview.completed_at = Some(Utc::now());
            }
            Err(err) => {
                warn!(interview = %interview.id.0, error = %err, "transcript analysis unavailable");
                interview.analysis = AnalysisOutcome::Unavailable {
                    reason: err.to_string(),
                };
            }
        }

        self.store.update_interview(interview.clone())?;

        self.notify(Notification {
            user_id: interview.employer_id.clone(),
            kind: NotificationKind::InterviewComplete,
            message: format!("Interview analysis completed for {}", job.title),
            related_id: Some(interview.id.0.clone()),
        });

        Ok(interview)
    }

    /// Interviews the caller participates in, newest first.
    pub fn my_interviews(&self, caller: &Caller) -> Result<Vec<Interview>, HiringError> {
        Ok(self
            .store
            .interviews_by_participant(&caller.id, caller.role)?)
    }

    pub fn get_interview(
        &self,
        caller: &Caller,
        id: &InterviewId,
    ) -> Result<Interview, HiringError> {
        let interview = self
            .store
            .fetch_interview(id)?
            .ok_or(HiringError::InterviewNotFound)?;
        if !interview.is_participant(&caller.id) {
            return Err(HiringError::Forbidden);
        }
        Ok(interview)
    }

    fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifier.publish(notification) {
            warn!(error = %err, "notification dropped");
        }
    }
}

/// Error raised by the hiring workflows.
#[derive(Debug, thiserror::Error)]
pub enum HiringError {
    #[error("Job not found")]
    JobNotFound,
    #[error("Application not found")]
    ApplicationNotFound,
    #[error("Interview not found")]
    InterviewNotFound,
    #[error("User profile not found")]
    ProfileNotFound,
    #[error("Not authorized")]
    Forbidden,
    #[error("You have already applied for this job")]
    DuplicateApplication,
    #[error("Illegal status transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
