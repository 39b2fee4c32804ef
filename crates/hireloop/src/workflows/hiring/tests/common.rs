use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::workflows::hiring::analysis::{AnalysisError, AnalysisRequest, TranscriptAnalyzer};
use crate::workflows::hiring::domain::{
    AiDecision, Application, ApplicationId, Caller, Interview, InterviewAnalysis, InterviewId,
    InterviewMode, Job, JobDraft, JobId, Role, UserId, UserProfile,
};
use crate::workflows::hiring::repository::{
    ApplicationStore, InterviewStore, JobFilter, JobStore, Notification, NotificationPublisher,
    NotifyError, ProfileDirectory, RepositoryError,
};
use crate::workflows::hiring::service::{HiringService, InterviewInvite};

/// Mutex-backed store standing in for the persistence layer. Duplicate
/// detection and the counter bump happen under the same lock, matching the
/// atomic primitives a real backend would provide.
#[derive(Default)]
pub(super) struct MemoryStore {
    jobs: Mutex<HashMap<JobId, Job>>,
    applications: Mutex<HashMap<ApplicationId, Application>>,
    interviews: Mutex<HashMap<InterviewId, Interview>>,
    profiles: Mutex<HashMap<UserId, UserProfile>>,
}

impl MemoryStore {
    pub(super) fn add_profile(&self, profile: UserProfile) {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile);
    }
}

impl JobStore for MemoryStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_job(&self, job: Job) -> Result<(), RepositoryError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        if guard.contains_key(&job.id) {
            guard.insert(job.id.clone(), job);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn delete_job(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        let status = filter.status.unwrap_or_default();
        let mut jobs: Vec<Job> = guard
            .values()
            .filter(|job| job.status == status)
            .filter(|job| match &filter.search {
                Some(term) => {
                    let term = term.to_lowercase();
                    job.title.to_lowercase().contains(&term)
                        || job.description.to_lowercase().contains(&term)
                }
                None => true,
            })
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    fn jobs_by_employer(&self, employer: &UserId) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        let mut jobs: Vec<Job> = guard
            .values()
            .filter(|job| &job.employer_id == employer)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    fn increment_applications(&self, id: &JobId) -> Result<(), RepositoryError> {
        let mut guard = self.jobs.lock().expect("job mutex poisoned");
        let job = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        job.applications_count += 1;
        Ok(())
    }
}

impl ApplicationStore for MemoryStore {
    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        let duplicate = guard.values().any(|existing| {
            existing.job_id == application.job_id
                && existing.candidate_id == application.candidate_id
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn applications_by_candidate(
        &self,
        candidate: &UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| &application.candidate_id == candidate)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }

    fn applications_by_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.applications.lock().expect("application mutex poisoned");
        let mut applications: Vec<Application> = guard
            .values()
            .filter(|application| &application.job_id == job)
            .cloned()
            .collect();
        applications.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(applications)
    }
}

impl InterviewStore for MemoryStore {
    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        let mut guard = self.interviews.lock().expect("interview mutex poisoned");
        guard.insert(interview.id.clone(), interview.clone());
        Ok(interview)
    }

    fn fetch_interview(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError> {
        let guard = self.interviews.lock().expect("interview mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_interview(&self, interview: Interview) -> Result<(), RepositoryError> {
        let mut guard = self.interviews.lock().expect("interview mutex poisoned");
        if guard.contains_key(&interview.id) {
            guard.insert(interview.id.clone(), interview);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn interviews_by_participant(
        &self,
        user: &UserId,
        role: Role,
    ) -> Result<Vec<Interview>, RepositoryError> {
        let guard = self.interviews.lock().expect("interview mutex poisoned");
        let mut interviews: Vec<Interview> = guard
            .values()
            .filter(|interview| match role {
                Role::JobSeeker => &interview.candidate_id == user,
                Role::Employer => &interview.employer_id == user,
            })
            .cloned()
            .collect();
        interviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(interviews)
    }
}

impl ProfileDirectory for MemoryStore {
    fn fetch_profile(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default)]
pub(super) struct RecordingPublisher {
    events: Mutex<Vec<Notification>>,
}

impl RecordingPublisher {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

impl NotificationPublisher for RecordingPublisher {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        let mut guard = self.events.lock().expect("event mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

/// Publisher that always fails; the workflows must shrug it off.
pub(super) struct DeadLetterPublisher;

impl NotificationPublisher for DeadLetterPublisher {
    fn publish(&self, _notification: Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("queue unreachable".to_string()))
    }
}

/// Analyzer returning a canned evaluation.
pub(super) struct StubAnalyzer {
    pub(super) analysis: InterviewAnalysis,
}

impl StubAnalyzer {
    pub(super) fn positive() -> Self {
        Self {
            analysis: InterviewAnalysis {
                decision: AiDecision::Yes,
                score: 82,
                strengths: vec!["relevant experience".to_string()],
                weaknesses: vec!["sparse on testing practice".to_string()],
                recommendation: "Proceed to offer discussion.".to_string(),
            },
        }
    }
}

impl TranscriptAnalyzer for StubAnalyzer {
    fn analyze(
        &self,
        _request: AnalysisRequest,
    ) -> impl Future<Output = Result<InterviewAnalysis, AnalysisError>> + Send {
        let analysis = self.analysis.clone();
        async move { Ok(analysis) }
    }
}

/// Analyzer simulating an unreachable model endpoint.
pub(super) struct OfflineAnalyzer;

impl TranscriptAnalyzer for OfflineAnalyzer {
    fn analyze(
        &self,
        _request: AnalysisRequest,
    ) -> impl Future<Output = Result<InterviewAnalysis, AnalysisError>> + Send {
        async move {
            Err(AnalysisError::Transport(
                "connection refused".to_string(),
            ))
        }
    }
}

pub(super) fn employer() -> Caller {
    Caller {
        id: UserId("emp-1".to_string()),
        role: Role::Employer,
    }
}

pub(super) fn other_employer() -> Caller {
    Caller {
        id: UserId("emp-2".to_string()),
        role: Role::Employer,
    }
}

pub(super) fn candidate(id: &str) -> Caller {
    Caller {
        id: UserId(id.to_string()),
        role: Role::JobSeeker,
    }
}

pub(super) fn employer_profile(caller: &Caller) -> UserProfile {
    UserProfile {
        id: caller.id.clone(),
        name: "Dana Recruiter".to_string(),
        email: "dana@acme.example".to_string(),
        skills: Vec::new(),
        company_name: Some("Acme Robotics".to_string()),
    }
}

pub(super) fn candidate_profile(caller: &Caller, name: &str, skills: &[&str]) -> UserProfile {
    UserProfile {
        id: caller.id.clone(),
        name: name.to_string(),
        email: format!("{}@mail.example", name.to_lowercase().replace(' ', ".")),
        skills: skills.iter().map(|skill| skill.to_string()).collect(),
        company_name: None,
    }
}

pub(super) fn backend_job_draft() -> JobDraft {
    JobDraft {
        title: "Backend Engineer".to_string(),
        description: "Own the ingestion pipeline and its storage layer.".to_string(),
        required_skills: vec![
            "Rust".to_string(),
            "SQL".to_string(),
            "Docker".to_string(),
        ],
        location: "Des Moines, IA".to_string(),
        salary: "$130k-$150k".to_string(),
    }
}

pub(super) fn invite_for(application_id: ApplicationId) -> InterviewInvite {
    InterviewInvite {
        application_id,
        scheduled_date: Utc.with_ymd_and_hms(2026, 9, 14, 15, 0, 0).unwrap(),
        mode: InterviewMode::Online,
        location: String::new(),
    }
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}

pub(super) type MemoryService<A> = HiringService<MemoryStore, RecordingPublisher, A>;

/// Service wired with the in-memory store, a recording publisher, and the
/// supplied analyzer. The employer profile is pre-registered.
pub(super) fn service_with<A>(
    analyzer: A,
) -> (Arc<MemoryStore>, Arc<RecordingPublisher>, MemoryService<A>)
where
    A: TranscriptAnalyzer + 'static,
{
    let store = Arc::new(MemoryStore::default());
    let publisher = Arc::new(RecordingPublisher::default());
    store.add_profile(employer_profile(&employer()));
    let service = HiringService::new(store.clone(), publisher.clone(), Arc::new(analyzer));
    (store, publisher, service)
}
