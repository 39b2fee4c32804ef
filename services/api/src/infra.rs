use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use hireloop::workflows::hiring::{
    AiDecision, AnalysisError, AnalysisRequest, Application, ApplicationId, ApplicationStore,
    GeminiAnalyzer, Interview, InterviewAnalysis, InterviewId, InterviewStore, Job, JobFilter,
    JobId, JobStore, Notification, NotificationPublisher, NotifyError, ProfileDirectory,
    RepositoryError, Role, TranscriptAnalyzer, UserId, UserProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// In-memory backing store for every hiring seam. Duplicate detection and
/// counter bumps run under one lock, standing in for the conditional-create
/// and atomic-increment primitives of a real database.
#[derive(Default)]
pub(crate) struct InMemoryHiringStore {
    jobs: Mutex<HashMap<JobId, Job>>,
    applications: Mutex<HashMap<ApplicationId, Application>>,
    interviews: Mutex<HashMap<InterviewId, Interview>>,
    profiles: Mutex<HashMap<UserId, UserProfile>>,
}

impl InMemoryHiringStore {
    pub(crate) fn add_profile(&self, profile: UserProfile) {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile);
    }
}

impl JobStore for InMemoryHiringStore {
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
        let skills: Vec<String> = filter.skills.iter().map(|skill| normalize(skill)).collect();

        let mut jobs: Vec<Job> = guard
            .values()
            .filter(|job| job.status == status)
            .filter(|job| match &filter.search {
                Some(term) => {
                    let term = normalize(term);
                    job.title.to_lowercase().contains(&term)
                        || job.description.to_lowercase().contains(&term)
                }
                None => true,
            })
            .filter(|job| match &filter.location {
                Some(location) => job.location.to_lowercase().contains(&normalize(location)),
                None => true,
            })
            .filter(|job| {
                skills.is_empty()
                    || job
                        .required_skills
                        .iter()
                        .any(|skill| skills.contains(&normalize(skill)))
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

impl ApplicationStore for InMemoryHiringStore {
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

impl InterviewStore for InMemoryHiringStore {
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

impl ProfileDirectory for InMemoryHiringStore {
    fn fetch_profile(&self, id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// In-app notification feed; events stay queryable for demos and tests.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError> {
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

/// Deterministic analyzer used when no hosted model key is configured.
///
/// Scores by how many required skills are mentioned in the transcript, which
/// is crude but stable enough for demos and offline development.
#[derive(Default)]
pub(crate) struct ScriptedAnalyzer;

impl ScriptedAnalyzer {
    fn evaluate(request: &AnalysisRequest) -> InterviewAnalysis {
        let transcript = request.transcript.to_lowercase();
        let (mentioned, absent): (Vec<String>, Vec<String>) = request
            .required_skills
            .iter()
            .cloned()
            .partition(|skill| transcript.contains(&skill.trim().to_lowercase()));

        let score = if request.required_skills.is_empty() {
            50
        } else {
            ((mentioned.len() as f64 / request.required_skills.len() as f64) * 100.0).round() as u8
        };

        let decision = if score >= 70 {
            AiDecision::Yes
        } else if score >= 40 {
            AiDecision::Maybe
        } else {
            AiDecision::No
        };

        InterviewAnalysis {
            decision,
            score,
            strengths: mentioned
                .iter()
                .map(|skill| format!("Spoke to required skill: {skill}"))
                .collect(),
            weaknesses: absent
                .iter()
                .map(|skill| format!("No mention of required skill: {skill}"))
                .collect(),
            recommendation: match decision {
                AiDecision::Yes => "Covers the required stack; advance the candidate.".to_string(),
                AiDecision::Maybe => {
                    "Partial skill coverage; probe the gaps in a follow-up round.".to_string()
                }
                _ => "Transcript shows little overlap with the required skills.".to_string(),
            },
        }
    }
}

impl TranscriptAnalyzer for ScriptedAnalyzer {
    fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> impl Future<Output = Result<InterviewAnalysis, AnalysisError>> + Send {
        let analysis = Self::evaluate(&request);
        async move { Ok(analysis) }
    }
}

/// Runtime-selected analyzer: the hosted model when credentials exist,
/// the scripted fallback otherwise.
pub(crate) enum AnalyzerBackend {
    Gemini(GeminiAnalyzer),
    Scripted(ScriptedAnalyzer),
}

impl TranscriptAnalyzer for AnalyzerBackend {
    fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> impl Future<Output = Result<InterviewAnalysis, AnalysisError>> + Send {
        async move {
            match self {
                AnalyzerBackend::Gemini(inner) => inner.analyze(request).await,
                AnalyzerBackend::Scripted(inner) => inner.analyze(request).await,
            }
        }
    }
}

/// Starter accounts so the in-memory deployment is usable immediately;
/// ids double as the `x-caller-id` header values.
pub(crate) fn seed_demo_accounts(store: &InMemoryHiringStore) {
    store.add_profile(UserProfile {
        id: UserId("emp-demo".to_string()),
        name: "Morgan Hale".to_string(),
        email: "morgan@northwind.example".to_string(),
        skills: Vec::new(),
        company_name: Some("Northwind Labs".to_string()),
    });
    store.add_profile(UserProfile {
        id: UserId("cand-demo-1".to_string()),
        name: "Priya Raman".to_string(),
        email: "priya@mail.example".to_string(),
        skills: vec!["Rust".to_string(), "SQL".to_string(), "Docker".to_string()],
        company_name: None,
    });
    store.add_profile(UserProfile {
        id: UserId("cand-demo-2".to_string()),
        name: "Leo Martins".to_string(),
        email: "leo@mail.example".to_string(),
        skills: vec!["Python".to_string(), "SQL".to_string()],
        company_name: None,
    });
}
