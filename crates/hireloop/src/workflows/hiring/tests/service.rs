use std::sync::Arc;

use super::common::{
    backend_job_draft, candidate, candidate_profile, employer, invite_for, other_employer,
    service_with, DeadLetterPublisher, MemoryStore, OfflineAnalyzer, StubAnalyzer,
};
use crate::workflows::hiring::domain::{
    AiDecision, AnalysisOutcome, ApplicationStatus, InterviewStatus,
};
use crate::workflows::hiring::repository::NotificationKind;
use crate::workflows::hiring::service::{HiringError, HiringService};

#[test]
fn apply_snapshots_profile_and_scores_the_match() {
    let (store, publisher, service) = service_with(StubAnalyzer::positive());
    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");

    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["rust", "SQL"]));

    let application = service
        .apply(&alice, &job.id, "I ship reliable services.".to_string())
        .expect("application accepted");

    assert_eq!(application.status, ApplicationStatus::Applied);
    assert_eq!(application.match_score, 67); // 2 of 3 required skills
    assert_eq!(application.candidate_name, "Alice Finch");
    assert_eq!(application.candidate_skills.len(), 2);

    let job = service.get_job(&job.id).expect("job readable");
    assert_eq!(job.applications_count, 1);

    let events = publisher.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, NotificationKind::NewApplication);
    assert_eq!(events[0].user_id, employer().id);
}

#[test]
fn second_apply_for_same_pair_is_rejected_and_counter_untouched() {
    let (store, _publisher, service) = service_with(StubAnalyzer::positive());
    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");

    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));

    service
        .apply(&alice, &job.id, String::new())
        .expect("first apply succeeds");
    let err = service
        .apply(&alice, &job.id, String::new())
        .expect_err("second apply must fail");

    assert!(matches!(err, HiringError::DuplicateApplication));
    let job = service.get_job(&job.id).expect("job readable");
    assert_eq!(job.applications_count, 1);
}

#[test]
fn apply_to_missing_job_is_not_found() {
    let (store, _publisher, service) = service_with(StubAnalyzer::positive());
    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));

    let err = service
        .apply(
            &alice,
            &crate::workflows::hiring::domain::JobId("job-missing".to_string()),
            String::new(),
        )
        .expect_err("must fail");
    assert!(matches!(err, HiringError::JobNotFound));
}

#[test]
fn job_applications_rank_by_score_then_recency() {
    let (store, _publisher, service) = service_with(StubAnalyzer::positive());
    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");

    let strong = candidate("cand-strong");
    let weak = candidate("cand-weak");
    let strong_late = candidate("cand-strong-late");
    store.add_profile(candidate_profile(&strong, "Strong Early", &["Rust", "SQL", "Docker"]));
    store.add_profile(candidate_profile(&weak, "Weak Fit", &["Excel"]));
    store.add_profile(candidate_profile(
        &strong_late,
        "Strong Late",
        &["rust", "sql", "docker"],
    ));

    service.apply(&strong, &job.id, String::new()).expect("apply");
    service.apply(&weak, &job.id, String::new()).expect("apply");
    service
        .apply(&strong_late, &job.id, String::new())
        .expect("apply");

    let ranked = service
        .job_applications(&employer(), &job.id)
        .expect("owner can list");

    assert_eq!(ranked.len(), 3);
    // 100-scorers first; among equals the most recent submission leads.
    assert_eq!(ranked[0].candidate_name, "Strong Late");
    assert_eq!(ranked[1].candidate_name, "Strong Early");
    assert_eq!(ranked[2].candidate_name, "Weak Fit");
    assert!(ranked[0].match_score >= ranked[1].match_score);
    assert!(ranked[1].match_score >= ranked[2].match_score);
}

#[test]
fn non_owner_cannot_list_or_mutate_applications() {
    let (store, publisher, service) = service_with(StubAnalyzer::positive());
    store.add_profile(super::common::employer_profile(&other_employer()));
    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");

    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));
    let application = service
        .apply(&alice, &job.id, String::new())
        .expect("apply");

    let err = service
        .job_applications(&other_employer(), &job.id)
        .expect_err("listing must fail");
    assert!(matches!(err, HiringError::Forbidden));

    let before = publisher.events().len();
    let err = service
        .update_status(
            &other_employer(),
            &application.id,
            ApplicationStatus::Rejected,
        )
        .expect_err("status update must fail");
    assert!(matches!(err, HiringError::Forbidden));

    let err = service
        .create_interview(&other_employer(), invite_for(application.id.clone()))
        .expect_err("interview must fail");
    assert!(matches!(err, HiringError::Forbidden));

    // No state mutation, no notifications.
    let unchanged = service
        .job_applications(&employer(), &job.id)
        .expect("owner can list");
    assert_eq!(unchanged[0].status, ApplicationStatus::Applied);
    assert_eq!(publisher.events().len(), before);
}

#[test]
fn update_status_validates_the_transition_graph() {
    let (store, publisher, service) = service_with(StubAnalyzer::positive());
    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");

    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));
    let application = service
        .apply(&alice, &job.id, String::new())
        .expect("apply");

    // Direct hire from `applied` is allowed.
    let hired = service
        .update_status(&employer(), &application.id, ApplicationStatus::Hired)
        .expect("direct hire");
    assert_eq!(hired.status, ApplicationStatus::Hired);

    let events = publisher.events();
    let status_updates: Vec<_> = events
        .iter()
        .filter(|event| event.kind == NotificationKind::StatusUpdate)
        .collect();
    assert_eq!(status_updates.len(), 1);
    assert!(status_updates[0].message.contains("hired"));

    // Terminal state admits no further movement.
    let err = service
        .update_status(&employer(), &application.id, ApplicationStatus::Rejected)
        .expect_err("terminal state is frozen");
    assert!(matches!(err, HiringError::InvalidTransition { .. }));
}

#[test]
fn create_interview_forces_invited_status() {
    let (store, publisher, service) = service_with(StubAnalyzer::positive());
    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");

    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));
    let application = service
        .apply(&alice, &job.id, String::new())
        .expect("apply");

    // Move the application off its initial state first.
    service
        .update_status(&employer(), &application.id, ApplicationStatus::Rejected)
        .expect("reject");

    let interview = service
        .create_interview(&employer(), invite_for(application.id.clone()))
        .expect("interview scheduled");

    assert_eq!(interview.status, InterviewStatus::Scheduled);
    assert_eq!(interview.analysis, AnalysisOutcome::Pending);
    assert_eq!(interview.candidate_id, alice.id);

    let applications = service
        .job_applications(&employer(), &job.id)
        .expect("owner lists");
    assert_eq!(applications[0].status, ApplicationStatus::InterviewInvited);

    assert!(publisher
        .events()
        .iter()
        .any(|event| event.kind == NotificationKind::InterviewInvite));
}

#[tokio::test]
async fn transcript_analysis_completes_the_interview() {
    let (store, publisher, service) = service_with(StubAnalyzer::positive());
    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");

    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));
    let application = service
        .apply(&alice, &job.id, String::new())
        .expect("apply");
    let interview = service
        .create_interview(&employer(), invite_for(application.id))
        .expect("scheduled");

    let analyzed = service
        .submit_transcript(&alice, &interview.id, "Q: Rust? A: ownership.".to_string())
        .await
        .expect("analysis runs");

    assert_eq!(analyzed.status, InterviewStatus::Completed);
    assert!(analyzed.completed_at.is_some());
    assert_eq!(analyzed.transcript, "Q: Rust? A: ownership.");
    match &analyzed.analysis {
        AnalysisOutcome::Analyzed { analysis } => {
            assert_eq!(analysis.decision, AiDecision::Yes);
            assert_eq!(analysis.score, 82);
        }
        other => panic!("expected analyzed outcome, got {other:?}"),
    }

    assert!(publisher
        .events()
        .iter()
        .any(|event| event.kind == NotificationKind::InterviewComplete));
}

#[tokio::test]
async fn analyzer_failure_still_persists_transcript() {
    let (store, publisher, service) = service_with(OfflineAnalyzer);
    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");

    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));
    let application = service
        .apply(&alice, &job.id, String::new())
        .expect("apply");
    let interview = service
        .create_interview(&employer(), invite_for(application.id))
        .expect("scheduled");

    let saved = service
        .submit_transcript(&employer(), &interview.id, "Full transcript.".to_string())
        .await
        .expect("submission still succeeds");

    assert_eq!(saved.status, InterviewStatus::InProgress);
    assert_eq!(saved.transcript, "Full transcript.");
    assert!(saved.completed_at.is_none());
    match &saved.analysis {
        AnalysisOutcome::Unavailable { reason } => {
            assert!(reason.contains("connection refused"));
        }
        other => panic!("expected unavailable outcome, got {other:?}"),
    }
    assert_eq!(saved.analysis.decision(), AiDecision::Pending);
    assert_eq!(saved.analysis.score(), 0);

    // The employer is still told the analysis round finished.
    assert!(publisher
        .events()
        .iter()
        .any(|event| event.kind == NotificationKind::InterviewComplete));
}

#[tokio::test]
async fn outsider_cannot_touch_an_interview() {
    let (store, _publisher, service) = service_with(StubAnalyzer::positive());
    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");

    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));
    let application = service
        .apply(&alice, &job.id, String::new())
        .expect("apply");
    let interview = service
        .create_interview(&employer(), invite_for(application.id))
        .expect("scheduled");

    let stranger = candidate("cand-stranger");
    let err = service
        .submit_transcript(&stranger, &interview.id, "hello".to_string())
        .await
        .expect_err("stranger rejected");
    assert!(matches!(err, HiringError::Forbidden));

    let err = service
        .get_interview(&stranger, &interview.id)
        .expect_err("stranger rejected");
    assert!(matches!(err, HiringError::Forbidden));
}

#[test]
fn notification_failures_never_fail_the_workflow() {
    let store = Arc::new(MemoryStore::default());
    store.add_profile(super::common::employer_profile(&employer()));
    let service = HiringService::new(
        store.clone(),
        Arc::new(DeadLetterPublisher),
        Arc::new(StubAnalyzer::positive()),
    );

    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");
    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));

    let application = service
        .apply(&alice, &job.id, String::new())
        .expect("apply succeeds despite dead letter queue");
    assert_eq!(application.status, ApplicationStatus::Applied);
}

#[test]
fn my_listings_come_back_newest_first() {
    let (store, _publisher, service) = service_with(StubAnalyzer::positive());
    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));

    let jobs: Vec<_> = (0..3)
        .map(|_| {
            service
                .create_job(&employer(), backend_job_draft())
                .expect("job created")
        })
        .collect();
    let applications: Vec<_> = jobs
        .iter()
        .map(|job| service.apply(&alice, &job.id, String::new()).expect("apply"))
        .collect();

    let mine = service.my_applications(&alice).expect("own applications");
    assert_eq!(mine.len(), 3);
    assert_eq!(mine[0].id, applications[2].id);
    assert_eq!(mine[2].id, applications[0].id);
    assert!(mine
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    service
        .create_interview(&employer(), invite_for(applications[0].id.clone()))
        .expect("scheduled");
    let latest = service
        .create_interview(&employer(), invite_for(applications[1].id.clone()))
        .expect("scheduled");

    let sessions = service.my_interviews(&alice).expect("candidate view");
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, latest.id);
    assert!(sessions
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[test]
fn my_interviews_splits_by_role() {
    let (store, _publisher, service) = service_with(StubAnalyzer::positive());
    let job = service
        .create_job(&employer(), backend_job_draft())
        .expect("job created");

    let alice = candidate("cand-alice");
    store.add_profile(candidate_profile(&alice, "Alice Finch", &["Rust"]));
    let application = service
        .apply(&alice, &job.id, String::new())
        .expect("apply");
    service
        .create_interview(&employer(), invite_for(application.id))
        .expect("scheduled");

    assert_eq!(service.my_interviews(&alice).expect("candidate view").len(), 1);
    assert_eq!(
        service.my_interviews(&employer()).expect("employer view").len(),
        1
    );
    assert!(service
        .my_interviews(&candidate("cand-other"))
        .expect("empty view")
        .is_empty());
}
