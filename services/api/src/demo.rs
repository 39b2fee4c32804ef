use crate::infra::{seed_demo_accounts, InMemoryHiringStore, InMemoryNotificationPublisher, ScriptedAnalyzer};
use chrono::{Duration, Utc};
use clap::Args;
use hireloop::error::AppError;
use hireloop::workflows::hiring::{
    skills_breakdown, Application, ApplicationStatus, Caller, HiringError, HiringService,
    InterviewInvite, InterviewMode, JobDraft, Role, UserId,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Transcript submitted for the top-ranked candidate. Defaults to a
    /// sample that covers most of the posting's required skills.
    #[arg(long)]
    pub(crate) transcript: Option<String>,
    /// Stop after the application ranking, skipping the interview round.
    #[arg(long)]
    pub(crate) skip_interview: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        transcript,
        skip_interview,
    } = args;

    println!("Hiring workflow demo");

    let store = Arc::new(InMemoryHiringStore::default());
    seed_demo_accounts(&store);
    let feed = Arc::new(InMemoryNotificationPublisher::default());
    let service = Arc::new(HiringService::new(
        store,
        feed.clone(),
        Arc::new(ScriptedAnalyzer),
    ));

    let employer = Caller {
        id: UserId("emp-demo".to_string()),
        role: Role::Employer,
    };
    let strong_candidate = Caller {
        id: UserId("cand-demo-1".to_string()),
        role: Role::JobSeeker,
    };
    let partial_candidate = Caller {
        id: UserId("cand-demo-2".to_string()),
        role: Role::JobSeeker,
    };

    let job = match service.create_job(
        &employer,
        JobDraft {
            title: "Backend Engineer".to_string(),
            description: "Own the ingestion pipeline and its storage layer.".to_string(),
            required_skills: vec![
                "Rust".to_string(),
                "SQL".to_string(),
                "Docker".to_string(),
            ],
            location: "Remote".to_string(),
            salary: "$140k-$170k".to_string(),
        },
    ) {
        Ok(job) => job,
        Err(err) => {
            println!("  Posting rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} posted {} ({}) requiring {}",
        job.company_name,
        job.title,
        job.id.0,
        job.required_skills.join(", ")
    );

    for candidate in [&strong_candidate, &partial_candidate] {
        match service.apply(
            candidate,
            &job.id,
            "Excited about the role.".to_string(),
        ) {
            Ok(application) => render_application(&job.required_skills, &application),
            Err(err) => println!("  Application rejected for {}: {err}", candidate.id.0),
        }
    }

    let ranked = service.job_applications(&employer, &job.id)?;
    println!("\nRanked applications for {}", job.title);
    for (position, application) in ranked.iter().enumerate() {
        println!(
            "  {}. {} (score {}, status {})",
            position + 1,
            application.candidate_name,
            application.match_score,
            application.status.label()
        );
    }

    let Some(front_runner) = ranked.first().cloned() else {
        println!("  No applications to take forward");
        return Ok(());
    };

    if skip_interview {
        render_notifications(&feed);
        return Ok(());
    }

    let interview = service.create_interview(
        &employer,
        InterviewInvite {
            application_id: front_runner.id.clone(),
            scheduled_date: Utc::now() + Duration::days(3),
            mode: InterviewMode::Online,
            location: "Video call".to_string(),
        },
    )?;
    println!(
        "\n- Scheduled interview {} with {} for {}",
        interview.id.0,
        front_runner.candidate_name,
        interview.scheduled_date.format("%Y-%m-%d %H:%M UTC")
    );

    let transcript = transcript.unwrap_or_else(|| {
        "We walked through a Rust service the candidate built, then dug into \
         SQL schema design for the reporting tables."
            .to_string()
    });
    let analyzed = service
        .submit_transcript(&strong_candidate, &interview.id, transcript)
        .await?;
    println!(
        "  Analysis verdict: {} (score {})",
        analyzed.analysis.decision().label(),
        analyzed.analysis.score()
    );

    let hired = service.update_status(&employer, &front_runner.id, ApplicationStatus::Hired)?;
    println!(
        "  {} moved to status {}",
        hired.candidate_name,
        hired.status.label()
    );

    for application in &ranked {
        if application.id == front_runner.id {
            continue;
        }
        match service.update_status(&employer, &application.id, ApplicationStatus::Rejected) {
            Ok(updated) => println!(
                "  {} moved to status {}",
                updated.candidate_name,
                updated.status.label()
            ),
            Err(HiringError::InvalidTransition { from, to }) => println!(
                "  {} left untouched (cannot move from {from} to {to})",
                application.candidate_name
            ),
            Err(err) => println!("  Status update failed: {err}"),
        }
    }

    render_notifications(&feed);
    Ok(())
}

fn render_application(required_skills: &[String], application: &Application) {
    let breakdown = skills_breakdown(required_skills, &application.candidate_skills);
    println!(
        "- {} applied (application {}, match score {})",
        application.candidate_name, application.id.0, application.match_score
    );
    if !breakdown.matched.is_empty() {
        println!("    matched: {}", breakdown.matched.join(", "));
    }
    if !breakdown.missing.is_empty() {
        println!("    missing: {}", breakdown.missing.join(", "));
    }
}

fn render_notifications(feed: &InMemoryNotificationPublisher) {
    let events = feed.events();
    if events.is_empty() {
        println!("\nNotifications: none dispatched");
        return;
    }

    println!("\nNotification feed");
    for event in events {
        println!("  - to {}: {}", event.user_id.0, event.message);
    }
}
