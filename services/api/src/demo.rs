use std::sync::Arc;

use clap::Args;

use hireboard::board::{
    ApplicationRequest, ApplicationStatus, BoardError, BoardService, EmployerAccount, EmployerId,
    JobDraft, JobId, PlanCatalog, PlanId, SeekerId, TalentPoolFilter,
};
use hireboard::error::AppError;

use crate::infra::{seed_store, InMemoryBoardStore, InMemoryNotificationPublisher};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Plan assigned to the demo employer (buzz, sting, or swarm)
    #[arg(long, default_value = "buzz")]
    pub(crate) plan: String,
    /// Skip the application intake and review portion of the demo
    #[arg(long)]
    pub(crate) skip_applications: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        plan,
        skip_applications,
    } = args;

    let store = Arc::new(InMemoryBoardStore::default());
    seed_store(&store);
    store.add_employer(EmployerAccount {
        id: EmployerId("demo-co".to_string()),
        company_name: "Demo Co".to_string(),
        plan: PlanId::new(&plan),
        posts_used: 0,
    });
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = BoardService::new(
        store,
        notifications.clone(),
        PlanCatalog::standard(),
    );

    println!("Job board demo");
    println!("Demo employer 'demo-co' on plan '{plan}'");

    println!("\nPlan catalog");
    for tier in service.ledger().catalog().iter() {
        let limit = if tier.is_unlimited() {
            "unlimited".to_string()
        } else {
            tier.monthly_post_limit.to_string()
        };
        println!(
            "- {} (${}/mo): {} postings",
            tier.display_name, tier.price_usd, limit
        );
    }

    println!("\nPosting until the quota pushes back");
    let employer = EmployerId("demo-co".to_string());
    let mut posted: Vec<JobId> = Vec::new();
    for (title, skills) in [
        ("Backend Engineer", vec!["Python", "SQL"]),
        ("Data Engineer", vec!["SQL", "AWS"]),
        ("Platform Engineer", vec!["Rust", "Kubernetes"]),
    ] {
        match service.post_job(&employer, demo_draft(title, &skills)) {
            Ok(job) => {
                println!("  Posted '{}' as {}", job.title, job.id.0);
                posted.push(job.id);
            }
            Err(BoardError::QuotaExceeded { limit, plan_name }) => {
                println!("  '{title}' rejected: limit of {limit} reached on {plan_name}");
            }
            Err(err) => {
                println!("  '{title}' rejected: {err}");
            }
        }
    }

    if let Some(first) = posted.first() {
        let remaining = service.delete_job(&employer, first)?;
        println!(
            "\nDeleted {} to free a slot ({} postings now counted)",
            first.0, remaining
        );
    }

    if !skip_applications {
        run_application_demo(&service, &posted)?;
    }

    println!("\nTalent pool for 'demo-co' (keyword: sql)");
    let pool =
        service.talent_pool(&employer, TalentPoolFilter::Keyword("sql".to_string()))?;
    if pool.is_empty() {
        println!("  No matching seekers");
    } else {
        for profile in pool {
            println!("  {} ({})", profile.full_name, profile.skills.join(", "));
        }
    }

    let events = notifications.events();
    println!("\nCaptured notification intents: {}", events.len());
    for intent in events {
        println!("  {} -> {:?}", intent.template, intent.audience);
    }

    Ok(())
}

fn run_application_demo<R, N>(
    service: &BoardService<R, N>,
    posted: &[JobId],
) -> Result<(), AppError>
where
    R: hireboard::board::BoardStore + 'static,
    N: hireboard::board::NotificationPublisher + 'static,
{
    let Some(job_id) = posted.get(1).or_else(|| posted.first()) else {
        println!("\nNo open posting left for the application demo");
        return Ok(());
    };

    println!("\nApplication intake demo");
    let sky = SeekerId("sky-tran".to_string());
    let noor = SeekerId("noor-haddad".to_string());

    match service.submit_application(demo_request(&noor, job_id)) {
        Err(BoardError::CvMissing) => {
            println!("  {} turned away: no CV on file", noor.0);
        }
        Ok(_) => println!("  {} applied", noor.0),
        Err(err) => println!("  {} rejected: {err}", noor.0),
    }

    let application = service.submit_application(demo_request(&sky, job_id))?;
    println!(
        "  {} applied to {} ({})",
        sky.0,
        job_id.0,
        application.status.label()
    );

    match service.submit_application(demo_request(&sky, job_id)) {
        Err(BoardError::DuplicateApplication) => {
            println!("  Second submission from {} refused as a duplicate", sky.0);
        }
        other => println!("  Unexpected duplicate outcome: {other:?}"),
    }

    let employer = EmployerId("demo-co".to_string());
    let reviewed =
        service.review_application(&employer, &sky, job_id, ApplicationStatus::Shortlisted)?;
    println!("  Review outcome: {}", reviewed.status.label());

    match service.review_application(&employer, &sky, job_id, ApplicationStatus::Hired) {
        Err(BoardError::Transition(err)) => {
            println!("  Re-review refused: {err}");
        }
        other => println!("  Unexpected re-review outcome: {other:?}"),
    }

    println!("\nShortlist for {}", sky.0);
    let shortlist = service.shortlist_for_seeker(&sky)?;
    if shortlist.is_empty() {
        println!("  No open matching postings");
    } else {
        for job in shortlist {
            println!(
                "  {} ({}) wants: {}",
                job.title,
                job.id.0,
                job.required_skills.join(", ")
            );
        }
    }

    Ok(())
}

fn demo_draft(title: &str, skills: &[&str]) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        category: "technology".to_string(),
        location: "Remote".to_string(),
        required_skills: skills.iter().map(|skill| skill.to_string()).collect(),
        screening_questions: Vec::new(),
    }
}

fn demo_request(seeker: &SeekerId, job: &JobId) -> ApplicationRequest {
    ApplicationRequest {
        seeker_id: seeker.clone(),
        job_id: job.clone(),
        answers: Vec::new(),
        cover_letter: Some("Keen to join.".to_string()),
    }
}
