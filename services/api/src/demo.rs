use clap::Args;
use std::fmt;
use std::sync::Arc;

use freelance_hub::marketplace::{
    AccountView, ApplicationStatus, IdentityError, InMemoryStore, Job, JobDraft,
    MarketplaceError, MarketplaceState, Principal, Registration, Role,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the progress-update portion of the demo
    #[arg(long)]
    pub(crate) skip_progress: bool,
}

#[derive(Debug)]
pub(crate) enum SeedError {
    Identity(IdentityError),
    Marketplace(MarketplaceError),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::Identity(err) => write!(f, "identity error: {err}"),
            SeedError::Marketplace(err) => write!(f, "marketplace error: {err}"),
        }
    }
}

impl std::error::Error for SeedError {}

impl From<IdentityError> for SeedError {
    fn from(value: IdentityError) -> Self {
        Self::Identity(value)
    }
}

impl From<MarketplaceError> for SeedError {
    fn from(value: MarketplaceError) -> Self {
        Self::Marketplace(value)
    }
}

pub(crate) struct SeedSummary {
    pub(crate) freelancers: usize,
    pub(crate) recruiters: usize,
    pub(crate) jobs: usize,
    pub(crate) sarah: Principal,
    pub(crate) john: Principal,
    pub(crate) first_job: Job,
}

fn principal_from_view(view: &AccountView) -> Principal {
    match view {
        AccountView::Freelancer(view) => Principal {
            id: view.id.clone(),
            role: Role::Freelancer,
        },
        AccountView::Recruiter(view) => Principal {
            id: view.id.clone(),
            role: Role::Recruiter,
        },
    }
}

fn registration(name: &str, email: &str, role: Role) -> Registration {
    Registration {
        name: name.to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        role,
        location: None,
        bio: None,
        skills: Vec::new(),
        company: None,
    }
}

/// Load sample accounts and jobs through the public registration and posting
/// flows so the denormalized caches line up with the records.
pub(crate) fn seed_demo_data(
    state: &MarketplaceState<InMemoryStore>,
) -> Result<SeedSummary, SeedError> {
    let john = state.identity.register(Registration {
        location: Some("New York, USA".to_string()),
        bio: Some("Full-stack developer with 5 years of experience".to_string()),
        skills: vec![
            "React".to_string(),
            "Node.js".to_string(),
            "TypeScript".to_string(),
        ],
        ..registration("John Smith", "john@example.com", Role::Freelancer)
    })?;
    let emma = state.identity.register(Registration {
        location: Some("London, UK".to_string()),
        bio: Some("UI/UX designer focused on intuitive interfaces".to_string()),
        skills: vec!["UI/UX Design".to_string(), "Figma".to_string()],
        ..registration("Emma Wilson", "emma@example.com", Role::Freelancer)
    })?;
    state.identity.register(Registration {
        location: Some("Remote".to_string()),
        bio: Some("Backend developer for scalable microservices".to_string()),
        skills: vec!["Node.js".to_string(), "PostgreSQL".to_string()],
        ..registration("David Chen", "david@example.com", Role::Freelancer)
    })?;

    let sarah = state.identity.register(Registration {
        company: Some("TechCorp Inc.".to_string()),
        location: Some("San Francisco, USA".to_string()),
        ..registration("Sarah Johnson", "sarah@techcorp.com", Role::Recruiter)
    })?;
    let michael = state.identity.register(Registration {
        company: Some("Innovate Design Studio".to_string()),
        location: Some("Berlin, Germany".to_string()),
        ..registration("Michael Roberts", "michael@innovatedesign.com", Role::Recruiter)
    })?;

    let sarah = principal_from_view(&sarah);
    let michael = principal_from_view(&michael);
    let john = principal_from_view(&john);
    let emma = principal_from_view(&emma);

    let first_job = state.marketplace.post_job(
        &sarah,
        JobDraft {
            title: "Full-Stack Developer for E-commerce Platform".to_string(),
            description: "Build and maintain our e-commerce platform".to_string(),
            location: Some("Remote".to_string()),
            skills_required: vec!["React".to_string(), "Node.js".to_string()],
            budget: "$3000-5000".to_string(),
            deadline: "2025-05-01".to_string(),
        },
    )?;
    let design_job = state.marketplace.post_job(
        &michael,
        JobDraft {
            title: "UI/UX Designer for Mobile App".to_string(),
            description: "Create intuitive interfaces for our mobile application".to_string(),
            location: Some("Berlin, Germany (Remote possible)".to_string()),
            skills_required: vec!["UI/UX Design".to_string(), "Figma".to_string()],
            budget: "$2500-4000".to_string(),
            deadline: "2025-04-20".to_string(),
        },
    )?;
    state.marketplace.post_job(
        &sarah,
        JobDraft {
            title: "Backend Developer for API Development".to_string(),
            description: "Build and optimize our RESTful APIs".to_string(),
            location: Some("Remote".to_string()),
            skills_required: vec!["Node.js".to_string(), "API Development".to_string()],
            budget: "$4000-6000".to_string(),
            deadline: "2025-05-15".to_string(),
        },
    )?;

    state
        .marketplace
        .apply(&john, &first_job.id, "I'm very interested in this position".to_string())?;
    state
        .marketplace
        .apply(&emma, &design_job.id, "My portfolio covers mobile app design".to_string())?;

    Ok(SeedSummary {
        freelancers: 3,
        recruiters: 2,
        jobs: 3,
        sarah,
        john,
        first_job,
    })
}

/// Scripted run of the full hiring arc, printed to stdout.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), freelance_hub::error::AppError> {
    println!("FreelanceHub marketplace demo");

    let store = Arc::new(InMemoryStore::default());
    let state = MarketplaceState::new(store);

    let seeded = match seed_demo_data(&state) {
        Ok(seeded) => seeded,
        Err(err) => {
            println!("  Seeding failed: {err}");
            return Ok(());
        }
    };
    println!(
        "Seeded {} freelancers, {} recruiters, {} open jobs",
        seeded.freelancers, seeded.recruiters, seeded.jobs
    );

    println!("\nScenario: hiring for \"{}\"", seeded.first_job.title);

    let application = match state
        .marketplace
        .applications_for_job(&seeded.sarah, &seeded.first_job.id)
    {
        Ok(mut rows) if !rows.is_empty() => rows.remove(0).application,
        Ok(_) => {
            println!("  No applications to review");
            return Ok(());
        }
        Err(err) => {
            println!("  Applicant listing unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "- Reviewing application {} (cover letter: {:?})",
        application.id.0, application.cover_letter
    );

    match state.marketplace.set_application_status(
        &seeded.sarah,
        &application.id,
        ApplicationStatus::Accepted,
    ) {
        Ok(accepted) => println!("- Application status: {}", accepted.status.label()),
        Err(err) => {
            println!("  Acceptance failed: {err}");
            return Ok(());
        }
    }

    match state.marketplace.recruiter_stats(&seeded.sarah.id) {
        Ok(stats) => {
            println!("\nRecruiter dashboard");
            println!(
                "- {} listings | {} active | {} completed",
                stats.total_listings, stats.active_jobs, stats.completed_jobs
            );
            println!(
                "- applications: {} total, {} pending, {} accepted | {} successful hires",
                stats.total_applications,
                stats.pending_applications,
                stats.accepted_applications,
                stats.successful_hires
            );
        }
        Err(err) => println!("  Recruiter stats unavailable: {err}"),
    }

    match state.marketplace.freelancer_dashboard_jobs(&seeded.john.id) {
        Ok(rows) => {
            println!("\nFreelancer dashboard jobs");
            for row in rows {
                println!(
                    "- {} | application {} | status {}",
                    row.job.title,
                    row.application_id.0,
                    row.application_status.label()
                );
            }
        }
        Err(err) => println!("  Freelancer dashboard unavailable: {err}"),
    }

    if args.skip_progress {
        return Ok(());
    }

    println!("\nProgress updates");
    for progress in [40_u8, 100] {
        match state
            .marketplace
            .update_project_progress(&seeded.john, &seeded.first_job.id, progress)
        {
            Ok(projects) => {
                let project = &projects[0];
                println!(
                    "- {}% -> {} ({})",
                    project.progress,
                    project.status.label(),
                    project.title
                );
            }
            Err(err) => println!("  Progress update failed: {err}"),
        }
    }

    Ok(())
}
