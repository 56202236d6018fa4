use crate::infra::{in_memory_portal, Portal};
use clap::Args;
use job_portal::config::{AdminConfig, SessionConfig};
use job_portal::error::AppError;
use job_portal::portal::{
    JobApplication, JobOrder, JobSeeker, NewJob, OrganisationRegistration, Pagination,
    PortalError, SeekerProfile, SeekerRegistration,
};

const DEMO_ADMIN_EMAIL: &str = "admin@portal.demo";
const DEMO_ADMIN_PASSWORD: &str = "demo-admin";
const MAX_APPLICANTS: i64 = 1_000;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Seats offered on the demo posting.
    #[arg(long, default_value_t = 1)]
    pub(crate) vacancy: u32,
    /// Applicants competing for the posting.
    #[arg(
        long,
        default_value_t = 2,
        value_parser = clap::value_parser!(u32).range(0..=MAX_APPLICANTS)
    )]
    pub(crate) applicants: u32,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        vacancy,
        applicants,
    } = args;

    let admin = AdminConfig {
        email: DEMO_ADMIN_EMAIL.to_string(),
        password: DEMO_ADMIN_PASSWORD.to_string(),
    };
    let portal = in_memory_portal(Some(&admin), SessionConfig::default())?;

    println!("Job portal hiring demo");
    let role = portal
        .admin
        .authenticate(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD)?;
    println!("- Admin signed in as {role:?}");

    let organisation = portal.organisations.register(OrganisationRegistration {
        name: "Acme Corp".to_string(),
        email: "hiring@acme.demo".to_string(),
        password: "acme-demo".to_string(),
    })?;
    let domain = portal.domains.create("Engineering")?;
    println!(
        "- Registered organisation {} and domain {}",
        organisation.name, domain.name
    );

    let job = portal.jobs.create(
        organisation.id,
        NewJob {
            name: "Backend Dev".to_string(),
            org_name: organisation.name.clone(),
            domain_name: domain.name.clone(),
            skill_req: "rust, sql".to_string(),
            ctc: 1_800_000,
            vacancy,
        },
    )?;
    println!(
        "- Posted {} ({} seat(s), ctc {})",
        job.name, job.vacancy, job.ctc
    );

    let mut applications = Vec::new();
    for index in 1..=applicants {
        let seeker = portal.seekers.register(SeekerRegistration {
            name: format!("Applicant {index}"),
            email: format!("applicant{index}@seeker.demo"),
            password: "seeker-demo".to_string(),
            skill: "rust".to_string(),
        })?;
        match portal.applications.apply(&job.id, &seeker.id) {
            Ok(application) => {
                println!("- {} applied ({})", seeker.name, application.id);
                applications.push((seeker, application));
            }
            Err(err) => println!("- {} could not apply: {err}", seeker.name),
        }
    }

    println!("\nSelection round");
    for (seeker, application) in &applications {
        match portal.applications.select(&organisation.id, &application.id) {
            Ok(receipt) => println!(
                "- {}: {} ({} seat(s) left)",
                seeker.name, receipt.message, receipt.remaining_vacancy
            ),
            Err(PortalError::Conflict(reason)) => println!("- {}: {reason}", seeker.name),
            Err(err) => return Err(err.into()),
        }
    }

    if let Some((seeker, _)) = applications.first() {
        if let Err(err) = portal.applications.apply(&job.id, &seeker.id) {
            println!("- {} re-applying: {err}", seeker.name);
        }
    }

    print_outcome(&portal, &applications)?;
    Ok(())
}

fn print_outcome(
    portal: &Portal,
    applications: &[(JobSeeker, JobApplication)],
) -> Result<(), AppError> {
    println!("\nOutcome");
    for (seeker, _) in applications {
        let profile = portal.seekers.my_applications(&seeker.id)?;
        let status = match &profile {
            SeekerProfile::Selected { selected_in, .. } => format!(
                "selected into {}",
                selected_in
                    .as_ref()
                    .map_or("an unknown job", |job| job.name.as_str())
            ),
            SeekerProfile::Applying { applications, .. } => {
                format!("{} pending application(s)", applications.len())
            }
        };
        println!("- {}: {status}", profile.seeker().name);
    }

    let open = portal
        .jobs
        .list_for_seekers(Pagination::default(), JobOrder::default())?;
    println!("- Open postings visible to seekers: {}", open.len());
    match serde_json::to_string_pretty(&open) {
        Ok(json) => println!("  Seeker listing payload:\n{json}"),
        Err(err) => println!("  Seeker listing payload unavailable: {err}"),
    }
    Ok(())
}
