//! Commands outside the registration wizard: session, account, applications, admin review
//! and the public gallery.

use std::io;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use talent_onboarding::api::{export_review_csv, AccountUpdate, ApplicationSummary};
use talent_onboarding::error::AppError;
use talent_onboarding::workflows::registration::ApplicantRole;
use tracing::info;

use crate::infra::{RoleArg, Services, StatusArg};
use crate::input::read_json;

#[derive(Args, Debug)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) password: String,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ApplicationsCommand {
    /// List your submitted applications
    List {
        #[arg(long, value_enum)]
        role: RoleArg,
    },
    /// Delete one of your applications on the server
    Delete {
        #[arg(long, value_enum)]
        role: RoleArg,
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum AccountCommand {
    /// Show the signed-in account
    Show,
    /// Update account details from a JSON file
    Update {
        #[arg(long)]
        input: PathBuf,
        /// Send only the given fields (PATCH) instead of replacing them (PUT)
        #[arg(long)]
        partial: bool,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum ReviewCommand {
    /// List applications awaiting or past review
    List {
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        /// Only applications submitted on or after this date (YYYY-MM-DD)
        #[arg(long, value_parser = crate::infra::parse_date)]
        since: Option<NaiveDate>,
        /// Write CSV to stdout instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Approve an application
    Approve {
        #[arg(long, value_enum)]
        role: RoleArg,
        id: String,
    },
    /// Reject an application
    Reject {
        #[arg(long, value_enum)]
        role: RoleArg,
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
}

pub(crate) async fn login(services: &Services, args: LoginArgs) -> Result<(), AppError> {
    let response = services.client.login(&args.email, &args.password).await?;
    let name = response
        .user
        .map(|account| account.display_name())
        .unwrap_or(args.email);
    info!("session token stored");
    println!("Signed in as {name}.");
    Ok(())
}

pub(crate) fn logout(services: &Services) -> Result<(), AppError> {
    services.client.logout()?;
    println!("Signed out.");
    Ok(())
}

pub(crate) async fn applications(
    services: &Services,
    command: ApplicationsCommand,
) -> Result<(), AppError> {
    match command {
        ApplicationsCommand::List { role } => {
            let applications = services.client.my_applications(role.into()).await?;
            if applications.is_empty() {
                println!("No applications yet.");
            }
            for application in &applications {
                print_application(application);
            }
        }
        ApplicationsCommand::Delete { role, id } => {
            services.client.delete_application(role.into(), &id).await?;
            println!("Deleted application {id}.");
        }
    }
    Ok(())
}

pub(crate) async fn account(services: &Services, command: AccountCommand) -> Result<(), AppError> {
    let account = match command {
        AccountCommand::Show => services.client.account().await?,
        AccountCommand::Update { input, partial } => {
            let (update, _): (AccountUpdate, _) = read_json(&input)?;
            if partial {
                services.client.patch_account(&update).await?
            } else {
                services.client.update_account(&update).await?
            }
        }
    };

    println!("{} <{}>", account.display_name(), account.email);
    if let Some(phone) = &account.phone {
        println!("Phone: {phone}");
    }
    if let Some(role) = &account.role {
        println!("Role: {role}");
    }
    if let Some(created_at) = account.created_at {
        println!("Member since {}", created_at.format("%Y-%m-%d"));
    }
    Ok(())
}

pub(crate) async fn review(services: &Services, command: ReviewCommand) -> Result<(), AppError> {
    match command {
        ReviewCommand::List {
            role,
            status,
            since,
            csv,
        } => {
            let queue = services
                .client
                .review_queue(role.into(), status.map(Into::into))
                .await?;
            let queue = submitted_since(queue, since);

            if csv {
                export_review_csv(io::stdout().lock(), &queue)?;
            } else if queue.is_empty() {
                println!("Review queue is empty.");
            } else {
                for application in &queue {
                    print_application(application);
                }
            }
        }
        ReviewCommand::Approve { role, id } => {
            services.client.approve(role.into(), &id).await?;
            println!("Approved {id}.");
        }
        ReviewCommand::Reject { role, id, reason } => {
            services
                .client
                .reject(role.into(), &id, reason.as_deref())
                .await?;
            println!("Rejected {id}.");
        }
    }
    Ok(())
}

pub(crate) async fn gallery(services: &Services, role: RoleArg) -> Result<(), AppError> {
    let role = ApplicantRole::from(role);
    let profiles = services.client.gallery(role).await?;
    if profiles.is_empty() {
        println!("No approved {role} profiles yet.");
    }
    for profile in profiles {
        let details: Vec<&str> = [&profile.height, &profile.hair_color, &profile.eye_color]
            .into_iter()
            .filter_map(|value| value.as_deref())
            .collect();
        println!(
            "{} ({}) {} photo(s) {}",
            profile.display_name,
            profile.id,
            profile.photos.len(),
            details.join(", ")
        );
    }
    Ok(())
}

fn submitted_since(
    applications: Vec<ApplicationSummary>,
    since: Option<NaiveDate>,
) -> Vec<ApplicationSummary> {
    let Some(since) = since else {
        return applications;
    };
    applications
        .into_iter()
        .filter(|application| {
            application
                .submitted_at
                .is_some_and(|at| at.date_naive() >= since)
        })
        .collect()
}

fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_application(application: &ApplicationSummary) {
    println!(
        "{:<10} {:<9} {:<24} {:<30} {}",
        application.id,
        application.status.label(),
        application.full_name,
        application.email,
        format_timestamp(application.submitted_at)
    );
    if let Some(reason) = &application.rejection_reason {
        println!("{:<10} reason: {reason}", "");
    }
}
