use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::ValueEnum;
use talent_onboarding::api::{ApiClient, SessionStore};
use talent_onboarding::config::AppConfig;
use talent_onboarding::error::AppError;
use talent_onboarding::storage::FileKeyValueStore;
use talent_onboarding::telemetry;
use talent_onboarding::workflows::registration::{
    ApplicantRole, ApplicationStatus, Destination, Navigator,
};
use tracing::debug;

pub(crate) type Client = ApiClient<FileKeyValueStore>;

/// Everything one invocation needs: configuration, the durable store and the API client
/// sharing it.
pub(crate) struct Services {
    pub(crate) storage: Arc<FileKeyValueStore>,
    pub(crate) client: Arc<Client>,
}

impl Services {
    pub(crate) fn init() -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        telemetry::init(&config.telemetry)?;

        let storage = Arc::new(FileKeyValueStore::open(config.storage.storage_file()));
        let client = Arc::new(ApiClient::new(
            &config.api,
            SessionStore::new(storage.clone()),
        )?);

        debug!(
            ?config.environment,
            base_url = %config.api.base_url,
            storage = %storage.path().display(),
            "client initialised"
        );

        Ok(Self { storage, client })
    }
}

/// Prints where the applicant should go next; a terminal cannot redirect.
#[derive(Debug, Default)]
pub(crate) struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, destination: Destination) {
        match destination {
            Destination::Login => {
                eprintln!("Your session is missing or has expired. Run `talent-onboarding login` first.");
            }
            Destination::RegistrationComplete(role) => {
                println!("Registration complete. Your {role} application is now pending review.");
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RoleArg {
    Model,
    Hostess,
}

impl From<RoleArg> for ApplicantRole {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Model => ApplicantRole::Model,
            RoleArg::Hostess => ApplicantRole::Hostess,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum StatusArg {
    Pending,
    Approved,
    Rejected,
}

impl From<StatusArg> for ApplicationStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => ApplicationStatus::Pending,
            StatusArg::Approved => ApplicationStatus::Approved,
            StatusArg::Rejected => ApplicationStatus::Rejected,
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` is a no.
pub(crate) fn confirm(question: &str) -> Result<bool, AppError> {
    let mut stdout = io::stdout();
    write!(stdout, "{question} [y/N] ")?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
