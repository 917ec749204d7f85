use clap::{Parser, Subcommand};
use talent_onboarding::error::AppError;

use crate::infra::{RoleArg, Services};
use crate::portal::{self, AccountCommand, ApplicationsCommand, LoginArgs, ReviewCommand};
use crate::wizard::{self, RegisterAction};

#[derive(Parser, Debug)]
#[command(
    name = "talent-onboarding",
    about = "Register as a model or hostess and manage applications from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session token
    Login(LoginArgs),
    /// Forget the stored session token
    Logout,
    /// Work through the four-step registration wizard
    Register {
        #[arg(value_enum)]
        role: RoleArg,
        #[command(subcommand)]
        action: RegisterAction,
    },
    /// Your submitted applications
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
    /// The signed-in account
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
    /// Admin review of submitted applications
    Review {
        #[command(subcommand)]
        command: ReviewCommand,
    },
    /// Browse approved profiles
    Gallery {
        #[arg(long, value_enum)]
        role: RoleArg,
    },
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let services = Services::init()?;

    match cli.command {
        Command::Login(args) => portal::login(&services, args).await,
        Command::Logout => portal::logout(&services),
        Command::Register { role, action } => wizard::run(&services, role, action).await,
        Command::Applications { command } => portal::applications(&services, command).await,
        Command::Account { command } => portal::account(&services, command).await,
        Command::Review { command } => portal::review(&services, command).await,
        Command::Gallery { role } => portal::gallery(&services, role).await,
    }
}
