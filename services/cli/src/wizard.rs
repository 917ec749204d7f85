use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Subcommand;
use talent_onboarding::error::AppError;
use talent_onboarding::storage::FileKeyValueStore;
use talent_onboarding::workflows::registration::{
    AdvanceOutcome, ApplicantRole, FlowDescriptor, HostessProfile, LocalProgressStore,
    ModelProfile, ProgressSource, Reconciliation, ResetConfirmation, ResetOutcome, Step,
    WizardController, WizardPhase,
};

use crate::infra::{confirm, Client, RoleArg, Services, TerminalNavigator};
use crate::input::{
    read_json, HostessProfileInput, ModelProfileInput, ProfileInput, RegistrationInput,
};

#[derive(Subcommand, Debug)]
pub(crate) enum RegisterAction {
    /// Show the current step after reconciling with the server
    Status,
    /// Submit the active step from a JSON input file and move to the next one
    Advance {
        /// JSON file with `personal_info`, `profile`, `documents` and `identity` blocks
        #[arg(long)]
        input: PathBuf,
        /// Keep submitting steps from the same file until registration completes
        #[arg(long)]
        all: bool,
    },
    /// Go back one step without contacting the server
    Back,
    /// Forget local registration progress and start over
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

type Wizard<P> =
    WizardController<P, LocalProgressStore<FileKeyValueStore>, Client, TerminalNavigator>;

/// Role-specific pieces the command needs beyond the shared controller.
trait RoleForm: Default + Clone + Send + Sized {
    type Input: ProfileInput<Profile = Self>;

    fn flow() -> FlowDescriptor<Self>;
}

impl RoleForm for ModelProfile {
    type Input = ModelProfileInput;

    fn flow() -> FlowDescriptor<Self> {
        FlowDescriptor::model()
    }
}

impl RoleForm for HostessProfile {
    type Input = HostessProfileInput;

    fn flow() -> FlowDescriptor<Self> {
        FlowDescriptor::hostess()
    }
}

pub(crate) async fn run(
    services: &Services,
    role: RoleArg,
    action: RegisterAction,
) -> Result<(), AppError> {
    match ApplicantRole::from(role) {
        ApplicantRole::Model => run_for::<ModelProfile>(services, action).await,
        ApplicantRole::Hostess => run_for::<HostessProfile>(services, action).await,
    }
}

async fn run_for<P: RoleForm>(
    services: &Services,
    action: RegisterAction,
) -> Result<(), AppError> {
    let flow = P::flow();
    let store = Arc::new(LocalProgressStore::new(services.storage.clone(), flow.role()));
    let wizard: Wizard<P> = WizardController::new(
        flow,
        store,
        services.client.clone(),
        Arc::new(TerminalNavigator),
    );

    let mounted = wizard.mount().await?;

    match action {
        RegisterAction::Status => print_status(&wizard, &mounted),
        RegisterAction::Advance { input, all } => advance(&wizard, &input, all).await?,
        RegisterAction::Back => {
            let step = wizard.retreat()?;
            println!("Now on {step}.");
        }
        RegisterAction::Reset { yes } => {
            let confirmed =
                yes || confirm("Discard your registration progress and start over?")?;
            let confirmation = if confirmed {
                ResetConfirmation::Confirmed
            } else {
                ResetConfirmation::Declined
            };
            match wizard.reset(confirmation)? {
                ResetOutcome::Reset => {
                    println!("Registration progress cleared; starting again at {}.", Step::FIRST)
                }
                ResetOutcome::Cancelled => println!("Nothing changed."),
            }
        }
    }

    Ok(())
}

fn print_status<P: RoleForm>(wizard: &Wizard<P>, mounted: &Reconciliation) {
    let progress = wizard.progress();
    let source = match mounted.source {
        ProgressSource::Local => "saved on this device",
        ProgressSource::Remote => "restored from the server",
        ProgressSource::Fresh => "new registration",
    };

    println!(
        "{} registration: {} of {} ({source})",
        wizard.role(),
        progress.current_step,
        Step::LAST.number()
    );
    match &progress.applicant_id {
        Some(id) => println!("Applicant id: {id}"),
        None => println!("Applicant id: not assigned yet"),
    }
    for step in Step::ALL {
        let marker = if step < progress.current_step {
            "x"
        } else if step == progress.current_step {
            ">"
        } else {
            " "
        };
        println!("  [{marker}] {}. {}", step.number(), step.label());
    }
}

async fn advance<P: RoleForm>(
    wizard: &Wizard<P>,
    input: &Path,
    all: bool,
) -> Result<(), AppError> {
    let (mut form, base): (RegistrationInput<P::Input>, PathBuf) = read_json(input)?;

    loop {
        fill_active_step(wizard, &mut form, &base)?;

        match wizard.advance().await? {
            AdvanceOutcome::Advanced {
                from,
                to,
                applicant_id,
            } => println!("Saved {from} for applicant {applicant_id}. Next: {to}."),
            AdvanceOutcome::Submitted { applicant_id } => {
                println!("Submitted application {applicant_id}.")
            }
        }

        if !all || wizard.phase() == WizardPhase::Submitted {
            return Ok(());
        }
    }
}

fn missing_block(step: Step, block: &str) -> AppError {
    AppError::Input(format!("input has no `{block}` block for {step}"))
}

fn fill_active_step<P: RoleForm>(
    wizard: &Wizard<P>,
    form: &mut RegistrationInput<P::Input>,
    base: &Path,
) -> Result<(), AppError> {
    let step = wizard.current_step();
    match step {
        Step::PersonalInfo => {
            let personal = form
                .personal_info
                .take()
                .ok_or_else(|| missing_block(step, "personal_info"))?;
            wizard.edit_personal_info(|block| *block = personal)?;
        }
        Step::Profile => {
            let profile = form
                .profile
                .take()
                .ok_or_else(|| missing_block(step, "profile"))?
                .load(base)?;
            wizard.edit_profile(|block| *block = profile)?;
        }
        Step::Documents => {
            let documents = form
                .documents
                .take()
                .ok_or_else(|| missing_block(step, "documents"))?
                .load(base)?;
            wizard.edit_documents(|block| *block = documents)?;
        }
        Step::IdentityCheck => {
            let identity = form
                .identity
                .take()
                .ok_or_else(|| missing_block(step, "identity"))?
                .load(base)?;
            wizard.edit_identity(|block| *block = identity)?;
        }
    }
    Ok(())
}
