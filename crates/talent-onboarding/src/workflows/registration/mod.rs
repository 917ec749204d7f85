//! Multi-step applicant registration: progress persistence, reconciliation with the server,
//! per-step validation, and the wizard state machine shared by the model and hostess flows.

pub mod controller;
pub mod domain;
pub mod flow;
pub mod gateway;
pub mod progress;
pub mod reconcile;
pub mod validation;

#[cfg(test)]
mod tests;

pub use controller::{
    AdvanceOutcome, Destination, Navigator, ResetConfirmation, ResetOutcome, WizardController,
    WizardError, WizardPhase,
};
pub use domain::{
    ApplicantDraft, ApplicantId, ApplicantRole, ApplicationStatus, DocumentVerification,
    HostessProfile, IdentityCheck, ModelProfile, PersonalInfo, ProgressRecord, Step,
    UploadedFile,
};
pub use flow::{FlowDescriptor, FlowDescriptorError, StepContext, StepDescriptor};
pub use gateway::{MultipartPayload, RegistrationGateway, RemoteProgress, StepPayload, StepResponse};
pub use progress::{LocalProgressStore, ProgressStore};
pub use reconcile::{ProgressReconciler, ProgressSource, Reconciliation};
pub use validation::{ValidationFailure, HOSTESS_MIN_PHOTOS, MODEL_MAX_ADDITIONAL_PHOTOS};
