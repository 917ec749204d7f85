use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::domain::{
    ApplicantDraft, ApplicantId, ApplicantRole, DocumentVerification, IdentityCheck,
    PersonalInfo, ProgressRecord, Step,
};
use super::flow::{FlowDescriptor, StepContext};
use super::gateway::RegistrationGateway;
use super::progress::ProgressStore;
use super::reconcile::{ProgressReconciler, Reconciliation};
use super::validation::ValidationFailure;
use crate::api::ApiError;
use crate::storage::StorageError;

/// Places the wizard can send the user once it stops being the right screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Login,
    RegistrationComplete(ApplicantRole),
}

/// Collaborator that moves the user off the wizard.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Active,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced {
        from: Step,
        to: Step,
        applicant_id: ApplicantId,
    },
    Submitted {
        applicant_id: ApplicantId,
    },
}

/// Explicit answer to the "start over?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetConfirmation {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Reset,
    Cancelled,
}

/// Error raised by wizard operations. None of these end the wizard; the user stays on the
/// current step and may retry.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{0}")]
    Validation(ValidationFailure),
    #[error("another request for this registration is still in progress")]
    Busy,
    #[error("registration has already been submitted")]
    AlreadySubmitted,
    #[error("no applicant identifier; personal information must be submitted first")]
    MissingApplicantId,
    #[error("server accepted personal information but returned no applicant identifier")]
    MissingIdentifier,
    #[error("{requested} cannot be edited while on {active}")]
    StepLocked { requested: Step, active: Step },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("unable to encode step payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl WizardError {
    pub fn user_message(&self) -> String {
        match self {
            WizardError::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

struct WizardState<P> {
    progress: ProgressRecord,
    draft: ApplicantDraft<P>,
    phase: WizardPhase,
}

impl<P: Default> Default for WizardState<P> {
    fn default() -> Self {
        Self {
            progress: ProgressRecord::default(),
            draft: ApplicantDraft::default(),
            phase: WizardPhase::Active,
        }
    }
}

/// Held for the duration of a remote round trip. Released on drop, including when the
/// owning future is dropped mid-flight.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, WizardError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| WizardError::Busy)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Four-step registration state machine shared by every applicant role.
pub struct WizardController<P, S, G, N> {
    flow: FlowDescriptor<P>,
    store: Arc<S>,
    gateway: Arc<G>,
    navigator: Arc<N>,
    state: Mutex<WizardState<P>>,
    busy: AtomicBool,
}

impl<P, S, G, N> WizardController<P, S, G, N>
where
    P: Default + Clone + Send,
    S: ProgressStore,
    G: RegistrationGateway,
    N: Navigator,
{
    pub fn new(flow: FlowDescriptor<P>, store: Arc<S>, gateway: Arc<G>, navigator: Arc<N>) -> Self {
        Self {
            flow,
            store,
            gateway,
            navigator,
            state: Mutex::new(WizardState::default()),
            busy: AtomicBool::new(false),
        }
    }

    fn state(&self) -> MutexGuard<'_, WizardState<P>> {
        self.state.lock().expect("wizard state mutex poisoned")
    }

    pub fn role(&self) -> ApplicantRole {
        self.flow.role()
    }

    pub fn progress(&self) -> ProgressRecord {
        self.state().progress.clone()
    }

    pub fn current_step(&self) -> Step {
        self.state().progress.current_step
    }

    pub fn phase(&self) -> WizardPhase {
        self.state().phase
    }

    pub fn draft(&self) -> ApplicantDraft<P> {
        self.state().draft.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Load local progress and reconcile it with the server.
    pub async fn mount(&self) -> Result<Reconciliation, WizardError> {
        let local = self.adopt_local();
        self.reconcile_with_remote(local).await
    }

    /// Optimistically adopt stored progress so the wizard can render before the server answers.
    pub fn adopt_local(&self) -> Option<ProgressRecord> {
        let local = ProgressReconciler::new(self.store.as_ref()).adopt_local();
        if let Some(record) = &local {
            let mut state = self.state();
            state.progress = record.clone();
            state.phase = WizardPhase::Active;
        }
        local
    }

    /// Ask the server for its view of progress and adopt it only when it is further along.
    pub async fn reconcile_with_remote(
        &self,
        local: Option<ProgressRecord>,
    ) -> Result<Reconciliation, WizardError> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let remote = self
            .gateway
            .fetch_progress(self.flow.progress_endpoint(), self.role())
            .await;

        if let Err(err) = &remote {
            if err.is_unauthenticated() {
                self.navigator.navigate(Destination::Login);
                return Err(WizardError::Api(ApiError::Unauthenticated));
            }
        }

        let reconciliation = ProgressReconciler::new(self.store.as_ref()).reconcile(local, remote)?;

        let mut state = self.state();
        state.progress = reconciliation.record.clone();
        state.phase = WizardPhase::Active;
        info!(
            role = %self.role(),
            step = reconciliation.record.current_step.number(),
            source = ?reconciliation.source,
            "wizard mounted"
        );

        Ok(reconciliation)
    }

    fn edit_block<R>(
        &self,
        requested: Step,
        apply: impl FnOnce(&mut ApplicantDraft<P>) -> R,
    ) -> Result<R, WizardError> {
        let mut state = self.state();
        if state.phase == WizardPhase::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }
        let active = state.progress.current_step;
        if active != requested {
            return Err(WizardError::StepLocked { requested, active });
        }
        Ok(apply(&mut state.draft))
    }

    pub fn edit_personal_info<R>(
        &self,
        apply: impl FnOnce(&mut PersonalInfo) -> R,
    ) -> Result<R, WizardError> {
        self.edit_block(Step::PersonalInfo, |draft| apply(&mut draft.personal))
    }

    pub fn edit_profile<R>(&self, apply: impl FnOnce(&mut P) -> R) -> Result<R, WizardError> {
        self.edit_block(Step::Profile, |draft| apply(&mut draft.profile))
    }

    pub fn edit_documents<R>(
        &self,
        apply: impl FnOnce(&mut DocumentVerification) -> R,
    ) -> Result<R, WizardError> {
        self.edit_block(Step::Documents, |draft| apply(&mut draft.documents))
    }

    pub fn edit_identity<R>(
        &self,
        apply: impl FnOnce(&mut IdentityCheck) -> R,
    ) -> Result<R, WizardError> {
        self.edit_block(Step::IdentityCheck, |draft| apply(&mut draft.identity))
    }

    /// Validate and submit the active step, then move forward one step.
    ///
    /// Nothing is sent when validation fails or when a later step has no applicant identifier.
    /// Progress is persisted only after the server accepts the step, and the wizard moves on
    /// only once that save succeeds.
    pub async fn advance(&self) -> Result<AdvanceOutcome, WizardError> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        let (step, endpoint, payload) = {
            let state = self.state();
            if state.phase == WizardPhase::Submitted {
                return Err(WizardError::AlreadySubmitted);
            }

            let step = state.progress.current_step;
            let descriptor = self.flow.descriptor(step);

            if let Err(failure) = (descriptor.validate)(&state.draft, self.role()) {
                debug!(step = step.number(), field = failure.field, "step validation failed");
                return Err(WizardError::Validation(failure));
            }

            if step != Step::PersonalInfo && state.progress.applicant_id.is_none() {
                return Err(WizardError::MissingApplicantId);
            }

            let context = StepContext {
                role: self.role(),
                applicant_id: state.progress.applicant_id.as_ref(),
            };
            let payload = (descriptor.encode)(&state.draft, &context)?;
            (step, descriptor.endpoint.clone(), payload)
        };

        let response = match self.gateway.submit_step(&endpoint, payload).await {
            Ok(response) => response,
            Err(err) => {
                warn!(step = step.number(), error = %err, "step submission failed");
                if err.is_unauthenticated() {
                    self.navigator.navigate(Destination::Login);
                }
                return Err(WizardError::Api(err));
            }
        };

        let mut state = self.state();
        let mut progress = state.progress.clone();
        if step == Step::PersonalInfo {
            let applicant_id = response
                .applicant_id
                .ok_or(WizardError::MissingIdentifier)?;
            progress.applicant_id = Some(applicant_id);
        }
        let applicant_id = progress
            .applicant_id
            .clone()
            .ok_or(WizardError::MissingApplicantId)?;

        if step == Step::LAST {
            let cleared = self.store.clear();
            *state = WizardState {
                phase: WizardPhase::Submitted,
                ..WizardState::default()
            };
            drop(state);
            info!(role = %self.role(), applicant_id = %applicant_id, "registration submitted");
            self.navigator
                .navigate(Destination::RegistrationComplete(self.role()));
            cleared?;
            return Ok(AdvanceOutcome::Submitted { applicant_id });
        }

        let next = step.next();
        progress.current_step = next;
        self.store.save(&progress)?;
        state.progress = progress;
        info!(
            role = %self.role(),
            from = step.number(),
            to = next.number(),
            "registration step accepted"
        );

        Ok(AdvanceOutcome::Advanced {
            from: step,
            to: next,
            applicant_id,
        })
    }

    /// Step back without contacting the server. Already submitted data stays submitted.
    pub fn retreat(&self) -> Result<Step, WizardError> {
        let _busy = BusyGuard::acquire(&self.busy)?;
        let mut state = self.state();
        if state.phase == WizardPhase::Submitted {
            return Err(WizardError::AlreadySubmitted);
        }

        let current = state.progress.current_step;
        if current == Step::FIRST {
            return Ok(current);
        }

        state.progress.current_step = current.previous();
        self.store.save(&state.progress)?;
        debug!(step = state.progress.current_step.number(), "stepped back");
        Ok(state.progress.current_step)
    }

    /// Abandon local progress tracking. Partial records on the server are left alone.
    pub fn reset(&self, confirmation: ResetConfirmation) -> Result<ResetOutcome, WizardError> {
        if confirmation == ResetConfirmation::Declined {
            return Ok(ResetOutcome::Cancelled);
        }

        let _busy = BusyGuard::acquire(&self.busy)?;
        self.store.clear()?;
        *self.state() = WizardState::default();
        info!(role = %self.role(), "registration progress reset");
        Ok(ResetOutcome::Reset)
    }
}
