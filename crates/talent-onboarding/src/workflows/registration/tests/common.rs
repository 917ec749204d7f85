use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::ApiError;
use crate::storage::MemoryKeyValueStore;
use crate::workflows::registration::controller::{Destination, Navigator, WizardController};
use crate::workflows::registration::domain::{
    ApplicantDraft, ApplicantId, ApplicantRole, DocumentVerification, HostessProfile,
    IdentityCheck, ModelProfile, PersonalInfo, UploadedFile,
};
use crate::workflows::registration::flow::FlowDescriptor;
use crate::workflows::registration::gateway::{
    RegistrationGateway, RemoteProgress, StepPayload, StepResponse,
};
use crate::workflows::registration::progress::LocalProgressStore;

pub(super) type MemoryProgress = LocalProgressStore<MemoryKeyValueStore>;
pub(super) type ModelWizard =
    WizardController<ModelProfile, MemoryProgress, ScriptedGateway, RecordingNavigator>;
pub(super) type HostessWizard =
    WizardController<HostessProfile, MemoryProgress, ScriptedGateway, RecordingNavigator>;

/// Gateway answering from queues and recording every submission it receives.
#[derive(Default)]
pub(super) struct ScriptedGateway {
    submissions: Mutex<VecDeque<Result<StepResponse, ApiError>>>,
    progress: Mutex<Option<Result<Option<RemoteProgress>, ApiError>>>,
    calls: Mutex<Vec<(String, StepPayload)>>,
    progress_calls: Mutex<usize>,
    delay_yields: usize,
}

impl ScriptedGateway {
    pub(super) fn with_delay(delay_yields: usize) -> Self {
        Self {
            delay_yields,
            ..Self::default()
        }
    }

    pub(super) fn respond(&self, response: Result<StepResponse, ApiError>) -> &Self {
        self.submissions
            .lock()
            .expect("gateway mutex poisoned")
            .push_back(response);
        self
    }

    pub(super) fn respond_ok(&self) -> &Self {
        self.respond(Ok(StepResponse::default()))
    }

    pub(super) fn respond_with_id(&self, id: &str) -> &Self {
        self.respond(Ok(StepResponse {
            applicant_id: Some(ApplicantId(id.to_string())),
            message: None,
        }))
    }

    pub(super) fn set_progress(&self, progress: Result<Option<RemoteProgress>, ApiError>) {
        *self.progress.lock().expect("gateway mutex poisoned") = Some(progress);
    }

    pub(super) fn calls(&self) -> Vec<(String, StepPayload)> {
        self.calls.lock().expect("gateway mutex poisoned").clone()
    }

    pub(super) fn progress_calls(&self) -> usize {
        *self.progress_calls.lock().expect("gateway mutex poisoned")
    }
}

#[async_trait]
impl RegistrationGateway for ScriptedGateway {
    async fn submit_step(
        &self,
        endpoint: &str,
        payload: StepPayload,
    ) -> Result<StepResponse, ApiError> {
        self.calls
            .lock()
            .expect("gateway mutex poisoned")
            .push((endpoint.to_string(), payload));

        for _ in 0..self.delay_yields {
            tokio::task::yield_now().await;
        }

        let next = self
            .submissions
            .lock()
            .expect("gateway mutex poisoned")
            .pop_front();
        next.unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_string())))
    }

    async fn fetch_progress(
        &self,
        _endpoint: &str,
        _role: ApplicantRole,
    ) -> Result<Option<RemoteProgress>, ApiError> {
        *self.progress_calls.lock().expect("gateway mutex poisoned") += 1;
        self.progress
            .lock()
            .expect("gateway mutex poisoned")
            .take()
            .unwrap_or(Ok(None))
    }
}

#[derive(Default)]
pub(super) struct RecordingNavigator {
    destinations: Mutex<Vec<Destination>>,
}

impl RecordingNavigator {
    pub(super) fn destinations(&self) -> Vec<Destination> {
        self.destinations
            .lock()
            .expect("navigator mutex poisoned")
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        self.destinations
            .lock()
            .expect("navigator mutex poisoned")
            .push(destination);
    }
}

pub(super) struct Harness<W> {
    pub(super) storage: Arc<MemoryKeyValueStore>,
    pub(super) store: Arc<MemoryProgress>,
    pub(super) gateway: Arc<ScriptedGateway>,
    pub(super) navigator: Arc<RecordingNavigator>,
    pub(super) wizard: W,
}

pub(super) fn model_harness() -> Harness<ModelWizard> {
    model_harness_with(Arc::new(MemoryKeyValueStore::default()), ScriptedGateway::default())
}

pub(super) fn model_harness_with(
    storage: Arc<MemoryKeyValueStore>,
    gateway: ScriptedGateway,
) -> Harness<ModelWizard> {
    let store = Arc::new(LocalProgressStore::new(storage.clone(), ApplicantRole::Model));
    let gateway = Arc::new(gateway);
    let navigator = Arc::new(RecordingNavigator::default());
    let wizard = WizardController::new(
        FlowDescriptor::model(),
        store.clone(),
        gateway.clone(),
        navigator.clone(),
    );
    Harness {
        storage,
        store,
        gateway,
        navigator,
        wizard,
    }
}

pub(super) fn hostess_harness() -> Harness<HostessWizard> {
    let storage = Arc::new(MemoryKeyValueStore::default());
    let store = Arc::new(LocalProgressStore::new(storage.clone(), ApplicantRole::Hostess));
    let gateway = Arc::new(ScriptedGateway::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let wizard = WizardController::new(
        FlowDescriptor::hostess(),
        store.clone(),
        gateway.clone(),
        navigator.clone(),
    );
    Harness {
        storage,
        store,
        gateway,
        navigator,
        wizard,
    }
}

pub(super) fn photo(name: &str) -> UploadedFile {
    UploadedFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

pub(super) fn fill_personal_info(info: &mut PersonalInfo) {
    *info = PersonalInfo {
        first_name: "Ana".to_string(),
        last_name: "Silva".to_string(),
        email: "ana.silva@example.com".to_string(),
        phone: "+351 912 345 678".to_string(),
        date_of_birth: "1998-04-12".to_string(),
        gender: "female".to_string(),
        nationality: "Portuguese".to_string(),
        address: "Rua Augusta 10".to_string(),
        city: "Lisbon".to_string(),
        country: "Portugal".to_string(),
        emergency_contact_name: "Rui Silva".to_string(),
        emergency_contact_phone: "+351 913 000 000".to_string(),
    };
}

pub(super) fn fill_model_profile(profile: &mut ModelProfile) {
    *profile = ModelProfile {
        height: "178".to_string(),
        weight: "58".to_string(),
        bust: "84".to_string(),
        waist: "61".to_string(),
        hips: "89".to_string(),
        shoe_size: "39".to_string(),
        hair_color: "brown".to_string(),
        eye_color: "green".to_string(),
        experience_level: "intermediate".to_string(),
        instagram: "@ana.models".to_string(),
        portfolio_url: None,
        profile_photo: Some(photo("headshot.jpg")),
        additional_photos: vec![photo("full-body.jpg")],
    };
}

pub(super) fn fill_hostess_profile(profile: &mut HostessProfile, photos: usize) {
    *profile = HostessProfile {
        height: "170".to_string(),
        weight: "55".to_string(),
        hair_color: "blonde".to_string(),
        eye_color: "blue".to_string(),
        languages: "Portuguese, English, Spanish".to_string(),
        availability: "weekends".to_string(),
        experience: "trade fairs".to_string(),
        instagram: String::new(),
        photos: (0..photos).map(|i| photo(&format!("hostess-{i}.jpg"))).collect(),
    };
}

pub(super) fn fill_documents(documents: &mut DocumentVerification) {
    *documents = DocumentVerification {
        issuer_country: "Portugal".to_string(),
        document_type: "passport".to_string(),
        front: Some(photo("passport-front.jpg")),
        back: Some(photo("passport-back.jpg")),
    };
}

pub(super) fn fill_identity(identity: &mut IdentityCheck) {
    identity.selfie_with_id = Some(photo("selfie.jpg"));
}

pub(super) fn is_empty_draft<P: Default + PartialEq>(draft: &ApplicantDraft<P>) -> bool {
    *draft == ApplicantDraft::default()
}
