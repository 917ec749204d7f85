//! Per-role step tables driving the shared wizard controller.

use super::domain::{
    ApplicantDraft, ApplicantId, ApplicantRole, HostessProfile, ModelProfile, Step,
};
use super::gateway::{MultipartPayload, StepPayload};
use super::validation::{
    validate_documents, validate_hostess_profile, validate_identity, validate_model_profile,
    validate_personal_info, ValidationFailure,
};

/// What an encoder or validator knows besides the draft itself.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub role: ApplicantRole,
    pub applicant_id: Option<&'a ApplicantId>,
}

impl StepContext<'_> {
    fn id_value(&self) -> &str {
        self.applicant_id.map(ApplicantId::as_str).unwrap_or_default()
    }
}

pub type Validator<P> = fn(&ApplicantDraft<P>, ApplicantRole) -> Result<(), ValidationFailure>;
pub type Encoder<P> = fn(&ApplicantDraft<P>, &StepContext<'_>) -> Result<StepPayload, serde_json::Error>;

/// One row of a flow: how to validate, encode, and where to send a step.
pub struct StepDescriptor<P> {
    pub step: Step,
    pub endpoint: String,
    pub validate: Validator<P>,
    pub encode: Encoder<P>,
}

impl<P> Clone for StepDescriptor<P> {
    fn clone(&self) -> Self {
        Self {
            step: self.step,
            endpoint: self.endpoint.clone(),
            validate: self.validate,
            encode: self.encode,
        }
    }
}

impl<P> std::fmt::Debug for StepDescriptor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDescriptor")
            .field("step", &self.step)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("descriptor at position {position} is for {found}, expected {expected}")]
pub struct FlowDescriptorError {
    pub position: usize,
    pub expected: Step,
    pub found: Step,
}

/// Ordered step table for one applicant role.
#[derive(Debug, Clone)]
pub struct FlowDescriptor<P> {
    role: ApplicantRole,
    progress_endpoint: String,
    steps: [StepDescriptor<P>; 4],
}

impl<P> FlowDescriptor<P> {
    /// Steps must be given in wizard order.
    pub fn new(
        role: ApplicantRole,
        progress_endpoint: impl Into<String>,
        steps: [StepDescriptor<P>; 4],
    ) -> Result<Self, FlowDescriptorError> {
        for (position, (descriptor, expected)) in steps.iter().zip(Step::ALL).enumerate() {
            if descriptor.step != expected {
                return Err(FlowDescriptorError {
                    position,
                    expected,
                    found: descriptor.step,
                });
            }
        }

        Ok(Self {
            role,
            progress_endpoint: progress_endpoint.into(),
            steps,
        })
    }

    fn standard(role: ApplicantRole, validate_profile: Validator<P>, encode_profile: Encoder<P>) -> Self {
        let base = format!("/api/{}/register", role.api_segment());
        let steps = [
            StepDescriptor {
                step: Step::PersonalInfo,
                endpoint: format!("{base}/personal-info"),
                validate: |draft, role| validate_personal_info(&draft.personal, role),
                encode: encode_personal_info::<P>,
            },
            StepDescriptor {
                step: Step::Profile,
                endpoint: format!("{base}/profile"),
                validate: validate_profile,
                encode: encode_profile,
            },
            StepDescriptor {
                step: Step::Documents,
                endpoint: format!("{base}/documents"),
                validate: |draft, _| validate_documents(&draft.documents),
                encode: encode_documents::<P>,
            },
            StepDescriptor {
                step: Step::IdentityCheck,
                endpoint: format!("{base}/identity"),
                validate: |draft, _| validate_identity(&draft.identity),
                encode: encode_identity::<P>,
            },
        ];

        Self {
            role,
            progress_endpoint: format!("{base}/progress"),
            steps,
        }
    }

    pub fn role(&self) -> ApplicantRole {
        self.role
    }

    pub fn progress_endpoint(&self) -> &str {
        &self.progress_endpoint
    }

    pub fn descriptor(&self, step: Step) -> &StepDescriptor<P> {
        &self.steps[usize::from(step.number() - 1)]
    }

    pub fn steps(&self) -> &[StepDescriptor<P>] {
        &self.steps
    }
}

impl FlowDescriptor<ModelProfile> {
    pub fn model() -> Self {
        Self::standard(
            ApplicantRole::Model,
            |draft, _| validate_model_profile(&draft.profile),
            encode_model_profile,
        )
    }
}

impl FlowDescriptor<HostessProfile> {
    pub fn hostess() -> Self {
        Self::standard(
            ApplicantRole::Hostess,
            |draft, _| validate_hostess_profile(&draft.profile),
            encode_hostess_profile,
        )
    }
}

fn encode_personal_info<P>(
    draft: &ApplicantDraft<P>,
    _context: &StepContext<'_>,
) -> Result<StepPayload, serde_json::Error> {
    serde_json::to_value(&draft.personal).map(StepPayload::Json)
}

fn encode_model_profile(
    draft: &ApplicantDraft<ModelProfile>,
    context: &StepContext<'_>,
) -> Result<StepPayload, serde_json::Error> {
    let profile = &draft.profile;
    let mut payload = MultipartPayload::default()
        .text(context.role.id_field(), context.id_value())
        .text("height", profile.height.trim())
        .text("weight", profile.weight.trim())
        .optional_text("bust", &profile.bust)
        .optional_text("waist", &profile.waist)
        .optional_text("hips", &profile.hips)
        .optional_text("shoe_size", &profile.shoe_size)
        .text("hair_color", profile.hair_color.trim())
        .text("eye_color", profile.eye_color.trim())
        .text("experience_level", profile.experience_level.trim())
        .optional_text("instagram", &profile.instagram)
        .optional_text(
            "portfolio_url",
            profile.portfolio_url.as_deref().unwrap_or_default(),
        );

    if let Some(photo) = &profile.profile_photo {
        payload = payload.file("profile_photo", photo);
    }
    for photo in &profile.additional_photos {
        payload = payload.file("additional_photos", photo);
    }

    Ok(StepPayload::Multipart(payload))
}

fn encode_hostess_profile(
    draft: &ApplicantDraft<HostessProfile>,
    context: &StepContext<'_>,
) -> Result<StepPayload, serde_json::Error> {
    let profile = &draft.profile;
    let payload = MultipartPayload::default()
        .text(context.role.id_field(), context.id_value())
        .text("height", profile.height.trim())
        .text("weight", profile.weight.trim())
        .text("hair_color", profile.hair_color.trim())
        .text("eye_color", profile.eye_color.trim())
        .text("languages", profile.languages.trim())
        .text("availability", profile.availability.trim())
        .optional_text("experience", &profile.experience)
        .optional_text("instagram", &profile.instagram);

    let payload = profile
        .photos
        .iter()
        .fold(payload, |payload, photo| payload.file("photos", photo));

    Ok(StepPayload::Multipart(payload))
}

fn encode_documents<P>(
    draft: &ApplicantDraft<P>,
    context: &StepContext<'_>,
) -> Result<StepPayload, serde_json::Error> {
    let documents = &draft.documents;
    let mut payload = MultipartPayload::default()
        .text(context.role.id_field(), context.id_value())
        .text("issuer_country", documents.issuer_country.trim())
        .text("document_type", documents.document_type.trim());

    if let Some(front) = &documents.front {
        payload = payload.file("document_front", front);
    }
    if let Some(back) = &documents.back {
        payload = payload.file("document_back", back);
    }

    Ok(StepPayload::Multipart(payload))
}

fn encode_identity<P>(
    draft: &ApplicantDraft<P>,
    context: &StepContext<'_>,
) -> Result<StepPayload, serde_json::Error> {
    let mut payload =
        MultipartPayload::default().text(context.role.id_field(), context.id_value());
    if let Some(selfie) = &draft.identity.selfie_with_id {
        payload = payload.file("selfie_with_id", selfie);
    }
    Ok(StepPayload::Multipart(payload))
}
