use std::fmt;

use serde::{Deserialize, Serialize};

/// The two kinds of talent profile that can be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantRole {
    Model,
    Hostess,
}

impl ApplicantRole {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicantRole::Model => "model",
            ApplicantRole::Hostess => "hostess",
        }
    }

    /// Path segment used by the remote API (`/api/models/...`).
    pub const fn api_segment(self) -> &'static str {
        match self {
            ApplicantRole::Model => "models",
            ApplicantRole::Hostess => "hostesses",
        }
    }

    /// Field carrying the applicant identifier in progress responses and multipart payloads.
    pub const fn id_field(self) -> &'static str {
        match self {
            ApplicantRole::Model => "model_id",
            ApplicantRole::Hostess => "hostess_id",
        }
    }
}

impl fmt::Display for ApplicantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier assigned by the server when step one succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

impl ApplicantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four sequential wizard stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    PersonalInfo,
    Profile,
    Documents,
    IdentityCheck,
}

impl Step {
    pub const FIRST: Step = Step::PersonalInfo;
    pub const LAST: Step = Step::IdentityCheck;
    pub const ALL: [Step; 4] = [
        Step::PersonalInfo,
        Step::Profile,
        Step::Documents,
        Step::IdentityCheck,
    ];

    pub const fn number(self) -> u8 {
        match self {
            Step::PersonalInfo => 1,
            Step::Profile => 2,
            Step::Documents => 3,
            Step::IdentityCheck => 4,
        }
    }

    pub const fn from_number(number: u8) -> Option<Step> {
        match number {
            1 => Some(Step::PersonalInfo),
            2 => Some(Step::Profile),
            3 => Some(Step::Documents),
            4 => Some(Step::IdentityCheck),
            _ => None,
        }
    }

    /// Saturates at the last step.
    pub const fn next(self) -> Step {
        match self {
            Step::PersonalInfo => Step::Profile,
            Step::Profile => Step::Documents,
            Step::Documents | Step::IdentityCheck => Step::IdentityCheck,
        }
    }

    /// Saturates at the first step.
    pub const fn previous(self) -> Step {
        match self {
            Step::PersonalInfo | Step::Profile => Step::PersonalInfo,
            Step::Documents => Step::Profile,
            Step::IdentityCheck => Step::Documents,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Step::PersonalInfo => "personal information",
            Step::Profile => "profile and experience",
            Step::Documents => "document verification",
            Step::IdentityCheck => "identity check",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.label())
    }
}

/// Locally tracked progress for one registration attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub applicant_id: Option<ApplicantId>,
    pub current_step: Step,
}

impl ProgressRecord {
    pub fn new(applicant_id: Option<ApplicantId>, current_step: Step) -> Self {
        Self {
            applicant_id,
            current_step,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.applicant_id.is_none() && self.current_step == Step::FIRST
    }
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self::new(None, Step::FIRST)
    }
}

/// Review state of a submitted application. Owned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// File attached to one of the multipart steps.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Upload with an unknown content type.
    pub fn binary(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(file_name, mime::APPLICATION_OCTET_STREAM.as_ref(), bytes)
    }
}

// Bytes are elided so drafts stay readable in logs.
impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Step one block. Serialized as the JSON body of the create-applicant call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub nationality: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
}

/// Step two block for the model flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelProfile {
    pub height: String,
    pub weight: String,
    pub bust: String,
    pub waist: String,
    pub hips: String,
    pub shoe_size: String,
    pub hair_color: String,
    pub eye_color: String,
    pub experience_level: String,
    pub instagram: String,
    pub portfolio_url: Option<String>,
    pub profile_photo: Option<UploadedFile>,
    pub additional_photos: Vec<UploadedFile>,
}

/// Step two block for the hostess flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostessProfile {
    pub height: String,
    pub weight: String,
    pub hair_color: String,
    pub eye_color: String,
    pub languages: String,
    pub availability: String,
    pub experience: String,
    pub instagram: String,
    pub photos: Vec<UploadedFile>,
}

/// Step three block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentVerification {
    pub issuer_country: String,
    pub document_type: String,
    pub front: Option<UploadedFile>,
    pub back: Option<UploadedFile>,
}

/// Step four block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityCheck {
    pub selfie_with_id: Option<UploadedFile>,
}

/// In-memory registration record, filled one block per step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicantDraft<P> {
    pub personal: PersonalInfo,
    pub profile: P,
    pub documents: DocumentVerification,
    pub identity: IdentityCheck,
}
