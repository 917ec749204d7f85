//! JSON form files for the `register` and `account` commands.
//!
//! File fields hold paths; relative paths are resolved against the directory of the input
//! file and the content type is guessed from the extension.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use talent_onboarding::error::AppError;
use talent_onboarding::workflows::registration::{
    DocumentVerification, HostessProfile, IdentityCheck, ModelProfile, PersonalInfo,
    UploadedFile,
};

/// Read and parse a JSON input file, returning it together with the directory file paths
/// are relative to.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<(T, PathBuf), AppError> {
    let raw = fs::read_to_string(path).map_err(|err| {
        AppError::Input(format!("unable to read {}: {err}", path.display()))
    })?;
    let parsed = serde_json::from_str(&raw).map_err(|err| {
        AppError::Input(format!("{} is not valid input: {err}", path.display()))
    })?;
    let base = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok((parsed, base))
}

pub(crate) fn load_file(base: &Path, raw: &str) -> Result<UploadedFile, AppError> {
    let path = base.join(raw.trim());
    let bytes = fs::read(&path).map_err(|err| {
        AppError::Input(format!("unable to read upload {}: {err}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw.trim().to_string());
    let content_type = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(UploadedFile::new(file_name, content_type.essence_str(), bytes))
}

fn load_optional(base: &Path, raw: Option<&str>) -> Result<Option<UploadedFile>, AppError> {
    raw.filter(|raw| !raw.trim().is_empty())
        .map(|raw| load_file(base, raw))
        .transpose()
}

fn load_all(base: &Path, raw: &[String]) -> Result<Vec<UploadedFile>, AppError> {
    raw.iter().map(|path| load_file(base, path)).collect()
}

/// One file holding any of the four blocks; `advance` uses the block of the active step.
#[derive(Debug, Deserialize)]
#[serde(bound = "P: Deserialize<'de>")]
pub(crate) struct RegistrationInput<P> {
    #[serde(default)]
    pub(crate) personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub(crate) profile: Option<P>,
    #[serde(default)]
    pub(crate) documents: Option<DocumentsInput>,
    #[serde(default)]
    pub(crate) identity: Option<IdentityInput>,
}

/// Profile block as written in an input file, converted into the wizard's profile type.
pub(crate) trait ProfileInput: DeserializeOwned {
    type Profile;

    fn load(self, base: &Path) -> Result<Self::Profile, AppError>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ModelProfileInput {
    height: String,
    weight: String,
    bust: String,
    waist: String,
    hips: String,
    shoe_size: String,
    hair_color: String,
    eye_color: String,
    experience_level: String,
    instagram: String,
    portfolio_url: Option<String>,
    profile_photo: Option<String>,
    additional_photos: Vec<String>,
}

impl ProfileInput for ModelProfileInput {
    type Profile = ModelProfile;

    fn load(self, base: &Path) -> Result<ModelProfile, AppError> {
        Ok(ModelProfile {
            profile_photo: load_optional(base, self.profile_photo.as_deref())?,
            additional_photos: load_all(base, &self.additional_photos)?,
            height: self.height,
            weight: self.weight,
            bust: self.bust,
            waist: self.waist,
            hips: self.hips,
            shoe_size: self.shoe_size,
            hair_color: self.hair_color,
            eye_color: self.eye_color,
            experience_level: self.experience_level,
            instagram: self.instagram,
            portfolio_url: self.portfolio_url,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct HostessProfileInput {
    height: String,
    weight: String,
    hair_color: String,
    eye_color: String,
    languages: String,
    availability: String,
    experience: String,
    instagram: String,
    photos: Vec<String>,
}

impl ProfileInput for HostessProfileInput {
    type Profile = HostessProfile;

    fn load(self, base: &Path) -> Result<HostessProfile, AppError> {
        Ok(HostessProfile {
            photos: load_all(base, &self.photos)?,
            height: self.height,
            weight: self.weight,
            hair_color: self.hair_color,
            eye_color: self.eye_color,
            languages: self.languages,
            availability: self.availability,
            experience: self.experience,
            instagram: self.instagram,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct DocumentsInput {
    issuer_country: String,
    document_type: String,
    document_front: Option<String>,
    document_back: Option<String>,
}

impl DocumentsInput {
    pub(crate) fn load(self, base: &Path) -> Result<DocumentVerification, AppError> {
        Ok(DocumentVerification {
            front: load_optional(base, self.document_front.as_deref())?,
            back: load_optional(base, self.document_back.as_deref())?,
            issuer_country: self.issuer_country,
            document_type: self.document_type,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct IdentityInput {
    selfie_with_id: Option<String>,
}

impl IdentityInput {
    pub(crate) fn load(self, base: &Path) -> Result<IdentityCheck, AppError> {
        Ok(IdentityCheck {
            selfie_with_id: load_optional(base, self.selfie_with_id.as_deref())?,
        })
    }
}
