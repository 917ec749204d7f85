//! Per-step completeness rules. Each check stops at the first violated rule.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::domain::{
    ApplicantRole, DocumentVerification, HostessProfile, IdentityCheck, ModelProfile,
    PersonalInfo, Step,
};

pub const HOSTESS_MIN_PHOTOS: usize = 5;
pub const MODEL_MAX_ADDITIONAL_PHOTOS: usize = 5;

/// First rule a draft block violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub step: Step,
    pub field: &'static str,
    pub reason: String,
}

impl ValidationFailure {
    fn new(step: Step, field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            step,
            field,
            reason: reason.into(),
        }
    }

    fn missing(step: Step, field: &'static str, label: &str) -> Self {
        Self::new(step, field, format!("{label} is required"))
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for ValidationFailure {}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn require(
    step: Step,
    fields: &[(&'static str, &str, &str)],
) -> Result<(), ValidationFailure> {
    match fields.iter().find(|(_, _, value)| value.trim().is_empty()) {
        Some(&(field, label, _)) => Err(ValidationFailure::missing(step, field, label)),
        None => Ok(()),
    }
}

pub fn validate_personal_info(
    info: &PersonalInfo,
    role: ApplicantRole,
) -> Result<(), ValidationFailure> {
    let step = Step::PersonalInfo;
    require(
        step,
        &[
            ("first_name", "First name", info.first_name.as_str()),
            ("last_name", "Last name", info.last_name.as_str()),
            ("email", "Email", info.email.as_str()),
            ("phone", "Phone number", info.phone.as_str()),
            ("date_of_birth", "Date of birth", info.date_of_birth.as_str()),
            ("gender", "Gender", info.gender.as_str()),
            ("nationality", "Nationality", info.nationality.as_str()),
            ("address", "Address", info.address.as_str()),
            ("city", "City", info.city.as_str()),
            ("country", "Country", info.country.as_str()),
        ],
    )?;

    if role == ApplicantRole::Hostess {
        require(
            step,
            &[
                (
                    "emergency_contact_name",
                    "Emergency contact name",
                    info.emergency_contact_name.as_str(),
                ),
                (
                    "emergency_contact_phone",
                    "Emergency contact phone",
                    info.emergency_contact_phone.as_str(),
                ),
            ],
        )?;
    }

    if !email_pattern().is_match(info.email.trim()) {
        return Err(ValidationFailure::new(
            step,
            "email",
            "Please enter a valid email address",
        ));
    }

    Ok(())
}

pub fn validate_model_profile(profile: &ModelProfile) -> Result<(), ValidationFailure> {
    let step = Step::Profile;
    require(
        step,
        &[
            ("height", "Height", profile.height.as_str()),
            ("weight", "Weight", profile.weight.as_str()),
            ("hair_color", "Hair color", profile.hair_color.as_str()),
            ("eye_color", "Eye color", profile.eye_color.as_str()),
            ("experience_level", "Experience level", profile.experience_level.as_str()),
        ],
    )?;

    if profile.profile_photo.is_none() {
        return Err(ValidationFailure::new(
            step,
            "profile_photo",
            "A profile photo is required",
        ));
    }

    if profile.additional_photos.len() > MODEL_MAX_ADDITIONAL_PHOTOS {
        return Err(ValidationFailure::new(
            step,
            "additional_photos",
            format!(
                "At most {MODEL_MAX_ADDITIONAL_PHOTOS} additional photos can be uploaded ({} selected)",
                profile.additional_photos.len()
            ),
        ));
    }

    Ok(())
}

pub fn validate_hostess_profile(profile: &HostessProfile) -> Result<(), ValidationFailure> {
    let step = Step::Profile;
    require(
        step,
        &[
            ("height", "Height", profile.height.as_str()),
            ("weight", "Weight", profile.weight.as_str()),
            ("hair_color", "Hair color", profile.hair_color.as_str()),
            ("eye_color", "Eye color", profile.eye_color.as_str()),
            ("languages", "Languages", profile.languages.as_str()),
            ("availability", "Availability", profile.availability.as_str()),
        ],
    )?;

    if profile.photos.len() < HOSTESS_MIN_PHOTOS {
        return Err(ValidationFailure::new(
            step,
            "photos",
            format!(
                "Please upload at least {HOSTESS_MIN_PHOTOS} photos ({} selected)",
                profile.photos.len()
            ),
        ));
    }

    Ok(())
}

pub fn validate_documents(documents: &DocumentVerification) -> Result<(), ValidationFailure> {
    let step = Step::Documents;
    require(
        step,
        &[
            ("issuer_country", "Issuing country", documents.issuer_country.as_str()),
            ("document_type", "Document type", documents.document_type.as_str()),
        ],
    )?;

    if documents.front.is_none() {
        return Err(ValidationFailure::missing(
            step,
            "document_front",
            "Front image of the document",
        ));
    }
    if documents.back.is_none() {
        return Err(ValidationFailure::missing(
            step,
            "document_back",
            "Back image of the document",
        ));
    }

    Ok(())
}

pub fn validate_identity(identity: &IdentityCheck) -> Result<(), ValidationFailure> {
    if identity.selfie_with_id.is_none() {
        return Err(ValidationFailure::missing(
            Step::IdentityCheck,
            "selfie_with_id",
            "A selfie holding your ID",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::registration::domain::UploadedFile;

    fn photo(name: &str) -> UploadedFile {
        UploadedFile::new(name, "image/jpeg", vec![0xFF, 0xD8])
    }

    fn complete_personal_info() -> PersonalInfo {
        PersonalInfo {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+351 912 345 678".to_string(),
            date_of_birth: "1998-04-12".to_string(),
            gender: "female".to_string(),
            nationality: "Portuguese".to_string(),
            address: "Rua Augusta 10".to_string(),
            city: "Lisbon".to_string(),
            country: "Portugal".to_string(),
            emergency_contact_name: "Rui Silva".to_string(),
            emergency_contact_phone: "+351 913 000 000".to_string(),
        }
    }

    fn complete_hostess_profile(photos: usize) -> HostessProfile {
        HostessProfile {
            height: "170".to_string(),
            weight: "55".to_string(),
            hair_color: "brown".to_string(),
            eye_color: "green".to_string(),
            languages: "pt, en".to_string(),
            availability: "weekends".to_string(),
            experience: "trade fairs".to_string(),
            instagram: String::new(),
            photos: (0..photos).map(|i| photo(&format!("p{i}.jpg"))).collect(),
        }
    }

    #[test]
    fn personal_info_reports_first_missing_field_only() {
        let mut info = complete_personal_info();
        info.last_name = "   ".to_string();
        info.city = String::new();

        let failure = validate_personal_info(&info, ApplicantRole::Model).expect_err("fails");
        assert_eq!(failure.field, "last_name");
        assert_eq!(failure.step, Step::PersonalInfo);
        assert_eq!(failure.to_string(), "Last name is required");
    }

    #[test]
    fn emergency_contact_only_required_for_hostess() {
        let mut info = complete_personal_info();
        info.emergency_contact_name.clear();
        info.emergency_contact_phone.clear();

        assert!(validate_personal_info(&info, ApplicantRole::Model).is_ok());
        let failure = validate_personal_info(&info, ApplicantRole::Hostess).expect_err("fails");
        assert_eq!(failure.field, "emergency_contact_name");
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["ana", "ana@example", "ana @example.com", "@example.com"] {
            let mut info = complete_personal_info();
            info.email = email.to_string();
            let failure = validate_personal_info(&info, ApplicantRole::Model)
                .expect_err("malformed email rejected");
            assert_eq!(failure.field, "email", "email {email:?}");
        }
    }

    #[test]
    fn hostess_requires_five_photos() {
        let failure = validate_hostess_profile(&complete_hostess_profile(3)).expect_err("fails");
        assert_eq!(failure.field, "photos");
        assert!(failure.reason.contains("at least 5"));
        assert!(validate_hostess_profile(&complete_hostess_profile(5)).is_ok());
    }

    #[test]
    fn model_requires_one_profile_photo_and_caps_extras() {
        let mut profile = ModelProfile {
            height: "180".to_string(),
            weight: "62".to_string(),
            hair_color: "black".to_string(),
            eye_color: "brown".to_string(),
            experience_level: "professional".to_string(),
            ..ModelProfile::default()
        };
        let failure = validate_model_profile(&profile).expect_err("photo required");
        assert_eq!(failure.field, "profile_photo");

        profile.profile_photo = Some(photo("main.jpg"));
        assert!(validate_model_profile(&profile).is_ok());

        profile.additional_photos = (0..6).map(|i| photo(&format!("x{i}.jpg"))).collect();
        let failure = validate_model_profile(&profile).expect_err("too many extras");
        assert_eq!(failure.field, "additional_photos");
    }

    #[test]
    fn documents_require_both_images() {
        let mut documents = DocumentVerification {
            issuer_country: "Portugal".to_string(),
            document_type: "passport".to_string(),
            front: Some(photo("front.jpg")),
            back: None,
        };
        let failure = validate_documents(&documents).expect_err("back missing");
        assert_eq!(failure.field, "document_back");

        documents.back = Some(photo("back.jpg"));
        assert!(validate_documents(&documents).is_ok());
    }

    #[test]
    fn identity_requires_selfie() {
        let failure = validate_identity(&IdentityCheck::default()).expect_err("selfie missing");
        assert_eq!(failure.step, Step::IdentityCheck);
        assert!(validate_identity(&IdentityCheck {
            selfie_with_id: Some(photo("selfie.jpg")),
        })
        .is_ok());
    }
}
