use async_trait::async_trait;
use serde_json::Value;

use super::domain::{ApplicantId, ApplicantRole, UploadedFile};
use crate::api::ApiError;

/// Body of a step submission.
#[derive(Debug, Clone, PartialEq)]
pub enum StepPayload {
    Json(Value),
    Multipart(MultipartPayload),
}

/// Text fields and file parts of a multipart step, in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, UploadedFile)>,
}

impl MultipartPayload {
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    /// Adds the field only when the value is non-empty after trimming.
    pub fn optional_text(self, name: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self
        } else {
            self.text(name, value.trim())
        }
    }

    pub fn file(mut self, name: &str, file: &UploadedFile) -> Self {
        self.files.push((name.to_string(), file.clone()));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn files_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UploadedFile> + 'a {
        self.files
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, file)| file)
    }
}

/// Parsed 2xx response of a step submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepResponse {
    pub applicant_id: Option<ApplicantId>,
    pub message: Option<String>,
}

impl StepResponse {
    /// Read `id` and `message` from a JSON body; an empty or non-JSON body yields neither.
    pub fn from_body(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };
        Self {
            applicant_id: value.get("id").and_then(identifier_from),
            message: value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}

/// Server-side view of a flow's progress. The step is kept raw so range checks stay with the
/// reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProgress {
    pub applicant_id: Option<ApplicantId>,
    pub current_step: i64,
}

impl RemoteProgress {
    /// Read `{<role>_id, current_step}`. Returns `None` when no step is reported.
    pub fn from_value(value: &Value, role: ApplicantRole) -> Option<Self> {
        let current_step = match value.get("current_step")? {
            Value::Number(number) => number.as_i64()?,
            Value::String(raw) => raw.trim().parse().ok()?,
            _ => return None,
        };
        Some(Self {
            applicant_id: value.get(role.id_field()).and_then(identifier_from),
            current_step,
        })
    }
}

/// Identifiers arrive as strings or bare numbers depending on the endpoint.
pub(crate) fn identifier_from(value: &Value) -> Option<ApplicantId> {
    match value {
        Value::String(raw) if !raw.trim().is_empty() => Some(ApplicantId(raw.trim().to_string())),
        Value::Number(number) => Some(ApplicantId(number.to_string())),
        _ => None,
    }
}

/// Remote side of the wizard: step submission and progress lookup.
#[async_trait]
pub trait RegistrationGateway: Send + Sync {
    async fn submit_step(
        &self,
        endpoint: &str,
        payload: StepPayload,
    ) -> Result<StepResponse, ApiError>;

    /// `Ok(None)` when the server has no progress for the signed-in user.
    async fn fetch_progress(
        &self,
        endpoint: &str,
        role: ApplicantRole,
    ) -> Result<Option<RemoteProgress>, ApiError>;
}
