//! Typed HTTP client for the remote registration API.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::account::Account;
use super::error::ApiError;
use super::session::SessionStore;
use crate::config::ApiConfig;
use crate::storage::KeyValueStore;
use crate::workflows::registration::gateway::identifier_from;
use crate::workflows::registration::{
    ApplicantRole, MultipartPayload, RegistrationGateway, RemoteProgress, StepPayload,
    StepResponse,
};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<Account>,
}

/// Whether a call carries the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    Bearer,
    Anonymous,
}

pub struct ApiClient<K> {
    http: Client,
    base: Url,
    base_url: String,
    session: SessionStore<K>,
}

impl<K: KeyValueStore> ApiClient<K> {
    pub fn new(config: &ApiConfig, session: SessionStore<K>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base: config.base_url.clone(),
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore<K> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a token and keep it for later calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = self
            .send(
                self.request(Method::POST, "/api/auth/login", Auth::Anonymous)?
                    .json(&LoginRequest { email, password }),
            )
            .await?;
        let response: LoginResponse = decode(&body)?;
        self.session.save_token(&response.token)?;
        Ok(response)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        Ok(self.session.clear()?)
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
    ) -> Result<RequestBuilder, ApiError> {
        let request = self.http.request(method, format!("{}{}", self.base_url, path));
        self.authorize(request, auth)
    }

    /// Request to a route whose segments come from user input. Each segment is
    /// percent-encoded on its own, so `/`, `?` and `#` stay inside it.
    pub(crate) fn request_segments(
        &self,
        method: Method,
        segments: &[&str],
        auth: Auth,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        self.authorize(self.http.request(method, url), auth)
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Payload(format!("base url {} cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder, auth: Auth) -> Result<RequestBuilder, ApiError> {
        match auth {
            Auth::Anonymous => Ok(request),
            Auth::Bearer => {
                let token = self.session.token().ok_or(ApiError::Unauthenticated)?;
                Ok(request.bearer_auth(token))
            }
        }
    }

    /// Status and raw body, whatever the status.
    async fn exchange(&self, request: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "api response received");
        Ok((status, body))
    }

    /// Body of a 2xx response; any other status becomes an [`ApiError`].
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let (status, body) = self.exchange(request).await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::from_status(status.as_u16(), &body))
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, ApiError> {
        let body = self.send(self.request(Method::GET, path, auth)?).await?;
        decode(&body)
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<String, ApiError> {
        self.send(self.request(method, path, Auth::Bearer)?.json(body))
            .await
    }
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Identifiers arrive as strings or bare numbers; both are kept as strings.
pub(crate) fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    identifier_from(&value)
        .map(|id| id.0)
        .ok_or_else(|| de::Error::custom("expected a string or numeric id"))
}

fn multipart_form(payload: MultipartPayload) -> Result<Form, ApiError> {
    let form = payload
        .fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));

    payload
        .files
        .into_iter()
        .try_fold(form, |form, (name, file)| {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|err| ApiError::Payload(err.to_string()))?;
            Ok(form.part(name, part))
        })
}

#[async_trait]
impl<K: KeyValueStore> RegistrationGateway for ApiClient<K> {
    async fn submit_step(
        &self,
        endpoint: &str,
        payload: StepPayload,
    ) -> Result<StepResponse, ApiError> {
        let request = self.request(Method::POST, endpoint, Auth::Bearer)?;
        let request = match payload {
            StepPayload::Json(body) => request.json(&body),
            StepPayload::Multipart(parts) => request.multipart(multipart_form(parts)?),
        };
        let body = self.send(request).await?;
        Ok(StepResponse::from_body(&body))
    }

    async fn fetch_progress(
        &self,
        endpoint: &str,
        role: ApplicantRole,
    ) -> Result<Option<RemoteProgress>, ApiError> {
        let (status, body) = self
            .exchange(self.request(Method::GET, endpoint, Auth::Bearer)?)
            .await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &body));
        }
        if body.trim().is_empty() {
            return Ok(None);
        }

        let value: Value = decode(&body)?;
        Ok(RemoteProgress::from_value(&value, role))
    }
}
