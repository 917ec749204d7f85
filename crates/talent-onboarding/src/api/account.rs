use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::{decode, deserialize_id, ApiClient, Auth};
use super::error::ApiError;
use crate::storage::KeyValueStore;

const ACCOUNT_PATH: &str = "/api/account";

/// Signed-in user as reported by the account endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

/// Fields to change. Absent fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl AccountUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Deserialize)]
struct AccountEnvelope {
    user: Account,
}

impl<K: KeyValueStore> ApiClient<K> {
    pub async fn account(&self) -> Result<Account, ApiError> {
        let envelope: AccountEnvelope = self.get(ACCOUNT_PATH, Auth::Bearer).await?;
        Ok(envelope.user)
    }

    /// Replace the account details (`PUT`).
    pub async fn update_account(&self, update: &AccountUpdate) -> Result<Account, ApiError> {
        self.write_account(Method::PUT, update).await
    }

    /// Change only the given fields (`PATCH`).
    pub async fn patch_account(&self, update: &AccountUpdate) -> Result<Account, ApiError> {
        self.write_account(Method::PATCH, update).await
    }

    async fn write_account(
        &self,
        method: Method,
        update: &AccountUpdate,
    ) -> Result<Account, ApiError> {
        if update.is_empty() {
            return Err(ApiError::Payload("no account fields to update".to_string()));
        }
        let body = self.send_json(method, ACCOUNT_PATH, update).await?;
        let envelope: AccountEnvelope = decode(&body)?;
        Ok(envelope.user)
    }
}
