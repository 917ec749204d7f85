//! Submitted applications: the applicant's own list, the admin review queue, and the public
//! gallery of approved profiles.

use std::io::Write;

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::client::{deserialize_id, ApiClient, Auth};
use super::error::ApiError;
use crate::storage::KeyValueStore;
use crate::workflows::registration::{ApplicantRole, ApplicationStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub role: Option<ApplicantRole>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryProfile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub role: Option<ApplicantRole>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub hair_color: Option<String>,
    #[serde(default)]
    pub eye_color: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// List endpoints answer with either a bare array or `{ "applications": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { applications: Vec<T> },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { applications: items } => items,
        }
    }
}

#[derive(Debug, Serialize)]
struct RejectRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

impl<K: KeyValueStore> ApiClient<K> {
    pub async fn my_applications(
        &self,
        role: ApplicantRole,
    ) -> Result<Vec<ApplicationSummary>, ApiError> {
        let path = format!("/api/{}/applications", role.api_segment());
        let listing: Listing<ApplicationSummary> = self.get(&path, Auth::Bearer).await?;
        Ok(listing.into_vec())
    }

    /// Remove a partial or submitted application on the server.
    pub async fn delete_application(&self, role: ApplicantRole, id: &str) -> Result<(), ApiError> {
        let route = ["api", role.api_segment(), "applications", id];
        self.send(self.request_segments(Method::DELETE, &route, Auth::Bearer)?)
            .await?;
        info!(%role, id, "application deleted");
        Ok(())
    }

    pub async fn review_queue(
        &self,
        role: ApplicantRole,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ApplicationSummary>, ApiError> {
        let mut path = format!("/api/admin/{}", role.api_segment());
        if let Some(status) = status {
            path.push_str("?status=");
            path.push_str(status.label());
        }
        let listing: Listing<ApplicationSummary> = self.get(&path, Auth::Bearer).await?;
        Ok(listing.into_vec())
    }

    pub async fn approve(&self, role: ApplicantRole, id: &str) -> Result<(), ApiError> {
        let route = ["api", "admin", role.api_segment(), id, "approve"];
        self.send(self.request_segments(Method::POST, &route, Auth::Bearer)?)
            .await?;
        info!(%role, id, "application approved");
        Ok(())
    }

    pub async fn reject(
        &self,
        role: ApplicantRole,
        id: &str,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        let route = ["api", "admin", role.api_segment(), id, "reject"];
        let request = self.request_segments(Method::POST, &route, Auth::Bearer)?;
        self.send(request.json(&RejectRequest { reason })).await?;
        info!(%role, id, "application rejected");
        Ok(())
    }

    /// Approved profiles. Needs no session.
    pub async fn gallery(&self, role: ApplicantRole) -> Result<Vec<GalleryProfile>, ApiError> {
        let path = format!("/api/{}/gallery", role.api_segment());
        let listing: Listing<GalleryProfile> = self.get(&path, Auth::Anonymous).await?;
        Ok(listing.into_vec())
    }
}

/// Write a review queue as CSV with a header row.
pub fn export_review_csv<W: Write>(
    writer: W,
    applications: &[ApplicationSummary],
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([
        "id",
        "full_name",
        "email",
        "status",
        "submitted_at",
        "rejection_reason",
    ])?;

    for application in applications {
        let submitted_at = application
            .submitted_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default();
        writer.write_record([
            application.id.as_str(),
            application.full_name.as_str(),
            application.email.as_str(),
            application.status.label(),
            submitted_at.as_str(),
            application.rejection_reason.as_deref().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
