//! Remote REST API access.

mod account;
mod applications;
mod client;
mod error;
mod session;

pub use account::{Account, AccountUpdate};
pub use applications::{export_review_csv, ApplicationSummary, GalleryProfile};
pub use client::{ApiClient, LoginResponse};
pub use error::{server_message, ApiError, GENERIC_FAILURE};
pub use session::SessionStore;
