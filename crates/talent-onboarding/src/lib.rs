//! Client side of the talent registration service: a resumable four-step registration wizard
//! for models and hostesses, plus typed access to the applications, account, review and
//! gallery endpoints.

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod workflows;

pub use error::AppError;
