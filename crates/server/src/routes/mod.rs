//! HTTP route handlers
//!
//! - `listing`: the JSON/YAML document endpoint of each instance
//! - `viewer`: the HTML viewer page of each instance
//! - `login`: token issuance, mounted once per router
//! - `health`: liveness probe

pub mod health;
pub mod listing;
pub mod login;
pub mod viewer;

use crate::error::ServerError;

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
