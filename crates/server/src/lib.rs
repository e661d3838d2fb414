//! apimount server - HTTP endpoints for mounted API description instances
//!
//! This crate turns a mount configuration into a running axum server. For
//! every configured instance it serves:
//!
//! - **Document**: `GET <view path>/swagger.json` and `/swagger.yaml`
//! - **Viewer**: `GET <view path>/swagger`, an HTML page loading the viewer
//!   assets and the JSON document
//! - **Assets**: the configured assets directory under
//!   `<root path><prefix>/swagger-ui`
//!
//! and once per router, when credentials are configured:
//!
//! - **Login**: `POST <base url>/swagger-login` with `username` and
//!   `password` headers, answering a token or 401
//!
//! Documents are scanned on first request, once per cache key, and may be
//! narrowed per request with `?tags=`. With `require_token` set, document
//! requests without a valid token answer 204.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use auth::{AccessPolicy, AllowAll, Authenticator, LoginContext, StaticAuthenticator, TokenAccess};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::{Components, ServerState};
