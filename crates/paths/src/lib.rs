//! # apimount path composition
//!
//! Every URL an API description instance is served under is derived from
//! three configuration primitives:
//!
//! - the application context path (where the whole application is mounted),
//! - the router root path (where the API router lives inside the context),
//! - the instance's URI prefix.
//!
//! ## Contract
//!
//! - All functions here are pure string transforms: no state, no I/O.
//! - Each primitive is normalized independently with [`normalize`] before it
//!   is combined with [`compose`].
//! - Root segments contribute nothing to a composed path; non-root segments
//!   are concatenated left to right without an extra separator.
//!
//! ## Example
//!
//! ```
//! use paths::{PathContext, RouterPaths};
//!
//! let router = RouterPaths::new("/", "/");
//! let layout = PathContext::new(&router, "/v2").derive();
//!
//! assert_eq!(layout.view_path, "/v2");
//! assert_eq!(layout.html_resource_path, "/v2/swagger");
//! assert_eq!(layout.document_listing_path, "/v2/swagger.{type:json|yaml}");
//! assert_eq!(layout.instance_name, "swagger/v2");
//! ```

pub mod compose;
pub mod context;
pub mod host;

pub use compose::{compose, normalize, with_leading_slash};
pub use context::{InstancePaths, PathContext, RouterPaths};
pub use host::{HostSpec, Scheme, split_host};

/// Suffix of the viewer page, relative to the instance prefix.
pub const SWAGGER_PATH: &str = "/swagger";

/// Suffix of the static asset mount.
pub const SWAGGER_URI_PATH: &str = "/swagger-ui";

/// Suffix of the login endpoint, relative to the router base URL.
pub const SWAGGER_LOGIN_PATH: &str = "/swagger-login";

/// Path template of the document endpoint. The type selector only accepts
/// `json` or `yaml`.
pub const SWAGGER_LISTING_PATH: &str = "/swagger.{type:json|yaml}";

/// Prefix of every shared-storage attribute key.
pub const INSTANCE_NAME_PREFIX: &str = "swagger";
