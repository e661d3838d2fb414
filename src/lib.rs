//! Workspace umbrella crate for apimount.
//!
//! apimount serves Swagger 2.0 descriptions of an HTTP API next to the API
//! itself. Each configured instance gets a document endpoint, a viewer page
//! and a static asset mount under its own URI prefix. This crate re-exports
//! the building blocks and adds the two pieces that look at the whole
//! configuration at once: the YAML mount configuration ([`config`]) and the
//! startup [`planner`].
//!
//! ```
//! use apimount::{MountConfig, plan};
//!
//! let config = MountConfig::from_yaml(r#"
//! router:
//!   root_path: /api
//! instances:
//!   - resource_package: com.example.api
//!     uri_prefix: /v2
//! "#).unwrap();
//!
//! let plan = plan(&config.instances, &config.router, false).unwrap();
//! assert_eq!(plan.instances[0].paths.view_path, "/api/v2");
//! assert_eq!(plan.routes.len(), 3);
//! ```

pub mod config;
pub mod planner;

pub use cache::{
    CacheKey, DocumentCache, DocumentStore, KeyFamily, KeySource, KeyStrategy, derive_key,
};
pub use config::{ConfigLoadError, MountConfig, RouterConfig};
pub use document::{
    DocumentError, DocumentFormat, InstanceConfig, SpecificationDocument, base_document, render,
};
pub use filter::{CandidateOperation, is_visible, retain, select_paths};
pub use paths::{InstancePaths, PathContext, RouterPaths, compose, normalize};
pub use planner::{
    PlanError, PlannedInstance, RegistrationPlan, RouteDescriptor, RouteKind, plan,
};
pub use resolver::{
    DocumentResolver, FilterError, RegistryScanner, RequestContext, ResolveError, ScanError,
    ScannedApi, Scanner, SharedDocument, SharedScan, SpecFilter, TagQueryFilter,
};
