//! # apimount document cache
//!
//! Process-level state behind the document endpoint:
//!
//! - [`derive_key`] picks the [`CacheKey`] of an instance from a ranked list
//!   of derivations (scanner id, config id, base path, default);
//! - [`DocumentCache`] guarantees a key is scanned at most once and serves
//!   initialized keys without locking;
//! - [`DocumentStore`] is the shared storage documents are published to,
//!   keyed by instance name.
//!
//! Both containers are plain values with no global state: the host creates
//! them at startup, shares them behind an `Arc` and drops them at shutdown.
//!
//! ```
//! use cache::{derive_key, DocumentCache, KeySource};
//!
//! let cache = DocumentCache::new();
//! let key = derive_key(&KeySource {
//!     router_name: "api",
//!     scanner_id: None,
//!     config_id: None,
//!     use_path_based_config: true,
//!     base_path: "/v2",
//! });
//!
//! let doc = cache.resolve(&key, || Ok::<_, ()>("scanned")).unwrap();
//! assert_eq!(doc, "scanned");
//! assert!(cache.is_initialized(&key));
//! ```

mod cache;
pub mod key;
mod store;

pub use cache::DocumentCache;
pub use key::{CacheKey, DEFAULT_KEY_ID, KeyFamily, KeySource, KeyStrategy, derive_key};
pub use store::DocumentStore;
