//! # apimount resolver
//!
//! Produces the specification document of a mounted instance.
//!
//! On the first request for an instance the [`DocumentResolver`] asks its
//! [`Scanner`] for the operations of the configured resource package, merges
//! them into the metadata skeleton built from the instance configuration,
//! keeps only operations the tag allow-list lets through, and publishes the
//! result to the shared document store. The scan happens once per cache key;
//! later requests read the published document. Every response then passes
//! through the configured [`SpecFilter`] chain, which may redact it per
//! request without affecting what is cached.

mod error;
mod resolver;
pub mod scanner;
pub mod spec_filter;

pub use error::ResolveError;
pub use resolver::{DocumentResolver, SharedDocument, SharedScan, instance_cache_key};
pub use scanner::{
    OperationDescriptor, RegistryScanner, ResourceDescriptor, ScanError, ScannedApi, Scanner,
};
pub use spec_filter::{FilterError, RequestContext, SpecFilter, TagQueryFilter};
