use std::sync::Arc;

use cache::{CacheKey, DocumentCache, DocumentStore, KeySource, derive_key};
use document::{InstanceConfig, SpecificationDocument, base_document};
use once_cell::sync::OnceCell;
use paths::{PathContext, RouterPaths};

use crate::error::ResolveError;
use crate::scanner::{ScannedApi, Scanner};
use crate::spec_filter::{RequestContext, SpecFilter};

/// Shared handle to a published document.
pub type SharedDocument = Arc<SpecificationDocument>;

/// Shared handle to the result of one scan, cached per key.
pub type SharedScan = Arc<ScannedApi>;

/// Cache key of an instance mounted under `ctx`. The base-path derivation
/// uses the instance's view path, so distinct prefixes never share a key.
pub fn instance_cache_key(config: &InstanceConfig, ctx: &PathContext, router_name: &str) -> CacheKey {
    let base_path = ctx.view_path();
    derive_key(&KeySource {
        router_name,
        scanner_id: config.scanner_id.as_deref(),
        config_id: config.config_id.as_deref(),
        use_path_based_config: config.use_path_based_config,
        base_path: &base_path,
    })
}

/// Resolves the document of one mounted instance.
///
/// The resolver owns nothing process-wide: the cache and the store are
/// injected and usually shared by every instance of the application.
///
/// The cache holds raw scan results, so instances sharing a key scan once
/// but each publish a document built from their own metadata and allow-list.
pub struct DocumentResolver {
    config: Arc<InstanceConfig>,
    router: RouterPaths,
    router_name: String,
    scanner: Option<Arc<dyn Scanner>>,
    filters: Vec<Arc<dyn SpecFilter>>,
    cache: Arc<DocumentCache<SharedScan>>,
    store: Arc<DocumentStore<SharedDocument>>,
    published: OnceCell<()>,
}

impl DocumentResolver {
    pub fn new(
        config: Arc<InstanceConfig>,
        router: RouterPaths,
        router_name: impl Into<String>,
        cache: Arc<DocumentCache<SharedScan>>,
        store: Arc<DocumentStore<SharedDocument>>,
    ) -> Self {
        Self {
            config,
            router,
            router_name: router_name.into(),
            scanner: None,
            filters: Vec::new(),
            cache,
            store,
            published: OnceCell::new(),
        }
    }

    pub fn with_scanner(mut self, scanner: Arc<dyn Scanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Append a post-processing filter; filters run in insertion order.
    pub fn with_filter(mut self, filter: Arc<dyn SpecFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn config(&self) -> &InstanceConfig {
        &self.config
    }

    pub fn path_context(&self) -> PathContext {
        PathContext::new(&self.router, &self.config.uri_prefix)
    }

    pub fn instance_name(&self) -> String {
        self.path_context().instance_name()
    }

    pub fn cache_key(&self) -> CacheKey {
        self.cache_key_for(&self.path_context())
    }

    fn cache_key_for(&self, ctx: &PathContext) -> CacheKey {
        instance_cache_key(&self.config, ctx, &self.router_name)
    }

    /// Publish the metadata-only document as the pre-scan snapshot, unless
    /// something is already published. Returns whether it published.
    pub fn publish_base_document(&self) -> bool {
        let ctx = self.path_context();
        let name = ctx.instance_name();
        if self.store.contains(&name) {
            return false;
        }
        let doc = base_document(&self.config, &ctx.base_url());
        self.store.publish(&name, Arc::new(doc));
        true
    }

    /// Resolve the document for one request.
    ///
    /// `Ok(None)` means there is nothing to serve: no scanner is configured
    /// and nothing has been published for this instance.
    pub fn resolve(&self, request: &RequestContext) -> Result<Option<SharedDocument>, ResolveError> {
        let ctx = self.path_context();
        let instance_name = ctx.instance_name();

        if let Some(scanner) = &self.scanner {
            if self.published.get().is_none() {
                let key = self.cache_key_for(&ctx);
                let scanned = self.cache.resolve(&key, || {
                    scanner
                        .scan(&self.config.resource_package)
                        .map(Arc::new)
                })?;
                self.published
                    .get_or_init(|| self.publish_scanned(&scanned, &ctx, &instance_name));
            }
        }

        match self.store.get(&instance_name) {
            Some(doc) => self.apply_filters(doc, request).map(Some),
            None => {
                tracing::debug!(instance = %instance_name, "no document available");
                Ok(None)
            }
        }
    }

    /// Build this instance's document from a scan and publish it under the
    /// instance name, replacing the metadata-only snapshot.
    fn publish_scanned(&self, scanned: &ScannedApi, ctx: &PathContext, instance_name: &str) {
        let mut doc = base_document(&self.config, &ctx.base_url());
        doc.paths = filter::select_paths(
            &scanned.candidates,
            &self.config.allow_list_tags,
            &scanned.paths,
        );

        tracing::info!(
            instance = instance_name,
            package = %self.config.resource_package,
            operations = doc.operation_count(),
            "document published"
        );

        self.store.publish(instance_name, Arc::new(doc));
    }

    fn apply_filters(
        &self,
        doc: SharedDocument,
        request: &RequestContext,
    ) -> Result<SharedDocument, ResolveError> {
        if self.filters.is_empty() {
            return Ok(doc);
        }

        let mut current = SpecificationDocument::clone(&doc);
        for filter in &self.filters {
            current = filter
                .apply(current, request)
                .map_err(|source| ResolveError::Filter {
                    filter: filter.name().to_string(),
                    source,
                })?;
        }
        Ok(Arc::new(current))
    }
}
