use crate::auth::{AccessPolicy, AllowAll, Authenticator, StaticAuthenticator, TokenAccess};
use crate::config::ServerConfig;
use crate::error::ServerResult;
use apimount::{plan, MountConfig, RegistrationPlan};
use cache::{DocumentCache, DocumentStore};
use resolver::{
    DocumentResolver, RegistryScanner, Scanner, SharedDocument, SharedScan, TagQueryFilter,
};
use std::sync::Arc;
use std::time::Instant;

/// Pluggable pieces of the server. Anything left out is derived from the
/// [`ServerConfig`] or disabled.
#[derive(Clone, Default)]
pub struct Components {
    pub scanner: Option<Arc<dyn Scanner>>,
    pub authenticator: Option<Arc<dyn Authenticator>>,
    pub access: Option<Arc<dyn AccessPolicy>>,
}

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Routes and instances computed at startup
    pub plan: Arc<RegistrationPlan>,

    /// One resolver per planned instance, same order as `plan.instances`
    pub resolvers: Vec<Arc<DocumentResolver>>,

    /// Scan-once cache of raw scan results, shared by every instance
    pub cache: Arc<DocumentCache<SharedScan>>,

    /// Published documents by instance name
    pub store: Arc<DocumentStore<SharedDocument>>,

    /// Present when the login endpoint is mounted
    pub authenticator: Option<Arc<dyn Authenticator>>,

    pub access: Arc<dyn AccessPolicy>,

    pub started_at: Instant,
}

impl ServerState {
    /// Build state from the files and credentials named in `config`.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let mount = MountConfig::from_file(&config.mount_config)?;

        let scanner = match &config.registry_file {
            Some(path) => {
                let registry = RegistryScanner::from_file(path)?;
                tracing::info!(
                    path = %path.display(),
                    resources = registry.resources().len(),
                    "resource registry loaded"
                );
                Some(Arc::new(registry) as Arc<dyn Scanner>)
            }
            None => None,
        };

        let mut components = Components {
            scanner,
            ..Components::default()
        };
        if !config.credentials.is_empty() {
            let authenticator = Arc::new(
                StaticAuthenticator::new(config.credentials.clone())
                    .with_token_ttl(config.token_ttl()),
            );
            if config.require_token {
                components.access = Some(Arc::new(TokenAccess::new(authenticator.clone())));
            }
            components.authenticator = Some(authenticator);
        }

        Self::new(config, &mount, components)
    }

    /// Plan the mount and create one resolver per instance.
    pub fn new(config: ServerConfig, mount: &MountConfig, components: Components) -> ServerResult<Self> {
        let plan = plan(
            &mount.instances,
            &mount.router,
            components.authenticator.is_some(),
        )?;

        let cache = Arc::new(DocumentCache::new());
        let store = Arc::new(DocumentStore::new());
        let router_paths = mount.router.paths();

        let resolvers = plan
            .instances
            .iter()
            .map(|instance| {
                let mut resolver = DocumentResolver::new(
                    instance.config.clone(),
                    router_paths.clone(),
                    mount.router.name.clone(),
                    cache.clone(),
                    store.clone(),
                );
                if let Some(scanner) = &components.scanner {
                    resolver = resolver.with_scanner(scanner.clone());
                }
                if config.query_tag_filter {
                    resolver = resolver.with_filter(Arc::new(TagQueryFilter::default()));
                }
                resolver.publish_base_document();
                Arc::new(resolver)
            })
            .collect();

        Ok(Self {
            config: Arc::new(config),
            plan: Arc::new(plan),
            resolvers,
            cache,
            store,
            authenticator: components.authenticator,
            access: components.access.unwrap_or_else(|| Arc::new(AllowAll)),
            started_at: Instant::now(),
        })
    }
}
