//! Startup planning: turn the configured instances into the list of routes
//! to register.
//!
//! The planner does no I/O and touches no router. It validates the instance
//! list as a whole and returns a [`RegistrationPlan`] the HTTP layer walks.

use std::collections::HashMap;
use std::sync::Arc;

use cache::{CacheKey, KeyFamily};
use document::{DocumentFormat, InstanceConfig};
use paths::{InstancePaths, PathContext, compose};
use resolver::instance_cache_key;
use thiserror::Error;

use crate::config::RouterConfig;

/// Placeholder in a document listing path that stands for the format.
pub const FORMAT_PLACEHOLDER: &str = "{type:json|yaml}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("no instances configured")]
    NoInstances,

    #[error("instance {index} has no resource package")]
    MissingResourcePackage { index: usize },

    #[error("instances {first} and {second} share the instance name '{name}'")]
    DuplicateInstanceName {
        name: String,
        first: usize,
        second: usize,
    },

    #[error(
        "instance {index} uses {found:?} cache keys but earlier instances use {expected:?}; \
         every instance on a router must use the same key strategy"
    )]
    MixedKeyStrategies {
        index: usize,
        expected: KeyFamily,
        found: KeyFamily,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    StaticAssets,
    DocumentListing,
    Viewer,
    Login,
}

/// One route to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub kind: RouteKind,

    /// Index into [`RegistrationPlan::instances`]; `None` for the login route.
    pub instance: Option<usize>,

    /// Path relative to what the route is mounted under.
    pub path: String,

    /// Path the route is served at.
    pub absolute_path: String,
}

impl RouteDescriptor {
    /// Concrete paths of a document listing route, one per format.
    /// Other route kinds yield nothing.
    pub fn listing_paths(&self) -> Vec<(DocumentFormat, String)> {
        if self.kind != RouteKind::DocumentListing {
            return Vec::new();
        }
        DocumentFormat::ALL
            .iter()
            .map(|format| {
                (
                    *format,
                    self.absolute_path
                        .replace(FORMAT_PLACEHOLDER, format.extension()),
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PlannedInstance {
    pub config: Arc<InstanceConfig>,
    pub paths: InstancePaths,
    pub cache_key: CacheKey,
}

#[derive(Debug, Clone)]
pub struct RegistrationPlan {
    pub router: RouterConfig,
    pub instances: Vec<PlannedInstance>,
    pub routes: Vec<RouteDescriptor>,
}

impl RegistrationPlan {
    pub fn routes_for(&self, instance: usize) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes
            .iter()
            .filter(move |r| r.instance == Some(instance))
    }

    pub fn login_route(&self) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.kind == RouteKind::Login)
    }
}

/// Validate `instances` and lay out their routes.
///
/// Per instance, in order: static assets, document listing, viewer page.
/// The login route comes last and only when `with_login` is set.
pub fn plan(
    instances: &[InstanceConfig],
    router: &RouterConfig,
    with_login: bool,
) -> Result<RegistrationPlan, PlanError> {
    if instances.is_empty() {
        return Err(PlanError::NoInstances);
    }

    let router_paths = router.paths();
    let mut names: HashMap<String, usize> = HashMap::new();
    let mut family: Option<KeyFamily> = None;
    let mut planned = Vec::with_capacity(instances.len());
    let mut routes = Vec::with_capacity(instances.len() * 3 + 1);

    for (index, config) in instances.iter().enumerate() {
        if config.packages().next().is_none() {
            return Err(PlanError::MissingResourcePackage { index });
        }

        let ctx = PathContext::new(&router_paths, &config.uri_prefix);
        let layout = ctx.derive();

        if let Some(&first) = names.get(&layout.instance_name) {
            return Err(PlanError::DuplicateInstanceName {
                name: layout.instance_name,
                first,
                second: index,
            });
        }
        names.insert(layout.instance_name.clone(), index);

        let cache_key = instance_cache_key(config, &ctx, &router.name);
        let found = cache_key.strategy().family();
        match family {
            None => family = Some(found),
            Some(expected) if expected != found => {
                return Err(PlanError::MixedKeyStrategies {
                    index,
                    expected,
                    found,
                });
            }
            Some(_) => {}
        }

        routes.push(RouteDescriptor {
            kind: RouteKind::StaticAssets,
            instance: Some(index),
            path: layout.document_uri_path.clone(),
            absolute_path: compose(
                &router_paths.application_context_path,
                &layout.document_uri_path,
            ),
        });
        routes.push(RouteDescriptor {
            kind: RouteKind::DocumentListing,
            instance: Some(index),
            path: layout.document_listing_path.clone(),
            absolute_path: compose(&layout.base_url, &layout.document_listing_path),
        });
        routes.push(RouteDescriptor {
            kind: RouteKind::Viewer,
            instance: Some(index),
            path: layout.html_resource_path.clone(),
            absolute_path: compose(&layout.base_url, &layout.html_resource_path),
        });

        tracing::debug!(
            index,
            instance = %layout.instance_name,
            key = %cache_key,
            "planned instance"
        );
        planned.push(PlannedInstance {
            config: Arc::new(config.clone()),
            paths: layout,
            cache_key,
        });
    }

    if with_login {
        let login_path = router_paths.login_path();
        routes.push(RouteDescriptor {
            kind: RouteKind::Login,
            instance: None,
            path: login_path.clone(),
            absolute_path: login_path,
        });
    }

    tracing::info!(
        instances = planned.len(),
        routes = routes.len(),
        "registration plan ready"
    );

    Ok(RegistrationPlan {
        router: router.clone(),
        instances: planned,
        routes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cache::KeyStrategy;

    fn router(root: &str) -> RouterConfig {
        RouterConfig {
            root_path: root.to_string(),
            ..RouterConfig::default()
        }
    }

    fn instance(prefix: &str) -> InstanceConfig {
        InstanceConfig::new("com.example.api").with_uri_prefix(prefix)
    }

    #[test]
    fn routes_follow_instance_order() {
        let plan = plan(&[instance("/v1"), instance("/v2")], &router("/"), false).unwrap();
        let kinds: Vec<_> = plan.routes.iter().map(|r| (r.kind, r.instance)).collect();
        assert_eq!(
            kinds,
            vec![
                (RouteKind::StaticAssets, Some(0)),
                (RouteKind::DocumentListing, Some(0)),
                (RouteKind::Viewer, Some(0)),
                (RouteKind::StaticAssets, Some(1)),
                (RouteKind::DocumentListing, Some(1)),
                (RouteKind::Viewer, Some(1)),
            ]
        );
        assert!(plan.login_route().is_none());
    }

    #[test]
    fn absolute_paths_under_root_path() {
        let plan = plan(&[instance("/v2")], &router("/api"), true).unwrap();
        let paths: Vec<_> = plan
            .routes
            .iter()
            .map(|r| (r.path.as_str(), r.absolute_path.as_str()))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("/api/v2/swagger-ui", "/api/v2/swagger-ui"),
                ("/v2/swagger.{type:json|yaml}", "/api/v2/swagger.{type:json|yaml}"),
                ("/v2/swagger", "/api/v2/swagger"),
                ("/api/swagger-login", "/api/swagger-login"),
            ]
        );
        assert_eq!(plan.instances[0].paths.instance_name, "swagger/api/v2");
    }

    #[test]
    fn assets_sit_under_the_application_context() {
        let router = RouterConfig {
            application_context_path: "/app".into(),
            root_path: "/api".into(),
            ..RouterConfig::default()
        };
        let plan = plan(&[instance("/")], &router, false).unwrap();
        assert_eq!(plan.routes[0].absolute_path, "/app/api/swagger-ui");
        assert_eq!(plan.routes[2].absolute_path, "/app/api/swagger");
    }

    #[test]
    fn listing_paths_expand_per_format() {
        let plan = plan(&[instance("/v2")], &router("/"), false).unwrap();
        let listing = plan.routes_for(0).find(|r| r.kind == RouteKind::DocumentListing).unwrap();
        let expanded: Vec<_> = listing.listing_paths().into_iter().map(|(_, p)| p).collect();
        assert_eq!(expanded, vec!["/v2/swagger.json", "/v2/swagger.yaml"]);
        assert!(plan.routes[0].listing_paths().is_empty());
    }

    #[test]
    fn distinct_prefixes_get_distinct_keys() {
        let plan = plan(&[instance("/v1"), instance("/v2")], &router("/"), false).unwrap();
        assert_eq!(plan.instances[0].cache_key.as_str(), "api_/v1");
        assert_eq!(plan.instances[1].cache_key.as_str(), "api_/v2");
        assert_eq!(plan.instances[0].cache_key.strategy(), KeyStrategy::BasePath);
    }

    #[test]
    fn rejects_empty_list() {
        assert_eq!(plan(&[], &router("/"), false).unwrap_err(), PlanError::NoInstances);
    }

    #[test]
    fn rejects_blank_package() {
        let err = plan(&[instance("/v1"), InstanceConfig::new("  ")], &router("/"), false).unwrap_err();
        assert_eq!(err, PlanError::MissingResourcePackage { index: 1 });
    }

    #[test]
    fn rejects_duplicate_instance_names() {
        // "/v1/" and "/v1" normalize to the same view path.
        let err = plan(&[instance("/v1"), instance("/v1/")], &router("/"), false).unwrap_err();
        assert_eq!(
            err,
            PlanError::DuplicateInstanceName {
                name: "swagger/v1".into(),
                first: 0,
                second: 1,
            }
        );
    }

    #[test]
    fn rejects_mixed_key_strategies() {
        let mut with_id = instance("/v2");
        with_id.scanner_id = Some("shared".into());
        let err = plan(&[instance("/v1"), with_id], &router("/"), false).unwrap_err();
        assert_eq!(
            err,
            PlanError::MixedKeyStrategies {
                index: 1,
                expected: KeyFamily::Derived,
                found: KeyFamily::ScannerId,
            }
        );
    }

    #[test]
    fn base_path_and_default_keys_mix() {
        let mut root = instance("/");
        root.use_path_based_config = false;
        let plan = plan(&[root, instance("/v2")], &router("/"), false).unwrap();
        assert_eq!(plan.instances[0].cache_key.strategy(), KeyStrategy::Default);
        assert_eq!(plan.instances[1].cache_key.strategy(), KeyStrategy::BasePath);
    }
}
