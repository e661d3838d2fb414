//! Per-instance configuration.
//!
//! One [`InstanceConfig`] describes one mounted API description instance. It
//! is loaded once from the host application's configuration and never
//! mutated afterwards. Unknown fields are ignored so a host can keep its own
//! keys next to ours.
//!
//! ```yaml
//! resource_package: com.example.api,com.example.admin
//! title: Example API
//! version: "2.1"
//! host: https://api.example.com
//! uri_prefix: /v2
//! allow_list_tags: [public]
//! security_definitions:
//!   - name: oauth
//!     type: oauth2
//!     flow: implicit
//!     authorization_url: https://auth.example.com/authorize
//! ```

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration of one mounted API description instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Comma separated package prefixes the scanner searches. Required.
    #[serde(default)]
    pub resource_package: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub contact: Option<String>,

    #[serde(default)]
    pub license: Option<String>,

    #[serde(default)]
    pub license_url: Option<String>,

    #[serde(default)]
    pub terms_of_service_url: Option<String>,

    /// Host advertised in the document; may carry an `http://` or `https://`
    /// prefix which is turned into the document's scheme.
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_uri_prefix")]
    pub uri_prefix: String,

    /// Operations are only listed when they carry one of these tags. Empty
    /// disables filtering.
    #[serde(default, alias = "api_listing_filters")]
    pub allow_list_tags: BTreeSet<String>,

    #[serde(default)]
    pub security_definitions: Vec<SecurityDefinitionConfig>,

    /// Explicit scanner id; highest-precedence cache key source.
    #[serde(default)]
    pub scanner_id: Option<String>,

    /// Explicit config id; used when no scanner id is set.
    #[serde(default)]
    pub config_id: Option<String>,

    /// Key the cache by the instance's base path when no explicit id is set.
    #[serde(default = "default_true")]
    pub use_path_based_config: bool,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty_print: bool,
}

impl InstanceConfig {
    /// A configuration with the given resource package and every other field
    /// at its default.
    pub fn new(resource_package: impl Into<String>) -> Self {
        Self {
            resource_package: resource_package.into(),
            title: None,
            version: None,
            description: None,
            contact: None,
            license: None,
            license_url: None,
            terms_of_service_url: None,
            host: None,
            uri_prefix: default_uri_prefix(),
            allow_list_tags: BTreeSet::new(),
            security_definitions: Vec::new(),
            scanner_id: None,
            config_id: None,
            use_path_based_config: true,
            pretty_print: true,
        }
    }

    pub fn with_uri_prefix(mut self, uri_prefix: impl Into<String>) -> Self {
        self.uri_prefix = uri_prefix.into();
        self
    }

    pub fn with_allow_list_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Individual package prefixes, trimmed, empties dropped.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.resource_package
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// A named authentication scheme advertised by the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityDefinitionConfig {
    pub name: String,

    #[serde(flatten)]
    pub scheme: SecuritySchemeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SecuritySchemeConfig {
    Basic {
        #[serde(default)]
        description: Option<String>,
    },
    ApiKey {
        /// Header or query parameter name carrying the key.
        key_name: String,
        #[serde(rename = "in")]
        location: ApiKeyLocation,
    },
    Oauth2 {
        flow: String,
        #[serde(default)]
        authorization_url: Option<String>,
        #[serde(default)]
        token_url: Option<String>,
        #[serde(default)]
        scopes: IndexMap<String, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Header,
    Query,
}

fn default_uri_prefix() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}
