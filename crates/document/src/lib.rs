//! # apimount document model
//!
//! This crate holds the two data types every other apimount crate passes
//! around:
//!
//! - [`InstanceConfig`], the immutable configuration of one mounted API
//!   description instance;
//! - [`SpecificationDocument`], the Swagger 2.0 document served for it.
//!
//! [`base_document`] turns the former into the metadata skeleton of the
//! latter (info block, host, schemes, base path, security definitions).
//! Operations are added later by the resolver once a scan has run.
//! [`render`] serializes a document as JSON or YAML.
//!
//! ```
//! use document::{base_document, InstanceConfig};
//!
//! let mut config = InstanceConfig::new("com.example.api").with_title("Example");
//! config.host = Some("https://api.example.com".into());
//!
//! let doc = base_document(&config, "/app");
//! assert_eq!(doc.info.title.as_deref(), Some("Example"));
//! assert_eq!(doc.host.as_deref(), Some("api.example.com"));
//! assert_eq!(doc.base_path.as_deref(), Some("/app"));
//! ```

pub mod config;
pub mod render;
pub mod types;

pub use config::{ApiKeyLocation, InstanceConfig, SecurityDefinitionConfig, SecuritySchemeConfig};
pub use render::{DocumentFormat, render};
pub use types::{
    Contact, Info, License, Operation, PathItem, PathTable, SecurityScheme, SpecificationDocument,
};

use paths::split_host;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Build the metadata skeleton of an instance's document.
///
/// `base_url` is the router base URL the operations are relative to; an
/// empty base URL is advertised as `/`.
pub fn base_document(config: &InstanceConfig, base_url: &str) -> SpecificationDocument {
    let mut doc = SpecificationDocument::empty();

    doc.info = Info {
        title: config.title.clone(),
        version: config.version.clone(),
        description: config.description.clone(),
        terms_of_service: config.terms_of_service_url.clone(),
        contact: config.contact.clone().map(|name| Contact { name }),
        license: license(config),
    };

    if let Some(host) = config.host.as_deref() {
        let parsed = split_host(host);
        doc.host = Some(parsed.host);
        doc.schemes = parsed.schemes;
    }

    doc.base_path = Some(if base_url.is_empty() {
        "/".to_string()
    } else {
        base_url.to_string()
    });

    for definition in &config.security_definitions {
        doc.security_definitions
            .insert(definition.name.clone(), security_scheme(&definition.scheme));
    }

    doc
}

fn license(config: &InstanceConfig) -> Option<License> {
    if config.license.is_none() && config.license_url.is_none() {
        return None;
    }
    Some(License {
        name: config.license.clone(),
        url: config.license_url.clone(),
    })
}

fn security_scheme(cfg: &SecuritySchemeConfig) -> SecurityScheme {
    match cfg {
        SecuritySchemeConfig::Basic { description } => SecurityScheme::Basic {
            description: description.clone(),
        },
        SecuritySchemeConfig::ApiKey { key_name, location } => SecurityScheme::ApiKey {
            name: key_name.clone(),
            location: match location {
                ApiKeyLocation::Header => "header".to_string(),
                ApiKeyLocation::Query => "query".to_string(),
            },
        },
        SecuritySchemeConfig::Oauth2 {
            flow,
            authorization_url,
            token_url,
            scopes,
        } => SecurityScheme::OAuth2 {
            flow: flow.clone(),
            authorization_url: authorization_url.clone(),
            token_url: token_url.clone(),
            scopes: scopes.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paths::Scheme;

    #[test]
    fn metadata_is_mirrored() {
        let mut cfg = InstanceConfig::new("p").with_title("T");
        cfg.version = Some("1.0".into());
        cfg.description = Some("D".into());
        cfg.contact = Some("ops@example.com".into());
        cfg.license = Some("Apache-2.0".into());
        cfg.terms_of_service_url = Some("https://example.com/tos".into());

        let doc = base_document(&cfg, "");
        assert_eq!(doc.info.version.as_deref(), Some("1.0"));
        assert_eq!(doc.info.contact.as_ref().unwrap().name, "ops@example.com");
        assert_eq!(doc.info.license.as_ref().unwrap().name.as_deref(), Some("Apache-2.0"));
        assert_eq!(doc.info.terms_of_service.as_deref(), Some("https://example.com/tos"));
        assert_eq!(doc.base_path.as_deref(), Some("/"));
        assert!(doc.paths.is_empty());
    }

    #[test]
    fn host_without_scheme_infers_none() {
        let mut cfg = InstanceConfig::new("p");
        cfg.host = Some("localhost:8080".into());
        let doc = base_document(&cfg, "/api");
        assert_eq!(doc.host.as_deref(), Some("localhost:8080"));
        assert!(doc.schemes.is_empty());
    }

    #[test]
    fn host_with_scheme_is_split() {
        let mut cfg = InstanceConfig::new("p");
        cfg.host = Some("http://localhost:8080".into());
        let doc = base_document(&cfg, "/api");
        assert_eq!(doc.schemes, vec![Scheme::Http]);
    }

    #[test]
    fn security_definitions_keep_order_and_wire_names() {
        let yaml = r#"
resource_package: p
security_definitions:
  - name: key
    type: api_key
    key_name: X-Api-Key
    in: query
  - name: oauth
    type: oauth2
    flow: password
    token_url: https://auth.example.com/token
"#;
        let cfg: InstanceConfig = serde_yaml::from_str(yaml).unwrap();
        let doc = base_document(&cfg, "");
        let names: Vec<_> = doc.security_definitions.keys().cloned().collect();
        assert_eq!(names, vec!["key", "oauth"]);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["securityDefinitions"]["key"]["type"], "apiKey");
        assert_eq!(json["securityDefinitions"]["key"]["in"], "query");
        assert_eq!(json["securityDefinitions"]["oauth"]["type"], "oauth2");
        assert_eq!(
            json["securityDefinitions"]["oauth"]["tokenUrl"],
            "https://auth.example.com/token"
        );
    }
}
