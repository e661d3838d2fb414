//! The scanning capability and a registry-backed implementation.
//!
//! A [`Scanner`] enumerates the operations of a resource package. How it
//! finds them is its own business; the resolver only ever calls
//! [`Scanner::scan`]. [`RegistryScanner`] answers from a list of resource
//! descriptors registered in code or loaded from a YAML file:
//!
//! ```yaml
//! - package: com.example.api.users
//!   path: /users
//!   tags: [users]
//!   operations:
//!     - method: get
//!       operation_id: listUsers
//!       summary: List users
//!     - method: get
//!       path: /{id}
//!       operation_id: getUser
//!       tags: [admin]
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use document::{Operation, PathItem, PathTable};
use filter::CandidateOperation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read resource registry: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse resource registry: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("scan of '{package}' failed: {reason}")]
    Failed { package: String, reason: String },
}

/// What one scan of a resource package produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScannedApi {
    /// One entry per (resource, method) pair, in discovery order.
    pub candidates: Vec<CandidateOperation>,

    /// Raw operations by composed path, before visibility filtering.
    pub paths: PathTable,
}

/// Enumerates candidate operations for a resource package.
pub trait Scanner: Send + Sync {
    fn scan(&self, resource_package: &str) -> Result<ScannedApi, ScanError>;
}

/// A resource type and the operations it declares.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub package: String,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Abstract resources contribute candidates but no visible operations.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    #[serde(default)]
    pub operations: Vec<OperationDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub method: String,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub operation_id: Option<String>,

    /// Parameters, responses and other fields copied into the document as is.
    #[serde(default)]
    pub extra: IndexMap<String, Value>,
}

/// A [`Scanner`] over a fixed set of registered resources.
#[derive(Debug, Clone, Default)]
pub struct RegistryScanner {
    resources: Vec<ResourceDescriptor>,
}

impl RegistryScanner {
    pub fn new(resources: Vec<ResourceDescriptor>) -> Self {
        Self { resources }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ScanError> {
        Ok(Self::new(serde_yaml::from_str(yaml)?))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn register(&mut self, resource: ResourceDescriptor) {
        self.resources.push(resource);
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }
}

/// `package` equals `prefix` or lies below it.
fn in_package(package: &str, prefix: &str) -> bool {
    package == prefix
        || package
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.'))
}

impl Scanner for RegistryScanner {
    fn scan(&self, resource_package: &str) -> Result<ScannedApi, ScanError> {
        let prefixes: Vec<&str> = resource_package
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let mut scanned = ScannedApi::default();
        let matching = self
            .resources
            .iter()
            .filter(|r| prefixes.iter().any(|p| in_package(&r.package, p)));

        for resource in matching {
            for op in &resource.operations {
                let candidate = CandidateOperation {
                    class_tags: resource.tags.clone(),
                    method_tags: op.tags.clone(),
                    class_path: resource.path.clone(),
                    method_path: op.path.clone(),
                    method: op.method.to_ascii_lowercase(),
                };

                let path = candidate.operation_path();
                if !resource.is_abstract && !path.is_empty() {
                    let operation = Operation {
                        tags: resource.tags.union(&op.tags).cloned().collect(),
                        summary: op.summary.clone(),
                        description: op.description.clone(),
                        operation_id: op.operation_id.clone(),
                        extra: op.extra.clone(),
                    };
                    scanned
                        .paths
                        .entry(path)
                        .or_insert_with(PathItem::new)
                        .insert(candidate.method.clone(), operation);
                }
                scanned.candidates.push(candidate);
            }
        }

        tracing::debug!(
            package = resource_package,
            candidates = scanned.candidates.len(),
            paths = scanned.paths.len(),
            "registry scan complete"
        );
        Ok(scanned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const REGISTRY: &str = r#"
- package: com.example.api.users
  path: /users
  tags: [users]
  operations:
    - method: GET
      operation_id: listUsers
    - method: get
      path: /{id}
      operation_id: getUser
      tags: [admin]
- package: com.example.api.base
  path: /base
  abstract: true
  operations:
    - method: get
      operation_id: baseGet
- package: com.example.apiother
  path: /other
  operations:
    - method: get
- package: com.other
  path: /elsewhere
  operations:
    - method: get
"#;

    #[test]
    fn scans_only_matching_packages() {
        let scanner = RegistryScanner::from_yaml(REGISTRY).unwrap();
        let scanned = scanner.scan("com.example.api").unwrap();

        let classes: Vec<_> = scanned.candidates.iter().map(|c| c.class_path.as_str()).collect();
        assert_eq!(classes, vec!["/users", "/users", "/base"]);
        let paths: Vec<_> = scanned.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["/users", "/users/{id}"]);
    }

    #[test]
    fn multiple_packages_are_comma_separated() {
        let scanner = RegistryScanner::from_yaml(REGISTRY).unwrap();
        let scanned = scanner.scan("com.other, com.example.apiother").unwrap();
        assert_eq!(scanned.candidates.len(), 2);
        assert!(scanned.paths.contains_key("/elsewhere"));
        assert!(scanned.paths.contains_key("/other"));
    }

    #[test]
    fn operation_tags_merge_class_and_method_tags() {
        let scanner = RegistryScanner::from_yaml(REGISTRY).unwrap();
        let scanned = scanner.scan("com.example.api.users").unwrap();
        let op = &scanned.paths["/users/{id}"]["get"];
        assert_eq!(op.tags, vec!["admin".to_string(), "users".to_string()]);
        assert_eq!(scanned.candidates[0].method, "get");
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(REGISTRY.as_bytes()).unwrap();
        let scanner = RegistryScanner::from_file(file.path()).unwrap();
        assert_eq!(scanner.resources().len(), 4);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = RegistryScanner::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ScanError::Io(_)));
    }
}
