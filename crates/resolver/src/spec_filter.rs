//! Post-processing filters applied to a resolved document per request.

use std::collections::{BTreeSet, HashMap};

use document::SpecificationDocument;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("{0}")]
    Failed(String),
}

/// Transport-level request data a filter may look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub query: HashMap<String, Vec<String>>,
    pub headers: HashMap<String, Vec<String>>,
    pub cookies: HashMap<String, String>,
}

impl RequestContext {
    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn query_values(&self, name: &str) -> &[String] {
        self.query.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

/// One step of the post-processing chain.
///
/// Filters receive the document by value and return the (possibly redacted)
/// document to hand to the next step.
pub trait SpecFilter: Send + Sync {
    fn name(&self) -> &str;

    fn apply(
        &self,
        document: SpecificationDocument,
        request: &RequestContext,
    ) -> Result<SpecificationDocument, FilterError>;
}

/// Keeps only operations carrying one of the tags listed in a query
/// parameter (`?tags=a,b`, repeatable). Without the parameter the document
/// passes through unchanged.
#[derive(Debug, Clone)]
pub struct TagQueryFilter {
    parameter: String,
}

impl TagQueryFilter {
    pub fn new(parameter: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
        }
    }
}

impl Default for TagQueryFilter {
    fn default() -> Self {
        Self::new("tags")
    }
}

impl SpecFilter for TagQueryFilter {
    fn name(&self) -> &str {
        "tag-query"
    }

    fn apply(
        &self,
        mut document: SpecificationDocument,
        request: &RequestContext,
    ) -> Result<SpecificationDocument, FilterError> {
        let wanted: BTreeSet<&str> = request
            .query_values(&self.parameter)
            .iter()
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if wanted.is_empty() {
            return Ok(document);
        }

        for item in document.paths.values_mut() {
            item.retain(|_, op| op.tags.iter().any(|t| wanted.contains(t.as_str())));
        }
        document.paths.retain(|_, item| !item.is_empty());
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use document::{Operation, PathItem};

    fn tagged(tags: &[&str]) -> Operation {
        Operation {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn doc() -> SpecificationDocument {
        let mut doc = SpecificationDocument::empty();
        let mut users = PathItem::new();
        users.insert("get".into(), tagged(&["users"]));
        users.insert("delete".into(), tagged(&["admin"]));
        doc.paths.insert("/users".into(), users);
        let mut admin = PathItem::new();
        admin.insert("get".into(), tagged(&["admin"]));
        doc.paths.insert("/admin".into(), admin);
        doc
    }

    #[test]
    fn passes_through_without_parameter() {
        let out = TagQueryFilter::default()
            .apply(doc(), &RequestContext::default())
            .unwrap();
        assert_eq!(out, doc());
    }

    #[test]
    fn keeps_matching_operations_and_drops_empty_paths() {
        let request = RequestContext::default().with_query("tags", "users");
        let out = TagQueryFilter::default().apply(doc(), &request).unwrap();
        assert_eq!(out.operation_count(), 1);
        assert!(out.paths.contains_key("/users"));
        assert!(!out.paths.contains_key("/admin"));
    }

    #[test]
    fn comma_and_repeated_values_combine() {
        let request = RequestContext::default()
            .with_query("tags", "users, nothing")
            .with_query("tags", "admin");
        let out = TagQueryFilter::default().apply(doc(), &request).unwrap();
        assert_eq!(out.operation_count(), 3);
    }
}
