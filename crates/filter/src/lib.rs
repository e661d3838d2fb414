//! # apimount visibility filter
//!
//! Decides which scanned operations make it into an instance's document.
//!
//! ## Rules
//!
//! - An empty allow-list retains every candidate; tag filtering is opt-in.
//! - Otherwise a candidate is retained iff its declaring-class tags intersect
//!   the allow-list **or** its method tags do. The two conditions are
//!   independent; neither has to hold on its own for the other to count.
//! - A retained candidate's path is
//!   `compose(normalize(class_path), normalize(method_path))`. Candidates
//!   whose path is empty, or that have no entry in the raw scanned path
//!   table, are dropped silently: abstract base resources and the like
//!   produce nothing externally visible.
//! - Output preserves first-seen input order.

use std::collections::BTreeSet;

use document::{PathItem, PathTable};
use paths::{compose, normalize, with_leading_slash};
use serde::{Deserialize, Serialize};

/// One scanned (resource, method) pair, as reported by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateOperation {
    /// Tags declared on the resource type.
    #[serde(default)]
    pub class_tags: BTreeSet<String>,

    /// Tags declared on the method itself.
    #[serde(default)]
    pub method_tags: BTreeSet<String>,

    /// Path template of the resource type.
    #[serde(default)]
    pub class_path: String,

    /// Path template of the method, relative to `class_path`.
    #[serde(default)]
    pub method_path: String,

    /// Lower-case HTTP method, the key inside the raw path item.
    pub method: String,
}

impl CandidateOperation {
    pub fn new(class_path: impl Into<String>, method_path: impl Into<String>, method: &str) -> Self {
        Self {
            class_path: class_path.into(),
            method_path: method_path.into(),
            method: method.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_class_tags<I: IntoIterator<Item = S>, S: Into<String>>(mut self, tags: I) -> Self {
        self.class_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_method_tags<I: IntoIterator<Item = S>, S: Into<String>>(mut self, tags: I) -> Self {
        self.method_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The composed operation path; empty when both templates are root.
    pub fn operation_path(&self) -> String {
        compose(
            &normalize(&with_leading_slash(&self.class_path)),
            &normalize(&with_leading_slash(&self.method_path)),
        )
    }
}

/// Whether a candidate passes the allow-list.
pub fn is_visible(candidate: &CandidateOperation, allow_tags: &BTreeSet<String>) -> bool {
    if allow_tags.is_empty() {
        return true;
    }
    let hit = |tags: &BTreeSet<String>| tags.iter().any(|t| allow_tags.contains(t));
    hit(&candidate.class_tags) || hit(&candidate.method_tags)
}

/// Candidates passing the allow-list, in input order.
pub fn retain<'a>(
    candidates: &'a [CandidateOperation],
    allow_tags: &BTreeSet<String>,
) -> Vec<&'a CandidateOperation> {
    candidates
        .iter()
        .filter(|c| is_visible(c, allow_tags))
        .collect()
}

/// Build the path table of the emitted document.
///
/// Retained candidates are looked up in `raw_paths` by composed path and
/// method. Operations sharing a path are merged into one path item; the path
/// keeps the position of its first retained candidate.
pub fn select_paths(
    candidates: &[CandidateOperation],
    allow_tags: &BTreeSet<String>,
    raw_paths: &PathTable,
) -> PathTable {
    let mut out = PathTable::new();
    let mut dropped = 0usize;

    for candidate in retain(candidates, allow_tags) {
        let path = candidate.operation_path();
        if path.is_empty() {
            dropped += 1;
            continue;
        }
        let Some(operation) = raw_paths
            .get(&path)
            .and_then(|item| item.get(&candidate.method))
        else {
            dropped += 1;
            continue;
        };
        out.entry(path)
            .or_insert_with(PathItem::new)
            .insert(candidate.method.clone(), operation.clone());
    }

    tracing::debug!(
        candidates = candidates.len(),
        retained_paths = out.len(),
        dropped,
        "applied visibility filter"
    );
    out
}

#[cfg(test)]
mod tests;
