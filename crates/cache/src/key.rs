//! Cache key derivation.
//!
//! A key is produced by the first derivation in [`DERIVATIONS`] that yields
//! an id. The list is the whole precedence policy; there is no other branch.

use std::fmt;

use serde::Serialize;

/// Id used when no other derivation applies.
pub const DEFAULT_KEY_ID: &str = "default";

/// Which derivation produced a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStrategy {
    ScannerId,
    ConfigId,
    BasePath,
    Default,
}

/// Key spaces. Instances sharing a router must all use the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyFamily {
    ScannerId,
    ConfigId,
    /// Base-path keys and the default key.
    Derived,
}

impl KeyStrategy {
    pub fn family(self) -> KeyFamily {
        match self {
            KeyStrategy::ScannerId => KeyFamily::ScannerId,
            KeyStrategy::ConfigId => KeyFamily::ConfigId,
            KeyStrategy::BasePath | KeyStrategy::Default => KeyFamily::Derived,
        }
    }
}

/// Inputs of key derivation for one instance.
#[derive(Debug, Clone, Copy)]
pub struct KeySource<'a> {
    /// Disambiguates routers sharing one cache.
    pub router_name: &'a str,
    pub scanner_id: Option<&'a str>,
    pub config_id: Option<&'a str>,
    pub use_path_based_config: bool,
    /// Normalized base path of the instance.
    pub base_path: &'a str,
}

type Derivation = fn(&KeySource<'_>) -> Option<String>;

/// Key derivations in precedence order.
pub const DERIVATIONS: [(KeyStrategy, Derivation); 4] = [
    (KeyStrategy::ScannerId, from_scanner_id),
    (KeyStrategy::ConfigId, from_config_id),
    (KeyStrategy::BasePath, from_base_path),
    (KeyStrategy::Default, from_default),
];

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn from_scanner_id(src: &KeySource<'_>) -> Option<String> {
    non_blank(src.scanner_id)
}

fn from_config_id(src: &KeySource<'_>) -> Option<String> {
    non_blank(src.config_id)
}

fn from_base_path(src: &KeySource<'_>) -> Option<String> {
    if !src.use_path_based_config {
        return None;
    }
    non_blank(Some(src.base_path))
}

fn from_default(_: &KeySource<'_>) -> Option<String> {
    Some(DEFAULT_KEY_ID.to_string())
}

/// Identifies one instance's scanned state within a cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    strategy: KeyStrategy,
    value: String,
}

impl CacheKey {
    pub fn new(router_name: &str, strategy: KeyStrategy, id: &str) -> Self {
        Self {
            strategy,
            value: format!("{router_name}_{id}"),
        }
    }

    pub fn strategy(&self) -> KeyStrategy {
        self.strategy
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Run the derivations in order and return the first key produced.
pub fn derive_key(src: &KeySource<'_>) -> CacheKey {
    DERIVATIONS
        .iter()
        .find_map(|(strategy, derive)| derive(src).map(|id| (*strategy, id)))
        .map(|(strategy, id)| CacheKey::new(src.router_name, strategy, &id))
        .unwrap_or_else(|| CacheKey::new(src.router_name, KeyStrategy::Default, DEFAULT_KEY_ID))
}
