use serde::{Deserialize, Serialize};

/// Transfer scheme advertised by a description document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    fn prefix(self) -> &'static str {
        match self {
            Scheme::Http => "http://",
            Scheme::Https => "https://",
        }
    }
}

/// A configured host split into the bare host and its inferred schemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec {
    pub host: String,
    pub schemes: Vec<Scheme>,
}

/// Split a configured host string.
///
/// A leading `http://` or `https://` becomes the single scheme and is removed
/// from the host. Anything else is kept verbatim with no scheme inferred.
///
/// ```
/// use paths::{split_host, Scheme};
///
/// let parsed = split_host("https://api.example.com");
/// assert_eq!(parsed.host, "api.example.com");
/// assert_eq!(parsed.schemes, vec![Scheme::Https]);
/// ```
pub fn split_host(configured: &str) -> HostSpec {
    for scheme in [Scheme::Https, Scheme::Http] {
        if let Some(rest) = configured.strip_prefix(scheme.prefix()) {
            return HostSpec {
                host: rest.to_string(),
                schemes: vec![scheme],
            };
        }
    }
    HostSpec {
        host: configured.to_string(),
        schemes: Vec::new(),
    }
}
