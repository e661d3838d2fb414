use std::fmt;
use std::str::FromStr;

use crate::{DocumentError, SpecificationDocument};

/// Wire format of the document endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Json, DocumentFormat::Yaml];

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentFormat::Json => "application/json",
            DocumentFormat::Yaml => "application/yaml",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DocumentFormat {
    type Err = DocumentError;

    /// Case-insensitive; surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("json") {
            Ok(DocumentFormat::Json)
        } else if trimmed.eq_ignore_ascii_case("yaml") {
            Ok(DocumentFormat::Yaml)
        } else {
            Err(DocumentError::UnsupportedFormat(s.to_string()))
        }
    }
}

/// Serialize a document in the requested format.
pub fn render(
    doc: &SpecificationDocument,
    format: DocumentFormat,
    pretty: bool,
) -> Result<String, DocumentError> {
    let body = match format {
        DocumentFormat::Json if pretty => serde_json::to_string_pretty(doc)?,
        DocumentFormat::Json => serde_json::to_string(doc)?,
        DocumentFormat::Yaml => serde_yaml::to_string(doc)?,
    };
    Ok(body)
}
