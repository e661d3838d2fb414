use thiserror::Error;

use crate::scanner::ScanError;
use crate::spec_filter::FilterError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("filter '{filter}' failed: {source}")]
    Filter {
        filter: String,
        #[source]
        source: FilterError,
    },
}
