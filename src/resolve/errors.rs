use crate::ts::ParseError;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("failed to load source '{source_id}': {source}")]
    Source {
        source_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("source '{source_id}' is not known to the loader")]
    UnknownSource { source_id: String },

    #[error("failed to build tree for '{source_id}': {source}")]
    Parse {
        source_id: String,
        #[source]
        source: ParseError,
    },
}

impl ResolveError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ResolveError::Source {
            source_id: path.display().to_string(),
            source,
        }
    }
}
