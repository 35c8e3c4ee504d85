use crate::resolve::errors::ResolveError;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Supplies source text for a source identifier.
pub trait SourceLoader {
    fn load(&self, source_id: &str) -> Result<String, ResolveError>;
}

/// Reads sources from the filesystem, relative to an optional base directory.
#[derive(Debug, Clone, Default)]
pub struct FsSourceLoader {
    base: Option<PathBuf>,
}

impl FsSourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    fn path_for(&self, source_id: &str) -> PathBuf {
        match &self.base {
            Some(base) => base.join(source_id),
            None => PathBuf::from(source_id),
        }
    }
}

impl SourceLoader for FsSourceLoader {
    fn load(&self, source_id: &str) -> Result<String, ResolveError> {
        let path = self.path_for(source_id);
        fs::read_to_string(&path).map_err(|source| ResolveError::io(&path, source))
    }
}

/// In-memory sources keyed by identifier.
impl SourceLoader for HashMap<String, String> {
    fn load(&self, source_id: &str) -> Result<String, ResolveError> {
        self.get(source_id)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownSource {
                source_id: source_id.to_string(),
            })
    }
}
