use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("empty pattern")]
    EmptyPattern,

    #[error("tree for '{tree_source}' was built from different text than the locator holds")]
    SourceMismatch { tree_source: String },

    #[error("pattern matched 0 locations")]
    NoMatch,

    #[error("metavariable '{name}' not found in match")]
    MetavarNotFound { name: String },
}
