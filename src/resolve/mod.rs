//! Mapping runtime execution points back to syntax nodes.
//!
//! A [`Probe`] names a source, a line and optionally a column. The
//! [`ExecutionPositionResolver`] loads the source through a
//! [`SourceLoader`], builds (or reuses) its tree, and returns the innermost
//! node covering the point. "No node" is an ordinary `Ok(None)`.

pub mod cache;
pub mod errors;
pub mod lines;
pub mod loader;
pub mod resolver;

pub use cache::{CachedTree, TreeCache};
pub use errors::ResolveError;
pub use lines::LineIndex;
pub use loader::{FsSourceLoader, SourceLoader};
pub use resolver::{resolve_point, ExecutionPositionResolver, Probe, Resolution};
