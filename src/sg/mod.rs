//! ast-grep integration: mapping structural Python patterns onto tree nodes.
//!
//! Patterns use ast-grep's metavariable syntax (`$NAME`, `$$$ARGS`, `$_`).

pub mod errors;
pub mod lang;
pub mod locator;

pub use errors::PatternError;
pub use lang::{python, SupportLang};
pub use locator::{PatternHit, PatternLocator};
