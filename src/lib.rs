//! Tree Interval: interval-indexed syntax trees for Python source.
//!
//! Every node of a parsed module is stored with its source interval, so
//! callers can ask which node occupies or encloses a byte range, or which
//! node is executing at a runtime `(file, line, column)` point.
//!
//! # Architecture
//!
//! [`TreeIndex`] is a generic arena of [`Position`]-tagged nodes with
//! containment-preserving insertion and best-match search. The
//! [`ts::SyntaxTreeBuilder`] fills one from tree-sitter's Python grammar;
//! [`resolve::ExecutionPositionResolver`] maps execution probes onto it and
//! [`sg::PatternLocator`] maps ast-grep patterns onto it.
//!
//! # Example
//!
//! ```no_run
//! use tree_interval::ts::SyntaxTreeBuilder;
//! use tree_interval::statement;
//!
//! let source = "total = order.items.count()\n";
//! let tree = SyntaxTreeBuilder::new("order.py", source).build()?;
//!
//! let start = source.find("items").unwrap();
//! let node = tree.find_best_match(start, start + 5).unwrap();
//! println!("{}", statement::statement(&tree, node).unwrap());
//! # Ok::<(), tree_interval::ParseError>(())
//! ```

pub mod cache;
pub mod config;
pub mod info;
pub mod pool;
pub mod position;
pub mod resolve;
pub mod sg;
pub mod statement;
pub mod tree;
pub mod ts;

// Re-exports
pub use config::{load_from_path, load_from_str, ConfigError, Settings, TreeConfig};
pub use info::PathError;
pub use position::Position;
pub use resolve::{ExecutionPositionResolver, Probe, Resolution, ResolveError};
pub use sg::{PatternError, PatternLocator};
pub use statement::{Markers, Statement};
pub use tree::{Node, NodeId, TreeError, TreeIndex};
pub use ts::{ParseError, SyntaxInfo, SyntaxTreeBuilder};
