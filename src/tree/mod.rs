//! Interval-indexed tree storage and queries.
//!
//! Nodes live in an arena owned by [`TreeIndex`]; parent links are plain
//! [`NodeId`]s, so dropping the index releases the whole graph at once.

pub mod errors;
pub mod index;
pub mod node;
pub mod schema;

pub use errors::TreeError;
pub use index::{Ancestors, Descendants, TreeIndex};
pub use node::{Node, NodeId};
