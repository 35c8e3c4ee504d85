//! Tree-sitter integration: parsing Python source into interval trees.
//!
//! The grammar is taken from `ast-grep-language` so parsing and pattern
//! matching agree on node kinds and byte spans.

pub mod builder;
pub mod errors;
pub mod kinds;
pub mod parser;
pub mod validator;

pub use builder::{SyntaxInfo, SyntaxTreeBuilder};
pub use errors::ParseError;
pub use parser::{ErrorNode, ParsedSource, PythonParser};
pub use validator::validate_syntax;
