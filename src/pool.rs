//! Thread-local parser pooling.
//!
//! Creates a parser on first use per thread and reuses it for every later
//! build on that thread.

use crate::ts::{ParseError, PythonParser};
use std::cell::RefCell;

thread_local! {
    static PYTHON_PARSER: RefCell<Option<PythonParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use tree_interval::pool::with_parser;
///
/// let tree = with_parser(|parser| parser.parse("x = 1"))??;
/// assert_eq!(tree.root_node().kind(), "module");
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, ParseError>
where
    F: FnOnce(&mut PythonParser) -> R,
{
    PYTHON_PARSER.with(|cell| {
        let mut opt = cell.borrow_mut();
        let parser = match opt.as_mut() {
            Some(parser) => parser,
            None => opt.insert(PythonParser::new()?),
        };
        Ok(f(parser))
    })
}
