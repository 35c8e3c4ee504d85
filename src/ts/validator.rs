use crate::pool::with_parser;
use crate::ts::errors::ParseError;
use crate::ts::parser::ParsedSource;

/// Reject a parse that contains ERROR or MISSING nodes.
pub fn check_parsed(parsed: &ParsedSource<'_>) -> Result<(), ParseError> {
    let errors = parsed.error_nodes();
    match errors.as_slice() {
        [] => Ok(()),
        [only] => Err(ParseError::Syntax {
            byte_start: only.byte_start,
            byte_end: only.byte_end,
            line: only.start_point.row + 1,
            column: only.start_point.column,
        }),
        [first, ..] => Err(ParseError::MultipleSyntaxErrors {
            count: errors.len(),
            first_line: first.start_point.row + 1,
        }),
    }
}

/// Validate that Python source code has no syntax errors.
pub fn validate_syntax(source: &str) -> Result<(), ParseError> {
    let tree = with_parser(|parser| parser.parse(source))??;
    check_parsed(&ParsedSource { source, tree })
}
