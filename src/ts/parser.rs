use crate::ts::errors::ParseError;
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Parser, Tree};

/// A tree-sitter parser loaded with the Python grammar.
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        // The grammar comes from ast-grep-language so both stay on one tree-sitter version.
        let ts_lang = SupportLang::Python.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| ParseError::LanguageSet)?;

        Ok(Self { parser })
    }

    /// Parse from scratch; no previous tree is reused.
    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)
    }

    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, ParseError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource { source, tree })
    }
}

/// Source text paired with the tree parsed from it.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
}

impl<'a> ParsedSource<'a> {
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Whether any ERROR or MISSING node occurs anywhere in the tree.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// ERROR and MISSING nodes in document order.
    ///
    /// Subtrees without errors are skipped.
    pub fn error_nodes(&self) -> Vec<ErrorNode> {
        let mut found = Vec::new();
        let mut pending = vec![self.tree.root_node()];
        while let Some(node) = pending.pop() {
            if node.is_error() || node.is_missing() {
                found.push(ErrorNode::from(node));
            }
            if node.has_error() {
                let mut cursor = node.walk();
                let children: Vec<_> = node.children(&mut cursor).collect();
                pending.extend(children.into_iter().rev());
            }
        }
        found
    }

    pub fn node_text(&self, node: tree_sitter::Node<'_>) -> &'a str {
        &self.source[node.byte_range()]
    }
}

/// Location of an ERROR or MISSING node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_point: tree_sitter::Point,
    pub end_point: tree_sitter::Point,
}

impl From<tree_sitter::Node<'_>> for ErrorNode {
    fn from(node: tree_sitter::Node<'_>) -> Self {
        Self {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start_point: node.start_position(),
            end_point: node.end_position(),
        }
    }
}
