use crate::cache;
use crate::sg::errors::PatternError;
use crate::sg::lang::python;
use crate::tree::{NodeId, TreeIndex};
use crate::ts::SyntaxInfo;
use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_core::{AstGrep, NodeMatch};
use ast_grep_language::SupportLang;
use std::collections::HashMap;
use tracing::debug;

/// One pattern match, before it is mapped onto a tree.
#[derive(Debug, Clone)]
pub struct PatternHit {
    pub byte_start: usize,
    pub byte_end: usize,
    pub text: String,
    /// Captured metavariables: name -> text
    pub captures: HashMap<String, String>,
}

impl PatternHit {
    /// Byte span of a capture, taken as its first occurrence in the matched text.
    pub fn capture_span(&self, name: &str) -> Result<(usize, usize), PatternError> {
        let missing = || PatternError::MetavarNotFound {
            name: name.to_string(),
        };
        let capture = self.captures.get(name).ok_or_else(missing)?;
        let offset = self.text.find(capture.as_str()).ok_or_else(missing)?;
        let start = self.byte_start + offset;
        Ok((start, start + capture.len()))
    }
}

/// Finds tree nodes by ast-grep pattern.
///
/// ```no_run
/// use tree_interval::sg::PatternLocator;
/// use tree_interval::ts::SyntaxTreeBuilder;
///
/// let source = "print(config.name)\n";
/// let tree = SyntaxTreeBuilder::new("demo.py", source).build().unwrap();
/// let locator = PatternLocator::new(source);
/// let nodes = locator.locate(&tree, "$OBJ.name").unwrap();
/// assert_eq!(tree[nodes[0]].info().kind, "attribute");
/// ```
pub struct PatternLocator {
    source: String,
    sg: AstGrep<StrDoc<SupportLang>>,
}

impl PatternLocator {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            sg: AstGrep::new(source, python()),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every match of `pattern`, in document order.
    pub fn find_all(&self, pattern: &str) -> Result<Vec<PatternHit>, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::EmptyPattern);
        }
        let pat = cache::get_or_compile_pattern(pattern, python());
        let hits = self
            .sg
            .root()
            .find_all(&pat)
            .map(|m| self.to_hit(m))
            .collect();
        Ok(hits)
    }

    /// The first match of `pattern`.
    pub fn find_first(&self, pattern: &str) -> Result<PatternHit, PatternError> {
        self.find_all(pattern)?
            .into_iter()
            .next()
            .ok_or(PatternError::NoMatch)
    }

    /// Tree nodes best matching each hit of `pattern`, without duplicates.
    ///
    /// `tree` must have been built from the same text as this locator.
    pub fn locate(
        &self,
        tree: &TreeIndex<SyntaxInfo>,
        pattern: &str,
    ) -> Result<Vec<NodeId>, PatternError> {
        let same_text = tree
            .root_node()
            .is_some_and(|root| root.info().text == self.source);
        if !same_text {
            return Err(PatternError::SourceMismatch {
                tree_source: tree.source().to_string(),
            });
        }

        let mut nodes = Vec::new();
        for hit in self.find_all(pattern)? {
            if let Some(id) = tree.find_best_match(hit.byte_start, hit.byte_end) {
                if !nodes.contains(&id) {
                    nodes.push(id);
                }
            }
        }
        debug!(pattern, located = nodes.len(), "pattern lookup");
        Ok(nodes)
    }

    fn to_hit(&self, m: NodeMatch<StrDoc<SupportLang>>) -> PatternHit {
        let range = m.get_node().range();
        let captures: HashMap<String, String> = m.get_env().clone().into();
        PatternHit {
            byte_start: range.start,
            byte_end: range.end,
            text: self.source[range.clone()].to_string(),
            captures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::SyntaxTreeBuilder;

    const SOURCE: &str = r#"
def load(path):
    handle = open(path)
    data = handle.read()
    handle.close()
    return data
"#;

    fn tree() -> TreeIndex<SyntaxInfo> {
        SyntaxTreeBuilder::new("load.py", SOURCE).build().unwrap()
    }

    #[test]
    fn finds_method_calls_with_captures() {
        let locator = PatternLocator::new(SOURCE);
        let hits = locator.find_all("handle.$METHOD()").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].captures.get("METHOD").map(String::as_str), Some("read"));
        let (start, end) = hits[1].capture_span("METHOD").unwrap();
        assert_eq!(&SOURCE[start..end], "close");
    }

    #[test]
    fn locate_maps_hits_to_nodes() {
        let tree = tree();
        let locator = PatternLocator::new(SOURCE);
        let nodes = locator.locate(&tree, "open($PATH)").unwrap();
        assert_eq!(nodes.len(), 1);
        let node = &tree[nodes[0]];
        assert_eq!(node.info().kind, "call");
        assert_eq!(node.info().text, "open(path)");
    }

    #[test]
    fn locate_rejects_foreign_tree() {
        let tree = tree();
        let locator = PatternLocator::new("x = 1\n");
        let err = locator.locate(&tree, "x").unwrap_err();
        assert!(matches!(err, PatternError::SourceMismatch { .. }));
    }

    #[test]
    fn empty_and_missing_patterns() {
        let locator = PatternLocator::new(SOURCE);
        assert_eq!(locator.find_all("  ").unwrap_err(), PatternError::EmptyPattern);
        assert_eq!(
            locator.find_first("missing_call()").unwrap_err(),
            PatternError::NoMatch
        );
        let hit = locator.find_first("return $X").unwrap();
        assert_eq!(
            hit.capture_span("Y").unwrap_err(),
            PatternError::MetavarNotFound {
                name: "Y".to_string()
            }
        );
    }
}
