//! Build a [`TreeIndex`] from Python source with tree-sitter.
//!
//! Every named grammar node becomes a tree node, nested exactly as the
//! grammar nests it, under a synthetic `module` root spanning the whole
//! source.

use crate::config::{BuilderConfig, Settings, TreeConfig};
use crate::info::{ensure_path, get_path};
use crate::pool::with_parser;
use crate::position::Position;
use crate::tree::{NodeId, TreeIndex};
use crate::ts::errors::ParseError;
use crate::ts::kinds;
use crate::ts::parser::ParsedSource;
use crate::ts::validator::check_parsed;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

const PATTERN_KINDS: &[&str] = &["pattern_list", "tuple_pattern", "list_pattern"];

/// Payload stored on every node of a built syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxInfo {
    /// Grammar kind, e.g. `call` or `expression_statement`.
    pub kind: String,
    /// Field name under which the parent holds this node, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Source text covered by the node.
    pub text: String,
    #[serde(default)]
    pub statement: bool,
    /// The node is a binding target of an assignment.
    #[serde(default)]
    pub is_set: bool,
    /// Field name to child text for the node's fielded children.
    #[serde(default = "empty_object")]
    pub attributes: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl SyntaxInfo {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            statement: kinds::is_statement(&kind),
            kind,
            field: None,
            text: text.into(),
            is_set: false,
            attributes: empty_object(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Text of the child stored under `field`, when there is exactly one.
    pub fn attribute(&self, field: &str) -> Option<&str> {
        get_path(&self.attributes, &[field]).ok()?.as_str()
    }

    pub fn description(&self) -> &'static str {
        kinds::description(&self.kind)
    }

    pub fn is_field(&self, field: &str) -> bool {
        self.field.as_deref() == Some(field)
    }
}

/// Builds a syntax tree for one source text.
///
/// ```no_run
/// use tree_interval::ts::SyntaxTreeBuilder;
///
/// let tree = SyntaxTreeBuilder::new("demo.py", "x = obj.attr\n").build().unwrap();
/// let node = tree.find_best_match(4, 12).unwrap();
/// assert_eq!(tree[node].info().kind, "attribute");
/// ```
#[derive(Debug, Clone)]
pub struct SyntaxTreeBuilder {
    source_id: String,
    source: String,
    tree_config: TreeConfig,
    builder_config: BuilderConfig,
}

impl SyntaxTreeBuilder {
    pub fn new(source_id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            source: source.into(),
            tree_config: TreeConfig::default(),
            builder_config: BuilderConfig::default(),
        }
    }

    /// Read `path` and use its display form as the source identifier.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), source))
    }

    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.tree_config = config;
        self
    }

    pub fn with_builder_config(mut self, config: BuilderConfig) -> Self {
        self.builder_config = config;
        self
    }

    pub fn with_settings(self, settings: &Settings) -> Self {
        self.with_config(settings.tree.clone())
            .with_builder_config(settings.builder.clone())
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parse and index the source.
    ///
    /// Fails on any ERROR or MISSING node; no partial tree is returned.
    pub fn build(&self) -> Result<TreeIndex<SyntaxInfo>, ParseError> {
        let tree = with_parser(|parser| parser.parse(&self.source))??;
        let parsed = ParsedSource {
            source: &self.source,
            tree,
        };
        check_parsed(&parsed)?;

        let mut index = TreeIndex::with_config(self.source_id.clone(), self.tree_config.clone());
        let module = parsed.root_node();
        let mut root_info = SyntaxInfo::new("module", self.source.as_str());
        root_info.attributes = self.attributes_of(&parsed, module);
        let root = index.set_root(self.root_position()?, root_info)?;

        self.walk(&parsed, &mut index, root, module, false)?;
        debug!(
            source = %self.source_id,
            nodes = index.len(),
            "built syntax tree"
        );
        Ok(index)
    }

    fn root_position(&self) -> Result<Position, ParseError> {
        let offset = self.tree_config.line_offset();
        let line_count = self.source.matches('\n').count() + 1;
        let last_line_start = self.source.rfind('\n').map_or(0, |idx| idx + 1);
        let position = Position::new(0, self.source.len())?
            .with_lines(1 + offset, line_count + offset)?
            .with_columns(Some(0), Some(self.source.len() - last_line_start));
        Ok(position)
    }

    fn position_of(&self, node: tree_sitter::Node<'_>) -> Result<Position, ParseError> {
        let offset = self.tree_config.line_offset();
        let start = node.start_position();
        let end = node.end_position();
        let position = Position::new(node.start_byte(), node.end_byte())?
            .with_lines(start.row + 1 + offset, end.row + 1 + offset)?
            .with_columns(Some(start.column), Some(end.column));
        Ok(position)
    }

    fn keep(&self, node: tree_sitter::Node<'_>) -> bool {
        node.is_named() && (self.builder_config.include_comments || node.kind() != "comment")
    }

    fn walk(
        &self,
        parsed: &ParsedSource<'_>,
        index: &mut TreeIndex<SyntaxInfo>,
        parent: NodeId,
        node: tree_sitter::Node<'_>,
        parent_is_target: bool,
    ) -> Result<(), ParseError> {
        let binds = kinds::is_assignment(node.kind());
        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return Ok(());
        }
        loop {
            let child = cursor.node();
            if self.keep(child) {
                let field = cursor.field_name();
                let is_set = (binds && field == Some("left"))
                    || (parent_is_target && PATTERN_KINDS.contains(&node.kind()));

                let mut info = SyntaxInfo::new(child.kind(), parsed.node_text(child));
                info.field = field.map(str::to_string);
                info.is_set = is_set;
                info.attributes = self.attributes_of(parsed, child);

                let id = index.push_child(parent, self.position_of(child)?, info)?;
                self.walk(parsed, index, id, child, is_set)?;
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        Ok(())
    }

    /// Map each field name to the text of the named children stored under it.
    ///
    /// A field that holds several children maps to an array of texts.
    fn attributes_of(&self, parsed: &ParsedSource<'_>, node: tree_sitter::Node<'_>) -> Value {
        let mut attributes = empty_object();
        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return attributes;
        }
        loop {
            let child = cursor.node();
            if let Some(field) = cursor.field_name().filter(|_| self.keep(child)) {
                let text = Value::String(parsed.node_text(child).to_string());
                // Keys are single segments on a fresh object, so the path cannot fail.
                if let Ok(slot) = ensure_path(&mut attributes, &[field]) {
                    *slot = match slot.take() {
                        Value::Null => text,
                        Value::Array(mut items) => {
                            items.push(text);
                            Value::Array(items)
                        }
                        first => Value::Array(vec![first, text]),
                    };
                }
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        attributes
    }
}
