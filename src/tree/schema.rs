//! JSON schema for trees.
//!
//! A node serializes as
//!
//! ```text
//! { start, end, lineno, end_lineno, col_offset|null, end_col_offset|null,
//!   info, children: [Node, ...] }
//! ```
//!
//! and a whole tree as `{ source, config, root: Node|null }`. Loading a tree
//! rebuilds parent links from the nesting of `children`; it never re-runs
//! interval insertion.

use crate::config::TreeConfig;
use crate::position::Position;
use crate::tree::errors::TreeError;
use crate::tree::index::TreeIndex;
use crate::tree::node::NodeId;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Borrowed view used to serialize a subtree without cloning payloads.
struct NodeView<'a, T> {
    tree: &'a TreeIndex<T>,
    id: NodeId,
}

impl<T: Serialize> Serialize for NodeView<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.tree.node(self.id);
        let position = node.position();
        let children: Vec<NodeView<'_, T>> = node
            .children()
            .iter()
            .map(|&id| NodeView { tree: self.tree, id })
            .collect();

        let mut state = serializer.serialize_struct("Node", 8)?;
        state.serialize_field("start", &position.start())?;
        state.serialize_field("end", &position.end())?;
        state.serialize_field("lineno", &position.lineno())?;
        state.serialize_field("end_lineno", &position.end_lineno())?;
        state.serialize_field("col_offset", &position.col_offset())?;
        state.serialize_field("end_col_offset", &position.end_col_offset())?;
        state.serialize_field("info", node.info())?;
        state.serialize_field("children", &children)?;
        state.end()
    }
}

impl<T: Serialize> Serialize for TreeIndex<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let root = self.root().map(|id| NodeView { tree: self, id });
        let mut state = serializer.serialize_struct("Tree", 3)?;
        state.serialize_field("source", self.source())?;
        state.serialize_field("config", self.config())?;
        state.serialize_field("root", &root)?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct NodeRecord<T> {
    start: usize,
    end: usize,
    #[serde(default = "first_line")]
    lineno: usize,
    #[serde(default = "first_line")]
    end_lineno: usize,
    #[serde(default)]
    col_offset: Option<usize>,
    #[serde(default)]
    end_col_offset: Option<usize>,
    info: T,
    #[serde(default)]
    children: Vec<NodeRecord<T>>,
}

fn first_line() -> usize {
    1
}

impl<T> NodeRecord<T> {
    fn position(&self) -> Result<Position, TreeError> {
        Ok(Position::new(self.start, self.end)?
            .with_lines(self.lineno, self.end_lineno)?
            .with_columns(self.col_offset, self.end_col_offset))
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct TreeRecord<T> {
    source: String,
    #[serde(default)]
    config: TreeConfig,
    root: Option<NodeRecord<T>>,
}

impl<T> TreeRecord<T> {
    fn into_tree(self) -> Result<TreeIndex<T>, TreeError> {
        let mut tree = TreeIndex::with_config(self.source, self.config);
        if let Some(mut record) = self.root {
            let position = record.position()?;
            let children = std::mem::take(&mut record.children);
            let root = tree.set_root(position, record.info)?;
            attach_children(&mut tree, root, children)?;
        }
        Ok(tree)
    }
}

/// Attach `records` under `parent`, walking with an explicit stack so depth
/// is bounded by the heap rather than the call stack.
fn attach_children<T>(
    tree: &mut TreeIndex<T>,
    parent: NodeId,
    records: Vec<NodeRecord<T>>,
) -> Result<(), TreeError> {
    let mut pending: Vec<(NodeId, std::vec::IntoIter<NodeRecord<T>>)> =
        vec![(parent, records.into_iter())];
    while let Some((parent, siblings)) = pending.last_mut() {
        let parent = *parent;
        let Some(mut record) = siblings.next() else {
            pending.pop();
            continue;
        };
        let position = record.position()?;
        let children = std::mem::take(&mut record.children);
        let id = tree.push_child(parent, position, record.info)?;
        pending.push((id, children.into_iter()));
    }
    Ok(())
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TreeIndex<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        TreeRecord::<T>::deserialize(deserializer)?
            .into_tree()
            .map_err(de::Error::custom)
    }
}

impl<T: Serialize> TreeIndex<T> {
    /// Serialize the whole tree as compact JSON.
    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize the whole tree as indented JSON, honoring `config.indent_size`.
    pub fn to_json_pretty(&self) -> Result<String, TreeError> {
        let indent = " ".repeat(self.config().indent_size);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        // serde_json only ever writes valid UTF-8.
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// The subtree rooted at `id` as a JSON value in node schema.
    pub fn node_json(&self, id: NodeId) -> Result<serde_json::Value, TreeError> {
        if self.get(id).is_none() {
            return Err(TreeError::UnknownNode(id));
        }
        Ok(serde_json::to_value(NodeView { tree: self, id })?)
    }
}

impl<T: DeserializeOwned> TreeIndex<T> {
    /// Load a tree written by [`TreeIndex::to_json`].
    ///
    /// Nesting depth is not limited; deep documents grow the stack on the
    /// heap instead of hitting serde_json's recursion limit.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let record = TreeRecord::<T>::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        record.into_tree()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TreeIndex<String> {
        let mut tree = TreeIndex::new("sample");
        let root = Position::new(0, 100)
            .unwrap()
            .with_lines(1, 5)
            .unwrap()
            .with_columns(Some(0), Some(10));
        tree.insert(root, "root".to_string()).unwrap();
        tree.insert(Position::new(10, 50).unwrap(), "a".to_string())
            .unwrap();
        tree.insert(Position::new(20, 30).unwrap(), "b".to_string())
            .unwrap();
        tree.insert(Position::new(60, 90).unwrap(), "c".to_string())
            .unwrap();
        tree
    }

    #[test]
    fn node_schema_fields() {
        let tree = sample();
        let value = tree.node_json(tree.root().unwrap()).unwrap();
        assert_eq!(value["start"], 0);
        assert_eq!(value["end"], 100);
        assert_eq!(value["lineno"], 1);
        assert_eq!(value["end_lineno"], 5);
        assert_eq!(value["col_offset"], 0);
        assert_eq!(value["info"], "root");
        assert_eq!(value["children"].as_array().unwrap().len(), 2);
        assert_eq!(value["children"][0]["col_offset"], serde_json::Value::Null);
    }

    #[test]
    fn json_round_trip_is_structurally_equal() {
        let tree = sample();
        let loaded = TreeIndex::<String>::from_json(&tree.to_json().unwrap()).unwrap();
        assert_eq!(loaded, tree);

        let b = loaded.find_best_match(22, 24).unwrap();
        assert_eq!(loaded[b].info(), "b");
        let a = loaded[b].parent().unwrap();
        assert_eq!(loaded[a].info(), "a");
    }

    #[test]
    fn pretty_output_uses_configured_indent() {
        let tree = sample();
        let pretty = tree.to_json_pretty().unwrap();
        assert!(pretty.contains("\n    \"source\""));
        assert_eq!(TreeIndex::<String>::from_json(&pretty).unwrap(), tree);
    }

    #[test]
    fn missing_line_fields_default_to_one() {
        let doc = json!({
            "source": "x",
            "root": {"start": 0, "end": 5, "info": null, "children": [
                {"start": 1, "end": 2, "info": null}
            ]}
        });
        let tree = TreeIndex::<Option<String>>::from_json(&doc.to_string()).unwrap();
        let root = tree.root_node().unwrap();
        assert_eq!(root.position().lineno(), 1);
        assert_eq!(root.position().end_lineno(), 1);
        assert_eq!(root.position().col_offset(), None);
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn deep_chain_round_trip() {
        let depth = 400;
        let mut tree = TreeIndex::new("deep");
        for level in 0..depth {
            tree.insert(Position::new(level, 2 * depth - level).unwrap(), level)
                .unwrap();
        }
        let leaf = tree.find_best_match(depth - 1, depth + 1).unwrap();
        assert_eq!(tree.depth(leaf), depth - 1);

        let loaded = TreeIndex::<usize>::from_json(&tree.to_json().unwrap()).unwrap();
        assert_eq!(loaded, tree);
        let leaf = loaded.find_best_match(depth - 1, depth + 1).unwrap();
        assert_eq!(loaded.depth(leaf), depth - 1);
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let json = format!("{} x", sample().to_json().unwrap());
        assert!(matches!(
            TreeIndex::<String>::from_json(&json),
            Err(TreeError::Json(_))
        ));
    }

    #[test]
    fn empty_tree_round_trip() {
        let tree: TreeIndex<String> = TreeIndex::new("");
        let loaded = TreeIndex::<String>::from_json(&tree.to_json().unwrap()).unwrap();
        assert!(loaded.root().is_none());
    }

    #[test]
    fn malformed_intervals_are_rejected() {
        let inverted = json!({"source": "x", "root": {"start": 5, "end": 1, "info": 0}});
        let err = TreeIndex::<u32>::from_json(&inverted.to_string()).unwrap_err();
        assert!(err.is_invalid_range());

        let escaping = json!({"source": "x", "root": {"start": 0, "end": 5, "info": 0,
            "children": [{"start": 3, "end": 9, "info": 1}]}});
        let err = TreeIndex::<u32>::from_json(&escaping.to_string()).unwrap_err();
        assert!(err.is_invalid_range());
    }
}
