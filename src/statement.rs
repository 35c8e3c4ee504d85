//! Statement and attribute-chain analysis over built syntax trees.

use crate::tree::{NodeId, TreeIndex};
use crate::ts::SyntaxInfo;
use crate::ts::kinds;

/// Text of the enclosing statement on either side of an attribute chain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartStatement {
    pub before: String,
    pub after: String,
}

/// A statement split around one node and the chain it belongs to.
///
/// Concatenating `top.before`, `before`, `current`, `after` and `top.after`
/// gives back the statement text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statement {
    pub top: PartStatement,
    pub before: String,
    pub current: String,
    pub after: String,
}

/// Marker characters used by [`Statement::as_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub top: char,
    pub chain: char,
    pub current: char,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            top: '^',
            chain: '~',
            current: '*',
        }
    }
}

impl Statement {
    /// Each source line followed by a line of markers under its characters.
    ///
    /// Whitespace is never marked.
    pub fn as_text(&self, markers: Markers) -> String {
        let parts = [
            (self.top.before.as_str(), markers.top),
            (self.before.as_str(), markers.chain),
            (self.current.as_str(), markers.current),
            (self.after.as_str(), markers.chain),
            (self.top.after.as_str(), markers.top),
        ];

        let mut out: Vec<String> = Vec::new();
        let mut line = String::new();
        let mut marks = String::new();
        for (text, marker) in parts {
            for (idx, piece) in text.split('\n').enumerate() {
                if idx > 0 && !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                    out.push(std::mem::take(&mut marks));
                }
                line.push_str(piece);
                marks.extend(
                    piece
                        .chars()
                        .map(|c| if c.is_whitespace() { ' ' } else { marker }),
                );
            }
        }
        if !line.is_empty() {
            out.push(line);
            out.push(marks);
        }
        out.join("\n")
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_text(Markers::default()))
    }
}

/// Nearest node at or above `id` whose kind is a statement.
pub fn top_statement(tree: &TreeIndex<SyntaxInfo>, id: NodeId) -> Option<NodeId> {
    if tree.get(id)?.info().statement {
        return Some(id);
    }
    tree.find_parent(id, |node| node.info().statement)
}

/// Whether `id` sits inside the target side of an assignment.
///
/// The search stops at the enclosing statement.
pub fn is_set(tree: &TreeIndex<SyntaxInfo>, id: NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    std::iter::once(id)
        .chain(tree.ancestors(node.id()))
        .take_while(|&current| current == id || !tree[current].info().statement)
        .any(|current| {
            let node = &tree[current];
            node.info().is_field("left")
                && node
                    .parent()
                    .is_some_and(|parent| kinds::is_assignment(&tree[parent].info().kind))
        })
}

/// The attribute access whose `object` is `id`, as in `id.name`.
pub fn next_attribute(tree: &TreeIndex<SyntaxInfo>, id: NodeId) -> Option<NodeId> {
    let node = tree.get(id)?;
    let parent = node.parent()?;
    (node.info().is_field("object") && tree[parent].info().kind == "attribute").then_some(parent)
}

/// The `object` of the attribute access `id`.
pub fn previous_attribute(tree: &TreeIndex<SyntaxInfo>, id: NodeId) -> Option<NodeId> {
    let node = tree.get(id)?;
    if node.info().kind != "attribute" {
        return None;
    }
    node.children()
        .iter()
        .copied()
        .find(|&child| tree[child].info().is_field("object"))
}

/// Outermost node of the access chain `id` belongs to.
///
/// A chain continues upward through attribute accesses, called functions
/// and subscripted values.
fn chain_top(tree: &TreeIndex<SyntaxInfo>, id: NodeId) -> NodeId {
    let mut current = id;
    while let Some(parent) = tree[current].parent() {
        let info = tree[current].info();
        let continues = match tree[parent].info().kind.as_str() {
            "attribute" => info.is_field("object") || info.is_field("attribute"),
            "call" => info.is_field("function"),
            "subscript" => info.is_field("value"),
            _ => false,
        };
        if !continues {
            break;
        }
        current = parent;
    }
    current
}

/// Split the statement enclosing `id` around `id` and its chain.
pub fn statement(tree: &TreeIndex<SyntaxInfo>, id: NodeId) -> Option<Statement> {
    let source = tree.root_node()?.info().text.as_str();
    let top = &tree[top_statement(tree, id)?];
    let chain = &tree[chain_top(tree, id)];
    let node = &tree[id];

    let chain_start = chain.start().max(top.start());
    let chain_end = chain.end().min(top.end());
    let slice = |start: usize, end: usize| source.get(start..end).unwrap_or_default().to_string();

    Some(Statement {
        top: PartStatement {
            before: slice(top.start(), chain_start),
            after: slice(chain_end, top.end()),
        },
        before: slice(chain_start, node.start()),
        current: slice(node.start(), node.end()),
        after: slice(node.end(), chain_end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::SyntaxTreeBuilder;

    fn build(source: &str) -> TreeIndex<SyntaxInfo> {
        SyntaxTreeBuilder::new("test.py", source).build().unwrap()
    }

    fn find(tree: &TreeIndex<SyntaxInfo>, source: &str, needle: &str) -> NodeId {
        let start = source.find(needle).unwrap();
        tree.find_best_match(start, start + needle.len()).unwrap()
    }

    #[test]
    fn top_statement_is_nearest_statement() {
        let source = "def f():\n    x = a.b\n";
        let tree = build(source);
        let name = find(&tree, source, "a");
        let stmt = top_statement(&tree, name).unwrap();
        assert_eq!(tree[stmt].info().text, "x = a.b");
        assert_eq!(top_statement(&tree, stmt), Some(stmt));
    }

    #[test]
    fn is_set_covers_the_target_side() {
        let source = "a.b = c\n";
        let tree = build(source);
        assert!(is_set(&tree, find(&tree, source, "a.b")));
        assert!(is_set(&tree, find(&tree, source, "a")));
        assert!(!is_set(&tree, find(&tree, source, "c")));
    }

    #[test]
    fn augmented_assignment_targets() {
        let source = "total += 1\n";
        let tree = build(source);
        assert!(is_set(&tree, find(&tree, source, "total")));
        assert!(!is_set(&tree, find(&tree, source, "1")));
    }

    #[test]
    fn attribute_links() {
        let source = "x = a.b.c\n";
        let tree = build(source);
        let a = find(&tree, source, "a");
        let ab = next_attribute(&tree, a).unwrap();
        assert_eq!(tree[ab].info().text, "a.b");
        let abc = next_attribute(&tree, ab).unwrap();
        assert_eq!(tree[abc].info().text, "a.b.c");
        assert_eq!(next_attribute(&tree, abc), None);

        assert_eq!(previous_attribute(&tree, abc), Some(ab));
        assert_eq!(previous_attribute(&tree, ab), Some(a));
        assert_eq!(previous_attribute(&tree, a), None);
    }

    #[test]
    fn statement_splits_around_chain() {
        let source = "result = obj.method(1).value\n";
        let tree = build(source);
        let method = find(&tree, source, "obj.method");
        let stmt = statement(&tree, method).unwrap();
        assert_eq!(stmt.top.before, "result = ");
        assert_eq!(stmt.before, "");
        assert_eq!(stmt.current, "obj.method");
        assert_eq!(stmt.after, "(1).value");
        assert_eq!(stmt.top.after, "");
    }

    #[test]
    fn as_text_marks_each_part() {
        let stmt = Statement {
            top: PartStatement {
                before: "x = ".to_string(),
                after: String::new(),
            },
            before: "a.".to_string(),
            current: "b".to_string(),
            after: ".c".to_string(),
        };
        assert_eq!(stmt.as_text(Markers::default()), "x = a.b.c\n^ ^ ~~*~~");
        let custom = Markers {
            top: '-',
            chain: '=',
            current: '#',
        };
        assert_eq!(stmt.as_text(custom), "x = a.b.c\n- - ==#==");
    }

    #[test]
    fn as_text_breaks_lines() {
        let stmt = Statement {
            top: PartStatement {
                before: "f(\n    ".to_string(),
                after: ",\n)".to_string(),
            },
            before: String::new(),
            current: "arg".to_string(),
            after: String::new(),
        };
        assert_eq!(stmt.as_text(Markers::default()), "f(\n^^\n    arg,\n    ***^\n)\n^");
    }
}
