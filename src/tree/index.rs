use crate::config::TreeConfig;
use crate::position::Position;
use crate::tree::errors::TreeError;
use crate::tree::node::{Node, NodeId};
use std::ops::Index;
use tracing::trace;

/// An interval-indexed tree that owns every node in a flat arena.
///
/// Nodes enter the tree through [`TreeIndex::insert`] (or
/// [`TreeIndex::set_root`]) and live until the index is dropped. Every
/// child's position is contained in its parent's, and children are kept in
/// `(start, insertion order)` order.
#[derive(Debug, Clone)]
pub struct TreeIndex<T> {
    source: String,
    config: TreeConfig,
    nodes: Vec<Node<T>>,
    root: Option<NodeId>,
}

impl<T> TreeIndex<T> {
    /// Create an empty tree for the given source identifier.
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_config(source, TreeConfig::default())
    }

    /// Create an empty tree with explicit formatting settings.
    pub fn with_config(source: impl Into<String>, config: TreeConfig) -> Self {
        Self {
            source: source.into(),
            config,
            nodes: Vec::new(),
            root: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_node(&self) -> Option<&Node<T>> {
        self.root.map(|id| &self.nodes[id.index()])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.index())
    }

    /// Access a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.index()]
    }

    /// Mutable access to a node's payload. Positions and links stay fixed.
    pub fn info_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.index()).map(|node| &mut node.info)
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }

    fn alloc(&mut self, position: Position, info: T) -> Result<NodeId, TreeError> {
        let raw = u32::try_from(self.nodes.len()).map_err(|_| TreeError::Capacity {
            max: u64::from(u32::MAX),
        })?;
        let id = NodeId(raw);
        self.nodes.push(Node::new(id, position, info));
        Ok(id)
    }

    /// Assign the root directly. Fails if a root already exists.
    pub fn set_root(&mut self, position: Position, info: T) -> Result<NodeId, TreeError> {
        if self.root.is_some() {
            return Err(TreeError::RootAlreadySet);
        }
        let id = self.alloc(position, info)?;
        self.root = Some(id);
        Ok(id)
    }

    /// Insert a node, placing it under the smallest existing node that contains it.
    ///
    /// The first insertion into an empty tree becomes the root. Children of
    /// the anchor that fall inside the new interval are moved under the new
    /// node, so wider spans inserted after their descendants still nest
    /// correctly.
    pub fn insert(&mut self, position: Position, info: T) -> Result<NodeId, TreeError> {
        let Some(root) = self.root else {
            return self.set_root(position, info);
        };

        let anchor = self
            .find_best_match(position.start(), position.end())
            .ok_or_else(|| {
                let root_pos = self.nodes[root.index()].position;
                TreeError::OutsideRoot {
                    start: position.start(),
                    end: position.end(),
                    anchor_start: root_pos.start(),
                    anchor_end: root_pos.end(),
                }
            })?;

        let id = self.alloc(position, info)?;

        let siblings = std::mem::take(&mut self.nodes[anchor.index()].children);
        let (absorbed, mut kept): (Vec<NodeId>, Vec<NodeId>) = siblings
            .into_iter()
            .partition(|child| position.contains(&self.nodes[child.index()].position));

        for child in &absorbed {
            self.nodes[child.index()].parent = Some(id);
        }
        trace!(
            node = id.as_u32(),
            anchor = anchor.as_u32(),
            absorbed = absorbed.len(),
            "inserted {}",
            position
        );
        self.nodes[id.index()].children = absorbed;
        self.nodes[id.index()].parent = Some(anchor);

        kept.push(id);
        kept.sort_by_key(|child| (self.nodes[child.index()].position.start(), *child));
        self.nodes[anchor.index()].children = kept;

        Ok(id)
    }

    /// Attach a node under a known parent without running insertion.
    ///
    /// Used when nesting is already known (grammar walk, deserialization).
    /// Containment and child ordering are still checked.
    pub(crate) fn push_child(
        &mut self,
        parent: NodeId,
        position: Position,
        info: T,
    ) -> Result<NodeId, TreeError> {
        let parent_node = self.get(parent).ok_or(TreeError::UnknownNode(parent))?;
        let parent_pos = parent_node.position;
        if !parent_pos.contains(&position) {
            return Err(TreeError::OutsideParent {
                start: position.start(),
                end: position.end(),
                parent_start: parent_pos.start(),
                parent_end: parent_pos.end(),
            });
        }
        if let Some(last) = parent_node.children.last() {
            if self.nodes[last.index()].position.start() > position.start() {
                return Err(TreeError::UnorderedChildren {
                    start: parent_pos.start(),
                    end: parent_pos.end(),
                });
            }
        }

        let id = self.alloc(position, info)?;
        self.nodes[id.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// The node preferred by the best-match tie-break among all nodes containing `[start, end)`.
    ///
    /// Preference: smallest interval, then smallest start, then earliest
    /// inserted. Returns `None` when nothing contains the range.
    pub fn find_best_match(&self, start: usize, end: usize) -> Option<NodeId> {
        self.find_best_match_where(start, end, |_| true)
    }

    /// Like [`TreeIndex::find_best_match`], restricted to nodes accepted by `predicate`.
    ///
    /// The descent is still pruned by interval containment; the predicate
    /// only decides which containing nodes are eligible answers.
    pub fn find_best_match_where<P>(&self, start: usize, end: usize, predicate: P) -> Option<NodeId>
    where
        P: Fn(&Node<T>) -> bool,
    {
        let root = self.root?;
        self.best_within(root, start, end, &predicate)
    }

    fn best_within<P>(&self, id: NodeId, start: usize, end: usize, predicate: &P) -> Option<NodeId>
    where
        P: Fn(&Node<T>) -> bool,
    {
        let node = &self.nodes[id.index()];
        if !node.position.contains_range(start, end) {
            return None;
        }

        let mut best = predicate(node).then_some(id);
        // Siblings can overlap after out-of-order insertion, so every
        // containing child is a candidate, not just the first one.
        for &child in &node.children {
            if let Some(candidate) = self.best_within(child, start, end, predicate) {
                best = Some(match best {
                    Some(current) if self.prefers(current, candidate) => current,
                    _ => candidate,
                });
            }
        }
        best
    }

    fn prefers(&self, a: NodeId, b: NodeId) -> bool {
        self.nodes[a.index()].preference_key() <= self.nodes[b.index()].preference_key()
    }

    /// Walk upward from `id` (exclusive) and return the first ancestor accepted by `predicate`.
    pub fn find_parent<P>(&self, id: NodeId, predicate: P) -> Option<NodeId>
    where
        P: Fn(&Node<T>) -> bool,
    {
        self.ancestors(id).find(|ancestor| predicate(self.node(*ancestor)))
    }

    /// Every ancestor of `id` accepted by `predicate`, nearest first.
    pub fn find_all_parents<P>(&self, id: NodeId, predicate: P) -> Vec<NodeId>
    where
        P: Fn(&Node<T>) -> bool,
    {
        self.ancestors(id)
            .filter(|ancestor| predicate(self.node(*ancestor)))
            .collect()
    }

    /// Pre-order search of the subtree below `id` (the node itself excluded).
    pub fn find_child<P>(&self, id: NodeId, predicate: P) -> Option<NodeId>
    where
        P: Fn(&Node<T>) -> bool,
    {
        self.descendants(id)
            .skip(1)
            .find(|descendant| predicate(self.node(*descendant)))
    }

    /// Every node below `id` accepted by `predicate`, in pre-order.
    pub fn find_all_children<P>(&self, id: NodeId, predicate: P) -> Vec<NodeId>
    where
        P: Fn(&Node<T>) -> bool,
    {
        self.descendants(id)
            .skip(1)
            .filter(|descendant| predicate(self.node(*descendant)))
            .collect()
    }

    /// First sibling of `id` accepted by `predicate`, in stored order.
    ///
    /// A node without a parent has no siblings.
    pub fn find_sibling<P>(&self, id: NodeId, predicate: P) -> Option<NodeId>
    where
        P: Fn(&Node<T>) -> bool,
    {
        self.siblings(id)
            .find(|sibling| predicate(self.node(*sibling)))
    }

    /// Every sibling of `id` accepted by `predicate`, in stored order.
    pub fn find_all_siblings<P>(&self, id: NodeId, predicate: P) -> Vec<NodeId>
    where
        P: Fn(&Node<T>) -> bool,
    {
        self.siblings(id)
            .filter(|sibling| predicate(self.node(*sibling)))
            .collect()
    }

    fn siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let parent_children: &[NodeId] = match self.get(id).and_then(|node| node.parent) {
            Some(parent) => &self.nodes[parent.index()].children,
            None => &[],
        };
        parent_children.iter().copied().filter(move |sibling| *sibling != id)
    }

    /// Ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, T> {
        Ancestors {
            tree: self,
            next: self.get(id).and_then(|node| node.parent),
        }
    }

    /// `id` followed by its whole subtree in pre-order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_, T> {
        let stack = if self.get(id).is_some() { vec![id] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Every node reachable from the root, in pre-order.
    pub fn flatten(&self) -> Vec<NodeId> {
        match self.root {
            Some(root) => self.descendants(root).collect(),
            None => Vec::new(),
        }
    }
}

impl<T> Index<NodeId> for TreeIndex<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.node(id)
    }
}

impl<T: PartialEq> TreeIndex<T> {
    fn subtree_eq(&self, id: NodeId, other: &TreeIndex<T>, other_id: NodeId) -> bool {
        let a = self.node(id);
        let b = other.node(other_id);
        a.position == b.position
            && a.info == b.info
            && a.children.len() == b.children.len()
            && a
                .children
                .iter()
                .zip(&b.children)
                .all(|(x, y)| self.subtree_eq(*x, other, *y))
    }
}

/// Structural equality: same source, settings, intervals, payloads, nesting and order.
///
/// Arena ids are not compared, so a tree equals its deserialized copy.
impl<T: PartialEq> PartialEq for TreeIndex<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.source != other.source || self.config != other.config {
            return false;
        }
        match (self.root, other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => self.subtree_eq(a, other, b),
            _ => false,
        }
    }
}

pub struct Ancestors<'a, T> {
    tree: &'a TreeIndex<T>,
    next: Option<NodeId>,
}

impl<T> Iterator for Ancestors<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.node(current).parent;
        Some(current)
    }
}

pub struct Descendants<'a, T> {
    tree: &'a TreeIndex<T>,
    stack: Vec<NodeId>,
}

impl<T> Iterator for Descendants<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.node(current).children.iter().rev().copied());
        Some(current)
    }
}
