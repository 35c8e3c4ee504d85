use crate::position::Position;

/// Handle to a node in a [`TreeIndex`](crate::tree::TreeIndex) arena.
///
/// Ids are handed out in insertion order, so comparing two ids of the same
/// tree tells which node was inserted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw arena index, stable for the lifetime of the tree.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// A tree element: a position, an opaque payload and links into the arena.
///
/// Children are owned by the arena and referenced by id; `parent` is a
/// navigation-only back link.
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub(crate) id: NodeId,
    pub(crate) position: Position,
    pub(crate) info: T,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<T> Node<T> {
    pub(crate) fn new(id: NodeId, position: Position, info: T) -> Self {
        Self {
            id,
            position,
            info,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn info(&self) -> &T {
        &self.info
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn start(&self) -> usize {
        self.position.start()
    }

    pub fn end(&self) -> usize {
        self.position.end()
    }

    pub fn size(&self) -> usize {
        self.position.size()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Full best-match preference key: size, start, then insertion order.
    pub(crate) fn preference_key(&self) -> (usize, usize, NodeId) {
        let (size, start) = self.position.preference_key();
        (size, start, self.id)
    }
}
