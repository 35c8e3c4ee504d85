use crate::tree::node::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("invalid line range: lineno {lineno} is after end_lineno {end_lineno}")]
    InvalidLineRange { lineno: usize, end_lineno: usize },

    #[error("range {start}..{end} does not fit under {anchor_start}..{anchor_end}")]
    OutsideRoot {
        start: usize,
        end: usize,
        anchor_start: usize,
        anchor_end: usize,
    },

    #[error("range {start}..{end} does not fit under parent {parent_start}..{parent_end}")]
    OutsideParent {
        start: usize,
        end: usize,
        parent_start: usize,
        parent_end: usize,
    },

    #[error("tree is full: cannot hold more than {max} nodes")]
    Capacity { max: u64 },

    #[error("tree already has a root")]
    RootAlreadySet,

    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("children of node at {start}..{end} are not ordered by start offset")]
    UnorderedChildren { start: usize, end: usize },

    #[error("tree JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TreeError {
    /// True for the errors caused by an interval that cannot be placed.
    pub fn is_invalid_range(&self) -> bool {
        matches!(
            self,
            TreeError::InvalidRange { .. }
                | TreeError::InvalidLineRange { .. }
                | TreeError::OutsideRoot { .. }
                | TreeError::OutsideParent { .. }
        )
    }
}
