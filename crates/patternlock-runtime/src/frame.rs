#![forbid(unsafe_code)]

//! Per-frame draw snapshot.
//!
//! The renderer never reads lock internals. It asks for a [`Frame`] and
//! paints it: one visual per node, then the line segments in order using the
//! frame's [`LineTone`].

use patternlock_core::{AnimationHandle, NodeId, NodeState, Point, Rect};

/// Which line appearance to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineTone {
    #[default]
    Default,
    Correct,
    Error,
}

/// What to paint for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisual {
    pub id: NodeId,
    pub rect: Rect,
    pub state: NodeState,
    pub animation: Option<AnimationHandle>,
}

/// A straight line between two centers, or from a center to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub nodes: Vec<NodeVisual>,
    /// Empty when the pattern is hidden.
    pub segments: Vec<Segment>,
    pub tone: LineTone,
}
