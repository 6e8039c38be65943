#![forbid(unsafe_code)]

//! Node records and the N×N grid that owns them.
//!
//! Nodes are plain data: identity is fixed at creation, while appearance
//! state and the layout rect are rewritten by the touch state machine and the
//! geometry engine. Changing the grid size means building a new [`NodeGrid`].

use crate::geometry::Rect;

/// Linear, row-major node index in `[0, grid_size²)`.
pub type NodeId = usize;

/// Opaque handle to a platform animation resource.
///
/// The core only attaches and detaches it; running the animation is the
/// renderer's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config-file", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationHandle(pub u32);

/// Appearance state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeState {
    #[default]
    Normal,
    Highlighted,
    Correct,
    Error,
}

/// Row/column address of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub row: usize,
    pub column: usize,
}

impl GridPos {
    #[inline]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// One cell of the lock.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    pos: GridPos,
    /// Current appearance.
    pub state: NodeState,
    /// Layout rect, assigned by the geometry engine.
    pub rect: Rect,
    /// Animation attached while the node is lit by touch.
    pub animation: Option<AnimationHandle>,
}

impl Node {
    fn new(id: NodeId, grid_size: usize) -> Self {
        Self {
            id,
            pos: GridPos::new(id / grid_size, id % grid_size),
            state: NodeState::Normal,
            rect: Rect::default(),
            animation: None,
        }
    }

    #[inline]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub const fn row(&self) -> usize {
        self.pos.row
    }

    #[inline]
    pub const fn column(&self) -> usize {
        self.pos.column
    }

    #[inline]
    pub const fn pos(&self) -> GridPos {
        self.pos
    }

    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.state == NodeState::Highlighted
    }

    /// Move to `state`, detaching any animation when returning to normal.
    pub fn set_state(&mut self, state: NodeState) {
        if state == NodeState::Normal {
            self.animation = None;
        }
        self.state = state;
    }
}

/// The ordered set of `size²` nodes.
///
/// Invariant: `nodes[r * size + c]` has row `r` and column `c`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGrid {
    size: usize,
    nodes: Vec<Node>,
}

impl NodeGrid {
    /// Build a grid of `size × size` normal nodes. A zero size is treated as 1.
    ///
    /// `size` is expected to have passed [`check_grid_size`](crate::config::check_grid_size);
    /// larger sizes overflow the node count.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let nodes = (0..size * size).map(|id| Node::new(id, size)).collect();
        Self { size, nodes }
    }

    /// N of the N×N grid.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Total node count (`size²`).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Linear id of a grid position, if it is on the grid.
    #[inline]
    pub fn id_at(&self, pos: GridPos) -> Option<NodeId> {
        (pos.row < self.size && pos.column < self.size).then_some(pos.row * self.size + pos.column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// First node (in id order) whose rect, grown by `margin`, contains the point.
    pub fn hit_test(&self, x: f32, y: f32, margin: f32) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|node| node.rect.contains_expanded(x, y, margin))
            .map(Node::id)
    }

    /// Write layout rects into the nodes, in id order.
    ///
    /// Extra rects are ignored; missing ones leave the old rect in place.
    pub fn apply_layout(&mut self, rects: &[Rect]) {
        for (node, rect) in self.nodes.iter_mut().zip(rects) {
            node.rect = *rect;
        }
    }

    /// Return every node to [`NodeState::Normal`].
    pub fn reset_states(&mut self) {
        for node in &mut self.nodes {
            node.set_state(NodeState::Normal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_identity() {
        let grid = NodeGrid::new(4);
        assert_eq!(grid.len(), 16);
        for r in 0..4 {
            for c in 0..4 {
                let node = grid.get(r * 4 + c).unwrap();
                assert_eq!((node.row(), node.column()), (r, c));
                assert_eq!(grid.id_at(GridPos::new(r, c)), Some(node.id()));
            }
        }
        assert_eq!(grid.id_at(GridPos::new(4, 0)), None);
    }

    #[test]
    fn zero_size_is_promoted() {
        let grid = NodeGrid::new(0);
        assert_eq!(grid.size(), 1);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn hit_test_first_match_wins() {
        let mut grid = NodeGrid::new(2);
        grid.apply_layout(&[
            Rect::new(0, 0, 10, 10),
            Rect::new(12, 0, 22, 10),
            Rect::new(0, 12, 10, 22),
            Rect::new(12, 12, 22, 22),
        ]);
        assert_eq!(grid.hit_test(5.0, 5.0, 0.0), Some(0));
        assert_eq!(grid.hit_test(11.0, 5.0, 0.0), None);
        // The margin makes nodes 0 and 1 overlap at x = 11; id order decides.
        assert_eq!(grid.hit_test(11.0, 5.0, 2.0), Some(0));
        assert_eq!(grid.hit_test(20.0, 20.0, 0.0), Some(3));
    }

    #[test]
    fn normal_state_detaches_animation() {
        let mut grid = NodeGrid::new(3);
        let node = grid.get_mut(4).unwrap();
        node.set_state(NodeState::Highlighted);
        node.animation = Some(AnimationHandle(7));
        assert!(node.is_highlighted());

        grid.reset_states();
        let node = grid.get(4).unwrap();
        assert_eq!(node.state, NodeState::Normal);
        assert_eq!(node.animation, None);
    }
}
