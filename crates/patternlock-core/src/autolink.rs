#![forbid(unsafe_code)]

//! Intermediate-node detection between two touched nodes.
//!
//! When the pointer jumps from one node to a non-adjacent one, the nodes
//! lying exactly on the straight segment between them are "auto-linked" into
//! the path. Only lattice points count: a segment with slope `2/3` on a 4×4
//! grid crosses no intermediate node, while `(0,0) → (2,2)` crosses `(1,1)`.
//!
//! [`intermediate_nodes`] always returns the full geometric sequence; the
//! caller decides which of those nodes are already in the path.

use crate::node::GridPos;

/// Tolerance used to decide whether a diagonal step lands on a lattice row.
pub const LATTICE_EPSILON: f64 = 1e-6;

/// Grid positions strictly between `first` and `second` on the line joining
/// them, ordered from `first` towards `second`.
pub fn intermediate_nodes(first: GridPos, second: GridPos) -> Vec<GridPos> {
    let (r0, c0) = (signed(first.row), signed(first.column));
    let dx = signed(second.column) - c0;
    let dy = signed(second.row) - r0;

    let mut out = Vec::new();
    if dx == 0 && dy == 0 {
        return out;
    }

    if dy == 0 {
        let step = dx.signum();
        let mut column = c0 + step;
        while column != c0 + dx {
            out.push(pos(r0, column));
            column += step;
        }
    } else if dx == 0 {
        let step = dy.signum();
        let mut row = r0 + step;
        while row != r0 + dy {
            out.push(pos(row, c0));
            row += step;
        }
    } else {
        let tan = dy as f64 / dx as f64;
        let step = dx.signum();
        let mut x_delta = step;
        while x_delta != dx {
            let y_delta = x_delta as f64 * tan;
            let rounded = y_delta.round();
            if (y_delta - rounded).abs() < LATTICE_EPSILON {
                out.push(pos(r0 + rounded as i64, c0 + x_delta));
            }
            x_delta += step;
        }
    }

    tracing::debug!(?first, ?second, linked = out.len(), "auto-link");
    out
}

#[inline]
fn signed(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

// Every emitted point lies between two on-grid endpoints, so it is non-negative.
#[inline]
fn pos(row: i64, column: i64) -> GridPos {
    GridPos::new(row as usize, column as usize)
}
