#![forbid(unsafe_code)]

//! Adaptive grid measurement and node placement.
//!
//! [`measure`] turns the caller's size constraints plus a [`LayoutParams`]
//! into a [`Measurement`]; [`layout`] turns a measurement into one [`Rect`]
//! per node, in row-major order.
//!
//! # Layout modes
//!
//! - **Spacing-Padding** (a non-negative spacing is configured): node size,
//!   spacing, and padding are honored exactly when they fit. Under pressure
//!   the engine first keeps the node size and shrinks spacing and padding by
//!   a common ratio; if there is no room for that it keeps spacing and padding
//!   and shrinks the node; if the node would vanish it falls back to
//!   Identical-Area.
//! - **Identical-Area** (no spacing, or spacing infeasible): the area is cut
//!   into `n × n` equal cells and each node is centered in its cell.
//!
//! # Invariants
//!
//! 1. For a positive measured node size, every rect lies inside
//!    `[0, width) × [0, height)`.
//! 2. Rects never overlap and appear in raster order.
//! 3. An axis that is not [`Constraint::Exactly`] never grows past what the
//!    grid needs; the final area is squared by shrinking the longer free axis.
//! 4. All coordinates are truncated to whole pixels.

use crate::geometry::Rect;

/// One axis of the space offered by the embedding view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// The lock must occupy exactly this many pixels.
    Exactly(u32),
    /// The lock may use up to this many pixels.
    AtMost(u32),
    /// No limit; the lock sizes itself to its content.
    Unbounded,
}

impl Constraint {
    #[inline]
    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Exactly(_))
    }

    /// Resolve to a concrete pixel count, using `natural` when unbounded.
    fn resolve(self, natural: f32) -> i32 {
        match self {
            Self::Exactly(v) | Self::AtMost(v) => i32::try_from(v).unwrap_or(i32::MAX),
            Self::Unbounded => natural.ceil().max(0.0) as i32,
        }
    }
}

/// Which placement rule produced a [`Measurement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    SpacingPadding,
    IdenticalArea,
}

/// Layout inputs taken from the lock configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// N of the N×N grid.
    pub grid_size: usize,
    /// Desired node size in pixels.
    pub node_size: f32,
    /// Gap between neighbouring nodes; `None` or negative selects Identical-Area.
    pub spacing: Option<f32>,
    /// Outer padding, Spacing-Padding mode only.
    pub padding: f32,
    /// Identical-Area mode only: keep every cell square and center the grid.
    pub square_cells: bool,
}

impl LayoutParams {
    /// The configured spacing, if it selects Spacing-Padding mode.
    #[inline]
    pub fn effective_spacing(&self) -> Option<f32> {
        self.spacing.filter(|s| *s >= 0.0)
    }
}

/// Result of a measurement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Width the lock wants to occupy.
    pub width: i32,
    /// Height the lock wants to occupy.
    pub height: i32,
    /// Node side length in whole pixels.
    pub node_size: i32,
    pub mode: LayoutMode,
    /// Padding after shrinking; zero in Identical-Area mode.
    pub padding: f32,
    /// Spacing after shrinking; zero in Identical-Area mode.
    pub spacing: f32,
}

/// Measure the lock for the given constraints.
pub fn measure(width: Constraint, height: Constraint, params: &LayoutParams) -> Measurement {
    let n = params.grid_size.max(1);
    let cells = n as f32;
    let gaps = (n - 1) as f32;
    let desired = params.node_size;

    let spacing_padding = params.effective_spacing().and_then(|spacing| {
        let padding = params.padding;
        let natural = padding * 2.0 + spacing * gaps + cells * desired;
        let mut w = width.resolve(natural);
        let mut h = height.resolve(natural);
        let mut node_size = desired;
        let mut measured_padding = padding;
        let mut measured_spacing = spacing;

        let max_node_w = (w as f32 - padding * 2.0 - spacing * gaps) / cells;
        let max_node_h = (h as f32 - padding * 2.0 - spacing * gaps) / cells;
        let max_node = max_node_w.min(max_node_h);

        if node_size > max_node {
            let x_remains = (w as f32 - cells * node_size) as i32;
            let y_remains = (h as f32 - cells * node_size) as i32;
            let min_remains = x_remains.min(y_remains);
            let reserved = padding * 2.0 + spacing * gaps;

            if min_remains > 0 && reserved > 0.0 {
                let ratio = min_remains as f32 / reserved;
                measured_padding *= ratio;
                measured_spacing *= ratio;
                tracing::trace!(
                    ratio,
                    padding = measured_padding,
                    spacing = measured_spacing,
                    "shrinking padding and spacing"
                );
            } else {
                node_size = max_node;
                tracing::trace!(node_size, "shrinking node size");
            }
        } else {
            let content = natural as i32;
            if !width.is_exact() {
                w = content;
            }
            if !height.is_exact() {
                h = content;
            }
        }

        if node_size <= 0.0 {
            tracing::trace!(node_size, "spacing mode infeasible, using identical areas");
            return None;
        }

        Some(Measurement {
            width: w,
            height: h,
            node_size: node_size as i32,
            mode: LayoutMode::SpacingPadding,
            padding: measured_padding,
            spacing: measured_spacing,
        })
    });

    let mut measured = spacing_padding.unwrap_or_else(|| {
        let natural = cells * desired;
        let w = width.resolve(natural);
        let h = height.resolve(natural);
        let n_px = i32::try_from(n).unwrap_or(i32::MAX);
        let max_node = (w / n_px).min(h / n_px) as f32;
        Measurement {
            width: w,
            height: h,
            node_size: desired.min(max_node).max(0.0) as i32,
            mode: LayoutMode::IdenticalArea,
            padding: 0.0,
            spacing: 0.0,
        }
    });

    if measured.width > measured.height && !width.is_exact() {
        measured.width = measured.height;
    } else if measured.width < measured.height && !height.is_exact() {
        measured.height = measured.width;
    }

    tracing::trace!(
        width = measured.width,
        height = measured.height,
        node_size = measured.node_size,
        mode = ?measured.mode,
        "measured"
    );
    measured
}

/// Place every node for a finished measurement.
///
/// Returns `grid_size²` rects in row-major order.
pub fn layout(measured: &Measurement, params: &LayoutParams) -> Vec<Rect> {
    let n = params.grid_size.max(1);
    let cells = n as f32;
    let gaps = (n - 1) as f32;
    let node_px = measured.node_size.max(0);
    let node = node_px as f32;
    let width = measured.width as f32;
    let height = measured.height as f32;

    let mut rects = Vec::with_capacity(n * n);
    match measured.mode {
        LayoutMode::IdenticalArea => {
            let n_px = i32::try_from(n).unwrap_or(i32::MAX);
            let mut area_w = (measured.width / n_px) as f32;
            let mut area_h = (measured.height / n_px) as f32;
            let mut pad_w = 0.0;
            let mut pad_h = 0.0;
            if params.square_cells {
                let area = area_w.min(area_h);
                area_w = area;
                area_h = area;
                pad_w = (width - cells * area) / 2.0;
                pad_h = (height - cells * area) / 2.0;
            }
            for id in 0..n * n {
                let row = (id / n) as f32;
                let col = (id % n) as f32;
                let left = (pad_w + col * area_w + (area_w - node) / 2.0) as i32;
                let top = (pad_h + row * area_h + (area_h - node) / 2.0) as i32;
                rects.push(Rect::square(left, top, node_px));
            }
        }
        LayoutMode::SpacingPadding => {
            let pitch = node + measured.spacing;
            let pad_w = (width - cells * node - measured.spacing * gaps) / 2.0;
            let pad_h = (height - cells * node - measured.spacing * gaps) / 2.0;
            for id in 0..n * n {
                let row = (id / n) as f32;
                let col = (id % n) as f32;
                let left = (pad_w + col * pitch) as i32;
                let top = (pad_h + row * pitch) as i32;
                rects.push(Rect::square(left, top, node_px));
            }
        }
    }
    rects
}
