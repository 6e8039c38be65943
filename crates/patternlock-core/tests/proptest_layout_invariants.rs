//! Property-based tests for the geometry engine.
//!
//! For any grid size, desired node size, spacing, padding and offered space:
//!
//! 1. `layout` returns exactly `grid_size²` rects.
//! 2. **Bounds**: every non-empty rect lies inside the measured area.
//! 3. **No overlap**: no two rects share a pixel.
//! 4. **Raster order**: within a row lefts increase, within a column tops
//!    increase.
//! 5. A missing or negative spacing always yields Identical-Area layout.
//!
//! Bounds, overlap, mode selection and node size are checked over arbitrary
//! floats, unbounded axes and zero-sized constraints. Raster order is checked
//! on a half-pixel lattice, where strict ordering is exact rather than subject
//! to f32 rounding noise.

use patternlock_core::geometry::Rect;
use patternlock_core::measure::{Constraint, LayoutMode, LayoutParams, layout, measure};
use proptest::prelude::*;

fn half_steps(range: std::ops::RangeInclusive<i32>) -> impl Strategy<Value = f32> {
    range.prop_map(|v| v as f32 / 2.0)
}

fn constraint() -> impl Strategy<Value = Constraint> {
    prop_oneof![
        (1u32..=400).prop_map(Constraint::Exactly),
        (1u32..=400).prop_map(Constraint::AtMost),
    ]
}

fn any_constraint() -> impl Strategy<Value = Constraint> {
    prop_oneof![
        (0u32..=2000).prop_map(Constraint::Exactly),
        (0u32..=2000).prop_map(Constraint::AtMost),
        Just(Constraint::Unbounded),
    ]
}

fn any_params() -> impl Strategy<Value = LayoutParams> {
    (
        1usize..=7,
        0.01f32..500.0,
        proptest::option::of(-50.0f32..200.0),
        0.0f32..100.0,
        any::<bool>(),
    )
        .prop_map(
            |(grid_size, node_size, spacing, padding, square_cells)| LayoutParams {
                grid_size,
                node_size,
                spacing,
                padding,
                square_cells,
            },
        )
}

fn params() -> impl Strategy<Value = LayoutParams> {
    (
        1usize..=5,
        half_steps(2..=160),
        proptest::option::of(half_steps(-10..=40)),
        half_steps(0..=40),
        any::<bool>(),
    )
        .prop_map(
            |(grid_size, node_size, spacing, padding, square_cells)| LayoutParams {
                grid_size,
                node_size,
                spacing,
                padding,
                square_cells,
            },
        )
}

fn in_bounds(rect: &Rect, width: i32, height: i32) -> bool {
    rect.left >= 0 && rect.top >= 0 && rect.right <= width && rect.bottom <= height
}

proptest! {
    #[test]
    fn rects_fit_and_do_not_overlap(
        params in any_params(),
        width in any_constraint(),
        height in any_constraint(),
    ) {
        let measured = measure(width, height, &params);
        let rects = layout(&measured, &params);
        let n = params.grid_size;
        prop_assert_eq!(rects.len(), n * n);

        for (id, rect) in rects.iter().enumerate() {
            if rect.is_empty() {
                continue;
            }
            prop_assert!(
                in_bounds(rect, measured.width, measured.height),
                "node {} at {:?} escapes {}x{} ({:?})",
                id, rect, measured.width, measured.height, measured.mode
            );
            for other in &rects[id + 1..] {
                prop_assert!(
                    rect.intersection_opt(other).is_none(),
                    "{:?} overlaps {:?}",
                    rect, other
                );
            }
        }
    }

    #[test]
    fn rects_follow_raster_order(
        params in params(),
        width in constraint(),
        height in constraint(),
    ) {
        let measured = measure(width, height, &params);
        let rects = layout(&measured, &params);
        let n = params.grid_size;

        for row in 0..n {
            for col in 1..n {
                prop_assert!(rects[row * n + col].left >= rects[row * n + col - 1].left);
                prop_assert_eq!(rects[row * n + col].top, rects[row * n].top);
            }
        }
        for col in 0..n {
            for row in 1..n {
                prop_assert!(rects[row * n + col].top >= rects[(row - 1) * n + col].top);
                prop_assert_eq!(rects[row * n + col].left, rects[col].left);
            }
        }
        if measured.node_size > 0 {
            for row in 0..n {
                for col in 1..n {
                    prop_assert!(rects[row * n + col].left > rects[row * n + col - 1].left);
                }
            }
        }
    }

    #[test]
    fn negative_or_missing_spacing_is_identical_area(
        params in any_params(),
        spacing in proptest::option::of(-500.0f32..-0.001),
        width in any_constraint(),
        height in any_constraint(),
    ) {
        let params = LayoutParams { spacing, ..params };
        let measured = measure(width, height, &params);
        prop_assert_eq!(measured.mode, LayoutMode::IdenticalArea);
    }

    #[test]
    fn exact_axes_are_kept(
        params in any_params(),
        width in 0u32..=2000,
        height in 0u32..=2000,
    ) {
        let measured = measure(Constraint::Exactly(width), Constraint::Exactly(height), &params);
        prop_assert_eq!(measured.width, width as i32);
        prop_assert_eq!(measured.height, height as i32);
    }

    #[test]
    fn node_never_exceeds_desired_size(
        params in any_params(),
        width in any_constraint(),
        height in any_constraint(),
    ) {
        let measured = measure(width, height, &params);
        prop_assert!(measured.node_size as f32 <= params.node_size);
        prop_assert!(measured.node_size >= 0);
    }
}
