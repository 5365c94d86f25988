//! From resolved index window back to the world-space rectangle to draw.

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::lod::{GridLayout, IndexRange, LodSlice};
use crate::scale::{AxisSystem, AxisTransform, LinearScale};

/// Placement of the textured quad in world coordinates: the draw instruction
/// handed to the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadPlacement {
    /// World-space corner with the smallest x and y, z = 0.
    pub position: [f64; 3],
    /// World-space width and height.
    pub size: (f64, f64),
    /// Mirror the texture vertically (the ordinate orientation flag).
    pub flip_y: bool,
}

impl QuadPlacement {
    pub fn width(&self) -> f64 {
        self.size.0
    }

    pub fn height(&self) -> f64 {
        self.size.1
    }
}

/// Maps index-space slices to world-space geometry.
///
/// Owns the memoized per-axis data↔index scales, rebuilt only when the
/// dataset layout changes; pan and zoom reuse them untouched.
#[derive(Debug)]
pub struct GeometryMapper {
    layout: GridLayout,
    x_index: LinearScale,
    y_index: LinearScale,
}

impl GeometryMapper {
    pub fn new(layout: &GridLayout) -> Self {
        Self {
            layout: *layout,
            x_index: index_scale(&layout.x_domain, layout.shape.rows),
            y_index: index_scale(&layout.y_domain, layout.shape.cols),
        }
    }

    /// Rebuild the index scales if the layout changed since they were built.
    pub fn sync(&mut self, layout: &GridLayout) {
        if self.layout != *layout {
            *self = GeometryMapper::new(layout);
        }
    }

    /// Compute the world-space rectangle covering a resolved slice.
    ///
    /// Index space goes back to data space through the inverted index scale,
    /// then to world space through the axis transform. Both scales are
    /// endpoint-exact, so a slice flush with the array boundary lands
    /// exactly on the axis world extent: full zoom-out leaves no rounding
    /// gap between the quad edge and the axis edge.
    pub fn place(&mut self, slice: &LodSlice, layout: &GridLayout, axes: &AxisSystem) -> QuadPlacement {
        self.sync(layout);
        let (x_min, x_max) = axis_span(
            &slice.x_slice,
            self.layout.shape.rows,
            &self.x_index,
            axes.x.as_ref(),
        );
        let (y_min, y_max) = axis_span(
            &slice.y_slice,
            self.layout.shape.cols,
            &self.y_index,
            axes.y.as_ref(),
        );
        QuadPlacement {
            position: [x_min, y_min, 0.0],
            size: (x_max - x_min, y_max - y_min),
            flip_y: axes.flip_y,
        }
    }
}

/// Increasing map from the axis data domain onto `[0, len]` index space.
fn index_scale(domain: &Domain, len: usize) -> LinearScale {
    LinearScale::new((domain.min, domain.max), (0.0, len as f64))
}

/// World-space span of one axis of the slice, ordered min to max.
fn axis_span(
    slice: &IndexRange,
    len: usize,
    index: &LinearScale,
    world: &dyn AxisTransform,
) -> (f64, f64) {
    // The raw slice may carry its inclusive-edge +1 past the array; the
    // drawn rectangle covers the samples that actually exist.
    let bounded = slice.clamp(len);
    let a = world.forward(index.invert(bounded.begin as f64));
    let b = world.forward(index.invert(bounded.end as f64));
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
