//! Visible data-space extent derived from the camera pose and canvas size.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::scale::{AxisSystem, AxisTransform};

/// Camera pan/zoom state in world units.
///
/// Owned and mutated by gesture handling outside the pipeline; read-only
/// here. `zoom` is a positive magnification factor: at zoom 1, one world
/// unit covers one canvas pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: DVec2,
    pub zoom: f64,
}

impl CameraPose {
    /// Panics when `zoom` is not a positive finite number; such a pose is a
    /// collaborator contract violation, not a data condition.
    pub fn new(position: DVec2, zoom: f64) -> Self {
        assert!(
            zoom.is_finite() && zoom > 0.0,
            "camera zoom must be a positive finite number, got {zoom}"
        );
        Self { position, zoom }
    }

    pub fn centered(zoom: f64) -> Self {
        Self::new(DVec2::ZERO, zoom)
    }
}

/// Canvas size in physical pixels; changes on window or container resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A zero-sized canvas (not laid out yet) has nothing to show.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The data-space rectangle currently inside the camera viewport.
///
/// Pure function output: recomputed from the current pose on every relevant
/// event, never stored with independent identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleExtent {
    pub x_domain: Domain,
    pub y_domain: Domain,
    pub width: f64,
    pub height: f64,
    pub x_data_per_pixel: f64,
    pub y_data_per_pixel: f64,
}

impl VisibleExtent {
    /// Compute the visible extent for a camera pose.
    ///
    /// Per axis the viewport spans `position ± size / (2 * zoom)` in world
    /// units; inverting those bounds through the axis transform yields the
    /// visible data interval. Endpoints are re-ordered via
    /// [`Domain::spanning`] so a decreasing (flipped) transform cannot
    /// produce an inverted domain. Idempotent: recomputing with an unchanged
    /// pose yields an identical value.
    pub fn compute(pose: &CameraPose, canvas: CanvasSize, axes: &AxisSystem) -> VisibleExtent {
        let half_w = canvas.width as f64 / (2.0 * pose.zoom);
        let half_h = canvas.height as f64 / (2.0 * pose.zoom);

        let x_domain = Domain::spanning(
            axes.x.invert(pose.position.x - half_w),
            axes.x.invert(pose.position.x + half_w),
        );
        let y_domain = Domain::spanning(
            axes.y.invert(pose.position.y - half_h),
            axes.y.invert(pose.position.y + half_h),
        );

        VisibleExtent {
            x_domain,
            y_domain,
            width: x_domain.width(),
            height: y_domain.width(),
            x_data_per_pixel: x_domain.width() / canvas.width as f64,
            y_data_per_pixel: y_domain.width() / canvas.height as f64,
        }
    }
}

/// Skips extent recomputation while the camera holds still.
///
/// A pure-function memo keyed by `(pose, canvas)` rather than imperative
/// dirty flags: recomputing unconditionally gives the same answer, the memo
/// only avoids waking the downstream stages for a no-op frame.
#[derive(Debug, Default)]
pub struct ExtentMemo {
    entry: Option<((CameraPose, CanvasSize), VisibleExtent)>,
}

impl ExtentMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the extent for the pose, recomputing only when pose or canvas
    /// changed since the last call. The flag reports whether this call
    /// recomputed.
    pub fn update(
        &mut self,
        pose: &CameraPose,
        canvas: CanvasSize,
        axes: &AxisSystem,
    ) -> (VisibleExtent, bool) {
        let key = (*pose, canvas);
        if let Some((cached_key, value)) = &self.entry {
            if *cached_key == key {
                return (*value, false);
            }
        }
        let value = VisibleExtent::compute(pose, canvas, axes);
        self.entry = Some((key, value));
        (value, true)
    }

    /// Drop the cached extent, e.g. after the axis system is replaced.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
