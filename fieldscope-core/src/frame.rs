//! Per-frame pipeline: visible extent → LOD window → quad placement.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::extent::{CameraPose, CanvasSize, ExtentMemo, VisibleExtent};
use crate::geometry::{GeometryMapper, QuadPlacement};
use crate::lod::{self, GridLayout, LodSlice};
use crate::scale::AxisSystem;

/// Everything the rendering and data-source collaborators need for one
/// frame: the visible extent, the index window to fetch, and where to draw
/// the resulting texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub extent: VisibleExtent,
    pub slice: LodSlice,
    pub quad: QuadPlacement,
}

/// Runs the windowing stages in pipeline order once per rendered frame.
///
/// Owns the memoized pieces (extent cache, index scales). Camera pose and
/// canvas size stay externally owned and are passed in each frame; the
/// dataset layout and axis system are swapped through the setters when the
/// corresponding collaborator state changes.
pub struct FrameResolver {
    layout: GridLayout,
    axes: AxisSystem,
    extent: ExtentMemo,
    geometry: GeometryMapper,
}

impl FrameResolver {
    pub fn new(layout: GridLayout, axes: AxisSystem) -> Self {
        Self {
            geometry: GeometryMapper::new(&layout),
            extent: ExtentMemo::new(),
            layout,
            axes,
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn axes(&self) -> &AxisSystem {
        &self.axes
    }

    /// Swap in new dataset metadata. The memoized index scales rebuild here,
    /// before any geometry computation of the next frame reads them.
    pub fn set_layout(&mut self, layout: GridLayout) {
        self.layout = layout;
        self.geometry.sync(&layout);
    }

    /// Replace the axis transforms, e.g. after a canvas resize rescales the
    /// world extent.
    pub fn set_axes(&mut self, axes: AxisSystem) {
        self.axes = axes;
        self.extent.invalidate();
    }

    /// Resolve one frame.
    ///
    /// `None` means no part of the dataset is visible (or the canvas has no
    /// size yet): the renderer leaves the background untouched and the next
    /// frame that pans back into range resumes with no re-initialization.
    pub fn frame(&mut self, pose: &CameraPose, canvas: CanvasSize) -> Option<FrameView> {
        let (extent, recomputed) = self.extent.update(pose, canvas, &self.axes);
        let slice = lod::resolve(&extent, &self.layout)?;
        let quad = self.geometry.place(&slice, &self.layout, &self.axes);
        if recomputed {
            debug!(
                "view x=[{:.4}, {:.4}] y=[{:.4}, {:.4}] lod={} window={}x{}",
                slice.x_data.min,
                slice.x_data.max,
                slice.y_data.min,
                slice.y_data.max,
                slice.level_of_detail,
                slice.x_lod_slice.len(),
                slice.y_lod_slice.len(),
            );
        }
        Some(FrameView {
            extent,
            slice,
            quad,
        })
    }
}
