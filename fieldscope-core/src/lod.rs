//! Viewport → index-window resolution: which sub-region of the backing grid
//! to materialize, and at what decimation.

use serde::{Deserialize, Serialize};

use crate::domain::{normalize, Domain};
use crate::extent::VisibleExtent;

/// Logical size of the backing grid. Rows index the abscissa (x), columns
/// the ordinate (y), matching the viewer's axis convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    /// Panics on a zero dimension; datasets are non-empty by contract.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "grid shape must be positive, got {rows}x{cols}");
        Self { rows, cols }
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Declared data-space extent and shape of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub x_domain: Domain,
    pub y_domain: Domain,
    pub shape: GridShape,
}

impl GridLayout {
    pub fn new(x_domain: Domain, y_domain: Domain, shape: GridShape) -> Self {
        Self {
            x_domain,
            y_domain,
            shape,
        }
    }

    /// Layout whose domains span one data unit per sample, the convention
    /// for plain image slices without physical axis units.
    pub fn index_aligned(shape: GridShape) -> Self {
        Self {
            x_domain: Domain::new(0.0, shape.rows as f64),
            y_domain: Domain::new(0.0, shape.cols as f64),
            shape,
        }
    }
}

/// Half-open `[begin, end)` index range along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexRange {
    pub begin: usize,
    pub end: usize,
}

impl IndexRange {
    pub fn new(begin: usize, end: usize) -> Self {
        assert!(begin <= end, "inverted index range [{begin}, {end})");
        Self { begin, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Bound the range to an array of `len` elements.
    ///
    /// Raw slices keep their inclusive-edge `+1` past the end; every data
    /// access funnels through this clamp so an out-of-range index can never
    /// reach a backing array.
    pub fn clamp(&self, len: usize) -> IndexRange {
        let begin = self.begin.min(len);
        IndexRange {
            begin,
            end: self.end.min(len).max(begin),
        }
    }

    /// Whether the range touches both edges of a `len`-element axis.
    pub fn covers(&self, len: usize) -> bool {
        self.begin == 0 && self.end >= len
    }
}

/// Resolved window: the decimation level, index ranges at full and decimated
/// resolution, and the visible data-space sub-domain they cover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LodSlice {
    /// Decimation factor: 1 is native resolution, `n` means one rendered
    /// sample represents `n` underlying samples per axis. Never below 1.
    pub level_of_detail: u32,
    pub x_slice: IndexRange,
    pub y_slice: IndexRange,
    pub x_lod_slice: IndexRange,
    pub y_lod_slice: IndexRange,
    pub x_data: Domain,
    pub y_data: Domain,
}

/// Decide what sub-window to materialize for a visible extent, and at what
/// decimation. `None` is the explicit "nothing to render" signal, covering
/// an empty intersection with the dataset as well as the degenerate inputs
/// (zero-width domains, zero canvas) that would otherwise divide by zero.
pub fn resolve(extent: &VisibleExtent, layout: &GridLayout) -> Option<LodSlice> {
    let bounds = [
        extent.x_domain.min,
        extent.x_domain.max,
        extent.y_domain.min,
        extent.y_domain.max,
    ];
    if bounds.iter().any(|v| !v.is_finite()) {
        return None;
    }
    if layout.x_domain.is_degenerate()
        || layout.y_domain.is_degenerate()
        || extent.x_domain.is_degenerate()
        || extent.y_domain.is_degenerate()
    {
        return None;
    }

    let x_data = extent.x_domain.intersect(&layout.x_domain)?;
    let y_data = extent.y_domain.intersect(&layout.y_domain)?;

    // One sample per pixel along the denser axis, never below native
    // resolution. Conservative: the sparser axis renders sharper than
    // strictly needed rather than under-sampled.
    let x_bin_per_pixel =
        layout.shape.rows as f64 / layout.x_domain.width() * extent.x_data_per_pixel;
    let y_bin_per_pixel =
        layout.shape.cols as f64 / layout.y_domain.width() * extent.y_data_per_pixel;
    if !x_bin_per_pixel.is_finite() || !y_bin_per_pixel.is_finite() {
        return None;
    }
    let level_of_detail = x_bin_per_pixel.min(y_bin_per_pixel).floor().max(1.0) as u32;

    Some(LodSlice {
        level_of_detail,
        x_slice: raw_slice(&x_data, &layout.x_domain, layout.shape.rows),
        y_slice: raw_slice(&y_data, &layout.y_domain, layout.shape.cols),
        x_lod_slice: lod_slice(&x_data, &layout.x_domain, layout.shape.rows, level_of_detail),
        y_lod_slice: lod_slice(&y_data, &layout.y_domain, layout.shape.cols, level_of_detail),
        x_data,
        y_data,
    })
}

/// `[floor(len·t0), ceil(len·t1) + 1)`: the `+1` keeps the end-boundary
/// sample despite floating rounding. The end may exceed `len`; data access
/// clamps through [`IndexRange::clamp`].
fn raw_slice(visible: &Domain, dataset: &Domain, len: usize) -> IndexRange {
    let begin = (len as f64 * normalize(visible.min, dataset)).floor().max(0.0) as usize;
    let end = (len as f64 * normalize(visible.max, dataset)).ceil() as usize + 1;
    IndexRange::new(begin.min(end), end)
}

/// Same formula over the decimated axis of `floor(len / lod)` bins, with the
/// end clamped so the slice never exceeds the decimated array bounds.
fn lod_slice(visible: &Domain, dataset: &Domain, len: usize, lod: u32) -> IndexRange {
    let lod_len = len / lod as usize;
    let scaled = lod_len as f64;
    let begin = (scaled * normalize(visible.min, dataset)).floor().max(0.0) as usize;
    let end = ((scaled * normalize(visible.max, dataset)).ceil() as usize + 1).min(lod_len);
    IndexRange::new(begin.min(end), end)
}
