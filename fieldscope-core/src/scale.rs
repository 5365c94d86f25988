//! Bidirectional axis transforms between data, world and index space.

use crate::domain::Domain;

/// The seam to the axis-system collaborator: the pipeline only ever calls
/// `forward` (data → world) and `invert` (world → data), and treats the
/// mapping as an opaque invertible transform.
pub trait AxisTransform {
    fn forward(&self, data: f64) -> f64;
    fn invert(&self, world: f64) -> f64;
}

/// Affine map between two endpoint pairs, either of which may be decreasing
/// (a flipped axis is a decreasing range).
///
/// Endpoint-exact: an input equal to a domain endpoint maps to the matching
/// range endpoint without rounding slack, and vice versa for `invert`. The
/// geometry mapper relies on this to keep full-extent slices flush with the
/// axis world extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    /// Panics on a degenerate (zero-width) domain or range, which has no
    /// invertible mapping.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        assert!(domain.0 != domain.1, "degenerate scale domain {domain:?}");
        assert!(range.0 != range.1, "degenerate scale range {range:?}");
        Self { domain, range }
    }

    /// Increasing map from one interval onto another.
    pub fn from_domains(domain: Domain, range: Domain) -> Self {
        Self::new((domain.min, domain.max), (range.min, range.max))
    }
}

impl AxisTransform for LinearScale {
    fn forward(&self, data: f64) -> f64 {
        if data == self.domain.0 {
            return self.range.0;
        }
        if data == self.domain.1 {
            return self.range.1;
        }
        let t = (data - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    fn invert(&self, world: f64) -> f64 {
        if world == self.range.0 {
            return self.domain.0;
        }
        if world == self.range.1 {
            return self.domain.1;
        }
        let t = (world - self.range.0) / (self.range.1 - self.range.0);
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }
}

/// Log10 data axis drawn on a linear world axis. Positive domains only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    linear: LinearScale,
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        assert!(
            domain.0 > 0.0 && domain.1 > 0.0,
            "log scale requires a strictly positive domain, got {domain:?}"
        );
        Self {
            linear: LinearScale::new((domain.0.log10(), domain.1.log10()), range),
        }
    }
}

impl AxisTransform for LogScale {
    fn forward(&self, data: f64) -> f64 {
        self.linear.forward(data.log10())
    }

    fn invert(&self, world: f64) -> f64 {
        10f64.powf(self.linear.invert(world))
    }
}

/// Per-axis transforms plus the ordinate orientation flag.
pub struct AxisSystem {
    pub x: Box<dyn AxisTransform + Send + Sync>,
    pub y: Box<dyn AxisTransform + Send + Sync>,
    pub flip_y: bool,
}

impl AxisSystem {
    pub fn new(
        x: Box<dyn AxisTransform + Send + Sync>,
        y: Box<dyn AxisTransform + Send + Sync>,
        flip_y: bool,
    ) -> Self {
        Self { x, y, flip_y }
    }

    /// Linear axes that fill a canvas: each data domain maps onto a world
    /// extent of the canvas size, centered on the origin, so the full dataset
    /// exactly fills the viewport at zoom 1 with the camera at the origin.
    pub fn fitting_canvas(
        x_domain: Domain,
        y_domain: Domain,
        canvas_width: u32,
        canvas_height: u32,
        flip_y: bool,
    ) -> Self {
        let half_w = canvas_width as f64 / 2.0;
        let half_h = canvas_height as f64 / 2.0;
        Self {
            x: Box::new(LinearScale::new((x_domain.min, x_domain.max), (-half_w, half_w))),
            y: Box::new(LinearScale::new((y_domain.min, y_domain.max), (-half_h, half_h))),
            flip_y,
        }
    }
}
