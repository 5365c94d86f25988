//! Procedural escape-time field: samples are computed on demand for an
//! index window, with no backing array behind them.

use rayon::prelude::*;

use crate::domain::Domain;
use crate::field::FieldWindow;
use crate::lod::GridShape;

/// Escape-time sampler over the complex plane.
///
/// Produces the same shape of output as a backing-array slice, so it
/// substitutes transparently wherever sampled data is expected. Purely
/// functional and deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FractalField {
    pub max_iterations: u32,
}

impl Default for FractalField {
    fn default() -> Self {
        Self {
            max_iterations: 100,
        }
    }
}

impl FractalField {
    /// Panics on a zero iteration budget; the escape normalization divides
    /// by it.
    pub fn new(max_iterations: u32) -> Self {
        assert!(max_iterations > 0, "iteration budget must be positive");
        Self { max_iterations }
    }

    /// The data-space extent the classic set lives in; a natural default
    /// dataset domain for this sampler.
    pub fn canonical_domains() -> (Domain, Domain) {
        (Domain::new(-2.5, 1.5), Domain::new(-2.0, 2.0))
    }

    /// Sample the field over a window: cell `(row, col)` maps to the center
    /// of its grid cell within the supplied domains, rows along the
    /// abscissa (the real axis).
    ///
    /// Expensive at high iteration counts; rows are sampled in parallel.
    /// Callers re-sampling per frame should go through [`SampleMemo`].
    pub fn sample(&self, x_domain: &Domain, y_domain: &Domain, shape: GridShape) -> FieldWindow {
        let x_step = x_domain.width() / shape.rows as f64;
        let y_step = y_domain.width() / shape.cols as f64;

        let mut values = vec![0.0f32; shape.len()];
        values
            .par_chunks_mut(shape.cols)
            .enumerate()
            .for_each(|(row, out)| {
                let cx = x_domain.min + (row as f64 + 0.5) * x_step;
                for (col, value) in out.iter_mut().enumerate() {
                    let cy = y_domain.min + (col as f64 + 0.5) * y_step;
                    *value = self.escape_value(cx, cy);
                }
            });

        FieldWindow {
            rows: shape.rows,
            cols: shape.cols,
            values,
        }
    }

    /// Normalized escape iteration for the parameter `c = cx + i·cy`:
    /// iterate `z ← z² + c`, escaping when `|z|² > 4`; `1.0` when the orbit
    /// stays bounded for the full budget.
    fn escape_value(&self, cx: f64, cy: f64) -> f32 {
        let mut zx = 0.0f64;
        let mut zy = 0.0f64;
        for i in 0..self.max_iterations {
            let zx2 = zx * zx;
            let zy2 = zy * zy;
            if zx2 + zy2 > 4.0 {
                return i as f32 / self.max_iterations as f32;
            }
            zy = 2.0 * zx * zy + cy;
            zx = zx2 - zy2 + cx;
        }
        1.0
    }
}

/// Single-entry sample cache keyed by the exact window request.
///
/// Holding only the most recent key gives last-pose-wins for free in the
/// synchronous frame model: a window computed for a superseded viewport can
/// never be observed once a newer request lands.
#[derive(Debug, Default)]
pub struct SampleMemo {
    entry: Option<(SampleKey, FieldWindow)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SampleKey {
    x_bits: (u64, u64),
    y_bits: (u64, u64),
    shape: GridShape,
    max_iterations: u32,
}

impl SampleKey {
    fn new(field: &FractalField, x: &Domain, y: &Domain, shape: GridShape) -> Self {
        Self {
            x_bits: (x.min.to_bits(), x.max.to_bits()),
            y_bits: (y.min.to_bits(), y.max.to_bits()),
            shape,
            max_iterations: field.max_iterations,
        }
    }
}

impl SampleMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample through the cache: recompute only when domain, shape or
    /// iteration budget changed since the last call.
    pub fn sample(
        &mut self,
        field: &FractalField,
        x_domain: &Domain,
        y_domain: &Domain,
        shape: GridShape,
    ) -> &FieldWindow {
        let key = SampleKey::new(field, x_domain, y_domain, shape);
        if self.entry.as_ref().map(|(k, _)| *k) != Some(key) {
            self.entry = None;
        }
        let (_, window) = self
            .entry
            .get_or_insert_with(|| (key, field.sample(x_domain, y_domain, shape)));
        window
    }
}
