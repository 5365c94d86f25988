//! In-memory scalar fields and decimated window extraction.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Domain;
use crate::error::{FieldError, FieldResult};
use crate::lod::{GridShape, LodSlice};

/// A sampled rectangular window, shaped like a backing-array slice whether
/// it came from a stored field or a procedural sampler. Row-major, rows
/// along the abscissa. May be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWindow {
    pub rows: usize,
    pub cols: usize,
    pub values: Vec<f32>,
}

impl FieldWindow {
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.values[row * self.cols + col])
    }
}

/// Resident row-major 2D scalar field; rows index the abscissa.
///
/// Read-only once built: the pipeline never mutates the backing array.
#[derive(Debug, Clone)]
pub struct ScalarField {
    shape: GridShape,
    values: Vec<f32>,
}

impl ScalarField {
    pub fn from_values(shape: GridShape, values: Vec<f32>) -> FieldResult<Self> {
        if values.len() != shape.len() {
            return Err(FieldError::ShapeMismatch {
                expected: shape.len(),
                actual: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    /// Uniform random field in `[0, 1)`, seedable for reproducibility.
    pub fn random(shape: GridShape, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let values = (0..shape.len()).map(|_| rng.gen::<f32>()).collect();
        Self { shape, values }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.shape.rows || col >= self.shape.cols {
            return None;
        }
        Some(self.values[row * self.shape.cols + col])
    }

    /// Min/max of the finite samples, for color scaling. NaN samples are
    /// skipped the way a nanmin/nanmax reduction would; an all-NaN field
    /// falls back to the unit interval.
    pub fn value_domain(&self) -> Domain {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.values {
            if !v.is_finite() {
                continue;
            }
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        if min > max {
            Domain::new(0.0, 1.0)
        } else {
            Domain::new(min as f64, max as f64)
        }
    }

    /// Materialize the decimated window a resolved slice names.
    ///
    /// Strides the backing array by `level_of_detail` along both axes over
    /// the decimated index ranges. Every index is clamped into bounds, so
    /// the inclusive-edge `+1` carried by raw slices can never read past
    /// the array.
    pub fn window(&self, slice: &LodSlice) -> FieldWindow {
        let lod = slice.level_of_detail as usize;
        let x = slice.x_lod_slice.clamp(self.shape.rows / lod);
        let y = slice.y_lod_slice.clamp(self.shape.cols / lod);

        let mut values = Vec::with_capacity(x.len() * y.len());
        for i in x.begin..x.end {
            let row = (i * lod).min(self.shape.rows - 1);
            for j in y.begin..y.end {
                let col = (j * lod).min(self.shape.cols - 1);
                values.push(self.values[row * self.shape.cols + col]);
            }
        }
        FieldWindow {
            rows: x.len(),
            cols: y.len(),
            values,
        }
    }
}
