//! Fieldscope Core Library
//!
//! Viewport-driven level-of-detail windowing for large 2D scalar fields:
//! given a camera pose, a canvas size and a dataset far larger than can be
//! materialized at interactive framerates, decide which sub-window of the
//! backing grid to materialize, at which decimation, and where the resulting
//! textured rectangle must be drawn so it lines up with the axis system.
//!
//! The per-frame pipeline runs in three strictly ordered stages:
//! visible extent ([`extent`]) → index window resolution ([`lod`]) →
//! world-space quad placement ([`geometry`]). [`frame::FrameResolver`] ties
//! the stages together. Sampled data comes either from a resident array
//! ([`field::ScalarField`]) or a procedural sampler ([`fractal`]).

pub mod domain;
pub mod error;
pub mod extent;
pub mod field;
pub mod fractal;
pub mod frame;
pub mod geometry;
pub mod io;
pub mod lod;
pub mod scale;

// Re-export commonly used types and functions
pub use domain::{intersect_all, normalize, Domain};
pub use error::{FieldError, FieldResult};
pub use extent::{CameraPose, CanvasSize, ExtentMemo, VisibleExtent};
pub use field::{FieldWindow, ScalarField};
pub use fractal::{FractalField, SampleMemo};
pub use frame::{FrameResolver, FrameView};
pub use geometry::{GeometryMapper, QuadPlacement};
pub use io::read_npy;
pub use lod::{resolve, GridLayout, GridShape, IndexRange, LodSlice};
pub use scale::{AxisSystem, AxisTransform, LinearScale, LogScale};

/// Version information for the fieldscope core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
