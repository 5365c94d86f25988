//! Scalar → color mapping for heatmap rendering.

use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use fieldscope_core::Domain;

/// Built-in color maps, interpolated between control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMap {
    #[default]
    Viridis,
    Inferno,
    Grayscale,
}

/// Evenly spaced control points, dark to bright.
const VIRIDIS: [[u8; 3]; 5] = [
    [68, 1, 84],
    [59, 82, 139],
    [33, 145, 140],
    [94, 201, 98],
    [253, 231, 37],
];

const INFERNO: [[u8; 3]; 5] = [
    [0, 0, 4],
    [87, 16, 110],
    [188, 55, 84],
    [249, 142, 9],
    [252, 255, 164],
];

impl ColorMap {
    /// Color at position `t` in `[0, 1]`; values outside clamp.
    pub fn sample(&self, t: f64) -> [u8; 3] {
        let t = t.clamp(0.0, 1.0);
        match self {
            ColorMap::Grayscale => {
                let v = (t * 255.0).round() as u8;
                [v, v, v]
            }
            ColorMap::Viridis => lerp_stops(&VIRIDIS, t),
            ColorMap::Inferno => lerp_stops(&INFERNO, t),
        }
    }
}

impl FromStr for ColorMap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "viridis" => Ok(ColorMap::Viridis),
            "inferno" => Ok(ColorMap::Inferno),
            "gray" | "grey" | "grayscale" => Ok(ColorMap::Grayscale),
            other => Err(format!(
                "unknown colormap '{other}', expected viridis, inferno or gray"
            )),
        }
    }
}

fn lerp_stops(stops: &[[u8; 3]; 5], t: f64) -> [u8; 3] {
    let scaled = t * (stops.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(stops.len() - 2);
    let frac = scaled - lower as f64;
    let a = stops[lower];
    let b = stops[lower + 1];
    [
        lerp_channel(a[0], b[0], frac),
        lerp_channel(a[1], b[1], frac),
        lerp_channel(a[2], b[2], frac),
    ]
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

/// How raw sample values map onto colormap positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    #[default]
    Linear,
    Log,
}

/// Normalization of sample values into `[0, 1]` colormap positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    domain: Domain,
    scale_type: ScaleType,
    invert: bool,
}

impl ColorScale {
    /// A log scale over a non-positive domain has no meaning; it degrades
    /// to linear with a warning rather than producing NaN positions.
    pub fn new(domain: Domain, scale_type: ScaleType, invert: bool) -> Self {
        let scale_type = if scale_type == ScaleType::Log && domain.min <= 0.0 {
            warn!(
                "log color scale requires a positive domain, got [{}, {}]; using linear",
                domain.min, domain.max
            );
            ScaleType::Linear
        } else {
            scale_type
        };
        Self {
            domain,
            scale_type,
            invert,
        }
    }

    /// Colormap position for a sample, clamped to `[0, 1]`; `None` for
    /// non-finite samples, which render as transparent.
    pub fn position(&self, value: f32) -> Option<f64> {
        let value = value as f64;
        if !value.is_finite() {
            return None;
        }
        let t = if self.domain.is_degenerate() {
            0.5
        } else {
            match self.scale_type {
                ScaleType::Linear => {
                    (value - self.domain.min) / self.domain.width()
                }
                ScaleType::Log => {
                    let value = value.max(f64::MIN_POSITIVE);
                    (value.log10() - self.domain.min.log10())
                        / (self.domain.max.log10() - self.domain.min.log10())
                }
            }
        };
        let t = t.clamp(0.0, 1.0);
        Some(if self.invert { 1.0 - t } else { t })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(ColorMap::Viridis.sample(0.0), [68, 1, 84]);
        assert_eq!(ColorMap::Viridis.sample(1.0), [253, 231, 37]);
        assert_eq!(ColorMap::Grayscale.sample(0.0), [0, 0, 0]);
        assert_eq!(ColorMap::Grayscale.sample(1.0), [255, 255, 255]);
    }

    #[test]
    fn test_colormap_clamps_out_of_range() {
        assert_eq!(ColorMap::Inferno.sample(-0.5), ColorMap::Inferno.sample(0.0));
        assert_eq!(ColorMap::Inferno.sample(1.5), ColorMap::Inferno.sample(1.0));
    }

    #[test]
    fn test_colormap_midpoint_interpolates() {
        // Halfway between stops 2 and 3 of viridis.
        let mid = ColorMap::Viridis.sample(0.625);
        assert!(mid[0] > 33 && mid[0] < 94);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("viridis".parse::<ColorMap>().unwrap(), ColorMap::Viridis);
        assert_eq!("Gray".parse::<ColorMap>().unwrap(), ColorMap::Grayscale);
        assert!("plasma".parse::<ColorMap>().is_err());
    }

    #[test]
    fn test_linear_positions() {
        let scale = ColorScale::new(Domain::new(0.0, 10.0), ScaleType::Linear, false);
        assert_eq!(scale.position(0.0), Some(0.0));
        assert_eq!(scale.position(5.0), Some(0.5));
        assert_eq!(scale.position(10.0), Some(1.0));
        // Out-of-domain samples clamp instead of overshooting.
        assert_eq!(scale.position(20.0), Some(1.0));
        assert_eq!(scale.position(-3.0), Some(0.0));
    }

    #[test]
    fn test_inverted_positions() {
        let scale = ColorScale::new(Domain::new(0.0, 1.0), ScaleType::Linear, true);
        assert_eq!(scale.position(0.0), Some(1.0));
        assert_eq!(scale.position(1.0), Some(0.0));
    }

    #[test]
    fn test_log_positions() {
        let scale = ColorScale::new(Domain::new(1.0, 100.0), ScaleType::Log, false);
        assert_eq!(scale.position(1.0), Some(0.0));
        let mid = scale.position(10.0).unwrap();
        assert!((mid - 0.5).abs() < 1e-12);
        assert_eq!(scale.position(100.0), Some(1.0));
    }

    #[test]
    fn test_log_falls_back_on_nonpositive_domain() {
        let scale = ColorScale::new(Domain::new(0.0, 100.0), ScaleType::Log, false);
        assert_eq!(scale.position(50.0), Some(0.5));
    }

    #[test]
    fn test_nan_is_transparent() {
        let scale = ColorScale::new(Domain::new(0.0, 1.0), ScaleType::Linear, false);
        assert_eq!(scale.position(f32::NAN), None);
    }

    #[test]
    fn test_degenerate_domain_centers() {
        let scale = ColorScale::new(Domain::new(3.0, 3.0), ScaleType::Linear, false);
        assert_eq!(scale.position(3.0), Some(0.5));
    }
}
