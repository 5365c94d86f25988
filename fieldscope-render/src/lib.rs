/*!
# Fieldscope CPU Renderer

Rendering collaborator for the fieldscope windowing pipeline: turns the
core's outputs (an index window of sampled data plus a world-space quad
placement) into a canvas-sized RGBA image.

The presentation concerns live here, outside the core: color maps, value
normalization (linear/log, inversion), compositing and PNG export. The core
hands over a [`fieldscope_core::FieldWindow`] and a
[`fieldscope_core::QuadPlacement`]; this crate draws them.
*/

use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::Path;

pub mod colormap;
pub mod compose;
pub mod raster;

pub use colormap::{ColorMap, ColorScale, ScaleType};
pub use compose::Compositor;
pub use raster::rasterize;

use fieldscope_core::{CameraPose, CanvasSize, Domain, FieldWindow, FrameView};

/// Presentation settings for a heatmap frame.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HeatmapStyle {
    pub color_map: ColorMap,
    pub scale_type: ScaleType,
    pub invert_color_map: bool,
    pub background: [u8; 4],
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            color_map: ColorMap::Viridis,
            scale_type: ScaleType::Linear,
            invert_color_map: false,
            background: [0, 0, 0, 255],
        }
    }
}

/// Render one resolved frame to a canvas image.
///
/// `view` may be `None` (nothing visible): the canvas comes back filled with
/// the background color only, never an error.
pub fn render_frame(
    pose: &CameraPose,
    canvas: CanvasSize,
    view: Option<&FrameView>,
    window: Option<&FieldWindow>,
    value_domain: Domain,
    style: &HeatmapStyle,
) -> RgbaImage {
    let compositor = Compositor::new(*pose, canvas);
    let mut target = compositor.blank_canvas(style.background);

    if let (Some(view), Some(window)) = (view, window) {
        let scale = ColorScale::new(value_domain, style.scale_type, style.invert_color_map);
        let texture = rasterize(window, &scale, style.color_map);
        compositor.compose(&mut target, &view.quad, &texture);
    }
    target
}

/// Write a rendered canvas to a PNG file.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldscope_core::{AxisSystem, FrameResolver, GridLayout, GridShape, ScalarField};

    fn frame_setup() -> (ScalarField, FrameResolver, CanvasSize) {
        let shape = GridShape::new(32, 32);
        let field = ScalarField::random(shape, 3);
        let layout = GridLayout::index_aligned(shape);
        let canvas = CanvasSize::new(64, 64);
        let axes = AxisSystem::fitting_canvas(layout.x_domain, layout.y_domain, 64, 64, false);
        (field, FrameResolver::new(layout, axes), canvas)
    }

    #[test]
    fn test_visible_frame_paints_canvas() {
        let (field, mut resolver, canvas) = frame_setup();
        let pose = CameraPose::centered(1.0);
        let view = resolver.frame(&pose, canvas).unwrap();
        let window = field.window(&view.slice);

        let image = render_frame(
            &pose,
            canvas,
            Some(&view),
            Some(&window),
            field.value_domain(),
            &HeatmapStyle::default(),
        );
        assert_eq!(image.dimensions(), (64, 64));
        // Full-extent view: no background pixel survives (viridis never
        // produces pure black).
        assert!(image.pixels().all(|p| p.0 != [0, 0, 0, 255]));
    }

    #[test]
    fn test_empty_frame_is_background_only() {
        let (_, _, canvas) = frame_setup();
        let pose = CameraPose::centered(1.0);
        let style = HeatmapStyle {
            background: [7, 7, 7, 255],
            ..Default::default()
        };
        let image = render_frame(&pose, canvas, None, None, Domain::new(0.0, 1.0), &style);
        assert!(image.pixels().all(|p| p.0 == [7, 7, 7, 255]));
    }

    #[test]
    fn test_save_png_round_trip() {
        let (field, mut resolver, canvas) = frame_setup();
        let pose = CameraPose::centered(1.0);
        let view = resolver.frame(&pose, canvas).unwrap();
        let window = field.window(&view.slice);
        let image = render_frame(
            &pose,
            canvas,
            Some(&view),
            Some(&window),
            field.value_domain(),
            &HeatmapStyle::default(),
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        save_png(&image, &path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), image.dimensions());
    }
}
