//! Rasterize sampled windows into RGBA textures.

use image::{Rgba, RgbaImage};

use fieldscope_core::FieldWindow;

use crate::colormap::{ColorMap, ColorScale};

/// Map a sampled window through a color scale into an RGBA texture.
///
/// Texture x follows the window rows (abscissa samples), texture y the
/// window columns, so pixel `(tx, ty)` shows sample `(tx, ty)`. Non-finite
/// samples become fully transparent pixels. An empty window yields a 0-sized
/// image.
pub fn rasterize(window: &FieldWindow, scale: &ColorScale, map: ColorMap) -> RgbaImage {
    let mut image = RgbaImage::new(window.rows as u32, window.cols as u32);
    for (tx, ty, pixel) in image.enumerate_pixels_mut() {
        let value = window.get(tx as usize, ty as usize).unwrap_or(f32::NAN);
        *pixel = match scale.position(value) {
            Some(t) => {
                let [r, g, b] = map.sample(t);
                Rgba([r, g, b, 255])
            }
            None => Rgba([0, 0, 0, 0]),
        };
    }
    image
}
