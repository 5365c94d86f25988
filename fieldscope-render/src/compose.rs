//! Place a rasterized window onto the canvas.

use image::{Rgba, RgbaImage};

use fieldscope_core::{CameraPose, CanvasSize, QuadPlacement};

/// Maps world coordinates onto canvas pixels for one frame and blits the
/// texture of a placed quad into the canvas image.
///
/// Uses the same viewport convention as the extent tracker: the camera sees
/// `position ± size / (2 · zoom)` in world units, and the screen y axis
/// points down.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    pose: CameraPose,
    canvas: CanvasSize,
}

impl Compositor {
    pub fn new(pose: CameraPose, canvas: CanvasSize) -> Self {
        Self { pose, canvas }
    }

    /// Canvas pixel position of a world point; may lie outside the canvas.
    pub fn world_to_pixel(&self, wx: f64, wy: f64) -> (f64, f64) {
        let half_w = self.canvas.width as f64 / (2.0 * self.pose.zoom);
        let half_h = self.canvas.height as f64 / (2.0 * self.pose.zoom);
        let px = (wx - (self.pose.position.x - half_w)) * self.pose.zoom;
        // Screen y grows downward, world y upward.
        let py = ((self.pose.position.y + half_h) - wy) * self.pose.zoom;
        (px, py)
    }

    /// Nearest-neighbor blit of `texture` into `target` over the quad's
    /// pixel footprint, clipped to the canvas. Transparent texels leave the
    /// background untouched.
    pub fn compose(&self, target: &mut RgbaImage, quad: &QuadPlacement, texture: &RgbaImage) {
        let (tex_w, tex_h) = texture.dimensions();
        if tex_w == 0 || tex_h == 0 || quad.width() <= 0.0 || quad.height() <= 0.0 {
            return;
        }

        let (x0, y1) = self.world_to_pixel(quad.position[0], quad.position[1]);
        let (x1, y0) = self.world_to_pixel(
            quad.position[0] + quad.width(),
            quad.position[1] + quad.height(),
        );
        // y0 is the top edge (largest world y), y1 the bottom.
        let rect_w = x1 - x0;
        let rect_h = y1 - y0;
        if rect_w <= 0.0 || rect_h <= 0.0 {
            return;
        }

        let px_begin = x0.floor().max(0.0) as u32;
        let px_end = (x1.ceil().max(0.0) as u32).min(target.width());
        let py_begin = y0.floor().max(0.0) as u32;
        let py_end = (y1.ceil().max(0.0) as u32).min(target.height());

        for py in py_begin..py_end {
            // Fraction down the quad, sampled at the pixel center.
            let fy_down = ((py as f64 + 0.5 - y0) / rect_h).clamp(0.0, 1.0);
            // Texture y follows the data ordinate, which runs bottom-up on
            // screen unless the axis is flipped.
            let fy = if quad.flip_y { fy_down } else { 1.0 - fy_down };
            let ty = ((fy * tex_h as f64) as u32).min(tex_h - 1);

            for px in px_begin..px_end {
                let fx = ((px as f64 + 0.5 - x0) / rect_w).clamp(0.0, 1.0);
                let tx = ((fx * tex_w as f64) as u32).min(tex_w - 1);

                let texel = *texture.get_pixel(tx, ty);
                if texel.0[3] == 0 {
                    continue;
                }
                target.put_pixel(px, py, texel);
            }
        }
    }

    /// A canvas-sized image filled with the background color.
    pub fn blank_canvas(&self, background: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(self.canvas.width, self.canvas.height, Rgba(background))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn checker_texture(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn test_world_to_pixel_centered() {
        let compositor = Compositor::new(CameraPose::centered(1.0), CanvasSize::new(256, 256));
        // The camera origin lands in the canvas center.
        assert_eq!(compositor.world_to_pixel(0.0, 0.0), (128.0, 128.0));
        // World top-left corner maps to pixel (0, 0).
        assert_eq!(compositor.world_to_pixel(-128.0, 128.0), (0.0, 0.0));
    }

    #[test]
    fn test_world_to_pixel_zoomed_and_panned() {
        let pose = CameraPose::new(DVec2::new(10.0, 20.0), 2.0);
        let compositor = Compositor::new(pose, CanvasSize::new(100, 100));
        // The camera position is always the canvas center.
        assert_eq!(compositor.world_to_pixel(10.0, 20.0), (50.0, 50.0));
        // One world unit right of center moves `zoom` pixels.
        assert_eq!(compositor.world_to_pixel(11.0, 20.0), (52.0, 50.0));
        // One world unit up moves `zoom` pixels up the screen.
        assert_eq!(compositor.world_to_pixel(10.0, 21.0), (50.0, 48.0));
    }

    #[test]
    fn test_full_canvas_quad_covers_every_pixel() {
        let compositor = Compositor::new(CameraPose::centered(1.0), CanvasSize::new(64, 64));
        let quad = QuadPlacement {
            position: [-32.0, -32.0, 0.0],
            size: (64.0, 64.0),
            flip_y: false,
        };
        let mut canvas = compositor.blank_canvas([9, 9, 9, 255]);
        compositor.compose(&mut canvas, &quad, &checker_texture(8, 8));

        // No background pixel survives anywhere, corners included.
        for corner in [(0, 0), (63, 0), (0, 63), (63, 63)] {
            let pixel = canvas.get_pixel(corner.0, corner.1).0;
            assert_ne!(pixel, [9, 9, 9, 255], "background at {corner:?}");
        }
    }

    #[test]
    fn test_offscreen_quad_leaves_background() {
        let compositor = Compositor::new(CameraPose::centered(1.0), CanvasSize::new(32, 32));
        let quad = QuadPlacement {
            position: [500.0, 500.0, 0.0],
            size: (10.0, 10.0),
            flip_y: false,
        };
        let mut canvas = compositor.blank_canvas([1, 2, 3, 255]);
        compositor.compose(&mut canvas, &quad, &checker_texture(4, 4));
        assert!(canvas.pixels().all(|p| p.0 == [1, 2, 3, 255]));
    }

    #[test]
    fn test_partial_quad_clips_to_canvas() {
        let compositor = Compositor::new(CameraPose::centered(1.0), CanvasSize::new(32, 32));
        // Right half of the canvas.
        let quad = QuadPlacement {
            position: [0.0, -16.0, 0.0],
            size: (16.0, 32.0),
            flip_y: false,
        };
        let mut canvas = compositor.blank_canvas([0, 0, 0, 255]);
        compositor.compose(&mut canvas, &quad, &checker_texture(4, 4));

        assert_eq!(canvas.get_pixel(0, 16).0, [0, 0, 0, 255]);
        assert_ne!(canvas.get_pixel(24, 16).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_flip_mirrors_vertically() {
        let compositor = Compositor::new(CameraPose::centered(1.0), CanvasSize::new(4, 4));
        // Texture with a single bright row at texture y = 0.
        let mut texture = RgbaImage::from_pixel(1, 4, Rgba([0, 0, 0, 255]));
        texture.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
        let quad = |flip| QuadPlacement {
            position: [-2.0, -2.0, 0.0],
            size: (4.0, 4.0),
            flip_y: flip,
        };

        let mut plain = compositor.blank_canvas([0, 0, 0, 0]);
        compositor.compose(&mut plain, &quad(false), &texture);
        let mut flipped = compositor.blank_canvas([0, 0, 0, 0]);
        compositor.compose(&mut flipped, &quad(true), &texture);

        // Unflipped: texture y = 0 is the ordinate minimum, drawn at the
        // canvas bottom. Flipped: it lands at the top.
        assert_eq!(plain.get_pixel(0, 3).0, [255, 255, 255, 255]);
        assert_eq!(flipped.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
