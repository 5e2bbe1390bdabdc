//! Stage zoom and pan.
//!
//! The viewport only maps screen pixels to image pixels. It never feeds
//! into style scaling, which depends on image width alone.

use tpl_core::coords::{ImageSize, PixelPoint};

pub const MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 4.0;
pub const ZOOM_STEP: f64 = 0.1;
/// Wheel zoom factors.
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Last known container size, used by zoom-to-fit.
    container: Option<(f64, f64)>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            container: None,
        }
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        1.0
    }
}

impl Viewport {
    pub fn set_container(&mut self, width: f64, height: f64) {
        self.container = Some((width, height));
    }

    pub fn zoom_in(&mut self) {
        self.scale = clamp_scale(self.scale + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.scale = clamp_scale(self.scale - ZOOM_STEP);
    }

    /// Multiply the scale, keeping the image point under `(sx, sy)` fixed.
    pub fn zoom_by(&mut self, factor: f64, sx: f64, sy: f64) {
        let old = self.scale;
        let new = clamp_scale(old * factor);
        self.offset_x = sx - (sx - self.offset_x) * new / old;
        self.offset_y = sy - (sy - self.offset_y) * new / old;
        self.scale = new;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Fit `image` inside the container without upscaling, centred.
    /// Returns `false` if either size is unknown.
    pub fn fit(&mut self, image: ImageSize) -> bool {
        let Some((cw, ch)) = self.container else {
            return false;
        };
        if !image.is_loaded() || cw <= 0.0 || ch <= 0.0 {
            return false;
        }
        self.scale = clamp_scale((cw / image.width).min(ch / image.height).min(1.0));
        self.offset_x = (cw - image.width * self.scale) / 2.0;
        self.offset_y = (ch - image.height * self.scale) / 2.0;
        true
    }

    pub fn screen_to_image(&self, sx: f64, sy: f64) -> PixelPoint {
        PixelPoint::new(
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    pub fn image_to_screen(&self, p: PixelPoint) -> (f64, f64) {
        (
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }
}
