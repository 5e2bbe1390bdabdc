//! Coordinate normalizer: percentage space ↔ pixel space.
//!
//! Stored positions are percentages of the background image; everything the
//! user touches is in image pixels. Style magnitudes (font size, box sizes)
//! are expressed against [`REFERENCE_WIDTH`] and scaled by the ratio of the
//! actual image width to that constant. Viewport zoom never enters these
//! formulas; it only maps screen pixels to image pixels (see
//! `tpl-editor`'s viewport).

use crate::error::CoordError;
use crate::model::Position;
use serde::{Deserialize, Serialize};

/// Logical image width that style values are authored against.
///
/// Must match the external renderer's constant exactly; a mismatch shifts
/// every scaled font and box without any error being raised.
pub const REFERENCE_WIDTH: f64 = 1000.0;

/// Decimal places kept for stored percentages.
pub const PERCENT_DECIMALS: i32 = 2;

/// Natural pixel dimensions of the background image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and non-zero.
    pub fn is_loaded(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Fails with [`CoordError::ImageNotLoaded`] unless [`is_loaded`](Self::is_loaded).
    pub fn ensure_loaded(&self) -> Result<Self, CoordError> {
        if self.is_loaded() {
            Ok(*self)
        } else {
            Err(CoordError::ImageNotLoaded {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Image pixels per reference unit.
    pub fn style_scale(&self) -> f64 {
        self.width / REFERENCE_WIDTH
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Component-wise `self - other`.
    pub fn delta_from(self, other: PixelPoint) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

/// Percentage position → pixel position.
pub fn to_pixels(position: &Position, image: ImageSize) -> PixelPoint {
    PixelPoint::new(
        position.x / 100.0 * image.width,
        position.y / 100.0 * image.height,
    )
}

/// Pixel position → percentage position, clamped to `[0, 100]` and rounded
/// to [`PERCENT_DECIMALS`] places.
pub fn to_percent(pixel: PixelPoint, image: ImageSize) -> Result<Position, CoordError> {
    let image = image.ensure_loaded()?;
    Ok(Position::new(
        round_percent(clamp_percent(pixel.x / image.width * 100.0)),
        round_percent(clamp_percent(pixel.y / image.height * 100.0)),
    ))
}

/// `raw * (image_width / reference_width)`.
pub fn scale_style_value(raw: f64, image_width: f64, reference_width: f64) -> f64 {
    raw * (image_width / reference_width)
}

/// Clamp into `[0, 100]`; NaN maps to the center.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        50.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

pub fn round_percent(value: f64) -> f64 {
    let factor = 10f64.powi(PERCENT_DECIMALS);
    (value * factor).round() / factor
}
