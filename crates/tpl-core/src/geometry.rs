//! Pixel geometry of fields.
//!
//! A field's on-screen box is a pure function of its position, style/size,
//! the image pixel size and [`REFERENCE_WIDTH`](crate::coords::REFERENCE_WIDTH).

use crate::coords::{ImageSize, PixelPoint, REFERENCE_WIDTH, scale_style_value, to_pixels};
use crate::model::{Field, FieldKind, TextAlign, TextStyle};
use smallvec::SmallVec;

/// Axis-aligned box in image pixels (before rotation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl FieldBox {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn contains(&self, p: PixelPoint) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// Box edges that take part in alignment.
///
/// Text fields expose only their horizontal extent; image fields expose
/// all four sides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldEdges {
    pub xs: SmallVec<[f64; 2]>,
    pub ys: SmallVec<[f64; 2]>,
}

/// Pixel width/height of a field at the given image size.
pub fn field_dimensions(field: &Field, image: ImageSize) -> (f64, f64) {
    if let Some(size) = field.size {
        return (size.width, size.height);
    }
    match &field.kind {
        FieldKind::Text(style) => (
            scale_style_value(style.width, image.width, REFERENCE_WIDTH),
            scale_style_value(style.height, image.width, REFERENCE_WIDTH),
        ),
        FieldKind::Image(style) => (
            style
                .max_width
                .map(|w| scale_style_value(w, image.width, REFERENCE_WIDTH))
                .unwrap_or_else(|| (image.width / 4.0).round()),
            style
                .max_height
                .map(|h| scale_style_value(h, image.width, REFERENCE_WIDTH))
                .unwrap_or_else(|| (image.height / 4.0).round()),
        ),
    }
}

/// Horizontal span of a text box anchored at `x` for the given alignment.
fn text_span(x: f64, width: f64, align: TextAlign) -> (f64, f64) {
    match align {
        TextAlign::Center => (x - width / 2.0, x + width / 2.0),
        TextAlign::Left => (x, x + width),
        TextAlign::Right => (x - width, x),
    }
}

/// Unrotated pixel box of `field`.
pub fn field_box(field: &Field, image: ImageSize) -> FieldBox {
    let anchor = to_pixels(&field.position, image);
    let (w, h) = field_dimensions(field, image);
    let (left, right) = match &field.kind {
        FieldKind::Text(style) => text_span(anchor.x, w, style.align),
        FieldKind::Image(_) => (anchor.x - w / 2.0, anchor.x + w / 2.0),
    };
    FieldBox {
        left,
        top: anchor.y - h / 2.0,
        right,
        bottom: anchor.y + h / 2.0,
    }
}

/// Alignment edges of `field` at its current position.
pub fn field_edges(field: &Field, image: ImageSize) -> FieldEdges {
    let b = field_box(field, image);
    let mut edges = FieldEdges::default();
    edges.xs.push(b.left);
    edges.xs.push(b.right);
    if field.kind.is_image() {
        edges.ys.push(b.top);
        edges.ys.push(b.bottom);
    }
    edges
}

/// Font size in image pixels for a text style.
pub fn scaled_font_size(style: &TextStyle, image: ImageSize) -> f64 {
    scale_style_value(style.font_size, image.width, REFERENCE_WIDTH)
}
