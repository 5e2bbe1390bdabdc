//! Hit testing: image-pixel point → field lookup.
//!
//! Walks fields front-to-back (highest `z_index` first). Hidden fields are
//! never hit. Rotated fields are tested in their own local frame, rotated
//! about the position anchor the same way the renderer rotates them.

use kurbo::{Affine, Point, Rect};
use tpl_core::coords::{ImageSize, to_pixels};
use tpl_core::geometry::{FieldBox, field_box};
use tpl_core::id::FieldId;
use tpl_core::model::{Field, paint_order};

fn to_rect(b: &FieldBox) -> Rect {
    Rect::new(b.left, b.top, b.right, b.bottom)
}

/// Local → image transform of a field (rotation about its anchor).
fn field_transform(field: &Field, image: ImageSize) -> Affine {
    if field.rotation == 0.0 {
        return Affine::IDENTITY;
    }
    let anchor = to_pixels(&field.position, image);
    Affine::rotate_about(field.rotation.to_radians(), Point::new(anchor.x, anchor.y))
}

/// Does the (possibly rotated) field cover `(px, py)`?
pub fn field_contains(field: &Field, image: ImageSize, px: f64, py: f64) -> bool {
    let local = field_transform(field, image).inverse() * Point::new(px, py);
    let b = field_box(field, image);
    // Inclusive on every side so points on the right/bottom edge still hit.
    local.x >= b.left && local.x <= b.right && local.y >= b.top && local.y <= b.bottom
}

/// Find the topmost visible field at `(px, py)`.
/// Returns `None` for empty canvas.
pub fn hit_test(fields: &[Field], image: ImageSize, px: f64, py: f64) -> Option<FieldId> {
    paint_order(fields)
        .into_iter()
        .rev()
        .map(|i| &fields[i])
        .filter(|f| f.visible)
        .find(|f| field_contains(f, image, px, py))
        .map(|f| f.id)
}

/// Axis-aligned bounds of a field after rotation.
pub fn rotated_bounds(field: &Field, image: ImageSize) -> FieldBox {
    let r = field_transform(field, image).transform_rect_bbox(to_rect(&field_box(field, image)));
    FieldBox {
        left: r.x0,
        top: r.y0,
        right: r.x1,
        bottom: r.y1,
    }
}
