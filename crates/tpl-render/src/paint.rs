//! Field collection → canvas drawing calls.
//!
//! The engine never rasterises anything itself. A host implements
//! [`Canvas`] (Canvas2D in the browser, a test recorder in tests) and
//! [`paint_scene`] drives it in paint order: background, grid, fields by
//! ascending `z_index`, selection outlines, then the snap indicator.

use tpl_core::coords::{ImageSize, PixelPoint, to_pixels};
use tpl_core::geometry::{FieldBox, field_box, scaled_font_size};
use tpl_core::guides::{GuideAxis, GuideKind, grid_lines};
use tpl_core::id::FieldId;
use tpl_core::model::{Color, Field, FieldKind, FontWeight, TextAlign, TextShadow, paint_order};
use tpl_core::snap::SnapResult;

/// Dash pattern shared by grid and guide lines.
pub const GUIDE_DASH: [f64; 2] = [4.0, 4.0];

const GRID_COLOR: &str = "rgba(0, 0, 0, 0.1)";

/// Indicator color per guideline kind.
pub fn guide_color(kind: GuideKind) -> &'static str {
    match kind {
        GuideKind::Center => "rgba(255, 0, 0, 0.7)",
        GuideKind::FieldCenter => "rgba(0, 100, 255, 0.7)",
        _ => "rgba(0, 255, 0, 0.7)",
    }
}

/// A full-span straight line across the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub axis: GuideAxis,
    pub value: f64,
    /// Length of the line (image height for `X`, width for `Y`).
    pub extent: f64,
    pub color: &'static str,
    pub dash: Option<[f64; 2]>,
}

impl GuideLine {
    /// `(x0, y0, x1, y1)` endpoints in image pixels.
    pub fn endpoints(&self) -> (f64, f64, f64, f64) {
        match self.axis {
            GuideAxis::X => (self.value, 0.0, self.value, self.extent),
            GuideAxis::Y => (0.0, self.value, self.extent, self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw<'a> {
    pub id: FieldId,
    pub text: &'a str,
    pub anchor: PixelPoint,
    pub bounds: FieldBox,
    pub font_family: &'a str,
    /// Already scaled to image pixels.
    pub font_size: f64,
    pub bold: bool,
    pub color: Color,
    pub align: TextAlign,
    pub shadow: Option<&'a TextShadow>,
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDraw {
    pub id: FieldId,
    pub anchor: PixelPoint,
    pub bounds: FieldBox,
    pub corner_radius: f64,
    pub border: bool,
    pub rotation: f64,
}

/// Drawing capability supplied by the host.
///
/// Rotations are in degrees about `anchor`.
pub trait Canvas {
    fn draw_background(&mut self, image: ImageSize);
    fn draw_guide(&mut self, line: &GuideLine);
    fn draw_text(&mut self, text: &TextDraw<'_>);
    fn draw_image_box(&mut self, image: &ImageDraw);
    fn draw_selection(&mut self, bounds: &FieldBox, anchor: PixelPoint, rotation: f64);
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub fields: &'a [Field],
    pub image: ImageSize,
    pub selection: &'a [FieldId],
    /// Grid cell size when the grid is shown.
    pub grid: Option<f64>,
    pub indicator: Option<&'a SnapResult>,
}

/// Paint the whole scene. Call once per frame after clearing the target.
pub fn paint_scene(canvas: &mut dyn Canvas, view: &SceneView<'_>) {
    let image = view.image;
    if !image.is_loaded() {
        log::trace!("PAINT skipped: image not loaded");
        return;
    }
    canvas.draw_background(image);

    if let Some(size) = view.grid {
        for x in grid_lines(image.width, size) {
            canvas.draw_guide(&grid_line(GuideAxis::X, x, image.height));
        }
        for y in grid_lines(image.height, size) {
            canvas.draw_guide(&grid_line(GuideAxis::Y, y, image.width));
        }
    }

    for i in paint_order(view.fields) {
        let field = &view.fields[i];
        if field.visible {
            paint_field(canvas, field, image);
        }
    }

    for field in view.fields.iter().filter(|f| f.visible && view.selection.contains(&f.id)) {
        let anchor = to_pixels(&field.position, image);
        canvas.draw_selection(&field_box(field, image), anchor, field.rotation);
    }

    if let Some(snap) = view.indicator {
        if let Some(g) = snap.x {
            canvas.draw_guide(&indicator_line(GuideAxis::X, g.value, g.kind, image.height));
        }
        if let Some(g) = snap.y {
            canvas.draw_guide(&indicator_line(GuideAxis::Y, g.value, g.kind, image.width));
        }
    }
}

fn grid_line(axis: GuideAxis, value: f64, extent: f64) -> GuideLine {
    GuideLine {
        axis,
        value,
        extent,
        color: GRID_COLOR,
        dash: None,
    }
}

fn indicator_line(axis: GuideAxis, value: f64, kind: GuideKind, extent: f64) -> GuideLine {
    GuideLine {
        axis,
        value,
        extent,
        color: guide_color(kind),
        dash: Some(GUIDE_DASH),
    }
}

fn paint_field(canvas: &mut dyn Canvas, field: &Field, image: ImageSize) {
    let anchor = to_pixels(&field.position, image);
    let bounds = field_box(field, image);
    match &field.kind {
        FieldKind::Text(style) => {
            let font_size = scaled_font_size(style, image);
            log::trace!(
                "TEXT {} {:?} at ({:.1}, {:.1}) size {:.1}",
                field.id,
                field.display_text(),
                anchor.x,
                anchor.y,
                font_size
            );
            canvas.draw_text(&TextDraw {
                id: field.id,
                text: field.display_text(),
                anchor,
                bounds,
                font_family: &style.font_family,
                font_size,
                bold: style.font_weight == FontWeight::Bold,
                color: style.color,
                align: style.align,
                shadow: style.shadow.as_ref(),
                rotation: field.rotation,
            });
        }
        FieldKind::Image(style) => {
            log::trace!(
                "IMAGE {} at ({:.1}, {:.1}) {:.1}x{:.1}",
                field.id,
                anchor.x,
                anchor.y,
                bounds.width(),
                bounds.height()
            );
            let corner_radius = if style.rounded {
                bounds.width().min(bounds.height()) / 10.0
            } else {
                0.0
            };
            canvas.draw_image_box(&ImageDraw {
                id: field.id,
                anchor,
                bounds,
                corner_radius,
                border: style.border,
                rotation: field.rotation,
            });
        }
    }
}
