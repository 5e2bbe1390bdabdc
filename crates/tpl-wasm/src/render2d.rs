//! Canvas2D backend for the scene painter.
//!
//! Implements [`Canvas`] over a `CanvasRenderingContext2d`. Coordinates are
//! image pixels; the caller installs the viewport transform first.

use tpl_core::coords::{ImageSize, PixelPoint};
use tpl_core::geometry::FieldBox;
use tpl_core::model::TextAlign;
use tpl_render::paint::{Canvas, GuideLine, ImageDraw, TextDraw};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

const PLACEHOLDER_FILL: &str = "rgba(142, 142, 147, 0.15)";
const PLACEHOLDER_STROKE: &str = "#86868B";
const SELECTION: &str = "#4FC3F7";

pub struct Canvas2d<'a> {
    ctx: &'a CanvasRenderingContext2d,
    background: Option<&'a HtmlImageElement>,
}

impl<'a> Canvas2d<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, background: Option<&'a HtmlImageElement>) -> Self {
        Self { ctx, background }
    }

    /// Translate to `anchor` and rotate by `degrees` about it.
    fn enter_field(&self, anchor: PixelPoint, degrees: f64) {
        self.ctx.save();
        let _ = self.ctx.translate(anchor.x, anchor.y);
        let _ = self.ctx.rotate(degrees.to_radians());
    }

    fn set_dash(&self, dash: Option<[f64; 2]>) {
        let pattern = match dash {
            Some([on, off]) => js_sys::Array::of2(&JsValue::from_f64(on), &JsValue::from_f64(off)),
            None => js_sys::Array::new(),
        };
        let _ = self.ctx.set_line_dash(&pattern);
    }
}

impl Canvas for Canvas2d<'_> {
    fn draw_background(&mut self, image: ImageSize) {
        match self.background {
            Some(img) => {
                let _ = self
                    .ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, image.width, image.height);
            }
            None => {
                self.ctx.set_fill_style_str("#FFFFFF");
                self.ctx.fill_rect(0.0, 0.0, image.width, image.height);
            }
        }
    }

    fn draw_guide(&mut self, line: &GuideLine) {
        let (x0, y0, x1, y1) = line.endpoints();
        self.ctx.save();
        self.ctx.set_stroke_style_str(line.color);
        self.ctx.set_line_width(1.0);
        self.set_dash(line.dash);
        self.ctx.begin_path();
        self.ctx.move_to(x0, y0);
        self.ctx.line_to(x1, y1);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn draw_text(&mut self, text: &TextDraw<'_>) {
        self.enter_field(text.anchor, text.rotation);
        let weight = if text.bold { "bold" } else { "normal" };
        self.ctx
            .set_font(&format!("{weight} {}px {}", text.font_size, text.font_family));
        self.ctx.set_fill_style_str(&text.color.to_hex());
        self.ctx.set_text_align(match text.align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        self.ctx.set_text_baseline("middle");
        if let Some(shadow) = text.shadow {
            self.ctx.set_shadow_color(&shadow.color.to_hex());
            self.ctx.set_shadow_blur(shadow.blur);
        }
        let _ = self.ctx.fill_text(text.text, 0.0, 0.0);
        self.ctx.restore();
    }

    fn draw_image_box(&mut self, image: &ImageDraw) {
        self.enter_field(image.anchor, image.rotation);
        let b = &image.bounds;
        rounded_rect_path(
            self.ctx,
            b.left - image.anchor.x,
            b.top - image.anchor.y,
            b.width(),
            b.height(),
            image.corner_radius,
        );
        self.ctx.set_fill_style_str(PLACEHOLDER_FILL);
        self.ctx.fill();
        if image.border {
            self.ctx.set_stroke_style_str(PLACEHOLDER_STROKE);
            self.ctx.set_line_width(2.0);
            self.ctx.stroke();
        }
        self.ctx.restore();
    }

    fn draw_selection(&mut self, bounds: &FieldBox, anchor: PixelPoint, rotation: f64) {
        self.enter_field(anchor, rotation);
        self.ctx.set_stroke_style_str(SELECTION);
        self.ctx.set_line_width(1.5);
        self.set_dash(Some([4.0, 4.0]));
        self.ctx.stroke_rect(
            bounds.left - anchor.x,
            bounds.top - anchor.y,
            bounds.width(),
            bounds.height(),
        );
        self.ctx.restore();
    }
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}
