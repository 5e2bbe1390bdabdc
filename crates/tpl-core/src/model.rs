//! Field data model for certificate/card templates.
//!
//! A template is a background image plus a flat collection of `Field`s.
//! Positions are stored in percentage space (0–100 of the image width and
//! height); style magnitudes are stored in reference units (see
//! [`REFERENCE_WIDTH`](crate::coords::REFERENCE_WIDTH)) so the same field
//! renders identically at any resolution.

use crate::id::FieldId;
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// 8-bit RGBA color, as exchanged with the renderer in `#RRGGBB` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let pair = |i: usize| -> Option<u8> { Some(hex_digit(bytes[i])? << 4 | hex_digit(bytes[i + 1])?) };

        match bytes.len() {
            3 => Some(Self::rgb(
                hex_digit(bytes[0])? * 17,
                hex_digit(bytes[1])? * 17,
                hex_digit(bytes[2])? * 17,
            )),
            6 => Some(Self::rgb(pair(0)?, pair(2)?, pair(4)?)),
            8 => Some(Self {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a: pair(6)?,
            }),
            _ => None,
        }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

// ─── Position & size ─────────────────────────────────────────────────────

/// Persisted placement of a field, in percent of the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    /// Whether the last commit landed on a grid line. Informational only.
    #[serde(default, rename = "snapToGrid", skip_serializing_if = "Option::is_none")]
    pub snapped_to_grid: Option<bool>,
}

impl Position {
    /// Image center; used to repair fields with a missing position.
    pub const CENTER: Position = Position {
        x: 50.0,
        y: 50.0,
        snapped_to_grid: None,
    };

    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            snapped_to_grid: None,
        }
    }

    /// Copy with both axes clamped into `[0, 100]`; non-finite values
    /// fall back to the center.
    pub fn clamped(self) -> Self {
        let fix = |v: f64| if v.is_finite() { v.clamp(0.0, 100.0) } else { 50.0 };
        Self {
            x: fix(self.x),
            y: fix(self.y),
            snapped_to_grid: self.snapped_to_grid,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Explicit pixel box set by an interactive resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

// ─── Styles ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShadow {
    pub color: Color,
    pub blur: f64,
}

impl Default for TextShadow {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            blur: 3.0,
        }
    }
}

/// Visual attributes of a text field. Sizes are in reference units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub color: Color,
    pub align: TextAlign,
    /// `None` when the shadow is disabled.
    pub shadow: Option<TextShadow>,
    pub width: f64,
    pub height: f64,
}

impl TextStyle {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;
    pub const DEFAULT_WIDTH: f64 = 200.0;
    pub const DEFAULT_HEIGHT: f64 = 100.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Cairo";
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_weight: FontWeight::Normal,
            color: Color::BLACK,
            align: TextAlign::Center,
            shadow: None,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

/// Visual attributes of an image placeholder.
///
/// `max_width` / `max_height` are in reference units; when absent the box
/// falls back to a quarter of the image dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageStyle {
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub rounded: bool,
    pub border: bool,
}

/// Kind-specific payload of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    Text(TextStyle),
    Image(ImageStyle),
}

impl FieldKind {
    pub fn is_image(&self) -> bool {
        matches!(self, FieldKind::Image(_))
    }
}

// ─── Field ───────────────────────────────────────────────────────────────

/// A placeholder positioned over the template image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    /// Data key the renderer binds to (e.g. `recipient_name`).
    pub name: String,
    pub label: Option<String>,
    pub kind: FieldKind,
    pub position: Position,
    pub z_index: i32,
    pub visible: bool,
    /// Degrees, clockwise.
    pub rotation: f64,
    pub size: Option<Size>,
}

impl Field {
    pub fn text(id: FieldId, name: &str) -> Self {
        Self::new(id, name, FieldKind::Text(TextStyle::default()))
    }

    pub fn image(id: FieldId, name: &str) -> Self {
        Self::new(id, name, FieldKind::Image(ImageStyle::default()))
    }

    pub fn new(id: FieldId, name: &str, kind: FieldKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            label: None,
            kind,
            position: Position::CENTER,
            z_index: 0,
            visible: true,
            rotation: 0.0,
            size: None,
        }
    }

    /// Builder-style placement, clamped into percentage space.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y).clamped();
        self
    }

    pub fn with_z(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Text shown on the canvas: the label, falling back to the name.
    pub fn display_text(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.kind {
            FieldKind::Text(style) => Some(style),
            FieldKind::Image(_) => None,
        }
    }
}

/// Look up a field by id.
pub fn find_field(fields: &[Field], id: FieldId) -> Option<&Field> {
    fields.iter().find(|f| f.id == id)
}

/// Mutable lookup by id.
pub fn find_field_mut(fields: &mut [Field], id: FieldId) -> Option<&mut Field> {
    fields.iter_mut().find(|f| f.id == id)
}

/// Indices of `fields` in paint order: ascending `z_index`, ties keep
/// collection order.
pub fn paint_order(fields: &[Field]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fields.len()).collect();
    order.sort_by_key(|&i| fields[i].z_index);
    order
}
