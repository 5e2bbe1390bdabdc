//! JSON boundary with the field persistence API.
//!
//! The wire shape is the host's camelCase record with a loosely-typed
//! `style` bag; it is converted into the tagged [`FieldKind`] on load and
//! back on emit. Bad positions are repaired instead of failing the load.

use crate::error::LoadError;
use crate::id::FieldId;
use crate::model::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireKind {
    Text,
    Image,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireShadow {
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blur: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_shadow: Option<WireShadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_max_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_max_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_rounded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_border: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireField {
    id: FieldId,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(rename = "type")]
    kind: WireKind,
    #[serde(default)]
    position: Option<Value>,
    #[serde(default)]
    style: Option<WireStyle>,
    #[serde(default)]
    z_index: Option<i32>,
    #[serde(default)]
    visible: Option<bool>,
    #[serde(default)]
    rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<Size>,
}

/// Parse the host's field array. A repeated id keeps its first record; later
/// records carrying it get a fresh id.
pub fn load_fields(json: &str) -> Result<Vec<Field>, LoadError> {
    let records: Vec<WireField> = serde_json::from_str(json)?;
    let mut fields: Vec<Field> = Vec::with_capacity(records.len());
    let mut seen = HashSet::with_capacity(records.len());
    let mut repeated = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        let field = Field::from(record);
        if !seen.insert(field.id) {
            repeated.push(index);
        }
        fields.push(field);
    }
    for index in repeated {
        let old = fields[index].id;
        let fresh = FieldId::next_free(fields.iter().map(|f| f.id)).ok_or(LoadError::DuplicateId(old))?;
        log::warn!("field {old}: duplicate id, reassigned to {fresh}");
        fields[index].id = fresh;
    }
    Ok(fields)
}

/// Serialise fields back into the host's wire shape.
pub fn emit_fields(fields: &[Field]) -> String {
    let records: Vec<WireField> = fields.iter().map(WireField::from).collect();
    serde_json::to_string(&records).unwrap_or_else(|_| "[]".to_string())
}

fn repair_position(id: FieldId, raw: Option<&Value>) -> Position {
    let parsed = raw.and_then(|v| {
        let x = v.get("x")?.as_f64()?;
        let y = v.get("y")?.as_f64()?;
        Some(Position {
            x,
            y,
            snapped_to_grid: v.get("snapToGrid").and_then(Value::as_bool),
        })
    });
    match parsed {
        Some(p) if p.x.is_finite() && p.y.is_finite() => p.clamped(),
        _ => {
            log::warn!("field {id}: missing or malformed position, placing at center");
            Position::CENTER
        }
    }
}

fn parse_color(raw: Option<&str>, fallback: Color) -> Color {
    raw.and_then(Color::from_hex).unwrap_or(fallback)
}

fn text_style(style: WireStyle) -> TextStyle {
    let defaults = TextStyle::default();
    let shadow = style
        .text_shadow
        .filter(|s| s.enabled.unwrap_or(false))
        .map(|s| TextShadow {
            color: parse_color(s.color.as_deref(), Color::BLACK),
            blur: s.blur.unwrap_or(TextShadow::default().blur),
        });
    TextStyle {
        font_family: style.font_family.unwrap_or(defaults.font_family),
        font_size: style.font_size.unwrap_or(defaults.font_size),
        font_weight: match style.font_weight.as_deref() {
            Some("bold") => FontWeight::Bold,
            _ => FontWeight::Normal,
        },
        color: parse_color(style.color.as_deref(), defaults.color),
        align: match style.align.as_deref() {
            Some("left") => TextAlign::Left,
            Some("right") => TextAlign::Right,
            _ => TextAlign::Center,
        },
        shadow,
        width: style.width.unwrap_or(defaults.width),
        height: style.height.unwrap_or(defaults.height),
    }
}

fn image_style(style: WireStyle) -> ImageStyle {
    ImageStyle {
        max_width: style.image_max_width,
        max_height: style.image_max_height,
        rounded: style.image_rounded.unwrap_or(false),
        border: style.image_border.unwrap_or(false),
    }
}

impl From<WireField> for Field {
    fn from(w: WireField) -> Self {
        let position = repair_position(w.id, w.position.as_ref());
        let style = w.style.unwrap_or_default();
        let kind = match w.kind {
            WireKind::Text => FieldKind::Text(text_style(style)),
            WireKind::Image => FieldKind::Image(image_style(style)),
        };
        Field {
            id: w.id,
            name: w.name,
            label: w.label,
            kind,
            position,
            z_index: w.z_index.unwrap_or(0),
            visible: w.visible.unwrap_or(true),
            rotation: w.rotation.filter(|r| r.is_finite()).unwrap_or(0.0),
            size: w.size,
        }
    }
}

impl From<&Field> for WireField {
    fn from(f: &Field) -> Self {
        let (kind, style) = match &f.kind {
            FieldKind::Text(s) => (
                WireKind::Text,
                WireStyle {
                    font_family: Some(s.font_family.clone()),
                    font_size: Some(s.font_size),
                    font_weight: Some(
                        match s.font_weight {
                            FontWeight::Bold => "bold",
                            FontWeight::Normal => "normal",
                        }
                        .to_string(),
                    ),
                    color: Some(s.color.to_hex()),
                    align: Some(
                        match s.align {
                            TextAlign::Left => "left",
                            TextAlign::Center => "center",
                            TextAlign::Right => "right",
                        }
                        .to_string(),
                    ),
                    text_shadow: s.shadow.as_ref().map(|sh| WireShadow {
                        enabled: Some(true),
                        color: Some(sh.color.to_hex()),
                        blur: Some(sh.blur),
                    }),
                    width: Some(s.width),
                    height: Some(s.height),
                    ..WireStyle::default()
                },
            ),
            FieldKind::Image(s) => (
                WireKind::Image,
                WireStyle {
                    image_max_width: s.max_width,
                    image_max_height: s.max_height,
                    image_rounded: Some(s.rounded),
                    image_border: Some(s.border),
                    ..WireStyle::default()
                },
            ),
        };

        let mut position = json!({ "x": f.position.x, "y": f.position.y });
        if let Some(snapped) = f.position.snapped_to_grid {
            position["snapToGrid"] = Value::Bool(snapped);
        }

        WireField {
            id: f.id,
            name: f.name.clone(),
            label: f.label.clone(),
            kind,
            position: Some(position),
            style: Some(style),
            z_index: Some(f.z_index),
            visible: Some(f.visible),
            rotation: Some(f.rotation),
            size: f.size,
        }
    }
}
