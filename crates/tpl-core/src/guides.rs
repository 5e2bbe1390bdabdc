//! Alignment guideline candidates.
//!
//! Guidelines are rebuilt from scratch on every drag-move: field geometry
//! depends on style, and the cost is O(fields + grid lines) per event.

use crate::coords::{ImageSize, to_pixels};
use crate::geometry::field_edges;
use crate::id::FieldId;
use crate::model::Field;
use serde::{Deserialize, Serialize};

/// Which coordinate a guideline constrains.
///
/// `X` lines are vertical (they fix x), `Y` lines are horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    X,
    Y,
}

/// Origin of a guideline. Ordering of [`priority`](Self::priority) decides
/// ties in the snap resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuideKind {
    /// Canvas symmetry axis.
    Center,
    /// Center of another field.
    #[serde(rename = "field")]
    FieldCenter,
    /// Edge of another field.
    FieldEdge,
    /// Pre-drag edge of the dragged field itself.
    #[serde(rename = "edge")]
    SelfEdge,
    Grid,
}

impl GuideKind {
    pub const fn priority(self) -> u8 {
        match self {
            GuideKind::Center => 10,
            GuideKind::FieldCenter => 8,
            GuideKind::FieldEdge => 6,
            GuideKind::SelfEdge => 4,
            GuideKind::Grid => 2,
        }
    }
}

/// A candidate alignment line in image pixels. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guideline {
    pub axis: GuideAxis,
    pub value: f64,
    pub kind: GuideKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<FieldId>,
}

impl Guideline {
    pub const fn new(axis: GuideAxis, value: f64, kind: GuideKind) -> Self {
        Self {
            axis,
            value,
            kind,
            owner: None,
        }
    }

    pub const fn owned(axis: GuideAxis, value: f64, kind: GuideKind, owner: FieldId) -> Self {
        Self {
            axis,
            value,
            kind,
            owner: Some(owner),
        }
    }
}

/// Inputs to guideline generation besides the fields themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideParams {
    pub image: ImageSize,
    pub grid_size: f64,
    pub grid_enabled: bool,
}

/// Smallest grid cell that produces grid lines, in image pixels.
pub const MIN_GRID_SIZE: f64 = 1.0;

/// Upper bound on grid lines per axis.
pub const MAX_GRID_LINES: usize = 10_000;

/// Grid line positions `0, g, 2g, …` up to and including `extent`.
///
/// Cells below [`MIN_GRID_SIZE`] (or non-finite) disable the grid; the line
/// count is capped at [`MAX_GRID_LINES`].
pub fn grid_lines(extent: f64, grid_size: f64) -> impl Iterator<Item = f64> {
    let usable = grid_size.is_finite() && grid_size >= MIN_GRID_SIZE && extent.is_finite() && extent >= 0.0;
    let count = if usable {
        let steps = (extent / grid_size).floor();
        if steps >= MAX_GRID_LINES as f64 {
            MAX_GRID_LINES
        } else {
            steps as usize + 1
        }
    } else {
        0
    };
    (0..count).map(move |i| i as f64 * grid_size)
}

/// Build all candidate guidelines.
///
/// `fields` is the snapshot taken when the gesture began, so the dragged
/// field's self-edges reflect its pre-drag geometry. Hidden fields other than
/// the dragged one contribute nothing.
pub fn generate_guides(
    fields: &[Field],
    dragged: Option<FieldId>,
    params: &GuideParams,
) -> Vec<Guideline> {
    let image = params.image;
    let mut lines = Vec::new();

    if params.grid_enabled {
        lines.extend(
            grid_lines(image.width, params.grid_size)
                .map(|v| Guideline::new(GuideAxis::X, v, GuideKind::Grid)),
        );
        lines.extend(
            grid_lines(image.height, params.grid_size)
                .map(|v| Guideline::new(GuideAxis::Y, v, GuideKind::Grid)),
        );
    }

    lines.push(Guideline::new(GuideAxis::X, image.width / 2.0, GuideKind::Center));
    lines.push(Guideline::new(GuideAxis::Y, image.height / 2.0, GuideKind::Center));

    if let Some(current) = dragged.and_then(|id| fields.iter().find(|f| f.id == id)) {
        push_edges(&mut lines, current, image, GuideKind::SelfEdge);
    }

    for field in fields {
        if Some(field.id) == dragged || !field.visible {
            continue;
        }
        let center = to_pixels(&field.position, image);
        lines.push(Guideline::owned(GuideAxis::X, center.x, GuideKind::FieldCenter, field.id));
        lines.push(Guideline::owned(GuideAxis::Y, center.y, GuideKind::FieldCenter, field.id));
        push_edges(&mut lines, field, image, GuideKind::FieldEdge);
    }

    lines
}

fn push_edges(lines: &mut Vec<Guideline>, field: &Field, image: ImageSize, kind: GuideKind) {
    let edges = field_edges(field, image);
    for x in edges.xs {
        lines.push(Guideline::owned(GuideAxis::X, x, kind, field.id));
    }
    for y in edges.ys {
        lines.push(Guideline::owned(GuideAxis::Y, y, kind, field.id));
    }
}
