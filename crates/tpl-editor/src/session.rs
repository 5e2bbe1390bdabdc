//! Per-gesture state machine.
//!
//! ```text
//! Idle ──pointer-down on field──▶ Dragging ──pointer-up──▶ Idle
//! Idle ──transform start──────▶ Transforming ──transform end──▶ Idle
//! ```
//!
//! While dragging, the visual position is transient: it lives in
//! [`DragState`] and is only written into the field collection on commit.
//! Guidelines are regenerated on every move from the snapshot taken at
//! pointer-down, so edits made elsewhere mid-gesture cannot shift them.

use crate::selection::Selection;
use tpl_core::coords::{ImageSize, PixelPoint, to_percent, to_pixels};
use tpl_core::error::CoordError;
use tpl_core::geometry::FieldBox;
use tpl_core::guides::{GuideParams, generate_guides};
use tpl_core::id::FieldId;
use tpl_core::model::{Field, FieldKind, Position, Size, TextAlign, find_field, find_field_mut};
use tpl_core::settings::EditorSettings;
use tpl_core::snap::{SnapResult, resolve_snap};

/// Smallest box a transform may produce, in image pixels.
pub const MIN_BOX_SIZE: f64 = 10.0;
pub const ROTATION_SNAP_STEP: f64 = 45.0;
pub const ROTATION_SNAP_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragState),
    Transforming(TransformState),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

// ─── Drag ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DragState {
    /// Field under the pointer at pointer-down.
    pub anchor: FieldId,
    snapshot: Vec<Field>,
    /// Pointer minus the anchor's pixel position at pointer-down.
    grab: (f64, f64),
    start: PixelPoint,
    current: PixelPoint,
    snap: SnapResult,
}

impl DragState {
    /// Start dragging `id`. `None` if the field is not in `fields`.
    pub fn begin(fields: &[Field], id: FieldId, pointer: PixelPoint, image: ImageSize) -> Option<Self> {
        let field = find_field(fields, id)?;
        let start = to_pixels(&field.position, image);
        Some(Self {
            anchor: id,
            snapshot: fields.to_vec(),
            grab: pointer.delta_from(start),
            start,
            current: start,
            snap: SnapResult::passthrough(start),
        })
    }

    /// Snap the anchor for a new pointer position and keep it as the
    /// transient visual position.
    pub fn update(&mut self, pointer: PixelPoint, settings: &EditorSettings, image: ImageSize) -> &SnapResult {
        let raw = pointer.offset(-self.grab.0, -self.grab.1);
        self.snap = if settings.snap_to_grid {
            let params = GuideParams {
                image,
                grid_size: settings.grid_size,
                grid_enabled: settings.grid_enabled,
            };
            let guides = generate_guides(&self.snapshot, Some(self.anchor), &params);
            resolve_snap(raw, &guides, settings.snap_threshold)
        } else {
            SnapResult::passthrough(raw)
        };
        self.current = self.snap.position;
        &self.snap
    }

    pub fn snap(&self) -> &SnapResult {
        &self.snap
    }

    /// Pixel displacement of the anchor since pointer-down.
    pub fn delta(&self) -> (f64, f64) {
        self.current.delta_from(self.start)
    }

    /// Ids moved by this drag: the anchor first, then the rest of the
    /// selection.
    fn moved_ids<'a>(&'a self, selection: &'a Selection) -> impl Iterator<Item = FieldId> + 'a {
        std::iter::once(self.anchor).chain(selection.iter().filter(move |id| *id != self.anchor))
    }

    fn target(&self, id: FieldId, image: ImageSize) -> Option<PixelPoint> {
        let (dx, dy) = self.delta();
        find_field(&self.snapshot, id).map(|f| to_pixels(&f.position, image).offset(dx, dy))
    }

    /// Fields as they should be drawn right now.
    pub fn preview(&self, fields: &[Field], selection: &Selection, image: ImageSize) -> Vec<Field> {
        let mut out = fields.to_vec();
        for id in self.moved_ids(selection) {
            if let (Some(p), Some(field)) = (self.target(id, image), find_field_mut(&mut out, id)) {
                field.position.x = p.x / image.width * 100.0;
                field.position.y = p.y / image.height * 100.0;
            }
        }
        out
    }

    /// Write the final positions into `fields`.
    ///
    /// Every selected field moves by the anchor's pixel delta and is
    /// normalised on its own. Returns `Ok(None)` when the anchor no longer
    /// exists, which aborts the gesture without touching anything.
    pub fn commit(
        &self,
        fields: &mut [Field],
        selection: &Selection,
        image: ImageSize,
    ) -> Result<Option<Vec<FieldId>>, CoordError> {
        if find_field(fields, self.anchor).is_none() {
            return Ok(None);
        }
        let mut moved = Vec::new();
        for id in self.moved_ids(selection) {
            let Some(target) = self.target(id, image) else {
                continue;
            };
            let mut position = to_percent(target, image)?;
            let Some(field) = find_field_mut(fields, id) else {
                continue;
            };
            position.snapped_to_grid = if id == self.anchor {
                Some(self.snap.snapped_to_grid())
            } else {
                field.position.snapped_to_grid
            };
            field.position = position;
            moved.push(id);
        }
        Ok(Some(moved))
    }
}

// ─── Nudge ───────────────────────────────────────────────────────────────

/// Move `ids` by a pixel delta without snapping. Returns the ids whose
/// stored position actually changed.
pub fn nudge(
    fields: &mut [Field],
    ids: &[FieldId],
    dx: f64,
    dy: f64,
    image: ImageSize,
) -> Result<Vec<FieldId>, CoordError> {
    let mut changed = Vec::new();
    for &id in ids {
        let Some(field) = find_field_mut(fields, id) else {
            continue;
        };
        let target = to_pixels(&field.position, image).offset(dx, dy);
        let next = to_percent(target, image)?;
        if next.x != field.position.x || next.y != field.position.y {
            field.position.x = next.x;
            field.position.y = next.y;
            changed.push(id);
        }
    }
    Ok(changed)
}

// ─── Transform ───────────────────────────────────────────────────────────

/// A resize/rotate frame reported by the host's transform handles, in image
/// pixels. `bounds` is the unrotated box; `rotation` is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformFrame {
    pub bounds: FieldBox,
    pub rotation: f64,
}

#[derive(Debug, Clone)]
pub struct TransformState {
    pub id: FieldId,
    frame: Option<TransformFrame>,
}

impl TransformState {
    pub fn new(id: FieldId) -> Self {
        Self { id, frame: None }
    }

    /// Latest intermediate frame, drawn but not committed.
    pub fn update(&mut self, frame: TransformFrame) {
        self.frame = Some(frame);
    }

    pub fn frame(&self) -> Option<TransformFrame> {
        self.frame
    }

    pub fn preview(&self, fields: &[Field], image: ImageSize) -> Vec<Field> {
        let mut out = fields.to_vec();
        if let (Some(frame), Some(field)) = (self.frame, find_field_mut(&mut out, self.id)) {
            if let Some(anchor) = frame_anchor(field, &frame.bounds) {
                field.position.x = anchor.x / image.width * 100.0;
                field.position.y = anchor.y / image.height * 100.0;
                field.size = Some(frame_size(&frame.bounds));
            }
            field.rotation = snap_rotation(frame.rotation);
        }
        out
    }
}

/// Map any angle into `[0, 360)`. Non-finite input becomes 0.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let r = degrees.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Normalise, then pull onto the nearest multiple of 45° when within 5°.
pub fn snap_rotation(degrees: f64) -> f64 {
    let r = normalize_rotation(degrees);
    let nearest = (r / ROTATION_SNAP_STEP).round() * ROTATION_SNAP_STEP;
    if (r - nearest).abs() < ROTATION_SNAP_TOLERANCE {
        normalize_rotation(nearest)
    } else {
        r
    }
}

fn frame_size(bounds: &FieldBox) -> Size {
    Size {
        width: bounds.width(),
        height: bounds.height(),
    }
}

/// Position anchor for a box: alignment-dependent x for text, centre
/// otherwise. `None` when the box is under the minimum size.
fn frame_anchor(field: &Field, bounds: &FieldBox) -> Option<PixelPoint> {
    if bounds.width() < MIN_BOX_SIZE || bounds.height() < MIN_BOX_SIZE {
        return None;
    }
    let center = bounds.center();
    let x = match &field.kind {
        FieldKind::Text(style) => match style.align {
            TextAlign::Left => bounds.left,
            TextAlign::Center => center.x,
            TextAlign::Right => bounds.right,
        },
        FieldKind::Image(_) => center.x,
    };
    Some(PixelPoint::new(x, center.y))
}

/// Apply a finished transform to `field`.
///
/// Size and position come from the frame unless the box is smaller than
/// [`MIN_BOX_SIZE`], in which case the previous box is kept. Rotation is
/// always applied. Returns whether anything changed.
pub fn apply_transform(field: &mut Field, frame: &TransformFrame, image: ImageSize) -> Result<bool, CoordError> {
    let before = field.clone();
    match frame_anchor(field, &frame.bounds) {
        Some(anchor) => {
            let next = to_percent(anchor, image)?;
            field.position = Position {
                snapped_to_grid: field.position.snapped_to_grid,
                ..next
            };
            field.size = Some(frame_size(&frame.bounds));
        }
        None => log::debug!(
            "TRANSFORM {}: {:.1}x{:.1} below minimum, keeping box",
            field.id,
            frame.bounds.width(),
            frame.bounds.height()
        ),
    }
    field.rotation = snap_rotation(frame.rotation);
    Ok(*field != before)
}
