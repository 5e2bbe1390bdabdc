//! The editor shell.
//!
//! [`TemplateEditor`] owns the field collection, the selection, history and
//! the current gesture. The host feeds it [`InputEvent`]s and image-load
//! notifications, paints it through a [`Canvas`], and picks up committed
//! collections with [`TemplateEditor::take_commit`].

use crate::history::History;
use crate::input::{InputEvent, Modifiers};
use crate::layers::{self, LayerDirection};
use crate::selection::Selection;
use crate::session::{self, DragState, Gesture, TransformFrame, TransformState};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::viewport::{Viewport, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
use std::borrow::Cow;
use tpl_core::coords::{ImageSize, PixelPoint};
use tpl_core::error::CoordError;
use tpl_core::geometry::FieldBox;
use tpl_core::id::FieldId;
use tpl_core::model::{Field, find_field};
use tpl_core::settings::EditorSettings;
use tpl_core::snap::SnapResult;
use tpl_render::hit::{hit_test, rotated_bounds};
use tpl_render::paint::{Canvas, SceneView, paint_scene};

/// Background image lifecycle. Pixel conversions only run when `Loaded`.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageState {
    Pending,
    Loaded(ImageSize),
    Failed(String),
}

pub struct TemplateEditor {
    fields: Vec<Field>,
    selection: Selection,
    history: History<Vec<Field>>,
    gesture: Gesture,
    settings: EditorSettings,
    /// Grid drawing only; snap candidates follow `settings.grid_enabled`.
    grid_visible: bool,
    image: ImageState,
    pub viewport: Viewport,
    /// A commit happened since the last `take_commit`.
    dirty: bool,
}

impl TemplateEditor {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            fields: Vec::new(),
            selection: Selection::new(),
            history: History::new(settings.history_depth),
            gesture: Gesture::Idle,
            grid_visible: settings.grid_enabled,
            settings,
            image: ImageState::Pending,
            viewport: Viewport::default(),
            dirty: false,
        }
    }

    pub fn with_fields(fields: Vec<Field>, settings: EditorSettings) -> Self {
        let mut editor = Self::new(settings);
        editor.fields = fields;
        editor
    }

    /// Replace the collection from the host. History starts over.
    pub fn set_fields(&mut self, fields: Vec<Field>) {
        self.fields = fields;
        self.history.clear();
        self.gesture = Gesture::Idle;
        self.prune_selection();
        self.dirty = false;
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn image_state(&self) -> &ImageState {
        &self.image
    }

    pub fn image_size(&self) -> Option<ImageSize> {
        match self.image {
            ImageState::Loaded(size) => Some(size),
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Snap indicator of the running drag, if it snapped on any axis.
    pub fn indicator(&self) -> Option<&SnapResult> {
        match &self.gesture {
            Gesture::Dragging(drag) if drag.snap().is_snapped() => Some(drag.snap()),
            _ => None,
        }
    }

    /// The committed collection, once per commit.
    pub fn take_commit(&mut self) -> Option<&[Field]> {
        if std::mem::take(&mut self.dirty) {
            Some(&self.fields)
        } else {
            None
        }
    }

    /// Fields with any in-flight gesture applied.
    pub fn display_fields(&self) -> Cow<'_, [Field]> {
        let Some(image) = self.image_size() else {
            return Cow::Borrowed(&self.fields);
        };
        match &self.gesture {
            Gesture::Idle => Cow::Borrowed(&self.fields),
            Gesture::Dragging(drag) => Cow::Owned(drag.preview(&self.fields, &self.selection, image)),
            Gesture::Transforming(t) => Cow::Owned(t.preview(&self.fields, image)),
        }
    }

    /// Screen-space box around the selected visible fields, rotation and
    /// any in-flight gesture included. Hosts place overlay handles with it.
    pub fn selection_bounds(&self) -> Option<FieldBox> {
        let image = self.image_size()?;
        let fields = self.display_fields();
        let union = fields
            .iter()
            .filter(|f| f.visible && self.selection.contains(f.id))
            .map(|f| rotated_bounds(f, image))
            .reduce(|a, b| FieldBox {
                left: a.left.min(b.left),
                top: a.top.min(b.top),
                right: a.right.max(b.right),
                bottom: a.bottom.max(b.bottom),
            })?;
        let (left, top) = self.viewport.image_to_screen(PixelPoint::new(union.left, union.top));
        let (right, bottom) = self.viewport.image_to_screen(PixelPoint::new(union.right, union.bottom));
        Some(FieldBox {
            left,
            top,
            right,
            bottom,
        })
    }

    // ─── Image ───────────────────────────────────────────────────────────

    /// Record the background's natural size. Zero or non-finite sizes are
    /// refused and leave the editor pending.
    pub fn set_image_size(&mut self, width: f64, height: f64) -> Result<ImageSize, CoordError> {
        let size = ImageSize::new(width, height).ensure_loaded()?;
        self.image = ImageState::Loaded(size);
        self.viewport.fit(size);
        log::debug!("IMAGE loaded {width}x{height}");
        Ok(size)
    }

    pub fn image_failed(&mut self, reason: &str) {
        log::warn!("IMAGE failed to load: {reason}");
        self.image = ImageState::Failed(reason.to_string());
        self.gesture = Gesture::Idle;
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    /// Handle one input event. Returns whether a repaint is needed.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                let p = self.viewport.screen_to_image(*x, *y);
                self.pointer_down(p, modifiers)
            }
            InputEvent::PointerMove { x, y, .. } => {
                let p = self.viewport.screen_to_image(*x, *y);
                self.pointer_move(p)
            }
            InputEvent::PointerUp { x, y } => {
                let p = self.viewport.screen_to_image(*x, *y);
                self.pointer_move(p);
                self.pointer_up()
            }
            InputEvent::Wheel {
                x,
                y,
                dx,
                dy,
                modifiers,
            } => self.wheel(*x, *y, *dx, *dy, modifiers),
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(key, modifiers) {
                Some(action) => self.apply_shortcut(action),
                None => false,
            },
        }
    }

    pub fn apply_shortcut(&mut self, action: ShortcutAction) -> bool {
        if !self.gesture.is_idle() && action != ShortcutAction::Deselect {
            return false;
        }
        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Duplicate => !self.duplicate_selection().is_empty(),
            ShortcutAction::Delete => self.delete_selection(),
            ShortcutAction::SelectAll => self.select_all(),
            ShortcutAction::Deselect => self.escape(),
            ShortcutAction::Nudge { dx, dy } => self.nudge(dx, dy),
            ShortcutAction::LayerUp => self.move_layer(LayerDirection::Up),
            ShortcutAction::LayerDown => self.move_layer(LayerDirection::Down),
            ShortcutAction::Pan { dx, dy } => {
                self.viewport.pan(dx, dy);
                true
            }
            ShortcutAction::ZoomIn => {
                self.viewport.zoom_in();
                true
            }
            ShortcutAction::ZoomOut => {
                self.viewport.zoom_out();
                true
            }
            ShortcutAction::ZoomToFit => self.image_size().is_some_and(|size| self.viewport.fit(size)),
            ShortcutAction::ToggleGrid => {
                self.grid_visible = !self.grid_visible;
                true
            }
        }
    }

    fn wheel(&mut self, x: f64, y: f64, dx: f64, dy: f64, modifiers: &Modifiers) -> bool {
        if modifiers.shift {
            self.viewport.pan(-dx, -dy);
            return true;
        }
        if dy == 0.0 {
            return false;
        }
        let factor = if dy < 0.0 { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
        self.viewport.zoom_by(factor, x, y);
        true
    }

    // ─── Pointer gestures ────────────────────────────────────────────────

    /// Pointer-down at an image-space point.
    pub fn pointer_down(&mut self, p: PixelPoint, modifiers: &Modifiers) -> bool {
        let Some(image) = self.image_size() else {
            return false;
        };
        if !self.gesture.is_idle() {
            return false;
        }
        let Some(id) = hit_test(&self.fields, image, p.x, p.y) else {
            let had = !self.selection.is_empty();
            self.selection.clear();
            return had;
        };

        if modifiers.additive() && self.settings.capabilities.multi_select {
            if !self.selection.toggle(id) {
                return true;
            }
        } else if !self.selection.contains(id) {
            self.selection.replace(id);
        }

        if let Some(drag) = DragState::begin(&self.fields, id, p, image) {
            self.history.record(&self.fields);
            log::trace!("DRAG start {id} with {} selected", self.selection.len());
            self.gesture = Gesture::Dragging(drag);
        }
        true
    }

    /// Pointer-move at an image-space point.
    pub fn pointer_move(&mut self, p: PixelPoint) -> bool {
        let Some(image) = self.image_size() else {
            return false;
        };
        match &mut self.gesture {
            Gesture::Dragging(drag) => {
                drag.update(p, &self.settings, image);
                true
            }
            _ => false,
        }
    }

    /// End the running drag at its last position.
    pub fn pointer_up(&mut self) -> bool {
        if !matches!(self.gesture, Gesture::Dragging(_)) {
            return false;
        }
        let Gesture::Dragging(drag) = std::mem::take(&mut self.gesture) else {
            return false;
        };
        let Some(image) = self.image_size() else {
            return false;
        };
        match drag.commit(&mut self.fields, &self.selection, image) {
            Ok(Some(moved)) => {
                let (dx, dy) = drag.delta();
                log::debug!("COMMIT drag {:?} by ({dx:.1}, {dy:.1})", moved);
                self.dirty = true;
            }
            Ok(None) => {
                log::warn!("DRAG aborted: {} no longer exists", drag.anchor);
                self.history.discard_last();
            }
            Err(err) => {
                log::warn!("DRAG aborted: {err}");
                self.history.discard_last();
            }
        }
        true
    }

    /// Finish any gesture where it stands, then clear the selection.
    fn escape(&mut self) -> bool {
        let frame = match &self.gesture {
            Gesture::Transforming(t) => t.frame(),
            _ => None,
        };
        match frame {
            Some(frame) => {
                self.end_transform(frame);
            }
            None => {
                self.pointer_up();
                self.gesture = Gesture::Idle;
            }
        }
        self.selection.clear();
        true
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select `id` as a click would, without starting a drag.
    pub fn select(&mut self, id: FieldId, additive: bool) -> bool {
        if find_field(&self.fields, id).is_none() {
            return false;
        }
        if additive && self.settings.capabilities.multi_select {
            self.selection.toggle(id);
        } else {
            self.selection.replace(id);
        }
        true
    }

    pub fn select_all(&mut self) -> bool {
        if !self.settings.capabilities.multi_select {
            return false;
        }
        self.selection.set(self.fields.iter().filter(|f| f.visible).map(|f| f.id));
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn prune_selection(&mut self) {
        let fields = &self.fields;
        self.selection.retain(|id| find_field(fields, id).is_some());
    }

    // ─── Discrete commits ────────────────────────────────────────────────

    fn commit(&mut self, before: Vec<Field>, what: &str) {
        self.history.record(&before);
        self.dirty = true;
        log::debug!("COMMIT {what}: {} fields", self.fields.len());
    }

    /// Move the selection by image pixels. No snapping.
    pub fn nudge(&mut self, dx: f64, dy: f64) -> bool {
        let Some(image) = self.image_size() else {
            return false;
        };
        let ids: Vec<FieldId> = self.selection.iter().collect();
        let before = self.fields.clone();
        match session::nudge(&mut self.fields, &ids, dx, dy, image) {
            Ok(changed) if !changed.is_empty() => {
                self.commit(before, "nudge");
                true
            }
            Ok(_) => false,
            Err(err) => {
                log::warn!("NUDGE ignored: {err}");
                false
            }
        }
    }

    pub fn delete_selection(&mut self) -> bool {
        let ids: Vec<FieldId> = self.selection.iter().collect();
        let before = self.fields.clone();
        let removed = layers::delete(&mut self.fields, &ids);
        self.selection.clear();
        if removed == 0 {
            return false;
        }
        self.commit(before, "delete");
        true
    }

    /// Duplicate the selection; the copies become the new selection.
    pub fn duplicate_selection(&mut self) -> Vec<FieldId> {
        let ids: Vec<FieldId> = self.selection.iter().collect();
        let before = self.fields.clone();
        let created = layers::duplicate(&mut self.fields, &ids);
        if !created.is_empty() {
            self.selection.set(created.iter().copied());
            self.commit(before, "duplicate");
        }
        created
    }

    /// Layer up/down for a single selected field.
    pub fn move_layer(&mut self, direction: LayerDirection) -> bool {
        if !self.settings.capabilities.layers {
            return false;
        }
        let Some(id) = self.selection.single() else {
            log::debug!("LAYER ignored: needs exactly one selected field");
            return false;
        };
        let before = self.fields.clone();
        if !layers::move_layer(&mut self.fields, id, direction) {
            return false;
        }
        self.commit(before, "layer");
        true
    }

    pub fn toggle_visibility(&mut self, id: FieldId) -> bool {
        if !self.settings.capabilities.layers {
            return false;
        }
        let before = self.fields.clone();
        if !layers::toggle_visibility(&mut self.fields, id) {
            log::warn!("VISIBILITY ignored: unknown field {id}");
            return false;
        }
        if find_field(&self.fields, id).is_some_and(|f| !f.visible) {
            self.selection.retain(|s| s != id);
        }
        self.commit(before, "visibility");
        true
    }

    // ─── Transform ───────────────────────────────────────────────────────

    /// Enter the transforming state for the single selected field.
    pub fn begin_transform(&mut self) -> bool {
        if !self.settings.capabilities.transform || !self.gesture.is_idle() || self.image_size().is_none() {
            return false;
        }
        let Some(id) = self.selection.single() else {
            return false;
        };
        if find_field(&self.fields, id).is_none() {
            return false;
        }
        self.gesture = Gesture::Transforming(TransformState::new(id));
        true
    }

    pub fn update_transform(&mut self, frame: TransformFrame) -> bool {
        match &mut self.gesture {
            Gesture::Transforming(t) => {
                t.update(frame);
                true
            }
            _ => false,
        }
    }

    /// Apply the final frame. One history entry per completed transform.
    pub fn end_transform(&mut self, frame: TransformFrame) -> bool {
        if !matches!(self.gesture, Gesture::Transforming(_)) {
            return false;
        }
        let Gesture::Transforming(state) = std::mem::take(&mut self.gesture) else {
            return false;
        };
        let Some(image) = self.image_size() else {
            return false;
        };
        let before = self.fields.clone();
        let Some(field) = self.fields.iter_mut().find(|f| f.id == state.id) else {
            log::warn!("TRANSFORM aborted: {} no longer exists", state.id);
            return true;
        };
        match session::apply_transform(field, &frame, image) {
            Ok(true) => self.commit(before, "transform"),
            Ok(false) => {}
            Err(err) => log::warn!("TRANSFORM ignored: {err}"),
        }
        true
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        let Some(previous) = self.history.undo(&self.fields) else {
            return false;
        };
        self.fields = previous;
        self.prune_selection();
        self.dirty = true;
        log::debug!("COMMIT undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        let Some(next) = self.history.redo(&self.fields) else {
            return false;
        };
        self.fields = next;
        self.prune_selection();
        self.dirty = true;
        log::debug!("COMMIT redo");
        true
    }

    // ─── Paint ───────────────────────────────────────────────────────────

    pub fn paint(&self, canvas: &mut dyn Canvas) {
        let Some(image) = self.image_size() else {
            return;
        };
        let fields = self.display_fields();
        let grid = self.grid_visible.then_some(self.settings.grid_size);
        paint_scene(
            canvas,
            &SceneView {
                fields: fields.as_ref(),
                image,
                selection: self.selection.as_slice(),
                grid,
                indicator: self.indicator(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpl_core::model::Position;

    fn editor_with(fields: Vec<Field>) -> TemplateEditor {
        let mut editor = TemplateEditor::with_fields(fields, EditorSettings::default());
        editor.set_image_size(1000.0, 1000.0).unwrap();
        editor
    }

    #[test]
    fn pixel_work_waits_for_the_image() {
        let mut editor = TemplateEditor::with_fields(vec![Field::text(FieldId(1), "a")], EditorSettings::default());
        editor.selection.replace(FieldId(1));
        assert!(!editor.nudge(1.0, 0.0));
        assert!(!editor.pointer_down(PixelPoint::new(500.0, 500.0), &Modifiers::NONE));
        assert!(editor.set_image_size(0.0, 10.0).is_err());
        assert_eq!(editor.image_state(), &ImageState::Pending);
        editor.image_failed("404");
        assert!(matches!(editor.image_state(), ImageState::Failed(_)));
    }

    #[test]
    fn click_on_empty_area_clears_selection() {
        let mut editor = editor_with(vec![Field::text(FieldId(1), "a").at(10.0, 10.0)]);
        editor.select(FieldId(1), false);
        assert!(editor.pointer_down(PixelPoint::new(900.0, 900.0), &Modifiers::NONE));
        assert!(editor.selection().is_empty());
        assert!(editor.gesture().is_idle());
    }

    #[test]
    fn modifier_click_toggles_without_dragging_out() {
        let mut editor = editor_with(vec![
            Field::text(FieldId(1), "a").at(20.0, 20.0),
            Field::text(FieldId(2), "b").at(70.0, 70.0),
        ]);
        editor.select(FieldId(1), false);
        editor.pointer_down(PixelPoint::new(700.0, 700.0), &Modifiers::SHIFT);
        editor.pointer_up();
        assert_eq!(editor.selection().len(), 2);

        editor.pointer_down(PixelPoint::new(700.0, 700.0), &Modifiers::SHIFT);
        assert!(editor.gesture().is_idle());
        assert_eq!(editor.selection().as_slice(), &[FieldId(1)]);
    }

    #[test]
    fn escape_commits_drag_then_clears_selection() {
        let mut editor = editor_with(vec![Field::text(FieldId(1), "a").at(20.0, 20.0)]);
        editor.pointer_down(PixelPoint::new(200.0, 200.0), &Modifiers::NONE);
        editor.pointer_move(PixelPoint::new(333.0, 277.0));
        assert!(editor.handle(&InputEvent::key("Escape", Modifiers::NONE)));
        assert!(editor.gesture().is_idle());
        assert!(editor.selection().is_empty());
        assert_eq!(editor.fields()[0].position.x, 33.3);
        assert!(editor.take_commit().is_some());
    }

    #[test]
    fn capability_flags_gate_features() {
        let mut settings = EditorSettings::default();
        settings.capabilities.layers = false;
        settings.capabilities.transform = false;
        settings.capabilities.multi_select = false;
        let mut editor = TemplateEditor::with_fields(
            vec![Field::text(FieldId(1), "a"), Field::text(FieldId(2), "b")],
            settings,
        );
        editor.set_image_size(1000.0, 1000.0).unwrap();

        editor.select(FieldId(1), false);
        editor.select(FieldId(2), true);
        assert_eq!(editor.selection().as_slice(), &[FieldId(2)]);
        assert!(!editor.select_all());
        assert!(!editor.move_layer(LayerDirection::Up));
        assert!(!editor.toggle_visibility(FieldId(1)));
        assert!(!editor.begin_transform());
    }

    #[test]
    fn hiding_a_field_deselects_it() {
        let mut editor = editor_with(vec![Field::text(FieldId(1), "a")]);
        editor.select(FieldId(1), false);
        assert!(editor.toggle_visibility(FieldId(1)));
        assert!(editor.selection().is_empty());
        assert!(editor.undo());
        assert!(editor.fields()[0].visible);
    }

    #[test]
    fn grid_toggle_and_zoom_shortcuts() {
        let mut editor = editor_with(vec![]);
        assert!(editor.handle(&InputEvent::key("g", Modifiers::NONE)));
        assert!(!editor.grid_visible());
        assert!(editor.settings().grid_enabled, "G only hides the grid");
        editor.handle(&InputEvent::key("+", Modifiers::NONE));
        assert!((editor.viewport.scale - 1.1).abs() < 1e-9);
        editor.handle(&InputEvent::key("ArrowRight", Modifiers::CTRL));
        assert_eq!(editor.viewport.offset_x, 1.0);
    }

    #[test]
    fn selection_bounds_follow_rotation_and_viewport() {
        let mut logo = Field::image(FieldId(1), "logo").at(50.0, 50.0);
        logo.size = Some(tpl_core::model::Size {
            width: 200.0,
            height: 100.0,
        });
        logo.rotation = 90.0;
        let mut editor = editor_with(vec![logo, Field::image(FieldId(2), "seal").at(10.0, 10.0)]);
        assert_eq!(editor.selection_bounds(), None);

        editor.select(FieldId(1), false);
        editor.viewport.scale = 0.5;
        editor.viewport.offset_x = 20.0;
        editor.viewport.offset_y = 0.0;
        let b = editor.selection_bounds().unwrap();
        let close = |a: f64, e: f64| (a - e).abs() < 1e-9;
        assert!(close(b.left, 245.0) && close(b.right, 295.0), "{b:?}");
        assert!(close(b.top, 200.0) && close(b.bottom, 300.0), "{b:?}");

        editor.select(FieldId(2), false);
        let seal_only = editor.selection_bounds();
        editor.toggle_visibility(FieldId(1));
        editor.select(FieldId(1), true);
        assert_eq!(editor.selection().len(), 2);
        assert_eq!(editor.selection_bounds(), seal_only, "hidden fields add nothing");
    }

    #[test]
    fn set_fields_resets_history_and_prunes_selection() {
        let mut editor = editor_with(vec![Field::text(FieldId(1), "a")]);
        editor.select(FieldId(1), false);
        editor.nudge(5.0, 0.0);
        assert!(editor.can_undo());
        editor.set_fields(vec![Field::text(FieldId(2), "b").at(10.0, 10.0)]);
        assert!(!editor.can_undo());
        assert!(editor.selection().is_empty());
        assert_eq!(editor.fields()[0].position, Position::new(10.0, 10.0));
    }
}
