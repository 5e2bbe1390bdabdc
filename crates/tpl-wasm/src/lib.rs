//! WASM bridge for the template editor.
//!
//! Compiled via `wasm-pack build --target web`. Fields cross the boundary
//! as JSON in the persistence shape; event handlers return `true` when the
//! canvas needs a repaint.

mod render2d;

use serde::Serialize;
use tpl_core::geometry::FieldBox;
use tpl_core::id::FieldId;
use tpl_core::persist::{emit_fields, load_fields};
use tpl_core::settings::EditorSettings;
use tpl_editor::{
    InputEvent, LayerDirection, Modifiers, ShortcutAction, ShortcutMap, TemplateEditor, TransformFrame,
};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// The JS-facing editor controller. One instance per `<canvas>`.
#[wasm_bindgen]
pub struct TemplateCanvas {
    editor: TemplateEditor,
    background: Option<HtmlImageElement>,
    width: f64,
    height: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewState {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    can_undo: bool,
    can_redo: bool,
    grid_visible: bool,
}

#[derive(Serialize)]
struct ScreenBox {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn frame(left: f64, top: f64, width: f64, height: f64, rotation: f64) -> TransformFrame {
    TransformFrame {
        bounds: FieldBox {
            left,
            top,
            right: left + width,
            bottom: top + height,
        },
        rotation,
    }
}

#[wasm_bindgen]
impl TemplateCanvas {
    /// Create a controller for a canvas of the given size. Malformed
    /// `settings_json` falls back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, settings_json: &str) -> Self {
        console_error_panic_hook_setup();

        let settings = if settings_json.trim().is_empty() {
            EditorSettings::default()
        } else {
            EditorSettings::from_json(settings_json).unwrap_or_else(|err| {
                log::warn!("settings ignored: {err}");
                EditorSettings::default()
            })
        };
        let mut editor = TemplateEditor::new(settings);
        editor.viewport.set_container(width, height);
        Self {
            editor,
            background: None,
            width,
            height,
        }
    }

    /// Load the field array. Returns `false` on malformed JSON.
    pub fn set_fields(&mut self, json: &str) -> bool {
        match load_fields(json) {
            Ok(fields) => {
                self.editor.set_fields(fields);
                true
            }
            Err(err) => {
                log::warn!("set_fields: {err}");
                false
            }
        }
    }

    pub fn get_fields(&self) -> String {
        emit_fields(self.editor.fields())
    }

    /// The committed field array if anything changed since the last call,
    /// otherwise an empty string.
    pub fn take_commit(&mut self) -> String {
        self.editor.take_commit().map(emit_fields).unwrap_or_default()
    }

    /// Use a loaded `<img>` as the background. Returns `false` while its
    /// natural size is still unknown.
    pub fn set_image(&mut self, img: HtmlImageElement) -> bool {
        let (w, h) = (img.natural_width() as f64, img.natural_height() as f64);
        if self.set_image_size(w, h) {
            self.background = Some(img);
            true
        } else {
            false
        }
    }

    pub fn set_image_size(&mut self, width: f64, height: f64) -> bool {
        self.editor.set_image_size(width, height).is_ok()
    }

    pub fn image_failed(&mut self, reason: &str) {
        self.background = None;
        self.editor.image_failed(reason);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.editor.viewport.set_container(width, height);
        if let Some(size) = self.editor.image_size() {
            self.editor.viewport.fit(size);
        }
    }

    /// Render the scene to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.clear_rect(0.0, 0.0, self.width, self.height);
        let v = &self.editor.viewport;
        let _ = ctx.set_transform(v.scale, 0.0, 0.0, v.scale, v.offset_x, v.offset_y);
        let mut canvas = render2d::Canvas2d::new(ctx, self.background.as_ref());
        self.editor.paint(&mut canvas);
        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    }

    // ─── Events ──────────────────────────────────────────────────────────

    pub fn handle_pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        self.editor.handle(&InputEvent::PointerDown {
            x,
            y,
            modifiers: modifiers(shift, ctrl, alt, meta),
        })
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        self.editor.handle(&InputEvent::PointerMove {
            x,
            y,
            modifiers: modifiers(shift, ctrl, alt, meta),
        })
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.editor.handle(&InputEvent::PointerUp { x, y })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn handle_wheel(
        &mut self,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.editor.handle(&InputEvent::Wheel {
            x,
            y,
            dx,
            dy,
            modifiers: modifiers(shift, ctrl, alt, meta),
        })
    }

    /// Handle a keydown. Returns `true` if the key was consumed.
    pub fn handle_key(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        self.editor
            .handle(&InputEvent::key(key, modifiers(shift, ctrl, alt, meta)))
    }

    // ─── Commands ────────────────────────────────────────────────────────

    pub fn select(&mut self, id: u32, additive: bool) -> bool {
        self.editor.select(FieldId(id), additive)
    }

    /// Selected ids as a JSON array.
    pub fn selected_ids(&self) -> String {
        serde_json::to_string(self.editor.selection().as_slice()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    pub fn delete_selection(&mut self) -> bool {
        self.editor.delete_selection()
    }

    /// Ids of the new copies as a JSON array.
    pub fn duplicate_selection(&mut self) -> String {
        let created = self.editor.duplicate_selection();
        serde_json::to_string(&created).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn layer_up(&mut self) -> bool {
        self.editor.move_layer(LayerDirection::Up)
    }

    pub fn layer_down(&mut self) -> bool {
        self.editor.move_layer(LayerDirection::Down)
    }

    pub fn toggle_visibility(&mut self, id: u32) -> bool {
        self.editor.toggle_visibility(FieldId(id))
    }

    pub fn begin_transform(&mut self) -> bool {
        self.editor.begin_transform()
    }

    /// Intermediate transform frame in image pixels.
    pub fn update_transform(&mut self, left: f64, top: f64, width: f64, height: f64, rotation: f64) -> bool {
        self.editor.update_transform(frame(left, top, width, height, rotation))
    }

    pub fn end_transform(&mut self, left: f64, top: f64, width: f64, height: f64, rotation: f64) -> bool {
        self.editor.end_transform(frame(left, top, width, height, rotation))
    }

    /// The snap indicator of the running drag as JSON, or an empty string.
    pub fn indicator(&self) -> String {
        self.editor
            .indicator()
            .and_then(|snap| serde_json::to_string(snap).ok())
            .unwrap_or_default()
    }

    /// Screen-space box around the selection as JSON, or an empty string
    /// when nothing visible is selected.
    pub fn selection_bounds(&self) -> String {
        self.editor
            .selection_bounds()
            .map(|b| ScreenBox {
                left: b.left,
                top: b.top,
                right: b.right,
                bottom: b.bottom,
            })
            .and_then(|b| serde_json::to_string(&b).ok())
            .unwrap_or_default()
    }

    /// Zoom, pan and history availability as JSON.
    pub fn view_state(&self) -> String {
        let v = &self.editor.viewport;
        let state = ViewState {
            scale: v.scale,
            offset_x: v.offset_x,
            offset_y: v.offset_y,
            can_undo: self.editor.can_undo(),
            can_redo: self.editor.can_redo(),
            grid_visible: self.editor.grid_visible(),
        };
        serde_json::to_string(&state).unwrap_or_default()
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("template editor panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Validate a field array. Returns JSON: `{"ok":true,"count":n}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_fields(json: &str) -> String {
    match load_fields(json) {
        Ok(fields) => serde_json::json!({ "ok": true, "count": fields.len() }).to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

/// Name of the action bound to a key combo, or an empty string. Lets the
/// host decide whether to `preventDefault()` before forwarding the key.
#[wasm_bindgen]
pub fn resolve_shortcut(key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> String {
    ShortcutMap::resolve(key, &modifiers(shift, ctrl, alt, meta))
        .map(action_name)
        .unwrap_or_default()
        .to_string()
}

fn action_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Duplicate => "duplicate",
        ShortcutAction::Delete => "delete",
        ShortcutAction::SelectAll => "selectAll",
        ShortcutAction::Deselect => "deselect",
        ShortcutAction::Nudge { .. } => "nudge",
        ShortcutAction::LayerUp => "layerUp",
        ShortcutAction::LayerDown => "layerDown",
        ShortcutAction::Pan { .. } => "pan",
        ShortcutAction::ZoomIn => "zoomIn",
        ShortcutAction::ZoomOut => "zoomOut",
        ShortcutAction::ZoomToFit => "zoomToFit",
        ShortcutAction::ToggleGrid => "toggleGrid",
    }
}
