//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map is
//! plain data so the browser bridge and native tests share it.

use crate::input::Modifiers;

/// Nudge and pan step with and without Shift, in image pixels.
pub const NUDGE_STEP: f64 = 1.0;
pub const NUDGE_STEP_LARGE: f64 = 10.0;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    Duplicate,
    Delete,
    SelectAll,
    /// Escape: finish any gesture, then clear the selection.
    Deselect,
    /// Move the selection in image pixels.
    Nudge { dx: f64, dy: f64 },

    // ── Z-order ──
    LayerUp,
    LayerDown,

    // ── View ──
    /// Move the viewport, not the selection.
    Pan { dx: f64, dy: f64 },
    ZoomIn,
    ZoomOut,
    ZoomToFit,
    ToggleGrid,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: &Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        if let Some((ux, uy)) = arrow_direction(key) {
            let step = if modifiers.shift {
                NUDGE_STEP_LARGE
            } else {
                NUDGE_STEP
            };
            let (dx, dy) = (ux * step, uy * step);
            return Some(if cmd {
                ShortcutAction::Pan { dx, dy }
            } else {
                ShortcutAction::Nudge { dx, dy }
            });
        }

        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" | "c" | "C" => Some(ShortcutAction::Duplicate),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "]" => Some(ShortcutAction::LayerUp),
                "[" => Some(ShortcutAction::LayerDown),
                "0" => Some(ShortcutAction::ZoomToFit),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            "+" | "=" => Some(ShortcutAction::ZoomIn),
            "-" => Some(ShortcutAction::ZoomOut),
            "g" | "G" => Some(ShortcutAction::ToggleGrid),
            _ => None,
        }
    }
}

fn arrow_direction(key: &str) -> Option<(f64, f64)> {
    match key {
        "ArrowLeft" => Some((-1.0, 0.0)),
        "ArrowRight" => Some((1.0, 0.0)),
        "ArrowUp" => Some((0.0, -1.0)),
        "ArrowDown" => Some((0.0, 1.0)),
        _ => None,
    }
}
