//! Integration tests: pointer gestures through the editor shell.
//!
//! Covers snapping while dragging, the percentage commit on pointer-up,
//! multi-select drags, viewport mapping and resize/rotate transforms.

use pretty_assertions::assert_eq;
use tpl_core::geometry::FieldBox;
use tpl_core::{EditorSettings, Field, FieldId, GuideKind, ImageSize, PixelPoint, Position, find_field};
use tpl_editor::{Gesture, InputEvent, Modifiers, TemplateEditor, TransformFrame};
use tpl_render::{Canvas, GuideLine, ImageDraw, TextDraw};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn editor_with(fields: Vec<Field>, settings: EditorSettings) -> TemplateEditor {
    init_logging();
    let mut editor = TemplateEditor::with_fields(fields, settings);
    editor.set_image_size(1000.0, 1000.0).unwrap();
    editor
}

fn no_snap() -> EditorSettings {
    EditorSettings {
        snap_to_grid: false,
        ..EditorSettings::default()
    }
}

fn down(editor: &mut TemplateEditor, x: f64, y: f64, modifiers: Modifiers) -> bool {
    editor.handle(&InputEvent::PointerDown { x, y, modifiers })
}

fn drag_to(editor: &mut TemplateEditor, x: f64, y: f64) {
    editor.handle(&InputEvent::PointerMove {
        x,
        y,
        modifiers: Modifiers::NONE,
    });
}

fn up(editor: &mut TemplateEditor, x: f64, y: f64) -> bool {
    editor.handle(&InputEvent::PointerUp { x, y })
}

fn position(editor: &TemplateEditor, id: u32) -> (f64, f64) {
    let f = find_field(editor.fields(), FieldId(id)).unwrap();
    (f.position.x, f.position.y)
}

// ─── Snapping scenarios ─────────────────────────────────────────────────

#[test]
fn lone_field_snaps_to_center_and_grid() {
    let mut editor = editor_with(vec![Field::image(FieldId(1), "a").at(10.0, 80.0)], EditorSettings::default());
    assert!(down(&mut editor, 100.0, 800.0, Modifiers::NONE));
    drag_to(&mut editor, 504.0, 48.0);

    let snap = *editor.indicator().unwrap();
    assert_eq!(snap.position, PixelPoint::new(500.0, 50.0));
    assert_eq!(snap.x.map(|g| g.kind), Some(GuideKind::Center));
    assert_eq!(snap.y.map(|g| g.kind), Some(GuideKind::Grid));

    up(&mut editor, 504.0, 48.0);
    let field = &editor.fields()[0];
    assert_eq!((field.position.x, field.position.y), (50.0, 5.0));
    assert_eq!(field.position.snapped_to_grid, Some(true));
    assert!(editor.indicator().is_none(), "indicator is cleared on pointer-up");
}

#[test]
fn dragged_field_snaps_to_neighbour_center() {
    let mut editor = editor_with(
        vec![
            Field::text(FieldId(1), "a").at(20.0, 20.0),
            Field::text(FieldId(2), "b").at(70.0, 70.0),
        ],
        EditorSettings::default(),
    );
    down(&mut editor, 700.0, 700.0, Modifiers::NONE);
    drag_to(&mut editor, 205.0, 400.0);

    let snap = *editor.indicator().unwrap();
    assert_eq!(snap.position, PixelPoint::new(200.0, 400.0));
    assert_eq!(snap.x.map(|g| g.kind), Some(GuideKind::FieldCenter));
    assert_eq!(snap.x.and_then(|g| g.owner), Some(FieldId(1)));

    up(&mut editor, 205.0, 400.0);
    assert_eq!(position(&editor, 2), (20.0, 40.0));
    assert_eq!(position(&editor, 1), (20.0, 20.0));
}

#[test]
fn snapping_off_passes_raw_positions_through() {
    let mut editor = editor_with(vec![Field::image(FieldId(1), "a").at(10.0, 10.0)], no_snap());
    down(&mut editor, 100.0, 100.0, Modifiers::NONE);
    drag_to(&mut editor, 503.0, 52.0);
    assert!(editor.indicator().is_none());
    up(&mut editor, 503.0, 52.0);
    assert_eq!(position(&editor, 1), (50.3, 5.2));
    assert_eq!(editor.fields()[0].position.snapped_to_grid, Some(false));
}

// ─── Commit semantics ───────────────────────────────────────────────────

#[test]
fn visual_position_is_transient_until_pointer_up() {
    let mut editor = editor_with(vec![Field::text(FieldId(1), "a").at(10.0, 10.0)], no_snap());
    down(&mut editor, 100.0, 100.0, Modifiers::NONE);
    drag_to(&mut editor, 400.0, 300.0);

    assert_eq!(position(&editor, 1), (10.0, 10.0));
    let preview = editor.display_fields();
    assert!((preview[0].position.x - 40.0).abs() < 1e-9);
    assert!((preview[0].position.y - 30.0).abs() < 1e-9);
    assert!(editor.take_commit().is_none());

    up(&mut editor, 400.0, 300.0);
    assert_eq!(position(&editor, 1), (40.0, 30.0));
    assert!(editor.take_commit().is_some());
}

#[test]
fn zero_displacement_drag_still_commits() {
    let mut editor = editor_with(vec![Field::text(FieldId(1), "a").at(33.33, 66.67)], no_snap());
    down(&mut editor, 333.3, 666.7, Modifiers::NONE);
    up(&mut editor, 333.3, 666.7);
    assert!(editor.take_commit().is_some());
    assert_eq!(position(&editor, 1), (33.33, 66.67));
}

#[test]
fn drag_is_one_history_entry() {
    let mut editor = editor_with(vec![Field::text(FieldId(1), "a").at(10.0, 10.0)], no_snap());
    down(&mut editor, 100.0, 100.0, Modifiers::NONE);
    for step in 1..=10 {
        drag_to(&mut editor, 100.0 + step as f64 * 10.0, 100.0);
    }
    up(&mut editor, 200.0, 100.0);
    assert_eq!(position(&editor, 1), (20.0, 10.0));

    assert!(editor.undo());
    assert_eq!(position(&editor, 1), (10.0, 10.0));
    assert!(!editor.undo());
}

#[test]
fn drag_past_the_edge_is_clamped() {
    let mut editor = editor_with(vec![Field::image(FieldId(1), "a").at(90.0, 10.0)], no_snap());
    down(&mut editor, 900.0, 100.0, Modifiers::NONE);
    up(&mut editor, 1400.0, -300.0);
    assert_eq!(position(&editor, 1), (100.0, 0.0));
}

// ─── Multi-select ───────────────────────────────────────────────────────

#[test]
fn multi_select_drag_moves_every_selected_field() {
    let mut editor = editor_with(
        vec![
            Field::text(FieldId(1), "a").at(10.0, 10.0),
            Field::text(FieldId(2), "b").at(40.0, 60.0),
            Field::text(FieldId(3), "c").at(80.0, 20.0),
        ],
        no_snap(),
    );
    down(&mut editor, 100.0, 100.0, Modifiers::NONE);
    up(&mut editor, 100.0, 100.0);
    down(&mut editor, 400.0, 600.0, Modifiers::SHIFT);
    up(&mut editor, 400.0, 600.0);
    assert_eq!(editor.selection().len(), 2);

    // Grab A; B follows by the same pixel delta.
    down(&mut editor, 100.0, 100.0, Modifiers::NONE);
    assert_eq!(editor.selection().len(), 2, "pressing a selected field keeps the selection");
    drag_to(&mut editor, 137.0, 123.0);
    up(&mut editor, 137.0, 123.0);

    assert_eq!(position(&editor, 1), (13.7, 12.3));
    assert_eq!(position(&editor, 2), (43.7, 62.3));
    assert_eq!(position(&editor, 3), (80.0, 20.0));

    editor.undo();
    assert_eq!(position(&editor, 1), (10.0, 10.0));
    assert_eq!(position(&editor, 2), (40.0, 60.0));
}

#[test]
fn hidden_fields_cannot_be_grabbed() {
    let mut hidden = Field::text(FieldId(1), "a").at(50.0, 50.0);
    hidden.visible = false;
    let mut editor = editor_with(vec![hidden], EditorSettings::default());
    down(&mut editor, 500.0, 500.0, Modifiers::NONE);
    assert!(editor.gesture().is_idle());
    assert!(editor.selection().is_empty());
}

#[test]
fn topmost_field_wins_the_press() {
    let mut editor = editor_with(
        vec![
            Field::text(FieldId(1), "under").at(50.0, 50.0).with_z(5),
            Field::text(FieldId(2), "over").at(50.0, 50.0).with_z(1),
        ],
        EditorSettings::default(),
    );
    down(&mut editor, 500.0, 500.0, Modifiers::NONE);
    assert_eq!(editor.selection().as_slice(), &[FieldId(1)]);
}

// ─── Viewport ───────────────────────────────────────────────────────────

#[derive(Default)]
struct FontSizes(Vec<f64>);

impl Canvas for FontSizes {
    fn draw_background(&mut self, _image: ImageSize) {}
    fn draw_guide(&mut self, _line: &GuideLine) {}
    fn draw_text(&mut self, text: &TextDraw<'_>) {
        self.0.push(text.font_size);
    }
    fn draw_image_box(&mut self, _image: &ImageDraw) {}
    fn draw_selection(&mut self, _bounds: &FieldBox, _anchor: PixelPoint, _rotation: f64) {}
}

#[test]
fn zoomed_pointer_maps_into_image_space() {
    let mut editor = editor_with(vec![Field::text(FieldId(1), "a").at(50.0, 50.0)], no_snap());
    editor.viewport.scale = 0.5;
    editor.viewport.offset_x = 20.0;

    down(&mut editor, 270.0, 250.0, Modifiers::NONE);
    drag_to(&mut editor, 320.0, 250.0);
    up(&mut editor, 320.0, 250.0);
    assert_eq!(position(&editor, 1), (60.0, 50.0));
}

#[test]
fn zoom_never_changes_style_scaling() {
    let mut editor = editor_with(vec![Field::text(FieldId(1), "a")], EditorSettings::default());
    let mut at_one = FontSizes::default();
    editor.paint(&mut at_one);

    editor.handle(&InputEvent::key("+", Modifiers::NONE));
    editor.handle(&InputEvent::Wheel {
        x: 10.0,
        y: 10.0,
        dx: 0.0,
        dy: -100.0,
        modifiers: Modifiers::NONE,
    });
    assert!(editor.viewport.scale > 1.1);

    let mut zoomed = FontSizes::default();
    editor.paint(&mut zoomed);
    assert_eq!(at_one.0, vec![24.0]);
    assert_eq!(zoomed.0, at_one.0);
}

// ─── Transform ──────────────────────────────────────────────────────────

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

#[test]
fn transform_commits_once_with_explicit_size() {
    let mut editor = editor_with(vec![Field::image(FieldId(1), "logo").at(50.0, 50.0)], EditorSettings::default());
    editor.select(FieldId(1), false);
    assert!(editor.begin_transform());
    assert!(matches!(editor.gesture(), Gesture::Transforming(_)));

    for w in [260.0, 280.0, 300.0] {
        editor.update_transform(frame(100.0, 100.0, w, 200.0, 2.0));
    }
    assert_eq!(editor.display_fields()[0].size.map(|s| s.width), Some(300.0));
    assert_eq!(editor.fields()[0].size, None);

    assert!(editor.end_transform(frame(100.0, 100.0, 300.0, 200.0, 2.0)));
    let field = &editor.fields()[0];
    assert_eq!((field.position.x, field.position.y), (25.0, 20.0));
    assert_eq!(field.size.map(|s| (s.width, s.height)), Some((300.0, 200.0)));
    assert_eq!(field.rotation, 0.0);

    assert!(editor.undo());
    assert_eq!(editor.fields()[0].position, Position::new(50.0, 50.0));
    assert!(!editor.undo());
}

#[test]
fn transform_needs_a_single_selection() {
    let mut editor = editor_with(
        vec![Field::text(FieldId(1), "a"), Field::text(FieldId(2), "b")],
        EditorSettings::default(),
    );
    assert!(!editor.begin_transform());
    editor.select(FieldId(1), false);
    editor.select(FieldId(2), true);
    assert!(!editor.begin_transform());
    assert!(!editor.end_transform(frame(0.0, 0.0, 50.0, 50.0, 0.0)));
}

#[test]
fn undersized_transform_records_nothing() {
    let mut editor = editor_with(vec![Field::image(FieldId(1), "logo")], EditorSettings::default());
    editor.select(FieldId(1), false);
    editor.begin_transform();
    editor.end_transform(frame(0.0, 0.0, 4.0, 4.0, 0.0));
    assert_eq!(editor.fields()[0].size, None);
    assert!(!editor.can_undo());
    assert!(editor.gesture().is_idle());
}

#[test]
fn escape_commits_the_transform_in_progress() {
    let mut editor = editor_with(vec![Field::image(FieldId(1), "logo").at(50.0, 50.0)], EditorSettings::default());
    editor.select(FieldId(1), false);
    editor.begin_transform();
    editor.update_transform(frame(100.0, 100.0, 300.0, 200.0, 0.0));

    assert!(editor.handle(&InputEvent::key("Escape", Modifiers::NONE)));
    assert!(editor.gesture().is_idle());
    assert!(editor.selection().is_empty());
    let field = &editor.fields()[0];
    assert_eq!((field.position.x, field.position.y), (25.0, 20.0));
    assert_eq!(field.size.map(|s| (s.width, s.height)), Some((300.0, 200.0)));
    assert!(editor.can_undo());
    assert!(editor.take_commit().is_some());
}

#[test]
fn escape_before_any_frame_leaves_the_field() {
    let mut editor = editor_with(vec![Field::image(FieldId(1), "logo").at(50.0, 50.0)], EditorSettings::default());
    editor.select(FieldId(1), false);
    editor.begin_transform();

    assert!(editor.handle(&InputEvent::key("Escape", Modifiers::NONE)));
    assert!(editor.gesture().is_idle());
    assert_eq!(editor.fields()[0].size, None);
    assert!(!editor.can_undo());
}

// ─── Grid ───────────────────────────────────────────────────────────────

#[derive(Default)]
struct GridLines(usize);

impl Canvas for GridLines {
    fn draw_background(&mut self, _image: ImageSize) {}
    fn draw_guide(&mut self, line: &GuideLine) {
        if line.dash.is_none() {
            self.0 += 1;
        }
    }
    fn draw_text(&mut self, _text: &TextDraw<'_>) {}
    fn draw_image_box(&mut self, _image: &ImageDraw) {}
    fn draw_selection(&mut self, _bounds: &FieldBox, _anchor: PixelPoint, _rotation: f64) {}
}

#[test]
fn hiding_the_grid_keeps_grid_snapping() {
    let mut editor = editor_with(vec![Field::image(FieldId(1), "a").at(10.0, 80.0)], EditorSettings::default());
    let mut shown = GridLines::default();
    editor.paint(&mut shown);
    assert_eq!(shown.0, 42);

    assert!(editor.handle(&InputEvent::key("g", Modifiers::NONE)));
    let mut hidden = GridLines::default();
    editor.paint(&mut hidden);
    assert_eq!(hidden.0, 0);

    down(&mut editor, 100.0, 800.0, Modifiers::NONE);
    drag_to(&mut editor, 504.0, 48.0);
    assert_eq!(editor.indicator().and_then(|s| s.y).map(|g| g.kind), Some(GuideKind::Grid));
    up(&mut editor, 504.0, 48.0);
    assert_eq!(editor.fields()[0].position.snapped_to_grid, Some(true));
}

#[test]
fn sub_pixel_grid_size_drags_without_grid_lines() {
    let settings = EditorSettings::from_json(r#"{"gridSize": 1e-300}"#).unwrap();
    let mut editor = editor_with(vec![Field::image(FieldId(1), "a").at(10.0, 80.0)], settings);
    down(&mut editor, 100.0, 800.0, Modifiers::NONE);
    drag_to(&mut editor, 504.0, 48.0);

    let snap = *editor.indicator().unwrap();
    assert_eq!(snap.x.map(|g| g.kind), Some(GuideKind::Center));
    assert_eq!(snap.y, None);

    let mut lines = GridLines::default();
    editor.paint(&mut lines);
    assert_eq!(lines.0, 0);
}
