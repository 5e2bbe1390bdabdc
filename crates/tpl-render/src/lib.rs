pub mod hit;
pub mod paint;

pub use hit::{hit_test, rotated_bounds};
pub use paint::{Canvas, GuideLine, ImageDraw, SceneView, TextDraw, guide_color, paint_scene};
