pub mod coords;
pub mod error;
pub mod geometry;
pub mod guides;
pub mod id;
pub mod model;
pub mod persist;
pub mod settings;
pub mod snap;

pub use coords::{ImageSize, PixelPoint, REFERENCE_WIDTH, scale_style_value, to_percent, to_pixels};
pub use error::{CoordError, LoadError};
pub use geometry::{FieldBox, field_box};
pub use guides::{GuideAxis, GuideKind, GuideParams, Guideline, generate_guides};
pub use id::FieldId;
pub use model::*;
pub use persist::{emit_fields, load_fields};
pub use settings::{Capabilities, EditorSettings};
pub use snap::{ResolvedGuide, SnapResult, resolve_snap};
