pub mod editor;
pub mod history;
pub mod input;
pub mod layers;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod viewport;

pub use editor::{ImageState, TemplateEditor};
pub use history::History;
pub use input::{InputEvent, Modifiers};
pub use layers::LayerDirection;
pub use selection::Selection;
pub use session::{Gesture, TransformFrame};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use viewport::Viewport;
