mod layer;
mod mapper;
mod selection;

pub use layer::{Annotation, OverlayLayer};
pub use mapper::DisplayMapper;
pub use selection::{PointerEvent, PointerKind, Selection, SelectionEvent, SelectionMode};
