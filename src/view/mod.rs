//! Layout, viewport, and selection over the document model.

pub mod controller;
pub mod layout;
pub mod selection;
pub mod viewport;

pub use controller::Viewer;
pub use layout::{Alignment, LayoutEngine, LayoutItem, LayoutParams, PageSlot, PagesLayout};
pub use selection::{SelectionChanged, SelectionMode, SelectionModel};
pub use viewport::{ScrollBarRects, Viewport};
