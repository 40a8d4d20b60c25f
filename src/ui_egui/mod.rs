mod app;
pub mod theme;
pub mod timeline_view;

pub use app::{EventStore, TimelineApp};
pub use timeline_view::{TimelineData, TimelineView};
