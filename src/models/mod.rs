// Module exports for models
// Host-facing data: resources, events, configuration and view geometry

pub mod event;
pub mod resource;
pub mod settings;
pub mod ui;
