// Resource Timeline Library
// Layout and interaction engine for resource timelines, plus the egui binding

pub mod models;
pub mod services;
pub mod ui_egui;
pub mod utils;
