// Timeline configuration persistence
pub mod service;

pub use service::{ConfigError, ConfigService};
