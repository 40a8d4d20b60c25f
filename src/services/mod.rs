// Service module exports
// Pure layout passes first, then the stateful controllers built on them.

pub mod columns;
pub mod interaction;
pub mod lanes;
pub mod normalize;
pub mod settings;
pub mod slots;
pub mod timeline;
pub mod window;
