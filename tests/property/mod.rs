// Property-based tests for the timeline layout engine
// Each submodule checks one property against random inputs

mod columns_properties;
mod gesture_properties;
mod lanes_properties;
mod slots_properties;
mod window_properties;
