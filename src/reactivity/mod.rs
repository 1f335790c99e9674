// ============================================================================
// spark-effects - Reactivity Module
// Dependency tracking and write notification
// ============================================================================

pub mod tracking;

pub use tracking::{notify_write, track_read, untrack};
