// ============================================================================
// spark-effects - Core Module
// Fundamental types, traits, and context for the reactive system
// ============================================================================

pub mod constants;
pub mod context;
pub mod types;

pub use context::{ReactiveContext, is_tracking, with_context};
pub use types::{AnyReaction, AnySource, EqualsFn, SourceInner, default_equals};
