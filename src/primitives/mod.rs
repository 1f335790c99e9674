// ============================================================================
// spark-effects - Primitives Module
// Core reactive primitives: signal, effect, scope
// ============================================================================

pub mod effect;
pub mod scope;
pub mod signal;

pub use effect::{
    CleanupFn, Effect, EffectFn, EffectInner, destroy_effect, effect, effect_tracking,
    effect_with_cleanup, update_effect,
};
pub use scope::{
    EffectScope, ScopeCleanupFn, effect_scope, get_current_scope, on_scope_dispose,
};
pub use signal::{ReadSignal, Signal, signal, signal_with_equals};
