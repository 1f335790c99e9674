// ============================================================================
// spark-effects - Constants
// Effect status flags and scheduling limits
// ============================================================================

// =============================================================================
// EFFECT STATUS FLAGS
// =============================================================================

/// Effect is up to date with its dependencies
pub const CLEAN: u32 = 1 << 0;

/// A dependency changed while the effect was running; it must run again
pub const DIRTY: u32 = 1 << 1;

/// Effect function is currently executing
pub const RUNNING: u32 = 1 << 2;

/// Effect has been disposed and will never run again
pub const DESTROYED: u32 = 1 << 3;

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum consecutive re-runs of one effect before it is considered to be
/// invalidating itself in a loop.
pub const MAX_EFFECT_RERUNS: u32 = 100;
