// ============================================================================
// spark-effects - Trackers Module
// Hooks that turn host events into reactive state or style writes
// ============================================================================
//
// Every hook follows the same shape: allocate output signals (and a NodeRef
// when the tracker is element-bound), then register one effect whose setup
// reads the reactive inputs, wires host callbacks and returns a teardown.
// Changing an input tears the previous wiring down before setting it up
// again; stopping the enclosing scope, or dropping the tracker when created
// outside one, runs the last teardown.
//
// Closures handed to the host hold the host weakly and check a per-setup
// liveness flag, so nothing fires into a torn-down tracker.
// ============================================================================

pub mod count_up;
pub mod magnetic_hover;
pub mod pointer_glow;
pub mod scroll_reveal;
pub mod stagger_reveal;
pub mod tilt;

pub use count_up::{CountUp, CountUpPhase, count_at, use_count_up};
pub use magnetic_hover::{FOLLOW_TRANSITION, MagneticHover, MagneticOffset, use_magnetic_hover};
pub use pointer_glow::{GlowPosition, PointerGlow, use_pointer_glow};
pub use scroll_reveal::{ScrollReveal, use_scroll_reveal};
pub use stagger_reveal::{StaggerReveal, use_stagger_reveal};
pub use tilt::{PERSPECTIVE_PX, Tilt, TiltTransform, tilt_transform, tilt_transition, use_tilt};
