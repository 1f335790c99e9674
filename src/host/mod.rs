// ============================================================================
// spark-effects - Host Module
// The capabilities trackers consume from the UI runtime
// ============================================================================
//
// Trackers never talk to a platform directly. Everything they need (frame
// scheduling, timers, pointer listeners, intersection observers, geometry
// queries and inline style writes) comes through the `Host` trait. A browser
// binding implements it over the DOM; `VirtualHost` implements it over a
// virtual clock for headless driving and tests.
// ============================================================================

pub mod events;
pub mod geometry;
pub mod margin;
pub mod node_ref;
pub mod virtual_host;

use std::rc::Rc;

pub use events::{IntersectionEntry, IntersectionObserverInit, PointerEvent, PointerEventKind};
pub use geometry::{Point, Rect};
pub use margin::{Length, RootMargin};
pub use node_ref::NodeRef;
pub use virtual_host::{DEFAULT_FRAME_INTERVAL_MS, VirtualHost};

// =============================================================================
// HANDLES
// =============================================================================

/// Identity of an element known to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(pub u64);

// =============================================================================
// CALLBACKS
// =============================================================================

/// Runs once on the next frame with the frame timestamp in ms
pub type FrameCallback = Box<dyn FnOnce(f64)>;

pub type TimerCallback = Box<dyn FnOnce()>;

pub type PointerListener = Rc<dyn Fn(&PointerEvent)>;

pub type IntersectionCallback = Rc<dyn Fn(&IntersectionEntry)>;

// =============================================================================
// HOST
// =============================================================================

/// The runtime capabilities a tracker consumes.
///
/// All methods take `&self`; implementations use interior mutability and
/// must not hold internal borrows while invoking callbacks, since callbacks
/// re-enter the host (a frame callback requesting the next frame, a timer
/// clearing its siblings).
///
/// Cancel/remove/disconnect with a handle that already fired, was already
/// released, or never existed is a no-op.
pub trait Host {
    /// Monotonic clock in ms
    fn now(&self) -> f64;

    fn request_animation_frame(&self, callback: FrameCallback) -> FrameHandle;

    fn cancel_animation_frame(&self, handle: FrameHandle);

    fn set_timeout(&self, callback: TimerCallback, delay_ms: u32) -> TimerHandle;

    fn clear_timeout(&self, handle: TimerHandle);

    fn add_pointer_listener(
        &self,
        element: ElementId,
        kind: PointerEventKind,
        listener: PointerListener,
    ) -> ListenerHandle;

    fn remove_pointer_listener(&self, handle: ListenerHandle);

    fn observe_intersection(
        &self,
        element: ElementId,
        init: IntersectionObserverInit,
        callback: IntersectionCallback,
    ) -> ObserverHandle;

    fn disconnect_observer(&self, handle: ObserverHandle);

    /// Current bounding rect, or None if the element is gone
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    /// Write one inline style property
    fn set_style(&self, element: ElementId, property: &str, value: &str);
}
