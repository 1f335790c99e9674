// ============================================================================
// spark-effects - Virtual Host
// A deterministic host over a virtual clock
// ============================================================================
//
// Time only moves when the caller advances it. Frames fire on a fixed grid
// (multiples of the frame interval) and only when there is frame work:
// pending frame callbacks or live intersection observers. Timers fire at
// their due time, interleaved with frames by time, timers first on ties.
//
// Every callback runs with the internal state released, so callbacks may
// schedule, cancel, listen and observe freely.
// ============================================================================

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use crate::host::events::{
    IntersectionEntry, IntersectionObserverInit, PointerEvent, PointerEventKind,
};
use crate::host::geometry::Rect;
use crate::host::{
    ElementId, FrameCallback, FrameHandle, Host, IntersectionCallback, ListenerHandle,
    ObserverHandle, PointerListener, TimerCallback, TimerHandle,
};

/// 60 frames per second
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

const DEFAULT_VIEWPORT: Rect = Rect::new(0.0, 0.0, 1280.0, 800.0);

// =============================================================================
// STATE
// =============================================================================

struct ElementState {
    rect: Rect,
    style: BTreeMap<String, String>,
}

struct PendingFrame {
    handle: FrameHandle,
    callback: FrameCallback,
}

struct PendingTimer {
    handle: TimerHandle,
    due: f64,
    callback: TimerCallback,
}

struct Listener {
    handle: ListenerHandle,
    element: ElementId,
    kind: PointerEventKind,
    listener: PointerListener,
}

struct Observer {
    handle: ObserverHandle,
    element: ElementId,
    init: IntersectionObserverInit,
    callback: IntersectionCallback,
    /// (is_intersecting, meets threshold) at the last delivery
    last: Option<(bool, bool)>,
}

enum Step {
    Timer(f64),
    Frame(u64, f64),
}

struct VirtualState {
    now: f64,
    frame_interval: f64,
    last_frame_index: u64,
    next_id: u64,
    viewport: Rect,
    elements: HashMap<ElementId, ElementState>,
    frames: Vec<PendingFrame>,
    timers: Vec<PendingTimer>,
    listeners: Vec<Listener>,
    observers: Vec<Observer>,
}

impl VirtualState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Index and timestamp of the next frame slot after the last frame
    fn next_frame_slot(&self) -> (u64, f64) {
        let by_clock = (self.now / self.frame_interval).floor() as u64 + 1;
        let index = by_clock.max(self.last_frame_index + 1);
        (index, (index as f64 * self.frame_interval).max(self.now))
    }

    fn has_frame_work(&self) -> bool {
        !self.frames.is_empty() || !self.observers.is_empty()
    }

    /// Earliest timer (ties broken by registration order)
    fn earliest_timer(&self) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.due
                    .total_cmp(&b.due)
                    .then(a.handle.0.cmp(&b.handle.0))
            })
            .map(|(i, _)| i)
    }

    fn next_step(&self, target: f64) -> Option<Step> {
        let timer = self
            .earliest_timer()
            .map(|i| self.timers[i].due)
            .filter(|due| *due <= target);
        let frame = if self.has_frame_work() {
            Some(self.next_frame_slot()).filter(|(_, at)| *at <= target)
        } else {
            None
        };

        match (timer, frame) {
            (Some(due), Some((_, at))) if due <= at => Some(Step::Timer(due)),
            (_, Some((index, at))) => Some(Step::Frame(index, at)),
            (Some(due), None) => Some(Step::Timer(due)),
            (None, None) => None,
        }
    }

    fn observe(&self, observer: &Observer) -> Option<IntersectionEntry> {
        let element = self.elements.get(&observer.element)?;
        let rect = element.rect;
        let root = observer.init.root_margin.apply(self.viewport);
        let overlap = rect.intersect(&root);
        let is_intersecting = overlap.is_some();
        let intersection_ratio = match overlap {
            Some(o) if rect.area() > 0.0 => (o.area() / rect.area()).clamp(0.0, 1.0),
            Some(_) => 1.0,
            None => 0.0,
        };
        Some(IntersectionEntry {
            time: self.now,
            intersection_ratio,
            is_intersecting,
            bounding_client_rect: rect,
        })
    }

    /// Entries for every observer whose state changed since its last delivery
    fn collect_intersections(&mut self) -> Vec<(ObserverHandle, IntersectionEntry)> {
        let mut deliveries = Vec::new();
        for i in 0..self.observers.len() {
            let Some(entry) = self.observe(&self.observers[i]) else {
                continue;
            };
            let observer = &mut self.observers[i];
            let state = (
                entry.is_intersecting,
                entry.meets(observer.init.threshold),
            );
            if observer.last != Some(state) {
                observer.last = Some(state);
                deliveries.push((observer.handle, entry));
            }
        }
        deliveries
    }
}

// =============================================================================
// VIRTUAL HOST
// =============================================================================

/// Deterministic [`Host`] with a virtual clock, elements with geometry and
/// inline style, pointer dispatch and intersection computation.
///
/// # Example
///
/// ```
/// use spark_effects::host::{Host, Rect, VirtualHost};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let host = VirtualHost::new();
/// let fired = Rc::new(Cell::new(false));
/// let flag = fired.clone();
/// host.set_timeout(Box::new(move || flag.set(true)), 100);
///
/// host.advance(99.0);
/// assert!(!fired.get());
/// host.advance(1.0);
/// assert!(fired.get());
/// ```
pub struct VirtualHost {
    state: RefCell<VirtualState>,
}

impl VirtualHost {
    pub fn new() -> Self {
        Self::with_frame_interval(DEFAULT_FRAME_INTERVAL_MS)
    }

    pub fn with_frame_interval(frame_interval_ms: f64) -> Self {
        let frame_interval = if frame_interval_ms.is_finite() && frame_interval_ms > 0.0 {
            frame_interval_ms
        } else {
            tracing::warn!(
                frame_interval_ms,
                "invalid frame interval, using {DEFAULT_FRAME_INTERVAL_MS}ms"
            );
            DEFAULT_FRAME_INTERVAL_MS
        };

        Self {
            state: RefCell::new(VirtualState {
                now: 0.0,
                frame_interval,
                last_frame_index: 0,
                next_id: 0,
                viewport: DEFAULT_VIEWPORT,
                elements: HashMap::new(),
                frames: Vec::new(),
                timers: Vec::new(),
                listeners: Vec::new(),
                observers: Vec::new(),
            }),
        }
    }

    // =========================================================================
    // ELEMENTS & VIEWPORT
    // =========================================================================

    pub fn create_element(&self, rect: Rect) -> ElementId {
        let mut st = self.state.borrow_mut();
        let id = ElementId(st.next_id());
        st.elements.insert(
            id,
            ElementState {
                rect,
                style: BTreeMap::new(),
            },
        );
        id
    }

    /// Remove an element. Its geometry queries return None afterwards and
    /// observers of it stop reporting.
    pub fn remove_element(&self, element: ElementId) {
        self.state.borrow_mut().elements.remove(&element);
    }

    pub fn set_rect(&self, element: ElementId, rect: Rect) {
        if let Some(el) = self.state.borrow_mut().elements.get_mut(&element) {
            el.rect = rect;
        }
    }

    /// Inline style property last written to `element`
    pub fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.state
            .borrow()
            .elements
            .get(&element)
            .and_then(|el| el.style.get(property).cloned())
    }

    pub fn viewport(&self) -> Rect {
        self.state.borrow().viewport
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.state.borrow_mut().viewport = Rect::new(0.0, 0.0, width, height);
    }

    /// Scroll the document: every element moves by `(-dx, -dy)` in client
    /// space. Observers see the change on the next frame.
    pub fn scroll_by(&self, dx: f64, dy: f64) {
        for el in self.state.borrow_mut().elements.values_mut() {
            el.rect = el.rect.translate(-dx, -dy);
        }
    }

    // =========================================================================
    // POINTER DISPATCH
    // =========================================================================

    pub fn pointer_move(&self, element: ElementId, client_x: f64, client_y: f64) {
        self.dispatch(element, PointerEvent::moved(client_x, client_y));
    }

    pub fn pointer_leave(&self, element: ElementId, client_x: f64, client_y: f64) {
        self.dispatch(element, PointerEvent::left(client_x, client_y));
    }

    fn dispatch(&self, element: ElementId, event: PointerEvent) {
        let listeners: Vec<(ListenerHandle, PointerListener)> = {
            let st = self.state.borrow();
            if !st.elements.contains_key(&element) {
                return;
            }
            st.listeners
                .iter()
                .filter(|l| l.element == element && l.kind == event.kind)
                .map(|l| (l.handle, l.listener.clone()))
                .collect()
        };

        for (handle, listener) in listeners {
            // A listener removed by an earlier one in this dispatch does not run
            let still_attached = self
                .state
                .borrow()
                .listeners
                .iter()
                .any(|l| l.handle == handle);
            if still_attached {
                listener(&event);
            }
        }
    }

    // =========================================================================
    // TIME
    // =========================================================================

    /// Advance the clock by `ms`, firing timers and frames that fall due.
    pub fn advance(&self, ms: f64) {
        let target = self.state.borrow().now + ms.max(0.0);
        self.advance_to(target);
    }

    /// Advance to the next frame slot, running it.
    pub fn next_frame(&self) {
        let (index, at) = self.state.borrow().next_frame_slot();
        self.advance_to(at);
        let mut st = self.state.borrow_mut();
        st.last_frame_index = st.last_frame_index.max(index);
    }

    /// Run `count` frames.
    pub fn frames(&self, count: usize) {
        for _ in 0..count {
            self.next_frame();
        }
    }

    fn advance_to(&self, target: f64) {
        loop {
            let step = self.state.borrow().next_step(target);
            match step {
                Some(Step::Timer(due)) => self.run_timer(due),
                Some(Step::Frame(index, at)) => self.run_frame(index, at),
                None => break,
            }
        }
        let mut st = self.state.borrow_mut();
        st.now = st.now.max(target);
    }

    fn run_timer(&self, due: f64) {
        let timer = {
            let mut st = self.state.borrow_mut();
            st.now = st.now.max(due);
            let index = st.earliest_timer();
            index.map(|i| st.timers.remove(i))
        };
        if let Some(timer) = timer {
            (timer.callback)();
        }
    }

    fn run_frame(&self, index: u64, at: f64) {
        let batch: Vec<FrameHandle> = {
            let mut st = self.state.borrow_mut();
            st.now = st.now.max(at);
            st.last_frame_index = index;
            st.frames.iter().map(|f| f.handle).collect()
        };

        for handle in batch {
            let frame = {
                let mut st = self.state.borrow_mut();
                let index = st.frames.iter().position(|f| f.handle == handle);
                index.map(|i| st.frames.remove(i))
            };
            if let Some(frame) = frame {
                (frame.callback)(at);
            }
        }

        let deliveries = self.state.borrow_mut().collect_intersections();
        for (handle, entry) in deliveries {
            let callback = self
                .state
                .borrow()
                .observers
                .iter()
                .find(|o| o.handle == handle)
                .map(|o| o.callback.clone());
            if let Some(callback) = callback {
                callback(&entry);
            }
        }
    }

    // =========================================================================
    // INTROSPECTION
    // =========================================================================

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    /// Index of the last frame that ran
    pub fn frame_index(&self) -> u64 {
        self.state.borrow().last_frame_index
    }
}

impl Default for VirtualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VirtualHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state.borrow();
        f.debug_struct("VirtualHost")
            .field("now", &st.now)
            .field("elements", &st.elements.len())
            .field("frames", &st.frames.len())
            .field("timers", &st.timers.len())
            .field("listeners", &st.listeners.len())
            .field("observers", &st.observers.len())
            .finish()
    }
}

// =============================================================================
// HOST IMPLEMENTATION
// =============================================================================

impl Host for VirtualHost {
    fn now(&self) -> f64 {
        self.state.borrow().now
    }

    fn request_animation_frame(&self, callback: FrameCallback) -> FrameHandle {
        let mut st = self.state.borrow_mut();
        let handle = FrameHandle(st.next_id());
        st.frames.push(PendingFrame { handle, callback });
        handle
    }

    fn cancel_animation_frame(&self, handle: FrameHandle) {
        self.state
            .borrow_mut()
            .frames
            .retain(|f| f.handle != handle);
    }

    fn set_timeout(&self, callback: TimerCallback, delay_ms: u32) -> TimerHandle {
        let mut st = self.state.borrow_mut();
        let handle = TimerHandle(st.next_id());
        let due = st.now + f64::from(delay_ms);
        st.timers.push(PendingTimer {
            handle,
            due,
            callback,
        });
        handle
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.state
            .borrow_mut()
            .timers
            .retain(|t| t.handle != handle);
    }

    fn add_pointer_listener(
        &self,
        element: ElementId,
        kind: PointerEventKind,
        listener: PointerListener,
    ) -> ListenerHandle {
        let mut st = self.state.borrow_mut();
        let handle = ListenerHandle(st.next_id());
        st.listeners.push(Listener {
            handle,
            element,
            kind,
            listener,
        });
        handle
    }

    fn remove_pointer_listener(&self, handle: ListenerHandle) {
        self.state
            .borrow_mut()
            .listeners
            .retain(|l| l.handle != handle);
    }

    fn observe_intersection(
        &self,
        element: ElementId,
        init: IntersectionObserverInit,
        callback: IntersectionCallback,
    ) -> ObserverHandle {
        let mut st = self.state.borrow_mut();
        let handle = ObserverHandle(st.next_id());
        st.observers.push(Observer {
            handle,
            element,
            init,
            callback,
            last: None,
        });
        handle
    }

    fn disconnect_observer(&self, handle: ObserverHandle) {
        self.state
            .borrow_mut()
            .observers
            .retain(|o| o.handle != handle);
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.state.borrow().elements.get(&element).map(|el| el.rect)
    }

    fn set_style(&self, element: ElementId, property: &str, value: &str) {
        if let Some(el) = self.state.borrow_mut().elements.get_mut(&element) {
            el.style.insert(property.to_string(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::margin::RootMargin;
    use std::cell::Cell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = log.clone();
            move |name: &str| {
                let log = log.clone();
                let name = name.to_string();
                Box::new(move || log.borrow_mut().push(name)) as Box<dyn FnOnce()>
            }
        };
        (log, make)
    }

    #[test]
    fn timers_fire_in_due_then_registration_order() {
        let host = VirtualHost::new();
        let (log, make) = recorder();
        host.set_timeout(make("b"), 20);
        host.set_timeout(make("a"), 10);
        host.set_timeout(make("c"), 20);

        host.advance(15.0);
        assert_eq!(*log.borrow(), vec!["a"]);
        host.advance(5.0);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn zero_delay_timer_waits_for_advance() {
        let host = VirtualHost::new();
        let (log, make) = recorder();
        host.set_timeout(make("now"), 0);
        assert!(log.borrow().is_empty());
        host.advance(0.0);
        assert_eq!(*log.borrow(), vec!["now"]);
    }

    #[test]
    fn cleared_timer_never_fires_and_double_clear_is_noop() {
        let host = VirtualHost::new();
        let (log, make) = recorder();
        let t = host.set_timeout(make("x"), 5);
        host.clear_timeout(t);
        host.clear_timeout(t);
        host.advance(10.0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn frames_run_on_the_grid_with_timestamp() {
        let host = VirtualHost::with_frame_interval(10.0);
        let stamp = Rc::new(Cell::new(-1.0));
        let s = stamp.clone();
        host.request_animation_frame(Box::new(move |t| s.set(t)));

        host.advance(5.0);
        assert_eq!(stamp.get(), -1.0);
        host.advance(5.0);
        assert_eq!(stamp.get(), 10.0);
        assert_eq!(host.frame_index(), 1);
    }

    #[test]
    fn frame_requested_inside_a_frame_runs_next_frame() {
        let host = Rc::new(VirtualHost::with_frame_interval(10.0));
        let stamps = Rc::new(RefCell::new(Vec::new()));

        let (h, s) = (Rc::downgrade(&host), stamps.clone());
        host.request_animation_frame(Box::new(move |t| {
            s.borrow_mut().push(t);
            if let Some(host) = h.upgrade() {
                let s = s.clone();
                host.request_animation_frame(Box::new(move |t| s.borrow_mut().push(t)));
            }
        }));

        host.next_frame();
        assert_eq!(*stamps.borrow(), vec![10.0]);
        host.next_frame();
        assert_eq!(*stamps.borrow(), vec![10.0, 20.0]);
    }

    #[test]
    fn next_frame_always_makes_progress() {
        let host = VirtualHost::with_frame_interval(10.0);
        host.next_frame();
        host.next_frame();
        assert_eq!(host.now(), 20.0);
        assert_eq!(host.frame_index(), 2);
    }

    #[test]
    fn canceled_frame_does_not_run() {
        let host = VirtualHost::new();
        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        let handle = host.request_animation_frame(Box::new(move |_: f64| r.set(true)));
        host.cancel_animation_frame(handle);
        host.next_frame();
        assert!(!ran.get());
        assert_eq!(host.pending_frames(), 0);
    }

    #[test]
    fn pointer_dispatch_targets_element_and_kind() {
        let host = VirtualHost::new();
        let a = host.create_element(Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = host.create_element(Rect::new(20.0, 0.0, 10.0, 10.0));
        let moves = Rc::new(Cell::new(0));

        let m = moves.clone();
        let handle = host.add_pointer_listener(
            a,
            PointerEventKind::Move,
            Rc::new(move |_: &PointerEvent| m.set(m.get() + 1)),
        );

        host.pointer_move(a, 1.0, 1.0);
        host.pointer_move(b, 21.0, 1.0);
        host.pointer_leave(a, 1.0, 1.0);
        assert_eq!(moves.get(), 1);

        host.remove_pointer_listener(handle);
        host.pointer_move(a, 1.0, 1.0);
        assert_eq!(moves.get(), 1);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn intersection_delivered_on_first_frame_and_on_change() {
        let host = VirtualHost::with_frame_interval(10.0);
        host.set_viewport(100.0, 100.0);
        let el = host.create_element(Rect::new(0.0, 150.0, 100.0, 100.0));
        let entries = Rc::new(RefCell::new(Vec::new()));

        let e = entries.clone();
        host.observe_intersection(
            el,
            IntersectionObserverInit {
                threshold: 0.5,
                root_margin: RootMargin::ZERO,
            },
            Rc::new(move |entry: &IntersectionEntry| e.borrow_mut().push(*entry)),
        );

        host.next_frame();
        assert_eq!(entries.borrow().len(), 1);
        assert!(!entries.borrow()[0].is_intersecting);

        // 25% visible: intersecting, but under the threshold
        host.scroll_by(0.0, 75.0);
        host.next_frame();
        assert_eq!(entries.borrow().len(), 2);
        assert_eq!(entries.borrow()[1].intersection_ratio, 0.25);

        // Still under the threshold: no new entry
        host.scroll_by(0.0, 10.0);
        host.next_frame();
        assert_eq!(entries.borrow().len(), 2);

        host.scroll_by(0.0, 40.0);
        host.next_frame();
        assert_eq!(entries.borrow().len(), 3);
        assert!(entries.borrow()[2].meets(0.5));
    }

    #[test]
    fn styles_are_recorded_per_element() {
        let host = VirtualHost::new();
        let el = host.create_element(Rect::new(0.0, 0.0, 1.0, 1.0));
        host.set_style(el, "transform", "none");
        assert_eq!(host.style(el, "transform").as_deref(), Some("none"));
        assert_eq!(host.style(el, "opacity"), None);

        host.remove_element(el);
        assert_eq!(host.bounding_rect(el), None);
    }
}
