// ============================================================================
// spark-effects - Scroll Reveal
// A visibility flag driven by an intersection observer
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

use crate::cloned;
use crate::config::ScrollRevealOptions;
use crate::host::{
    Host, IntersectionCallback, IntersectionEntry, IntersectionObserverInit, NodeRef,
    ObserverHandle,
};
use crate::primitives::effect::{CleanupFn, Effect, effect_with_cleanup};
use crate::primitives::signal::{ReadSignal, Signal, signal};

/// Handle returned by [`use_scroll_reveal`].
#[derive(Clone, Debug)]
pub struct ScrollReveal {
    node: NodeRef,
    visible: Signal<bool>,
    effect: Effect,
}

impl ScrollReveal {
    /// Attach the element to watch here.
    pub fn node(&self) -> NodeRef {
        self.node.clone()
    }

    pub fn visible(&self) -> ReadSignal<bool> {
        self.visible.read_only()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get_untracked()
    }

    /// Unmount: disconnect the observer and reset `visible`. Idempotent.
    pub fn dispose(&self) {
        self.effect.dispose();
    }
}

/// Watch an element's visibility in the viewport.
///
/// `visible` becomes true on the first observation where the element is
/// intersecting the margin-adjusted viewport with at least `threshold` of
/// its area. With `once`, the observer is disconnected right there and the
/// flag stays true for the rest of the mount; otherwise it follows the
/// element in and out.
///
/// With no element attached nothing is observed and `visible` stays false.
/// Detaching or swapping the element and unmounting all reset it to false.
pub fn use_scroll_reveal<H>(host: &Rc<H>, options: ScrollRevealOptions) -> ScrollReveal
where
    H: Host + ?Sized + 'static,
{
    let (threshold, root_margin) = options.sanitized();
    let once = options.once;
    let node = NodeRef::new();
    let visible = signal(false);
    let weak_host = Rc::downgrade(host);

    let effect = effect_with_cleanup(cloned!(node, visible => move || {
        let element = node.get()?;
        let host = weak_host.upgrade()?;

        // Cleared on teardown and on the one-shot reveal; callbacks already
        // queued by the host check it before touching state.
        let alive = Rc::new(Cell::new(true));
        let observer: Rc<Cell<Option<ObserverHandle>>> = Rc::new(Cell::new(None));

        let on_entry: IntersectionCallback = Rc::new(cloned!(alive, observer, visible, weak_host =>
            move |entry: &IntersectionEntry| {
                if !alive.get() {
                    return;
                }
                if entry.meets(threshold) {
                    visible.set(true);
                    if once {
                        alive.set(false);
                        if let (Some(host), Some(handle)) = (weak_host.upgrade(), observer.take()) {
                            host.disconnect_observer(handle);
                        }
                        tracing::debug!(?element, "revealed once, observer detached");
                    }
                } else if !once {
                    visible.set(false);
                }
            }
        ));

        let init = IntersectionObserverInit {
            threshold,
            root_margin,
        };
        observer.set(Some(host.observe_intersection(element, init, on_entry)));
        tracing::debug!(?element, threshold, %root_margin, once, "scroll reveal observing");

        let teardown: CleanupFn = Box::new(cloned!(weak_host, visible => move || {
            alive.set(false);
            visible.set(false);
            if let (Some(host), Some(handle)) = (weak_host.upgrade(), observer.take()) {
                host.disconnect_observer(handle);
                tracing::debug!(?element, "scroll reveal observer disconnected");
            }
        }));
        Some(teardown)
    }));

    ScrollReveal {
        node,
        visible,
        effect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Rect, VirtualHost};

    #[test]
    fn unattached_tracker_observes_nothing() {
        let host = Rc::new(VirtualHost::new());
        let reveal = use_scroll_reveal(&host, ScrollRevealOptions::default());
        host.frames(3);
        assert_eq!(host.observer_count(), 0);
        assert!(!reveal.is_visible());
    }

    #[test]
    fn one_observer_per_attached_element() {
        let host = Rc::new(VirtualHost::new());
        let a = host.create_element(Rect::new(0.0, 2000.0, 100.0, 100.0));
        let b = host.create_element(Rect::new(0.0, 3000.0, 100.0, 100.0));
        let reveal = use_scroll_reveal(&host, ScrollRevealOptions::default());

        reveal.node().attach(a);
        assert_eq!(host.observer_count(), 1);
        reveal.node().attach(b);
        assert_eq!(host.observer_count(), 1);
        reveal.node().detach();
        assert_eq!(host.observer_count(), 0);
    }

    #[test]
    fn dispose_disconnects() {
        let host = Rc::new(VirtualHost::new());
        let el = host.create_element(Rect::new(0.0, 2000.0, 100.0, 100.0));
        let reveal = use_scroll_reveal(&host, ScrollRevealOptions::default());
        reveal.node().attach(el);
        reveal.dispose();
        reveal.dispose();
        assert_eq!(host.observer_count(), 0);
    }
}
