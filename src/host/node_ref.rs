// ============================================================================
// spark-effects - Node Reference
// The element-attachment handle trackers hand to callers
// ============================================================================

use crate::host::ElementId;
use crate::primitives::signal::{Signal, signal};

/// A slot for the element a tracker is bound to.
///
/// The slot is reactive: a tracker's effect reads it, so attaching,
/// replacing or detaching the element tears down the old bindings and sets
/// up new ones.
#[derive(Clone, Debug)]
pub struct NodeRef {
    element: Signal<Option<ElementId>>,
}

impl NodeRef {
    pub fn new() -> Self {
        Self {
            element: signal(None),
        }
    }

    pub fn attach(&self, element: ElementId) {
        self.element.set(Some(element));
    }

    pub fn detach(&self) {
        self.element.set(None);
    }

    /// The attached element. Tracked.
    pub fn get(&self) -> Option<ElementId> {
        self.element.get()
    }

    pub fn get_untracked(&self) -> Option<ElementId> {
        self.element.get_untracked()
    }

    pub fn is_attached(&self) -> bool {
        self.get_untracked().is_some()
    }
}

impl Default for NodeRef {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_and_detach() {
        let node = NodeRef::new();
        assert!(!node.is_attached());
        node.attach(ElementId(3));
        assert_eq!(node.get(), Some(ElementId(3)));
        node.detach();
        assert_eq!(node.get_untracked(), None);
    }
}
