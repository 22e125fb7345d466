//! Focus tracking.
//!
//! The document remembers a single focused element. Moving focus fires
//! `blur`/`focusout` on the element losing focus and `focus`/`focusin` on the
//! element gaining it, each carrying the other element as related target.

use std::rc::Rc;

use tracing::debug;

use crate::{Document, DomEvent, FocusEventData, Node, NodeId};

impl Document {
    /// The currently focused element, if it is still alive.
    pub fn active_element(&self) -> Option<Rc<Node>> {
        self.focused.borrow().as_ref().and_then(|w| w.upgrade())
    }

    /// Move focus to `node`. Focusing the already focused element does nothing.
    pub fn focus(&self, node: &Rc<Node>) {
        let old = self.active_element();
        if old.as_ref().map(|o| o.id) == Some(node.id) {
            return;
        }

        *self.focused.borrow_mut() = Some(Rc::downgrade(node));
        debug!(new = ?node.id, old = ?old.as_ref().map(|o| o.id), "Focus changed");

        if let Some(old) = &old {
            self.fire_focus_pair(old, ["blur", "focusout"], Some(node.id));
        }
        self.fire_focus_pair(node, ["focus", "focusin"], old.as_ref().map(|o| o.id));
    }

    /// Remove focus from `node` if it is the focused element.
    pub fn blur(&self, node: &Rc<Node>) {
        self.blur_to(node, None);
    }

    /// Remove focus from `node`, reporting `related` as the element that is
    /// about to receive focus (for example one outside this document).
    pub fn blur_to(&self, node: &Rc<Node>, related: Option<NodeId>) {
        if self.active_element().map(|o| o.id) != Some(node.id) {
            return;
        }
        *self.focused.borrow_mut() = None;
        debug!(old = ?node.id, "Element blurred");
        self.fire_focus_pair(node, ["blur", "focusout"], related);
    }

    fn fire_focus_pair(&self, target: &Rc<Node>, types: [&str; 2], related: Option<NodeId>) {
        for event_type in types {
            let mut event = DomEvent::focus(
                event_type,
                FocusEventData {
                    related_target: related,
                },
            );
            self.dispatch_event(target, &mut event);
        }
    }
}
