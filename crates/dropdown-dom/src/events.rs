//! # DOM Events
//!
//! DOM event types and dispatch mechanism following the DOM Events model.
//! Supports capture and bubble phases, stopPropagation, and preventDefault.
//! Listeners are identified by a [`ListenerId`] so the code that attached a
//! listener can later remove exactly that listener.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Node, NodeId};

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(u64);

impl EventId {
    /// Create a new unique EventId.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Event phases of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventPhase {
    /// No event is being processed.
    None = 0,
    /// Event is propagating through target's ancestors (capture).
    Capturing = 1,
    /// Event has arrived at the event target.
    AtTarget = 2,
    /// Event is propagating back up through ancestors (bubble).
    Bubbling = 3,
}

/// Common event interface for all DOM events.
#[derive(Debug, Clone)]
pub struct Event {
    /// Unique ID for this event.
    pub id: EventId,
    /// Event type (e.g., "click", "keydown").
    pub event_type: String,
    /// Whether the event bubbles.
    pub bubbles: bool,
    /// Whether the event is cancelable.
    pub cancelable: bool,
    /// Whether the event is composed (crosses shadow DOM boundary).
    pub composed: bool,
    /// Current phase.
    phase: Cell<EventPhase>,
    /// The target node (where the event originated).
    target: Cell<Option<NodeId>>,
    /// The current target (node currently handling the event).
    current_target: Cell<Option<NodeId>>,
    /// Whether stopPropagation was called.
    propagation_stopped: Cell<bool>,
    /// Whether stopImmediatePropagation was called.
    immediate_propagation_stopped: Cell<bool>,
    /// Whether preventDefault was called.
    default_prevented: Cell<bool>,
    /// Whether the event is trusted (dispatched by the platform).
    pub is_trusted: bool,
}

impl Event {
    /// Create a new event.
    pub fn new(event_type: &str, bubbles: bool, cancelable: bool) -> Self {
        Self {
            id: EventId::new(),
            event_type: event_type.to_string(),
            bubbles,
            cancelable,
            composed: false,
            phase: Cell::new(EventPhase::None),
            target: Cell::new(None),
            current_target: Cell::new(None),
            propagation_stopped: Cell::new(false),
            immediate_propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
            is_trusted: false,
        }
    }

    /// Create a trusted, composed UI event.
    pub fn new_trusted(event_type: &str, bubbles: bool, cancelable: bool) -> Self {
        let mut event = Self::new(event_type, bubbles, cancelable);
        event.is_trusted = true;
        event.composed = true;
        event
    }

    /// Get the current phase.
    pub fn phase(&self) -> EventPhase {
        self.phase.get()
    }

    /// Get the target node ID.
    pub fn target(&self) -> Option<NodeId> {
        self.target.get()
    }

    /// Get the current target node ID.
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target.get()
    }

    /// Stop propagation of the event.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Stop immediate propagation of the event.
    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
        self.immediate_propagation_stopped.set(true);
    }

    /// Prevent the default action.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    /// Check if propagation is stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Check if immediate propagation is stopped.
    pub fn immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped.get()
    }

    /// Check if the default action was prevented.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub(crate) fn set_phase(&self, phase: EventPhase) {
        self.phase.set(phase);
    }

    pub(crate) fn set_target(&self, target: NodeId) {
        self.target.set(Some(target));
    }

    pub(crate) fn set_current_target(&self, target: Option<NodeId>) {
        self.current_target.set(target);
    }
}

/// Mouse event data.
#[derive(Debug, Clone, Default)]
pub struct MouseEventData {
    /// X coordinate relative to the viewport.
    pub client_x: f64,
    /// Y coordinate relative to the viewport.
    pub client_y: f64,
    /// Which mouse button triggered the event.
    pub button: i16,
    /// Currently pressed buttons bitmask.
    pub buttons: u16,
    /// Related target (for enter/leave events).
    pub related_target: Option<NodeId>,
}

/// Keyboard event data.
#[derive(Debug, Clone, Default)]
pub struct KeyboardEventData {
    /// The key value.
    pub key: String,
    /// The key code.
    pub code: String,
    /// Whether this is a repeat event.
    pub repeat: bool,
    /// Whether Ctrl key was pressed.
    pub ctrl_key: bool,
    /// Whether Alt key was pressed.
    pub alt_key: bool,
    /// Whether Shift key was pressed.
    pub shift_key: bool,
    /// Whether Meta key was pressed.
    pub meta_key: bool,
}

impl KeyboardEventData {
    /// Keyboard data for a `key` value, deriving the physical `code`.
    pub fn for_key(key: &str) -> Self {
        let code = match key {
            " " => "Space".to_string(),
            k if k.chars().count() == 1 => {
                let ch = k.chars().next().unwrap_or_default();
                if ch.is_ascii_alphabetic() {
                    format!("Key{}", ch.to_ascii_uppercase())
                } else if ch.is_ascii_digit() {
                    format!("Digit{ch}")
                } else {
                    k.to_string()
                }
            }
            k => k.to_string(),
        };
        Self {
            key: key.to_string(),
            code,
            shift_key: key.chars().count() == 1 && key.chars().all(|c| c.is_ascii_uppercase()),
            ..Default::default()
        }
    }
}

/// Focus event data.
#[derive(Debug, Clone, Default)]
pub struct FocusEventData {
    /// The related target (element losing/gaining focus).
    pub related_target: Option<NodeId>,
}

/// DOM event with type-specific data.
#[derive(Debug, Clone)]
pub enum DomEvent {
    /// Generic event.
    Generic(Event),
    /// Mouse event.
    Mouse(Event, MouseEventData),
    /// Keyboard event.
    Keyboard(Event, KeyboardEventData),
    /// Focus event.
    Focus(Event, FocusEventData),
}

impl DomEvent {
    /// Get the base event.
    pub fn event(&self) -> &Event {
        match self {
            DomEvent::Generic(e) => e,
            DomEvent::Mouse(e, _) => e,
            DomEvent::Keyboard(e, _) => e,
            DomEvent::Focus(e, _) => e,
        }
    }

    /// Get mutable access to the base event.
    pub fn event_mut(&mut self) -> &mut Event {
        match self {
            DomEvent::Generic(e) => e,
            DomEvent::Mouse(e, _) => e,
            DomEvent::Keyboard(e, _) => e,
            DomEvent::Focus(e, _) => e,
        }
    }

    /// Keyboard payload, if this is a keyboard event.
    pub fn keyboard_data(&self) -> Option<&KeyboardEventData> {
        match self {
            DomEvent::Keyboard(_, data) => Some(data),
            _ => None,
        }
    }

    /// Related target of a focus or mouse event.
    pub fn related_target(&self) -> Option<NodeId> {
        match self {
            DomEvent::Focus(_, data) => data.related_target,
            DomEvent::Mouse(_, data) => data.related_target,
            _ => None,
        }
    }

    /// Create a mouse event. `mouseenter`/`mouseleave` never bubble.
    pub fn mouse(event_type: &str, bubbles: bool, data: MouseEventData) -> Self {
        let bubbles = bubbles && !matches!(event_type, "mouseenter" | "mouseleave");
        let event = Event::new_trusted(event_type, bubbles, true);
        DomEvent::Mouse(event, data)
    }

    /// Create a click event.
    pub fn click() -> Self {
        Self::mouse("click", true, MouseEventData::default())
    }

    /// Create a keyboard event.
    pub fn keyboard(event_type: &str, data: KeyboardEventData) -> Self {
        let event = Event::new_trusted(event_type, true, true);
        DomEvent::Keyboard(event, data)
    }

    /// Create a focus event.
    pub fn focus(event_type: &str, data: FocusEventData) -> Self {
        // focus/blur don't bubble, focusin/focusout do
        let bubbles = event_type == "focusin" || event_type == "focusout";
        let event = Event::new_trusted(event_type, bubbles, false);
        DomEvent::Focus(event, data)
    }
}

/// Options for adding an event listener.
#[derive(Debug, Clone, Default)]
pub struct AddEventListenerOptions {
    /// If true, the listener is invoked during capture phase.
    pub capture: bool,
    /// If true, the listener is automatically removed after first invocation.
    pub once: bool,
    /// If true, indicates that the listener will never call preventDefault.
    pub passive: bool,
}

/// An event listener callback.
pub type EventListenerCallback = Rc<dyn Fn(&DomEvent) + 'static>;

/// A registered event listener.
struct EventListener {
    id: ListenerId,
    callback: EventListenerCallback,
    options: AddEventListenerOptions,
}

/// Event target mixin - manages event listeners for a node.
#[derive(Default)]
pub struct EventTarget {
    /// Listeners keyed by event type.
    listeners: RefCell<HashMap<String, Vec<EventListener>>>,
}

impl EventTarget {
    /// Create a new event target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event listener. The returned id detaches it again.
    pub fn add_event_listener<F>(
        &self,
        event_type: &str,
        callback: F,
        options: AddEventListenerOptions,
    ) -> ListenerId
    where
        F: Fn(&DomEvent) + 'static,
    {
        let id = ListenerId::next();
        let mut listeners = self.listeners.borrow_mut();
        let list = listeners.entry(event_type.to_string()).or_default();
        list.push(EventListener {
            id,
            callback: Rc::new(callback),
            options,
        });
        id
    }

    /// Remove the listener registered under `id`. Returns whether it existed.
    pub fn remove_event_listener(&self, event_type: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(event_type) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            listeners.remove(event_type);
        }
        removed
    }

    /// Remove all listeners for an event type.
    pub fn remove_all_listeners(&self, event_type: &str) {
        self.listeners.borrow_mut().remove(event_type);
    }

    /// Remove every listener of every type.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Check if there are any listeners for an event type.
    pub fn has_listeners(&self, event_type: &str) -> bool {
        let listeners = self.listeners.borrow();
        listeners
            .get(event_type)
            .map(|l| !l.is_empty())
            .unwrap_or(false)
    }

    /// Total number of registered listeners across all event types.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().values().map(Vec::len).sum()
    }

    fn is_registered(&self, event_type: &str, id: ListenerId) -> bool {
        self.listeners
            .borrow()
            .get(event_type)
            .map(|list| list.iter().any(|l| l.id == id))
            .unwrap_or(false)
    }

    /// Invoke listeners for an event in the given phase.
    ///
    /// Matching listeners are snapshotted first so callbacks may add or remove
    /// listeners (on this or any node) while the event is being handled. A
    /// listener removed by an earlier callback does not fire.
    pub fn invoke_listeners(&self, event: &DomEvent, phase: EventPhase) {
        let event_type = event.event().event_type.clone();

        let snapshot: Vec<(ListenerId, EventListenerCallback, bool)> = {
            let listeners = self.listeners.borrow();
            let Some(list) = listeners.get(&event_type) else {
                return;
            };
            list.iter()
                .filter(|listener| match phase {
                    EventPhase::Capturing => listener.options.capture,
                    EventPhase::AtTarget => true,
                    EventPhase::Bubbling => !listener.options.capture,
                    EventPhase::None => false,
                })
                .map(|l| (l.id, l.callback.clone(), l.options.once))
                .collect()
        };

        for (id, callback, once) in snapshot {
            if !self.is_registered(&event_type, id) {
                continue;
            }
            if once {
                self.remove_event_listener(&event_type, id);
            }

            callback(event);

            if event.event().immediate_propagation_stopped() {
                break;
            }
        }
    }
}

impl std::fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTarget")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

/// Event dispatcher for propagating events through the DOM tree.
pub struct EventDispatcher;

impl EventDispatcher {
    /// Dispatch an event to a target node.
    /// Returns true if the event was not prevented.
    pub fn dispatch(event: &mut DomEvent, target: &Rc<Node>, ancestors: &[Rc<Node>]) -> bool {
        let bubbles = event.event().bubbles;

        event.event().set_target(target.id);

        // Ancestors are ordered from root to parent
        let mut path: Vec<&Rc<Node>> = ancestors.iter().collect();
        path.push(target);

        // Capture phase (root to target, excluding target)
        event.event().set_phase(EventPhase::Capturing);
        for node in &path[..path.len() - 1] {
            if event.event().propagation_stopped() {
                break;
            }
            event.event().set_current_target(Some(node.id));
            node.event_target
                .invoke_listeners(event, EventPhase::Capturing);
        }

        // At target phase
        if !event.event().propagation_stopped() {
            event.event().set_phase(EventPhase::AtTarget);
            event.event().set_current_target(Some(target.id));
            target
                .event_target
                .invoke_listeners(event, EventPhase::AtTarget);
        }

        // Bubble phase (target to root, excluding target)
        if bubbles && !event.event().propagation_stopped() {
            event.event().set_phase(EventPhase::Bubbling);
            for node in path[..path.len() - 1].iter().rev() {
                if event.event().propagation_stopped() {
                    break;
                }
                event.event().set_current_target(Some(node.id));
                node.event_target
                    .invoke_listeners(event, EventPhase::Bubbling);
            }
        }

        // Reset state
        event.event().set_phase(EventPhase::None);
        event.event().set_current_target(None);

        !event.event().default_prevented()
    }
}
