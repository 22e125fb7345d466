//! The dropdown element: input handling, public API and lifecycle.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use dropdown_common::Result;
use dropdown_dom::{
    AddEventListenerOptions, CustomElement, CustomElementRegistry, Document, DomError, DomEvent,
    ListenerId, Node,
};
use tracing::{debug, error, trace};

use crate::config::DropdownConfig;
use crate::navigation::{next_index, prev_index, type_ahead, DropdownKey};
use crate::props::{DropdownOption, DropdownProps};
use crate::render::{DropdownView, HOVER_CLASS, SELECTED_CLASS};
use crate::scroll::ScrollPolicy;
use crate::state::InteractionState;

/// A listener this element attached, kept so it can be removed again.
struct ListenerHandle {
    node: Weak<Node>,
    event_type: &'static str,
    id: ListenerId,
}

impl ListenerHandle {
    fn detach(&self) -> bool {
        self.node
            .upgrade()
            .map(|node| node.event_target.remove_event_listener(self.event_type, self.id))
            .unwrap_or(false)
    }
}

/// A dropdown/select element mounted on a host node.
pub struct Dropdown {
    this: Weak<Dropdown>,
    document: Weak<Document>,
    host: Rc<Node>,
    shadow: Rc<Node>,
    config: DropdownConfig,
    props: RefCell<DropdownProps>,
    state: Cell<InteractionState>,
    view: RefCell<Option<DropdownView>>,
    hidden_input: RefCell<Option<Rc<Node>>>,
    listeners: RefCell<Vec<ListenerHandle>>,
    option_listeners: RefCell<Vec<ListenerHandle>>,
    /// Set when focus opened the menu, so the click that usually follows a
    /// focusing mousedown does not close it again.
    focus_opened: Cell<bool>,
}

impl Dropdown {
    /// Attach a shadow root to `host` and create the element. Nothing is
    /// rendered until the element is connected.
    pub fn new(
        document: &Rc<Document>,
        host: &Rc<Node>,
        config: DropdownConfig,
    ) -> std::result::Result<Rc<Self>, DomError> {
        let shadow = document.attach_shadow(host)?;
        Ok(Rc::new_cyclic(|this| Self {
            this: this.clone(),
            document: Rc::downgrade(document),
            host: host.clone(),
            shadow,
            config,
            props: RefCell::new(DropdownProps::default()),
            state: Cell::new(InteractionState::default()),
            view: RefCell::new(None),
            hidden_input: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            option_listeners: RefCell::new(Vec::new()),
            focus_opened: Cell::new(false),
        }))
    }

    /// The element instance upgraded onto `host`.
    pub fn from_registry(registry: &CustomElementRegistry, host: &Node) -> Option<Rc<Self>> {
        registry.get(host.id)?.as_any_rc().downcast::<Self>().ok()
    }

    pub fn host(&self) -> &Rc<Node> {
        &self.host
    }

    pub fn shadow_root(&self) -> &Rc<Node> {
        &self.shadow
    }

    /// Snapshot of the rendered view handles.
    pub fn view(&self) -> Option<DropdownView> {
        self.view.borrow().clone()
    }

    /// The hidden form field in the host's light tree.
    pub fn hidden_input(&self) -> Option<Rc<Node>> {
        self.hidden_input.borrow().clone()
    }

    /// Configuration read from the host at mount.
    pub fn props(&self) -> DropdownProps {
        self.props.borrow().clone()
    }

    pub fn state(&self) -> InteractionState {
        InteractionState {
            open: self.is_expanded(),
            ..self.state.get()
        }
    }

    pub fn options(&self) -> Vec<DropdownOption> {
        self.props.borrow().options.clone()
    }

    /// Value of the committed option, or `""`.
    pub fn value(&self) -> String {
        let selected = self.state.get().selected;
        let props = self.props.borrow();
        selected
            .and_then(|index| props.options.get(index))
            .map(|option| option.value.clone())
            .unwrap_or_default()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.state.get().cursor
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.get().selected
    }

    pub fn scroll_offset(&self) -> usize {
        self.state.get().scroll_offset
    }

    pub fn is_expanded(&self) -> bool {
        self.view
            .borrow()
            .as_ref()
            .is_some_and(DropdownView::is_expanded)
    }

    /// Replace the option list. Selection, cursor and scroll are reset, the
    /// placeholder is shown again and the hidden field is cleared.
    pub fn set_options(&self, options: Vec<DropdownOption>) {
        debug!(count = options.len(), "Replacing options");
        self.props.borrow_mut().options = options;

        let mut state = self.state.get();
        state.reset_for_options();
        self.state.set(state);

        if let Some(input) = self.hidden_input() {
            input.set_attribute("value", "");
        }
        let Some(document) = self.document.upgrade() else {
            return;
        };
        if let Some(view) = self.view() {
            view.show_placeholder(&document, &self.props.borrow().placeholder);
            self.rebuild_options(&document, &view);
            if view.is_expanded() {
                view.apply_menu_height(self.scroll_policy(), view.single_option_height());
            }
        }
    }

    /// Commit the option at `index`. Out-of-range indices are ignored.
    pub fn set_selected_option(&self, index: usize) {
        let Some(option) = self.props.borrow().options.get(index).cloned() else {
            trace!(index, "Ignoring out-of-range selection");
            return;
        };

        let mut state = self.state.get();
        state.selected = Some(index);
        self.state.set(state);

        if let Some(input) = self.hidden_input() {
            input.set_attribute("value", option.value.as_str());
        }
        if let (Some(view), Some(document)) = (self.view(), self.document.upgrade()) {
            view.show_selection(&document, &option);
            view.set_marker(SELECTED_CLASS, Some(index));
        }
        debug!(index, value = %option.value, "Option selected");
        self.hide_menu();
    }

    /// Highlight the option at `index`, scrolling it into the visible window
    /// when the list is scroll-constrained. Out-of-range indices are ignored.
    pub fn set_cursor(&self, index: usize) {
        if index >= self.props.borrow().options.len() {
            return;
        }
        let mut state = self.state.get();
        state.cursor = Some(index);

        let view = self.view();
        if let Some(view) = &view {
            view.set_marker(HOVER_CLASS, Some(index));
        }

        let policy = self.scroll_policy();
        if policy.is_constrained() {
            let offset = policy.follow_cursor(state.scroll_offset, index);
            if offset != state.scroll_offset {
                state.scroll_offset = offset;
                if let Some(view) = &view {
                    view.apply_scroll(offset, view.single_option_height());
                }
            }
        }
        self.state.set(state);
    }

    /// Scroll so that row `index` is the first visible one, as far as the
    /// list allows.
    pub fn scroll_to_index(&self, index: usize) {
        if index >= self.props.borrow().options.len() {
            return;
        }
        let mut state = self.state.get();
        state.scroll_offset = self.scroll_policy().clamp(index);
        self.state.set(state);
        if let Some(view) = self.view() {
            view.apply_scroll(state.scroll_offset, view.single_option_height());
        }
    }

    pub fn open_menu(&self) {
        let Some(view) = self.view() else {
            return;
        };
        view.set_expanded(true);
        view.apply_menu_height(self.scroll_policy(), view.single_option_height());

        let mut state = self.state.get();
        state.open = true;
        self.state.set(state);

        let len = self.props.borrow().options.len();
        if let Some(cursor) = state.opening_cursor(len) {
            self.set_cursor(cursor);
        }
        debug!(cursor = ?self.cursor(), "Menu opened");
    }

    pub fn hide_menu(&self) {
        self.focus_opened.set(false);
        if let Some(view) = self.view() {
            view.set_expanded(false);
        }
        let mut state = self.state.get();
        if state.open {
            debug!("Menu closed");
        }
        state.open = false;
        self.state.set(state);
    }

    pub fn toggle_menu(&self) {
        if self.focus_opened.replace(false) && self.is_expanded() {
            return;
        }
        if self.is_expanded() {
            self.hide_menu();
        } else {
            self.open_menu();
        }
    }

    fn scroll_policy(&self) -> ScrollPolicy {
        let props = self.props.borrow();
        ScrollPolicy::new(props.maxitems, props.options.len())
    }

    fn handle_focus(&self) {
        let Some(view) = self.view() else {
            return;
        };
        if let (Some(document), Some(root)) = (self.document.upgrade(), view.root.clone()) {
            document.focus(&root);
        }
        view.set_focused(true);
        if !self.is_expanded() {
            self.open_menu();
            self.focus_opened.set(true);
        }
    }

    fn handle_focusout(&self, event: &DomEvent) {
        let related = event
            .related_target()
            .zip(self.document.upgrade())
            .and_then(|(id, document)| document.get_node(id));
        if related.is_some_and(|node| self.shadow.contains(&node)) {
            return;
        }
        self.hide_menu();
        if let Some(view) = self.view() {
            view.set_focused(false);
        }
    }

    fn handle_keyup(&self, event: &DomEvent) {
        if let Some(data) = event.keyboard_data() {
            if data.key != "Tab" {
                event.event().prevent_default();
            }
        }
    }

    fn handle_keydown(&self, event: &DomEvent) {
        let Some(data) = event.keyboard_data() else {
            return;
        };
        let key = DropdownKey::from_key(&data.key);
        trace!(key = %data.key, ?key, "keydown");
        self.focus_opened.set(false);

        if key == DropdownKey::Tab {
            self.hide_menu();
            return;
        }
        event.event().prevent_default();

        let len = self.props.borrow().options.len();
        let cursor = self.cursor();
        match key {
            key if key.opens_menu() && !self.is_expanded() => self.open_menu(),
            DropdownKey::Activate => {
                if let Some(cursor) = cursor.filter(|c| *c < len) {
                    self.set_selected_option(cursor);
                }
                self.hide_menu();
            }
            DropdownKey::ArrowDown => {
                if let Some(next) = next_index(cursor, len) {
                    self.set_cursor(next);
                }
            }
            DropdownKey::ArrowUp => {
                if let Some(prev) = prev_index(cursor, len) {
                    self.set_cursor(prev);
                }
            }
            DropdownKey::Escape => {
                self.hide_menu();
                let mut state = self.state.get();
                state.cursor = None;
                self.state.set(state);
                if let Some(view) = self.view() {
                    view.set_marker(HOVER_CLASS, None);
                }
            }
            DropdownKey::Char(ch) if self.is_expanded() => {
                let found = type_ahead(&self.props.borrow().options, cursor, ch);
                if let Some(found) = found {
                    self.scroll_to_index(found);
                    self.set_cursor(found);
                }
            }
            _ => {}
        }
    }

    fn handle_hover(&self, index: usize) {
        if index >= self.props.borrow().options.len() {
            return;
        }
        let mut state = self.state.get();
        state.cursor = Some(index);
        self.state.set(state);
        if let Some(view) = self.view() {
            view.set_marker(HOVER_CLASS, Some(index));
        }
    }

    fn listen<F>(&self, node: &Rc<Node>, event_type: &'static str, handler: F) -> ListenerHandle
    where
        F: Fn(&Dropdown, &DomEvent) + 'static,
    {
        let this = self.this.clone();
        let id = node.event_target.add_event_listener(
            event_type,
            move |event| {
                if let Some(dropdown) = this.upgrade() {
                    handler(&dropdown, event);
                }
            },
            AddEventListenerOptions::default(),
        );
        ListenerHandle {
            node: Rc::downgrade(node),
            event_type,
            id,
        }
    }

    fn attach_listeners(&self, view: &DropdownView) {
        let mut handles = Vec::new();
        if let Some(trigger) = &view.trigger {
            handles.push(self.listen(trigger, "click", |d, _| d.toggle_menu()));
            handles.push(self.listen(trigger, "focus", |d, _| d.handle_focus()));
        }
        if let Some(result) = &view.result {
            handles.push(self.listen(result, "click", |d, _| d.toggle_menu()));
        }
        // Key events from the trigger bubble here.
        if let Some(root) = &view.root {
            handles.push(self.listen(root, "focusout", |d, e| d.handle_focusout(e)));
            handles.push(self.listen(root, "keydown", |d, e| d.handle_keydown(e)));
            handles.push(self.listen(root, "keyup", |d, e| d.handle_keyup(e)));
        }
        self.listeners.borrow_mut().extend(handles);
    }

    fn rebuild_options(&self, document: &Document, view: &DropdownView) {
        for handle in self.option_listeners.borrow_mut().drain(..) {
            handle.detach();
        }

        let metrics = self.config.option_metrics.to_box_metrics();
        let rows = view.build_options(document, &self.props.borrow().options, metrics);

        let mut handles = Vec::with_capacity(rows.len() * 2);
        for (index, row) in rows.iter().enumerate() {
            handles.push(self.listen(row, "click", move |d, _| d.set_selected_option(index)));
            handles.push(self.listen(row, "mouseenter", move |d, _| d.handle_hover(index)));
        }
        *self.option_listeners.borrow_mut() = handles;
    }

    fn detach_listeners(&self) -> usize {
        let mut detached = 0;
        for handle in self.listeners.borrow_mut().drain(..) {
            detached += usize::from(handle.detach());
        }
        for handle in self.option_listeners.borrow_mut().drain(..) {
            detached += usize::from(handle.detach());
        }
        detached
    }

    fn ensure_hidden_input(&self, document: &Document, name: &str) {
        let existing = self
            .hidden_input()
            .filter(|input| input.parent().is_some_and(|p| p.id == self.host.id));
        let input = existing.unwrap_or_else(|| {
            let input = document.create_element("input");
            input.set_attribute("type", "hidden");
            self.host.append_child(input.clone());
            input
        });
        input.set_attribute("name", name);
        input.set_attribute("value", "");
        *self.hidden_input.borrow_mut() = Some(input);
    }

    /// Read attributes, render the shadow tree and attach listeners.
    fn mount(&self) -> Result<()> {
        self.detach_listeners();
        let document = self
            .document
            .upgrade()
            .ok_or_else(|| dropdown_common::DropdownError::render("document was dropped"))?;

        let props = DropdownProps::from_element(&self.host);
        document.remove_children(&self.shadow);
        *self.view.borrow_mut() = None;
        self.state.set(InteractionState::default());
        self.focus_opened.set(false);

        let view = DropdownView::render(
            &document,
            &self.shadow,
            &props,
            self.config.inject_stylesheet,
        )?;
        let name = props.name.clone();
        *self.props.borrow_mut() = props;
        *self.view.borrow_mut() = Some(view.clone());

        self.rebuild_options(&document, &view);
        self.ensure_hidden_input(&document, &name);
        self.attach_listeners(&view);

        debug!(
            host = ?self.host.id,
            options = self.props.borrow().options.len(),
            maxitems = self.props.borrow().maxitems,
            "Dropdown mounted"
        );
        Ok(())
    }
}

impl CustomElement for Dropdown {
    fn connected_callback(&self) {
        if let Err(e) = self.mount() {
            error!(host = ?self.host.id, error = %e, "Failed to mount dropdown");
        }
    }

    fn disconnected_callback(&self) {
        let detached = self.detach_listeners();
        if let Some(input) = self.hidden_input.borrow_mut().take() {
            match self.document.upgrade() {
                Some(document) => {
                    document.remove_node(&input);
                }
                None => {
                    self.host.remove_child(&input);
                }
            }
        }
        debug!(host = ?self.host.id, detached, "Dropdown disconnected");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

impl std::fmt::Debug for Dropdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dropdown")
            .field("host", &self.host.id)
            .field("state", &self.state.get())
            .field("options", &self.props.borrow().options.len())
            .finish()
    }
}
