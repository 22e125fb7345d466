//! # Dropdown DOM
//!
//! The host platform the `dropdown-menu` element runs on: a small, mutable DOM
//! tree with shadow roots, class lists, inline style, box metrics, event
//! dispatch, focus tracking, selector queries, a custom element registry and
//! form data collection.
//!
//! Uses html5ever for HTML parsing and constructs a traversable DOM tree.
//!
//! ## Design Goals
//!
//! 1. **Standards parsing**: html5ever implements the HTML5 parsing algorithm
//! 2. **Interior mutability**: nodes are shared as `Rc<Node>` and mutated in place
//!    from event handlers
//! 3. **Query support**: compound selectors with descendant/child combinators
//! 4. **Event dispatch**: DOM Events with capture/bubble phases, composed across
//!    shadow boundaries, with detachable listeners
//! 5. **Encapsulation**: shadow roots are not traversed by queries, `contains`
//!    or form collection

pub mod custom_elements;
pub mod events;
pub mod focus;
pub mod forms;
pub mod layout;
pub mod selector;

pub use custom_elements::{CustomElement, CustomElementConstructor, CustomElementRegistry};
pub use events::{
    AddEventListenerOptions, DomEvent, Event, EventDispatcher, EventId, EventListenerCallback,
    EventPhase, EventTarget, FocusEventData, KeyboardEventData, ListenerId, MouseEventData,
};
pub use forms::{FormDataEntry, FormDataValue, FormEnctype, FormMethod, FormState};
pub use layout::{BoxMetrics, EdgeSizes};
pub use selector::Selector;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur in DOM operations.
#[derive(Error, Debug)]
pub enum DomError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Node not found")]
    NodeNotFound,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Custom element `{0}` is already defined")]
    AlreadyDefined(String),

    #[error("Invalid custom element name `{0}`")]
    InvalidName(String),
}

/// Unique identifier for a DOM node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Create a new NodeId.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> usize {
        self.0
    }
}

/// Type of DOM node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    Document,
    DocumentType {
        name: String,
        public_id: String,
        system_id: String,
    },
    Element {
        tag_name: String,
        namespace: String,
    },
    Text,
    Comment,
    ProcessingInstruction {
        target: String,
    },
    /// Root of an encapsulated subtree attached to a host element.
    ShadowRoot,
}

/// A DOM node.
pub struct Node {
    /// Unique ID for this node.
    pub id: NodeId,
    /// Node type.
    pub node_type: NodeType,
    /// Element attributes.
    attributes: RefCell<HashMap<String, String>>,
    /// Character data for text, comment and processing-instruction nodes.
    data: RefCell<String>,
    /// Parent node (weak reference to avoid cycles).
    parent: RefCell<Option<Weak<Node>>>,
    /// Child nodes.
    children: RefCell<Vec<Rc<Node>>>,
    /// Previous sibling.
    prev_sibling: RefCell<Option<Weak<Node>>>,
    /// Next sibling.
    next_sibling: RefCell<Option<Weak<Node>>>,
    /// Shadow root attached to this element.
    shadow_root: RefCell<Option<Rc<Node>>>,
    /// Host element, set on shadow roots only.
    host: RefCell<Option<Weak<Node>>>,
    /// Inline style declarations.
    style: RefCell<HashMap<String, String>>,
    /// Vertical scroll position in px.
    scroll_top: Cell<f32>,
    /// Computed box metrics, assigned by whoever lays the node out.
    box_metrics: Cell<Option<BoxMetrics>>,
    /// Event target mixin for event handling.
    pub event_target: EventTarget,
}

impl Node {
    /// Create a new node.
    pub fn new(id: NodeId, node_type: NodeType) -> Rc<Self> {
        Rc::new(Self {
            id,
            node_type,
            attributes: RefCell::new(HashMap::new()),
            data: RefCell::new(String::new()),
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            prev_sibling: RefCell::new(None),
            next_sibling: RefCell::new(None),
            shadow_root: RefCell::new(None),
            host: RefCell::new(None),
            style: RefCell::new(HashMap::new()),
            scroll_top: Cell::new(0.0),
            box_metrics: Cell::new(None),
            event_target: EventTarget::new(),
        })
    }

    /// Get the tag name for element nodes.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    /// Get an attribute value.
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    /// Check whether an attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.borrow().contains_key(name)
    }

    /// Set an attribute value. Setting `style` also replaces the inline style.
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if name == "style" {
            *self.style.borrow_mut() = parse_style_declarations(&value);
        }
        self.attributes.borrow_mut().insert(name.to_string(), value);
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&self, name: &str) -> bool {
        if name == "style" {
            self.style.borrow_mut().clear();
        }
        self.attributes.borrow_mut().remove(name).is_some()
    }

    /// Get the class list.
    pub fn classes(&self) -> Vec<String> {
        self.get_attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Check whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attributes
            .borrow()
            .get("class")
            .map(|c| c.split_whitespace().any(|cls| cls == class))
            .unwrap_or(false)
    }

    /// Add a class if not already present.
    pub fn add_class(&self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes = self.classes();
        classes.push(class.to_string());
        self.set_attribute("class", classes.join(" "));
    }

    /// Remove a class. Returns whether it was present.
    pub fn remove_class(&self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let classes: Vec<String> = self.classes().into_iter().filter(|c| c != class).collect();
        self.set_attribute("class", classes.join(" "));
        true
    }

    /// Toggle a class, returning whether it is present afterwards.
    pub fn toggle_class(&self, class: &str) -> bool {
        if self.has_class(class) {
            self.remove_class(class);
            false
        } else {
            self.add_class(class);
            true
        }
    }

    /// Get the character data of a text or comment node.
    pub fn data(&self) -> String {
        self.data.borrow().clone()
    }

    /// Replace the character data of a text or comment node.
    pub fn set_data(&self, data: impl Into<String>) {
        *self.data.borrow_mut() = data.into();
    }

    /// Get the text content.
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, result: &mut String) {
        match &self.node_type {
            NodeType::Text => result.push_str(&self.data.borrow()),
            NodeType::Comment | NodeType::ProcessingInstruction { .. } => {}
            _ => {
                for child in self.children.borrow().iter() {
                    child.collect_text(result);
                }
            }
        }
    }

    /// Get an inline style property.
    pub fn style_property(&self, name: &str) -> Option<String> {
        self.style.borrow().get(name).cloned()
    }

    /// Set an inline style property.
    pub fn set_style_property(&self, name: &str, value: impl Into<String>) {
        self.style
            .borrow_mut()
            .insert(name.to_string(), value.into());
    }

    /// Remove an inline style property. Returns whether it was present.
    pub fn remove_style_property(&self, name: &str) -> bool {
        self.style.borrow_mut().remove(name).is_some()
    }

    /// Get the vertical scroll position.
    pub fn scroll_top(&self) -> f32 {
        self.scroll_top.get()
    }

    /// Set the vertical scroll position (clamped at zero).
    pub fn set_scroll_top(&self, scroll_top: f32) {
        self.scroll_top.set(scroll_top.max(0.0));
    }

    /// Get the computed box metrics, if the node has been laid out.
    pub fn box_metrics(&self) -> Option<BoxMetrics> {
        self.box_metrics.get()
    }

    /// Assign computed box metrics.
    pub fn set_box_metrics(&self, metrics: Option<BoxMetrics>) {
        self.box_metrics.set(metrics);
    }

    /// Get parent node.
    pub fn parent(&self) -> Option<Rc<Node>> {
        self.parent.borrow().as_ref().and_then(|w| w.upgrade())
    }

    /// Get the host element of a shadow root.
    pub fn host(&self) -> Option<Rc<Node>> {
        self.host.borrow().as_ref().and_then(|w| w.upgrade())
    }

    /// Get the shadow root attached to this element.
    pub fn shadow_root(&self) -> Option<Rc<Node>> {
        self.shadow_root.borrow().clone()
    }

    /// Get child nodes.
    pub fn children(&self) -> Vec<Rc<Node>> {
        self.children.borrow().clone()
    }

    /// Get element children only.
    pub fn element_children(&self) -> Vec<Rc<Node>> {
        self.children
            .borrow()
            .iter()
            .filter(|n| n.is_element())
            .cloned()
            .collect()
    }

    /// Get first child.
    pub fn first_child(&self) -> Option<Rc<Node>> {
        self.children.borrow().first().cloned()
    }

    /// Get last child.
    pub fn last_child(&self) -> Option<Rc<Node>> {
        self.children.borrow().last().cloned()
    }

    /// Get previous sibling.
    pub fn previous_sibling(&self) -> Option<Rc<Node>> {
        self.prev_sibling
            .borrow()
            .as_ref()
            .and_then(|w| w.upgrade())
    }

    /// Get next sibling.
    pub fn next_sibling(&self) -> Option<Rc<Node>> {
        self.next_sibling
            .borrow()
            .as_ref()
            .and_then(|w| w.upgrade())
    }

    /// Check if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self.node_type, NodeType::Element { .. })
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self.node_type, NodeType::Text)
    }

    /// Check if this is a shadow root.
    pub fn is_shadow_root(&self) -> bool {
        matches!(self.node_type, NodeType::ShadowRoot)
    }

    /// Inclusive descendant test. Does not look into or out of shadow trees,
    /// so a shadow root contains only its own encapsulated subtree.
    pub fn contains(&self, other: &Node) -> bool {
        if other.id == self.id {
            return true;
        }
        let mut current = other.parent();
        while let Some(node) = current {
            if node.id == self.id {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Ancestors ordered from the outermost to the direct parent. When
    /// `composed` is set, the path continues from a shadow root to its host.
    pub fn ancestors(&self, composed: bool) -> Vec<Rc<Node>> {
        let mut path = Vec::new();
        let mut current = self.parent_or_host(composed);
        while let Some(node) = current {
            current = node.parent_or_host(composed);
            path.push(node);
        }
        path.reverse();
        path
    }

    fn parent_or_host(&self, composed: bool) -> Option<Rc<Node>> {
        self.parent()
            .or_else(|| if composed { self.host() } else { None })
    }

    /// Append a child node, detaching it from any previous parent first.
    pub fn append_child(self: &Rc<Self>, child: Rc<Node>) {
        if let Some(old_parent) = child.parent() {
            old_parent.remove_child(&child);
        }

        // Update child's parent
        *child.parent.borrow_mut() = Some(Rc::downgrade(self));

        // Update sibling links
        if let Some(last) = self.last_child() {
            *last.next_sibling.borrow_mut() = Some(Rc::downgrade(&child));
            *child.prev_sibling.borrow_mut() = Some(Rc::downgrade(&last));
        }

        // Add to children
        self.children.borrow_mut().push(child);
    }

    /// Remove a direct child. Returns whether it was a child of this node.
    pub fn remove_child(&self, child: &Rc<Node>) -> bool {
        let position = self
            .children
            .borrow()
            .iter()
            .position(|c| Rc::ptr_eq(c, child));
        let Some(position) = position else {
            return false;
        };

        let prev = child.previous_sibling();
        let next = child.next_sibling();
        if let Some(prev) = &prev {
            *prev.next_sibling.borrow_mut() = next.as_ref().map(Rc::downgrade);
        }
        if let Some(next) = &next {
            *next.prev_sibling.borrow_mut() = prev.as_ref().map(Rc::downgrade);
        }

        *child.parent.borrow_mut() = None;
        *child.prev_sibling.borrow_mut() = None;
        *child.next_sibling.borrow_mut() = None;
        self.children.borrow_mut().remove(position);
        true
    }

    /// First descendant element matching `selector`, in document order.
    pub fn query_selector(&self, selector: &str) -> Result<Option<Rc<Node>>, DomError> {
        let selector = Selector::parse(selector)?;
        Ok(self.find_descendant(&selector))
    }

    /// All descendant elements matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Rc<Node>>, DomError> {
        let selector = Selector::parse(selector)?;
        let mut found = Vec::new();
        self.collect_descendants(&selector, &mut found);
        Ok(found)
    }

    fn find_descendant(&self, selector: &Selector) -> Option<Rc<Node>> {
        for child in self.children.borrow().iter() {
            if selector.matches(child) {
                return Some(child.clone());
            }
            if let Some(found) = child.find_descendant(selector) {
                return Some(found);
            }
        }
        None
    }

    fn collect_descendants(&self, selector: &Selector, found: &mut Vec<Rc<Node>>) {
        for child in self.children.borrow().iter() {
            if selector.matches(child) {
                found.push(child.clone());
            }
            child.collect_descendants(selector, found);
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("node_type", &self.node_type)
            .field("attributes", &self.attributes.borrow())
            .field("children", &self.children.borrow().len())
            .finish()
    }
}

/// Parse `a: b; c: d` into a declaration map.
fn parse_style_declarations(style: &str) -> HashMap<String, String> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_lowercase(), value.trim().to_string()))
        })
        .collect()
}

/// A complete DOM document.
pub struct Document {
    /// Root node of the document.
    root: Rc<Node>,
    /// All live nodes indexed by ID, including shadow tree nodes.
    nodes: RefCell<HashMap<NodeId, Rc<Node>>>,
    /// Next node ID.
    next_id: Cell<usize>,
    /// Currently focused element.
    pub(crate) focused: RefCell<Option<Weak<Node>>>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        let root = Node::new(NodeId::new(0), NodeType::Document);
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::new(0), root.clone());

        Self {
            root,
            nodes: RefCell::new(nodes),
            next_id: Cell::new(1),
            focused: RefCell::new(None),
        }
    }

    /// Parse HTML and create a document.
    pub fn parse_html(html: &str) -> Result<Self, DomError> {
        debug!(len = html.len(), "Parsing HTML");

        let dom = parse_rcdom(html)?;
        let doc = Document::new();
        doc.convert_rcdom(&dom.document, &doc.root.clone());

        debug!(node_count = doc.node_count(), "HTML parsed");
        Ok(doc)
    }

    /// Parse an HTML fragment and append the resulting nodes to `parent`.
    /// Returns the top-level nodes that were appended.
    pub fn parse_fragment_into(
        &self,
        parent: &Rc<Node>,
        html: &str,
    ) -> Result<Vec<Rc<Node>>, DomError> {
        let dom = parse_rcdom(html)?;
        let body = find_rcdom_element(&dom.document, "body")
            .ok_or_else(|| DomError::ParseError("fragment has no body".to_string()))?;

        let before = parent.children().len();
        self.convert_rcdom(&body, parent);
        let appended = parent.children().split_off(before);

        trace!(count = appended.len(), "Fragment parsed");
        Ok(appended)
    }

    fn convert_rcdom(&self, handle: &Handle, parent: &Rc<Node>) {
        for child_handle in handle.children.borrow().iter() {
            let node = match &child_handle.data {
                NodeData::Document => continue, // Skip document node itself
                NodeData::Doctype {
                    name,
                    public_id,
                    system_id,
                } => self.create_node(NodeType::DocumentType {
                    name: name.to_string(),
                    public_id: public_id.to_string(),
                    system_id: system_id.to_string(),
                }),
                NodeData::Element { name, attrs, .. } => {
                    let node = self.create_node(NodeType::Element {
                        tag_name: name.local.to_string(),
                        namespace: name.ns.to_string(),
                    });
                    for attr in attrs.borrow().iter() {
                        node.set_attribute(&attr.name.local.to_string(), attr.value.to_string());
                    }
                    node
                }
                NodeData::Text { contents } => {
                    let node = self.create_node(NodeType::Text);
                    node.set_data(contents.borrow().to_string());
                    node
                }
                NodeData::Comment { contents } => {
                    let node = self.create_node(NodeType::Comment);
                    node.set_data(contents.to_string());
                    node
                }
                NodeData::ProcessingInstruction { target, contents } => {
                    let node = self.create_node(NodeType::ProcessingInstruction {
                        target: target.to_string(),
                    });
                    node.set_data(contents.to_string());
                    node
                }
            };

            parent.append_child(node.clone());

            // Recurse for children
            self.convert_rcdom(child_handle, &node);
        }
    }

    fn create_node(&self, node_type: NodeType) -> Rc<Node> {
        let id = NodeId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let node = Node::new(id, node_type);
        self.nodes.borrow_mut().insert(id, node.clone());
        node
    }

    /// Create a detached HTML element.
    pub fn create_element(&self, tag_name: &str) -> Rc<Node> {
        self.create_node(NodeType::Element {
            tag_name: tag_name.to_lowercase(),
            namespace: "http://www.w3.org/1999/xhtml".to_string(),
        })
    }

    /// Create a detached text node.
    pub fn create_text_node(&self, text: &str) -> Rc<Node> {
        let node = self.create_node(NodeType::Text);
        node.set_data(text);
        node
    }

    /// Replace all children of `node` with a single text node.
    pub fn set_text_content(&self, node: &Rc<Node>, text: &str) {
        self.remove_children(node);
        if !text.is_empty() {
            node.append_child(self.create_text_node(text));
        }
    }

    /// Attach a shadow root to `host`.
    pub fn attach_shadow(&self, host: &Rc<Node>) -> Result<Rc<Node>, DomError> {
        if !host.is_element() {
            return Err(DomError::InvalidOperation(
                "shadow roots can only be attached to elements".to_string(),
            ));
        }
        if host.shadow_root().is_some() {
            return Err(DomError::InvalidOperation(format!(
                "<{}> already has a shadow root",
                host.tag_name().unwrap_or_default()
            )));
        }

        let shadow = self.create_node(NodeType::ShadowRoot);
        *shadow.host.borrow_mut() = Some(Rc::downgrade(host));
        *host.shadow_root.borrow_mut() = Some(shadow.clone());
        Ok(shadow)
    }

    /// Detach every child of `node`. Removed subtrees are unregistered and
    /// lose all of their event listeners. Returns the number of nodes removed.
    pub fn remove_children(&self, node: &Rc<Node>) -> usize {
        let mut removed = 0;
        for child in node.children() {
            node.remove_child(&child);
            removed += self.release_subtree(&child);
        }
        removed
    }

    /// Detach `node` from its parent and release its subtree.
    pub fn remove_node(&self, node: &Rc<Node>) -> usize {
        if let Some(parent) = node.parent() {
            parent.remove_child(node);
        }
        self.release_subtree(node)
    }

    fn release_subtree(&self, node: &Rc<Node>) -> usize {
        let mut released = 1;
        for child in node.children() {
            released += self.release_subtree(&child);
        }
        if let Some(shadow) = node.shadow_root() {
            released += self.release_subtree(&shadow);
        }
        node.event_target.clear();
        self.nodes.borrow_mut().remove(&node.id);
        released
    }

    /// Get the document root.
    pub fn root(&self) -> &Rc<Node> {
        &self.root
    }

    /// Number of live nodes, including shadow tree nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Get the document element (<html>).
    pub fn document_element(&self) -> Option<Rc<Node>> {
        self.root
            .children()
            .into_iter()
            .find(|n| n.tag_name() == Some("html"))
    }

    /// Get the <head> element.
    pub fn head(&self) -> Option<Rc<Node>> {
        self.document_element()?
            .children()
            .into_iter()
            .find(|n| n.tag_name() == Some("head"))
    }

    /// Get the <body> element.
    pub fn body(&self) -> Option<Rc<Node>> {
        self.document_element()?
            .children()
            .into_iter()
            .find(|n| n.tag_name() == Some("body"))
    }

    /// Get element by ID. Shadow trees are not searched.
    pub fn get_element_by_id(&self, id: &str) -> Option<Rc<Node>> {
        let mut found = None;
        self.traverse(|n| {
            if found.is_none() && n.get_attribute("id").as_deref() == Some(id) {
                found = Some(n.clone());
            }
        });
        found
    }

    /// Get elements by tag name.
    pub fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<Rc<Node>> {
        let tag_name_lower = tag_name.to_lowercase();
        let mut found = Vec::new();
        self.traverse(|n| {
            if n.tag_name().map(|t| t.to_lowercase() == tag_name_lower) == Some(true) {
                found.push(n.clone());
            }
        });
        found
    }

    /// Get elements by class name.
    pub fn get_elements_by_class_name(&self, class_name: &str) -> Vec<Rc<Node>> {
        let mut found = Vec::new();
        self.traverse(|n| {
            if n.has_class(class_name) {
                found.push(n.clone());
            }
        });
        found
    }

    /// Get a live node by ID.
    pub fn get_node(&self, id: NodeId) -> Option<Rc<Node>> {
        self.nodes.borrow().get(&id).cloned()
    }

    /// Get the title of the document.
    pub fn title(&self) -> Option<String> {
        let head = self.head()?;
        let title_elem = head
            .children()
            .into_iter()
            .find(|n| n.tag_name() == Some("title"))?;
        Some(title_elem.text_content())
    }

    /// Dispatch an event at `target`, building the propagation path from the
    /// target's ancestors. Returns true if the default action was not prevented.
    pub fn dispatch_event(&self, target: &Rc<Node>, event: &mut DomEvent) -> bool {
        let ancestors = target.ancestors(event.event().composed);
        EventDispatcher::dispatch(event, target, &ancestors)
    }

    /// Traverse the document tree depth-first. Shadow trees are skipped.
    pub fn traverse<F>(&self, mut callback: F)
    where
        F: FnMut(&Rc<Node>),
    {
        Self::traverse_node(&self.root, &mut callback);
    }

    fn traverse_node<F>(node: &Rc<Node>, callback: &mut F)
    where
        F: FnMut(&Rc<Node>),
    {
        callback(node);
        for child in node.children() {
            Self::traverse_node(&child, callback);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_rcdom(html: &str) -> Result<RcDom, DomError> {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| DomError::ParseError(e.to_string()))
}

fn find_rcdom_element(handle: &Handle, tag: &str) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if let NodeData::Element { name, .. } = &child.data {
            if name.local.to_string() == tag {
                return Some(child.clone());
            }
        }
        if let Some(found) = find_rcdom_element(child, tag) {
            return Some(found);
        }
    }
    None
}

/// Query selector support on whole documents.
pub struct QuerySelector;

impl QuerySelector {
    /// Select elements matching a selector, in document order.
    pub fn select(doc: &Document, selector: &str) -> Result<Vec<Rc<Node>>, DomError> {
        doc.root().query_selector_all(selector)
    }
}
