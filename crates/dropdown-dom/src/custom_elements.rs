//! # Custom Elements
//!
//! A registry mapping custom element names to constructors. Upgrading a
//! document constructs one instance per matching element and runs its
//! connected callback; disconnecting runs the teardown callback and drops the
//! instance.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::{Document, DomError, Node, NodeId};

/// Behaviour attached to an upgraded element.
pub trait CustomElement: Any {
    /// The element became part of the document.
    fn connected_callback(&self);

    /// The element left the document. Must release everything the element
    /// attached to the tree.
    fn disconnected_callback(&self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

/// Builds the element instance for a host node.
pub type CustomElementConstructor =
    Rc<dyn Fn(&Rc<Document>, &Rc<Node>) -> Result<Rc<dyn CustomElement>, DomError>>;

/// Registry of defined custom elements and their live instances.
#[derive(Default)]
pub struct CustomElementRegistry {
    definitions: RefCell<HashMap<String, CustomElementConstructor>>,
    instances: RefCell<HashMap<NodeId, Rc<dyn CustomElement>>>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name`. Names must be lowercase and contain a hyphen; a name can
    /// only be defined once.
    pub fn define<F>(&self, name: &str, constructor: F) -> Result<(), DomError>
    where
        F: Fn(&Rc<Document>, &Rc<Node>) -> Result<Rc<dyn CustomElement>, DomError> + 'static,
    {
        if !is_valid_custom_element_name(name) {
            return Err(DomError::InvalidName(name.to_string()));
        }
        let mut definitions = self.definitions.borrow_mut();
        if definitions.contains_key(name) {
            return Err(DomError::AlreadyDefined(name.to_string()));
        }
        definitions.insert(name.to_string(), Rc::new(constructor) as CustomElementConstructor);
        debug!(name, "Custom element defined");
        Ok(())
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.borrow().contains_key(name)
    }

    /// Upgrade every defined element in `document` that has no instance yet.
    /// Returns the number of elements upgraded.
    pub fn upgrade(&self, document: &Rc<Document>) -> usize {
        let mut candidates = Vec::new();
        {
            let definitions = self.definitions.borrow();
            let instances = self.instances.borrow();
            document.traverse(|node| {
                let defined = node
                    .tag_name()
                    .map(|tag| definitions.contains_key(tag))
                    .unwrap_or(false);
                if defined && !instances.contains_key(&node.id) {
                    candidates.push(node.clone());
                }
            });
        }

        candidates
            .iter()
            .filter(|node| self.upgrade_element(document, node))
            .count()
    }

    /// Upgrade a single element. Returns whether a new instance was created.
    pub fn upgrade_element(&self, document: &Rc<Document>, node: &Rc<Node>) -> bool {
        if self.instances.borrow().contains_key(&node.id) {
            return false;
        }
        let Some(tag) = node.tag_name() else {
            return false;
        };
        let Some(constructor) = self.definitions.borrow().get(tag).cloned() else {
            return false;
        };

        match constructor(document, node) {
            Ok(instance) => {
                self.instances.borrow_mut().insert(node.id, instance.clone());
                instance.connected_callback();
                debug!(tag, node = ?node.id, "Custom element upgraded");
                true
            }
            Err(e) => {
                warn!(tag, node = ?node.id, error = %e, "Custom element constructor failed");
                false
            }
        }
    }

    /// The instance attached to a node.
    pub fn get(&self, id: NodeId) -> Option<Rc<dyn CustomElement>> {
        self.instances.borrow().get(&id).cloned()
    }

    /// Run the connected callback of an existing instance again, after its
    /// host was disconnected and re-inserted.
    pub fn connect(&self, node: &Node) -> bool {
        let Some(instance) = self.get(node.id) else {
            return false;
        };
        instance.connected_callback();
        true
    }

    /// Run the teardown callback of the instance attached to `node` and
    /// forget it. Returns whether there was an instance.
    pub fn disconnect(&self, node: &Node) -> bool {
        let Some(instance) = self.instances.borrow_mut().remove(&node.id) else {
            return false;
        };
        instance.disconnected_callback();
        debug!(node = ?node.id, "Custom element disconnected");
        true
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_valid_custom_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_lowercase = chars.next().map(|c| c.is_ascii_lowercase()).unwrap_or(false);
    starts_lowercase
        && name.contains('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Counter {
        connected: Cell<u32>,
        disconnected: Cell<u32>,
    }

    impl CustomElement for Counter {
        fn connected_callback(&self) {
            self.connected.set(self.connected.get() + 1);
        }

        fn disconnected_callback(&self) {
            self.disconnected.set(self.disconnected.get() + 1);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
            self
        }
    }

    fn counter_constructor(
    ) -> impl Fn(&Rc<Document>, &Rc<Node>) -> Result<Rc<dyn CustomElement>, DomError> {
        |_doc, _node| {
            Ok(Rc::new(Counter {
                connected: Cell::new(0),
                disconnected: Cell::new(0),
            }) as Rc<dyn CustomElement>)
        }
    }

    #[test]
    fn test_define_validates_names() {
        let registry = CustomElementRegistry::new();
        assert!(matches!(
            registry.define("dropdown", counter_constructor()),
            Err(DomError::InvalidName(_))
        ));
        assert!(matches!(
            registry.define("Drop-Down", counter_constructor()),
            Err(DomError::InvalidName(_))
        ));

        registry.define("x-counter", counter_constructor()).unwrap();
        assert!(registry.is_defined("x-counter"));
        assert!(matches!(
            registry.define("x-counter", counter_constructor()),
            Err(DomError::AlreadyDefined(_))
        ));
    }

    #[test]
    fn test_upgrade_and_disconnect() {
        let doc = Rc::new(
            Document::parse_html("<html><body><x-counter></x-counter><x-counter></x-counter></body></html>")
                .unwrap(),
        );
        let registry = CustomElementRegistry::new();
        registry.define("x-counter", counter_constructor()).unwrap();

        assert_eq!(registry.upgrade(&doc), 2);
        assert_eq!(registry.upgrade(&doc), 0);
        assert_eq!(registry.len(), 2);

        let node = doc.get_elements_by_tag_name("x-counter").remove(0);
        let instance = registry.get(node.id).unwrap();
        let counter = instance.as_any().downcast_ref::<Counter>().unwrap();
        assert_eq!(counter.connected.get(), 1);

        assert!(registry.connect(&node));
        assert_eq!(counter.connected.get(), 2);

        assert!(registry.disconnect(&node));
        assert!(!registry.disconnect(&node));
        assert_eq!(counter.disconnected.get(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failing_constructor_is_skipped() {
        let doc = Rc::new(Document::parse_html("<x-broken></x-broken>").unwrap());
        let registry = CustomElementRegistry::new();
        registry
            .define(
                "x-broken",
                |_doc: &Rc<Document>, _node: &Rc<Node>| {
                    Err(DomError::InvalidOperation("boom".to_string()))
                },
            )
            .unwrap();

        assert_eq!(registry.upgrade(&doc), 0);
        assert!(registry.is_empty());
    }
}
