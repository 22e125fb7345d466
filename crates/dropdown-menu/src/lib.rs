//! # Dropdown Menu
//!
//! A styled, keyboard- and mouse-accessible select element hosted in a shadow
//! root, with a hidden light-tree input so enclosing forms submit the chosen
//! value.
//!
//! ## Usage
//!
//! ```ignore
//! let document = Rc::new(Document::parse_html(html)?);
//! let registry = CustomElementRegistry::new();
//! dropdown_menu::define(&registry)?;
//! registry.upgrade(&document);
//!
//! let dropdown = Dropdown::from_registry(&registry, &host).ok_or_not_found("dropdown")?;
//! dropdown.set_selected_option(2);
//! assert_eq!(dropdown.value(), "A03");
//! ```
//!
//! ## Modules
//!
//! - [`props`]: host attribute parsing
//! - [`state`]: interaction state
//! - [`navigation`]: key classification, wraparound and type-ahead
//! - [`scroll`]: visible-height and scroll policy
//! - [`render`]: shadow tree rendering and marker classes
//! - [`dropdown`]: event handling, public API and lifecycle
//! - [`config`]: element configuration

use std::rc::Rc;

use dropdown_common::{DropdownError, Result};
use dropdown_dom::{CustomElement, CustomElementRegistry};
use tracing::debug;

pub mod config;
pub mod dropdown;
pub mod navigation;
pub mod props;
pub mod render;
pub mod scroll;
pub mod state;

pub use config::{DropdownConfig, OptionMetricsConfig};
pub use dropdown::Dropdown;
pub use navigation::DropdownKey;
pub use props::{DropdownOption, DropdownProps};
pub use render::DropdownView;
pub use scroll::ScrollPolicy;
pub use state::InteractionState;

/// Default custom element name.
pub const TAG_NAME: &str = "dropdown-menu";

/// Register the element under [`TAG_NAME`].
///
/// Returns `Ok(false)` if the name is already defined.
pub fn define(registry: &CustomElementRegistry) -> Result<bool> {
    define_with_config(registry, DropdownConfig::default())
}

/// Register the element with a custom configuration.
pub fn define_with_config(registry: &CustomElementRegistry, config: DropdownConfig) -> Result<bool> {
    if registry.is_defined(&config.tag_name) {
        debug!(tag = %config.tag_name, "Dropdown already defined");
        return Ok(false);
    }

    let tag_name = config.tag_name.clone();
    registry
        .define(&tag_name, move |document, host| {
            let element = Dropdown::new(document, host, config.clone())?;
            Ok(element as Rc<dyn CustomElement>)
        })
        .map_err(|e| DropdownError::Registry(e.to_string()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_is_idempotent() {
        let registry = CustomElementRegistry::new();
        assert!(define(&registry).unwrap());
        assert!(!define(&registry).unwrap());
        assert!(registry.is_defined(TAG_NAME));
    }

    #[test]
    fn test_define_rejects_invalid_names() {
        let registry = CustomElementRegistry::new();
        let config = DropdownConfig {
            tag_name: "dropdown".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            define_with_config(&registry, config),
            Err(DropdownError::Registry(_))
        ));
    }
}
