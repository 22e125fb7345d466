//! # Dropdown Common
//!
//! Common error types and logging configuration shared by the dropdown crates.
//!
//! ## Features
//!
//! - Unified error type with optional error sources
//! - Logging configuration and setup
//! - Result and Option extension traits

use thiserror::Error;

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};

/// Unified error type for the dropdown element.
#[derive(Error, Debug)]
pub enum DropdownError {
    /// DOM-related errors.
    #[error("DOM error: {message}")]
    Dom {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A host attribute could not be interpreted.
    #[error("Attribute error on `{name}`: {message}")]
    Attribute {
        name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Rendering errors.
    #[error("Render error: {message}")]
    Render {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors.
    #[error("Config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Custom element registration errors.
    #[error("Registry error: {0}")]
    Registry(String),

    /// JSON errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DropdownError {
    /// Create a DOM error.
    pub fn dom(message: impl Into<String>) -> Self {
        Self::Dom {
            message: message.into(),
            source: None,
        }
    }

    /// Create a DOM error with source.
    pub fn dom_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Dom {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an attribute error.
    pub fn attribute(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Attribute {
            name: name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an attribute error with source.
    pub fn attribute_with_source<E: std::error::Error + Send + Sync + 'static>(
        name: impl Into<String>,
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Attribute {
            name: name.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a render error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Get the error category for diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            DropdownError::Dom { .. } => "dom",
            DropdownError::Attribute { .. } => "attribute",
            DropdownError::Render { .. } => "render",
            DropdownError::Config { .. } => "config",
            DropdownError::Registry(_) => "registry",
            DropdownError::Json(_) => "json",
            DropdownError::NotFound(_) => "not_found",
            DropdownError::InvalidArgument(_) => "invalid_argument",
        }
    }

    /// Whether the error came from malformed host input and was recoverable
    /// by falling back to a default.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DropdownError::Attribute { .. } | DropdownError::Json(_)
        )
    }
}

/// Result type alias for dropdown operations.
pub type Result<T> = std::result::Result<T, DropdownError>;

/// Extension trait for Result.
pub trait ResultExt<T> {
    /// Wrap the error as a DOM error with context.
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| DropdownError::dom_with_source(message, e))
    }
}

/// Extension trait for Option.
pub trait OptionExt<T> {
    /// Convert None to a NotFound error.
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| DropdownError::NotFound(resource.into()))
    }
}
