//! Element configuration

use dropdown_common::Result;
use dropdown_dom::{BoxMetrics, EdgeSizes};
use serde::{Deserialize, Serialize};

/// Dropdown element configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownConfig {
    /// Custom element name to register
    pub tag_name: String,

    /// Box metrics assigned to every rendered option
    pub option_metrics: OptionMetricsConfig,

    /// Append the element stylesheet to the shadow root
    pub inject_stylesheet: bool,
}

/// Vertical box metrics of one option row, in px
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionMetricsConfig {
    pub content_height: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub border_top: f32,
    pub border_bottom: f32,
}

impl DropdownConfig {
    /// Parse a configuration, filling omitted fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl OptionMetricsConfig {
    pub fn to_box_metrics(&self) -> BoxMetrics {
        BoxMetrics {
            content_height: self.content_height,
            padding: EdgeSizes::vertical_only(self.padding_top, self.padding_bottom),
            border: EdgeSizes::vertical_only(self.border_top, self.border_bottom),
        }
    }
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            tag_name: crate::TAG_NAME.to_string(),
            option_metrics: OptionMetricsConfig::default(),
            inject_stylesheet: true,
        }
    }
}

impl Default for OptionMetricsConfig {
    fn default() -> Self {
        Self {
            content_height: 20.0,
            padding_top: 6.0,
            padding_bottom: 6.0,
            border_top: 0.0,
            border_bottom: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_option_height() {
        let config = DropdownConfig::default();
        assert_eq!(config.tag_name, "dropdown-menu");
        assert_eq!(config.option_metrics.to_box_metrics().outer_height(), 33.0);
        assert!(config.inject_stylesheet);
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config =
            DropdownConfig::from_json(r#"{"tag_name":"city-picker","option_metrics":{"content_height":30}}"#)
                .unwrap();
        assert_eq!(config.tag_name, "city-picker");
        assert_eq!(config.option_metrics.content_height, 30.0);
        assert_eq!(config.option_metrics.padding_top, 6.0);
        assert!(config.inject_stylesheet);

        assert!(DropdownConfig::from_json("{").is_err());
    }
}
