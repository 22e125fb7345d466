//! Box metrics assigned to laid-out nodes.

/// Edge sizes (for padding and border).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeSizes {
    /// Same size on all four edges.
    pub fn uniform(size: f32) -> Self {
        Self {
            top: size,
            right: size,
            bottom: size,
            left: size,
        }
    }

    /// Only top and bottom edges.
    pub fn vertical_only(top: f32, bottom: f32) -> Self {
        Self {
            top,
            bottom,
            ..Default::default()
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Vertical box dimensions of a laid-out element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxMetrics {
    /// Content height in px.
    pub content_height: f32,
    /// Padding.
    pub padding: EdgeSizes,
    /// Border.
    pub border: EdgeSizes,
}

impl BoxMetrics {
    /// Height of the border box: content + vertical padding + vertical border.
    pub fn outer_height(&self) -> f32 {
        self.content_height + self.padding.vertical() + self.border.vertical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_height() {
        let metrics = BoxMetrics {
            content_height: 20.0,
            padding: EdgeSizes::vertical_only(6.0, 6.0),
            border: EdgeSizes::vertical_only(0.0, 1.0),
        };
        assert_eq!(metrics.outer_height(), 33.0);
    }

    #[test]
    fn test_edge_sizes() {
        let edges = EdgeSizes::uniform(2.0);
        assert_eq!(edges.horizontal(), 4.0);
        assert_eq!(edges.vertical(), 4.0);
        assert_eq!(BoxMetrics::default().outer_height(), 0.0);
    }
}
