//! Style sheet: node shapes, container decorations and layout spacing.
//!
//! A `StyleSheet` is a plain value handed to each [`GraphLayout`](crate::GraphLayout); two
//! layouts of the same graph may use different sheets. It deserializes from JSON with every
//! field optional.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::error::Result;
use crate::routing::RoutingMode;

/// How a clone relates to the other clones of its vertex. Node dimensions depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloneKind {
    /// The only clone of its vertex.
    NotClone,
    /// One of several clones of its vertex.
    IsClone,
    /// A clone sitting directly in a clone-group container, next to the group's core.
    IsMidget,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeShape {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: f64,
}

impl NodeShape {
    pub const fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
    pub shape: NodeShape,
    /// Shape used while the vertex has several clones. Falls back to `shape`.
    pub clone: Option<NodeShape>,
    /// Shape used for midgets. Falls back to `clone`, then `shape`.
    pub midget: Option<NodeShape>,
    /// Directional nodes expose input/output faces (see [`ConnectionType`](crate::ConnectionType)).
    pub directional: bool,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            shape: NodeShape::new(60.0, 30.0, 5.0),
            clone: Some(NodeShape::new(50.0, 24.0, 4.0)),
            midget: Some(NodeShape::new(36.0, 18.0, 3.0)),
            directional: false,
        }
    }
}

impl NodeStyle {
    pub fn shape_for(&self, kind: CloneKind) -> NodeShape {
        match kind {
            CloneKind::NotClone => self.shape,
            CloneKind::IsClone => self.clone.unwrap_or(self.shape),
            CloneKind::IsMidget => self.midget.or(self.clone).unwrap_or(self.shape),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerStyle {
    /// Space between the children's full boxes and the container's bounding box.
    pub padding: f64,
    /// Extra space around the bounding box that makes up the container's full box.
    pub margin: f64,
    pub label_char_width: f64,
    pub label_height: f64,
}

impl Default for ContainerStyle {
    fn default() -> Self {
        Self {
            padding: 10.0,
            margin: 5.0,
            label_char_width: 7.0,
            label_height: 14.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingStyle {
    /// Gap between neighbouring items placed by grid/layered/ring strategies.
    pub node_spacing: f64,
    /// Gap between a core and the ring of items placed around it.
    pub ring_spacing: f64,
    /// Distance from its neighbour at which a freshly split clone is dropped.
    pub clone_distance: f64,
}

impl Default for SpacingStyle {
    fn default() -> Self {
        Self {
            node_spacing: 40.0,
            ring_spacing: 20.0,
            clone_distance: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSheet {
    /// Used for vertex types without an entry in `nodes`.
    pub default_node: NodeStyle,
    /// Node styles keyed by vertex type label.
    pub nodes: IndexMap<String, NodeStyle>,
    pub container: ContainerStyle,
    pub spacing: SpacingStyle,
    pub routing: RoutingMode,
}

impl Default for StyleSheet {
    fn default() -> Self {
        let mut nodes = IndexMap::new();
        nodes.insert("Species".to_string(), NodeStyle::default());
        nodes.insert(
            "Reaction".to_string(),
            NodeStyle {
                shape: NodeShape::new(16.0, 16.0, 4.0),
                clone: None,
                midget: None,
                directional: true,
            },
        );
        Self {
            default_node: NodeStyle::default(),
            nodes,
            container: ContainerStyle::default(),
            spacing: SpacingStyle::default(),
            routing: RoutingMode::default(),
        }
    }
}

impl StyleSheet {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Style for a vertex type label. Exact matches win over case-insensitive ones.
    pub fn node_style(&self, type_label: &str) -> &NodeStyle {
        if let Some(style) = self.nodes.get(type_label) {
            return style;
        }
        self.nodes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(type_label))
            .map(|(_, v)| v)
            .unwrap_or(&self.default_node)
    }

    pub fn node_shape(&self, type_label: &str, kind: CloneKind) -> NodeShape {
        self.node_style(type_label).shape_for(kind)
    }

    pub fn is_directional(&self, type_label: &str) -> bool {
        self.node_style(type_label).directional
    }

    /// Width/height the label of a container needs.
    pub fn label_size(&self, label: &str) -> (f64, f64) {
        if label.is_empty() {
            return (0.0, 0.0);
        }
        (
            label.width() as f64 * self.container.label_char_width,
            self.container.label_height,
        )
    }
}
