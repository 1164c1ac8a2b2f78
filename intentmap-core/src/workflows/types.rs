use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkflowMeta {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub settings: Value,
}

impl Default for WorkflowMeta {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            description: None,
            settings: Value::Object(serde_json::Map::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeInstance {
    pub id: Uuid,
    /// Human-readable key, unique within a workflow and stable across exports.
    pub instance_key: String,
    pub node_type: String,
    pub display_label: String,
    pub position: CanvasPoint,
    pub config: Value,
    pub is_entry_point: bool,
}

impl Default for NodeInstance {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            instance_key: String::new(),
            node_type: String::new(),
            display_label: String::new(),
            position: CanvasPoint::default(),
            config: Value::Object(serde_json::Map::new()),
            is_entry_point: false,
        }
    }
}

impl NodeInstance {
    pub fn new(instance_key: &str, node_type: &str, position: CanvasPoint) -> Self {
        Self {
            instance_key: instance_key.to_owned(),
            node_type: node_type.to_owned(),
            display_label: instance_key.replace('_', " "),
            position,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    #[default]
    Default,
    Conditional,
    Fallback,
}

impl ConnectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Conditional => "conditional",
            Self::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Connection {
    pub id: Uuid,
    pub source_node_id: Uuid,
    pub target_node_id: Uuid,
    pub connection_type: ConnectionType,
    pub condition: Option<Value>,
    pub label: Option<String>,
    pub priority: i32,
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            source_node_id: Uuid::nil(),
            target_node_id: Uuid::nil(),
            connection_type: ConnectionType::Default,
            condition: None,
            label: None,
            priority: 0,
        }
    }
}

impl Connection {
    pub fn new(source_node_id: Uuid, target_node_id: Uuid) -> Self {
        Self {
            source_node_id,
            target_node_id,
            ..Self::default()
        }
    }

    pub fn touches(&self, node_id: Uuid) -> bool {
        self.source_node_id == node_id || self.target_node_id == node_id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}
