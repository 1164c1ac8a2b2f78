use std::collections::BTreeSet;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};

use super::store::WorkflowEditor;
use super::types::{
    CanvasPoint, CanvasState, Connection, ConnectionType, NodeInstance, WorkflowMeta,
};

/// Major version this build reads; minor bumps stay compatible.
const SUPPORTED_MAJOR: &str = "1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExport {
    pub version: String,
    pub workflow: ExportedWorkflow,
    pub nodes: Vec<ExportedNode>,
    pub edges: Vec<ExportedEdge>,
    #[serde(default)]
    pub canvas_state: CanvasState,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedWorkflow {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "empty_object")]
    pub settings: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedNode {
    pub instance_key: String,
    pub node_type: String,
    #[serde(default)]
    pub display_label: String,
    #[serde(default)]
    pub position: CanvasPoint,
    #[serde(default = "empty_object")]
    pub config: Value,
    #[serde(default)]
    pub is_entry_point: bool,
}

/// Connection addressed by `instance_key` on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub connection_type: ConnectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub priority: i32,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

pub fn export_workflow(
    editor: &WorkflowEditor,
    version: &str,
    exported_at: DateTime<Utc>,
) -> Result<WorkflowExport> {
    let view = editor.view();
    let nodes = view
        .nodes
        .iter()
        .map(|node| ExportedNode {
            instance_key: node.instance_key.clone(),
            node_type: node.node_type.clone(),
            display_label: node.display_label.clone(),
            position: node.position,
            config: node.config.clone(),
            is_entry_point: node.is_entry_point,
        })
        .collect();

    let mut edges = Vec::with_capacity(view.connections.len());
    for connection in view.connections {
        let key_of = |id: Uuid| {
            editor
                .nodes()
                .get(id)
                .map(|node| node.instance_key.clone())
                .ok_or_else(|| {
                    Error::Workflow(format!(
                        "connection '{}' references missing node '{id}'",
                        connection.id
                    ))
                })
        };
        edges.push(ExportedEdge {
            source: key_of(connection.source_node_id)?,
            target: key_of(connection.target_node_id)?,
            connection_type: connection.connection_type,
            condition: connection.condition.clone(),
            label: connection.label.clone(),
            priority: connection.priority,
        });
    }

    Ok(WorkflowExport {
        version: version.to_owned(),
        workflow: ExportedWorkflow {
            name: view.meta.name.clone(),
            description: view.meta.description.clone(),
            settings: view.meta.settings.clone(),
        },
        nodes,
        edges,
        canvas_state: *view.canvas,
        exported_at: Some(exported_at),
    })
}

pub fn export_to_json(export: &WorkflowExport) -> Result<String> {
    serde_json::to_string_pretty(export)
        .map_err(|err| Error::Workflow(format!("failed serializing workflow export: {err}")))
}

/// Parses and validates an export, rebuilding it under fresh ids.
pub fn import_workflow(raw: &str) -> Result<WorkflowEditor> {
    let value = serde_json::from_str::<Value>(raw)
        .map_err(|err| Error::Workflow(format!("failed parsing workflow export json: {err}")))?;
    validate_against_schema(&value)?;

    let export = serde_json::from_value::<WorkflowExport>(value)
        .map_err(|err| Error::Workflow(format!("invalid workflow export: {err}")))?;
    check_version(&export.version)?;
    check_references(&export)?;

    let mut editor = WorkflowEditor::new(WorkflowMeta {
        id: Uuid::new_v4(),
        name: export.workflow.name,
        description: export.workflow.description,
        settings: export.workflow.settings,
    });

    for node in export.nodes {
        let display_label = if node.display_label.is_empty() {
            node.instance_key.replace('_', " ")
        } else {
            node.display_label
        };
        editor.add_node(NodeInstance {
            id: Uuid::new_v4(),
            instance_key: node.instance_key,
            node_type: node.node_type,
            display_label,
            position: node.position,
            config: node.config,
            is_entry_point: node.is_entry_point,
        })?;
    }

    for edge in export.edges {
        let (Some(source), Some(target)) = (
            editor.nodes().by_key(&edge.source).map(|node| node.id),
            editor.nodes().by_key(&edge.target).map(|node| node.id),
        ) else {
            continue;
        };
        editor.connect(Connection {
            id: Uuid::new_v4(),
            source_node_id: source,
            target_node_id: target,
            connection_type: edge.connection_type,
            condition: edge.condition,
            label: edge.label,
            priority: edge.priority,
        })?;
    }

    editor.restore_canvas(export.canvas_state);
    editor.mark_saved();
    tracing::debug!(
        workflow = %editor.meta().name,
        nodes = editor.nodes().len(),
        connections = editor.connections().len(),
        "imported workflow"
    );
    Ok(editor)
}

fn export_schema() -> Result<&'static JSONSchema> {
    static SCHEMA: OnceLock<std::result::Result<JSONSchema, String>> = OnceLock::new();
    let compiled = SCHEMA.get_or_init(|| {
        let raw = include_str!("../../../docs/workflow.export.schema.json");
        let schema_value = serde_json::from_str::<Value>(raw)
            .map_err(|err| format!("invalid embedded workflow export schema json: {err}"))?;
        JSONSchema::compile(&schema_value)
            .map_err(|err| format!("failed compiling embedded workflow export schema: {err}"))
    });

    match compiled {
        Ok(schema) => Ok(schema),
        Err(err) => Err(Error::Config(err.clone())),
    }
}

fn validate_against_schema(value: &Value) -> Result<()> {
    let schema = export_schema()?;
    if let Err(errors) = schema.validate(value) {
        let details = errors
            .map(|err| format!("{}: {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::Validation(format!(
            "workflow export failed schema validation: {details}"
        )));
    }
    Ok(())
}

fn check_version(version: &str) -> Result<()> {
    let major = version.split('.').next().unwrap_or_default();
    if major != SUPPORTED_MAJOR {
        return Err(Error::Validation(format!(
            "unsupported workflow export version '{version}'"
        )));
    }
    Ok(())
}

fn check_references(export: &WorkflowExport) -> Result<()> {
    let mut keys = BTreeSet::new();
    for node in &export.nodes {
        if !keys.insert(node.instance_key.as_str()) {
            return Err(Error::Validation(format!(
                "duplicate node instance_key '{}'",
                node.instance_key
            )));
        }
    }

    for edge in &export.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !keys.contains(endpoint.as_str()) {
                return Err(Error::Validation(format!(
                    "edge {} -> {} references unknown node '{endpoint}'",
                    edge.source, edge.target
                )));
            }
        }
    }

    let entry_points = export
        .nodes
        .iter()
        .filter(|node| node.is_entry_point)
        .count();
    if entry_points > 1 {
        return Err(Error::Validation(format!(
            "workflow export declares {entry_points} entry points"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{export_to_json, export_workflow, import_workflow};
    use crate::error::Error;
    use crate::workflows::store::WorkflowEditor;
    use crate::workflows::types::{
        CanvasPoint, Connection, ConnectionType, NodeInstance, WorkflowMeta,
    };

    fn sample_editor() -> WorkflowEditor {
        let mut editor = WorkflowEditor::new(WorkflowMeta {
            name: "debt collection".to_owned(),
            description: Some("asks for the DNI then reports the balance".to_owned()),
            ..WorkflowMeta::default()
        });
        let mut start = NodeInstance::new("greeting", "message", CanvasPoint::new(0.0, 0.0));
        start.is_entry_point = true;
        let start = editor.add_node(start).expect("start");
        let ask = editor
            .add_node(NodeInstance::new("ask_dni", "input", CanvasPoint::new(250.0, 0.0)))
            .expect("ask");
        editor
            .connect(Connection {
                connection_type: ConnectionType::Conditional,
                condition: Some(serde_json::json!({"field": "dni", "op": "missing"})),
                label: Some("no dni".to_owned()),
                ..Connection::new(start, ask)
            })
            .expect("connect");
        editor.zoom_to(1.5);
        editor
    }

    #[test]
    fn export_references_nodes_by_instance_key() {
        let editor = sample_editor();
        let exported_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let export = export_workflow(&editor, "1.0", exported_at).expect("export");

        assert_eq!(export.version, "1.0");
        assert_eq!(export.nodes.len(), 2);
        assert_eq!(export.edges[0].source, "greeting");
        assert_eq!(export.edges[0].target, "ask_dni");
        assert_eq!(export.canvas_state.zoom, 1.5);

        let json = export_to_json(&export).expect("json");
        assert!(json.contains("\"exported_at\": \"2024-05-01T12:00:00Z\""));
        assert!(!json.contains(&editor.meta().id.to_string()));
    }

    #[test]
    fn import_rebuilds_with_fresh_ids() {
        let editor = sample_editor();
        let export = export_workflow(&editor, "1.0", Utc::now()).expect("export");
        let json = export_to_json(&export).expect("json");

        let imported = import_workflow(&json).expect("import");
        assert!(!imported.is_dirty());
        assert_eq!(imported.meta().name, "debt collection");
        assert_ne!(imported.meta().id, editor.meta().id);

        let original = editor.nodes().by_key("greeting").expect("original");
        let copy = imported.nodes().by_key("greeting").expect("imported");
        assert_ne!(original.id, copy.id);
        assert!(copy.is_entry_point);

        let connection = &imported.connections().connections()[0];
        assert_eq!(connection.connection_type, ConnectionType::Conditional);
        assert_eq!(connection.label.as_deref(), Some("no dni"));
        assert_eq!(imported.canvas().state().zoom, 1.5);

        let again = export_workflow(&imported, "1.0", export.exported_at.expect("stamp"))
            .expect("re-export");
        assert_eq!(again, export);
    }

    #[test]
    fn import_rejects_schema_violations() {
        let err = import_workflow(r#"{"version": "1.0", "workflow": {"name": "x"}, "nodes": []}"#)
            .expect_err("edges missing");
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("schema validation"));
    }

    #[test]
    fn import_rejects_unresolvable_edges_and_duplicate_keys() {
        let dangling = r#"{
            "version": "1.0",
            "workflow": {"name": "broken"},
            "nodes": [{"instance_key": "a", "node_type": "message"}],
            "edges": [{"source": "a", "target": "b"}]
        }"#;
        let err = import_workflow(dangling).expect_err("dangling edge");
        assert!(err.to_string().contains("unknown node 'b'"));

        let duplicated = r#"{
            "version": "1.0",
            "workflow": {"name": "broken"},
            "nodes": [
                {"instance_key": "a", "node_type": "message"},
                {"instance_key": "a", "node_type": "input"}
            ],
            "edges": []
        }"#;
        let err = import_workflow(duplicated).expect_err("duplicate key");
        assert!(err.to_string().contains("duplicate node instance_key 'a'"));
    }

    #[test]
    fn import_rejects_multiple_entry_points_and_unknown_versions() {
        let two_entries = r#"{
            "version": "1.2",
            "workflow": {"name": "broken"},
            "nodes": [
                {"instance_key": "a", "node_type": "message", "is_entry_point": true},
                {"instance_key": "b", "node_type": "message", "is_entry_point": true}
            ],
            "edges": []
        }"#;
        let err = import_workflow(two_entries).expect_err("two entry points");
        assert!(err.to_string().contains("2 entry points"));

        let future = r#"{
            "version": "2.0",
            "workflow": {"name": "later"},
            "nodes": [],
            "edges": []
        }"#;
        let err = import_workflow(future).expect_err("version");
        assert!(err.to_string().contains("unsupported workflow export version"));
    }
}
