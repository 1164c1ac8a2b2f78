use serde::Serialize;

use crate::layout::IntentStatus;

/// Data attached to a node, shaped per node type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NodePayload {
    Domain(DomainNodeData),
    Intent(IntentNodeData),
    Agent(AgentNodeData),
    KeywordGroup(KeywordGroupNodeData),
    BypassRule(BypassRuleNodeData),
    DomainGroup(DomainGroupNodeData),
    Workflow(WorkflowNodeData),
    Label(LabelNodeData),
}

impl NodePayload {
    pub fn label(&self) -> &str {
        match self {
            Self::Domain(data) => &data.label,
            Self::Intent(data) => &data.name,
            Self::Agent(data) => &data.label,
            Self::KeywordGroup(data) => &data.agent_key,
            Self::BypassRule(data) => &data.name,
            Self::DomainGroup(data) => &data.label,
            Self::Workflow(data) => &data.label,
            Self::Label(data) => &data.label,
        }
    }

    pub fn as_agent(&self) -> Option<&AgentNodeData> {
        match self {
            Self::Agent(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_intent(&self) -> Option<&IntentNodeData> {
        match self {
            Self::Intent(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_domain(&self) -> Option<&DomainNodeData> {
        match self {
            Self::Domain(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_domain_group(&self) -> Option<&DomainGroupNodeData> {
        match self {
            Self::DomainGroup(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_keyword_group(&self) -> Option<&KeywordGroupNodeData> {
        match self {
            Self::KeywordGroup(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainNodeData {
    pub key: String,
    pub label: String,
    pub color: Option<String>,
    pub enabled: bool,
    pub intent_count: usize,
    pub active_intent_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentNodeData {
    pub key: String,
    pub name: String,
    pub domain_key: String,
    pub enabled: bool,
    pub status: IntentStatus,
    pub agent_key: Option<String>,
    pub lemma_count: u32,
    pub keyword_count: u32,
    pub phrase_count: u32,
    pub confirmation_pattern_count: u32,
    pub total_patterns: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentNodeData {
    pub key: String,
    pub label: String,
    pub is_flow_agent: bool,
    pub enabled: bool,
    pub mapping_count: usize,
    pub keyword_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordGroupNodeData {
    pub agent_key: String,
    pub keywords: Vec<String>,
    pub total_count: usize,
    pub enabled_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BypassRuleNodeData {
    pub id: String,
    pub name: String,
    pub rule_type: String,
    pub priority: i32,
    pub enabled: bool,
    pub target_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainGroupNodeData {
    pub key: String,
    pub label: String,
    pub color: Option<String>,
    pub collapsed: bool,
    pub agent_count: usize,
    pub enabled_agent_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNodeData {
    pub instance_key: String,
    pub node_type: String,
    pub label: String,
    pub is_entry_point: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelNodeData {
    pub label: String,
}
