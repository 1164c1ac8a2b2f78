//! Node ids are derived from entity keys so highlight and selection state
//! stays valid across regenerations of the same data.

pub const MESSAGE_INPUT_ID: &str = "message-input";
pub const ORCHESTRATOR_ID: &str = "orchestrator";
pub const SUPERVISOR_ID: &str = "supervisor";
pub const END_ID: &str = "end";

pub fn domain_node_id(domain_key: &str) -> String {
    format!("domain-{domain_key}")
}

pub fn intent_node_id(domain_key: &str, intent_key: &str) -> String {
    format!("intent-{domain_key}:{intent_key}")
}

pub fn agent_node_id(agent_key: &str) -> String {
    format!("agent-{agent_key}")
}

pub fn keyword_group_node_id(agent_key: &str) -> String {
    format!("keywords-{agent_key}")
}

pub fn bypass_rule_node_id(rule_id: &str) -> String {
    format!("bypass-{rule_id}")
}

pub fn domain_group_node_id(domain_key: &str) -> String {
    format!("domain-group-{domain_key}")
}

pub fn workflow_node_id(instance_key: &str) -> String {
    format!("node-{instance_key}")
}

pub fn edge_id(source: &str, target: &str) -> String {
    format!("e-{source}-{target}")
}
