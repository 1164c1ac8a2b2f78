use std::path::Path;

use serde::{Deserialize, Serialize};

use super::entities::{Agent, BypassRule, Domain, IntentAgentMapping, KeywordMapping};
use crate::error::{Error, Result};

/// Everything the visualizers read, as fetched from the admin API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Snapshot {
    pub domains: Vec<Domain>,
    pub agents: Vec<Agent>,
    pub intent_mappings: Vec<IntentAgentMapping>,
    pub keyword_mappings: Vec<KeywordMapping>,
    pub bypass_rules: Vec<BypassRule>,
}

impl Snapshot {
    pub fn agent(&self, key: &str) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.key == key)
    }

    pub fn domain(&self, key: &str) -> Option<&Domain> {
        self.domains.iter().find(|domain| domain.key == key)
    }

    /// First mapping that applies to the intent within the given domain.
    pub fn mapping_for(&self, domain_key: &str, intent_key: &str) -> Option<&IntentAgentMapping> {
        self.intent_mappings
            .iter()
            .find(|mapping| mapping.applies_to(domain_key, intent_key))
    }

    pub fn keywords_for<'a>(
        &'a self,
        agent_key: &'a str,
    ) -> impl Iterator<Item = &'a KeywordMapping> + 'a {
        self.keyword_mappings
            .iter()
            .filter(move |mapping| mapping.agent_key == agent_key)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| Error::Snapshot(format!("failed parsing snapshot json: {err}")))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw)
            .map_err(|err| Error::Snapshot(format!("failed parsing snapshot yaml: {err}")))
    }
}

/// Loads a snapshot from disk; `.yaml`/`.yml` files are read as YAML, everything else as JSON.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        Error::Snapshot(format!(
            "failed to read snapshot '{}': {err}",
            path.display()
        ))
    })?;

    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or_default();

    let parsed = if matches!(ext, "yaml" | "yml") {
        serde_yaml::from_str::<Snapshot>(&raw).map_err(|err| err.to_string())
    } else {
        serde_json::from_str::<Snapshot>(&raw).map_err(|err| err.to_string())
    };
    let snapshot = parsed.map_err(|err| {
        Error::Snapshot(format!(
            "failed parsing snapshot '{}': {err}",
            path.display()
        ))
    })?;

    tracing::debug!(
        path = %path.display(),
        domains = snapshot.domains.len(),
        agents = snapshot.agents.len(),
        bypass_rules = snapshot.bypass_rules.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::model::BypassRuleType;

    #[test]
    fn parses_json_with_defaults() {
        let snapshot = Snapshot::from_json_str(
            r#"{
                "domains": [
                    {"key": "pharmacy", "intents": [{"key": "debt_query", "name": "Debt query"}]}
                ],
                "agents": [{"key": "pharmacy_operations_agent"}],
                "intent_mappings": [
                    {"intent_key": "debt_query", "agent_key": "pharmacy_operations_agent"}
                ]
            }"#,
        )
        .expect("snapshot should parse");

        let domain = snapshot.domain("pharmacy").expect("domain present");
        assert!(domain.enabled);
        assert!(domain.intents[0].enabled);
        assert!(snapshot.keyword_mappings.is_empty());

        let mapping = snapshot
            .mapping_for("pharmacy", "debt_query")
            .expect("mapping should apply to any domain");
        assert!(mapping.enabled);
    }

    #[test]
    fn parses_yaml_bypass_rules() {
        let snapshot = Snapshot::from_yaml_str(
            r#"
bypass_rules:
  - id: "r1"
    name: "Test numbers"
    rule_type: phone_number_list
    phone_numbers: ["5491122334455"]
    priority: 10
    target_agent: pharmacy_operations_agent
"#,
        )
        .expect("snapshot should parse");

        assert_eq!(
            snapshot.bypass_rules[0].rule_type,
            BypassRuleType::PhoneNumberList
        );
        assert!(snapshot.bypass_rules[0].enabled);
    }

    #[test]
    fn domain_scoped_mapping_does_not_leak() {
        let snapshot = Snapshot::from_json_str(
            r#"{"intent_mappings": [
                {"intent_key": "greeting", "domain_key": "credit", "agent_key": "greeting_agent"}
            ]}"#,
        )
        .expect("snapshot should parse");

        assert!(snapshot.mapping_for("credit", "greeting").is_some());
        assert!(snapshot.mapping_for("pharmacy", "greeting").is_none());
    }

    #[test]
    fn first_applicable_mapping_wins() {
        let snapshot = Snapshot::from_json_str(
            r#"{"intent_mappings": [
                {"intent_key": "greeting", "agent_key": "greeting_agent"},
                {"intent_key": "greeting", "domain_key": "credit", "agent_key": "credit_agent"}
            ]}"#,
        )
        .expect("snapshot should parse");

        let mapping = snapshot.mapping_for("credit", "greeting").expect("mapping");
        assert_eq!(mapping.agent_key, "greeting_agent");
    }

    #[test]
    fn reports_malformed_json() {
        let error = Snapshot::from_json_str("{\"domains\": 3}").expect_err("should fail");
        assert!(error.to_string().contains("snapshot"));
    }
}
