use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::status::IntentStatus;
use crate::model::{Agent, BypassRule, Domain, Intent, IntentAgentMapping, KeywordMapping};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntentFlowFilter {
    pub domain_key: Option<String>,
    pub enabled_only: bool,
    pub search: Option<String>,
    pub status: Option<IntentStatus>,
    /// When false, disabled domains, agents, mappings and keywords are hidden.
    pub show_disabled: bool,
}

impl Default for IntentFlowFilter {
    fn default() -> Self {
        Self {
            domain_key: None,
            enabled_only: false,
            search: None,
            status: None,
            show_disabled: true,
        }
    }
}

impl IntentFlowFilter {
    pub fn accepts_domain(&self, domain: &Domain) -> bool {
        if let Some(key) = &self.domain_key {
            if &domain.key != key {
                return false;
            }
        }
        self.show_disabled || domain.enabled
    }

    pub fn accepts_intent(&self, intent: &Intent, status: IntentStatus) -> bool {
        if self.enabled_only && !intent.enabled {
            return false;
        }
        if let Some(wanted) = self.status {
            if wanted != status {
                return false;
            }
        }
        match normalized_search(self.search.as_deref()) {
            Some(needle) => {
                contains_folded(&intent.key, &needle) || contains_folded(&intent.name, &needle)
            }
            None => true,
        }
    }

    pub fn accepts_mapping(&self, mapping: &IntentAgentMapping) -> bool {
        self.show_disabled || mapping.enabled
    }

    pub fn accepts_agent(&self, agent: &Agent) -> bool {
        self.show_disabled || agent.enabled
    }

    pub fn accepts_keyword(&self, keyword: &KeywordMapping) -> bool {
        self.show_disabled || keyword.enabled
    }

    /// Whether the filter can drop intents, in which case empty domains are hidden.
    pub fn narrows_intents(&self) -> bool {
        self.enabled_only
            || self.status.is_some()
            || normalized_search(self.search.as_deref()).is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoutingFlowFilter {
    pub show_disabled: bool,
    pub search: Option<String>,
    /// Domain groups whose agents are drawn; all others stay collapsed.
    pub expanded_domains: BTreeSet<String>,
}

impl Default for RoutingFlowFilter {
    fn default() -> Self {
        Self {
            show_disabled: true,
            search: None,
            expanded_domains: BTreeSet::new(),
        }
    }
}

impl RoutingFlowFilter {
    pub fn is_expanded(&self, domain_key: &str) -> bool {
        self.expanded_domains.contains(domain_key)
    }

    pub fn accepts_rule(&self, rule: &BypassRule) -> bool {
        if !self.show_disabled && !rule.enabled {
            return false;
        }
        match normalized_search(self.search.as_deref()) {
            Some(needle) => {
                contains_folded(&rule.name, &needle) || contains_folded(&rule.id, &needle)
            }
            None => true,
        }
    }

    pub fn accepts_agent(&self, agent: &Agent) -> bool {
        if !self.show_disabled && !agent.enabled {
            return false;
        }
        match normalized_search(self.search.as_deref()) {
            Some(needle) => {
                contains_folded(&agent.key, &needle)
                    || contains_folded(&agent.display_name, &needle)
            }
            None => true,
        }
    }

    pub fn accepts_domain(&self, domain: &Domain) -> bool {
        self.show_disabled || domain.enabled
    }
}

fn normalized_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::{IntentFlowFilter, RoutingFlowFilter};
    use crate::layout::IntentStatus;
    use crate::model::{Agent, Intent};

    fn intent(key: &str, name: &str, enabled: bool) -> Intent {
        Intent {
            key: key.to_owned(),
            name: name.to_owned(),
            enabled,
            ..Intent::default()
        }
    }

    #[test]
    fn search_matches_key_or_name_case_insensitively() {
        let filter = IntentFlowFilter {
            search: Some("  DEUDA ".to_owned()),
            ..IntentFlowFilter::default()
        };
        let debt = intent("debt_query", "Consulta de deuda", true);
        let greeting = intent("greeting", "Saludo", true);
        assert!(filter.accepts_intent(&debt, IntentStatus::Active));
        assert!(!filter.accepts_intent(&greeting, IntentStatus::Unused));
        assert!(filter.narrows_intents());
    }

    #[test]
    fn blank_search_does_not_narrow() {
        let filter = IntentFlowFilter {
            search: Some("   ".to_owned()),
            ..IntentFlowFilter::default()
        };
        assert!(!filter.narrows_intents());
        let greeting = intent("greeting", "Saludo", true);
        assert!(filter.accepts_intent(&greeting, IntentStatus::Unused));
    }

    #[test]
    fn enabled_only_and_status_combine() {
        let filter = IntentFlowFilter {
            enabled_only: true,
            status: Some(IntentStatus::Unused),
            ..IntentFlowFilter::default()
        };
        assert!(!filter.accepts_intent(&intent("a", "a", false), IntentStatus::Idle));
        assert!(!filter.accepts_intent(&intent("b", "b", true), IntentStatus::Active));
        assert!(filter.accepts_intent(&intent("c", "c", true), IntentStatus::Unused));
    }

    #[test]
    fn routing_filter_hides_disabled_agents() {
        let filter = RoutingFlowFilter {
            show_disabled: false,
            ..RoutingFlowFilter::default()
        };
        let agent = Agent {
            key: "credit_agent".to_owned(),
            enabled: false,
            ..Agent::default()
        };
        assert!(!filter.accepts_agent(&agent));
        assert!(RoutingFlowFilter::default().accepts_agent(&agent));
    }
}
