use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Domain {
    pub key: String,
    pub display_name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub enabled: bool,
    pub intents: Vec<Intent>,
}

impl Default for Domain {
    fn default() -> Self {
        Self {
            key: String::new(),
            display_name: String::new(),
            description: None,
            color: None,
            icon: None,
            enabled: true,
            intents: Vec::new(),
        }
    }
}

impl Domain {
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.key
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Intent {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub priority: i32,
    pub lemma_count: u32,
    pub keyword_count: u32,
    pub phrase_count: u32,
    pub confirmation_pattern_count: u32,
}

impl Default for Intent {
    fn default() -> Self {
        Self {
            key: String::new(),
            name: String::new(),
            description: None,
            enabled: true,
            priority: 0,
            lemma_count: 0,
            keyword_count: 0,
            phrase_count: 0,
            confirmation_pattern_count: 0,
        }
    }
}

impl Intent {
    pub fn total_patterns(&self) -> u32 {
        self.lemma_count
            .saturating_add(self.keyword_count)
            .saturating_add(self.phrase_count)
            .saturating_add(self.confirmation_pattern_count)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntentAgentMapping {
    pub intent_key: String,
    /// `None` applies the mapping to the intent in every domain.
    pub domain_key: Option<String>,
    pub agent_key: String,
    pub enabled: bool,
    pub confidence_threshold: f64,
}

impl Default for IntentAgentMapping {
    fn default() -> Self {
        Self {
            intent_key: String::new(),
            domain_key: None,
            agent_key: String::new(),
            enabled: true,
            confidence_threshold: 0.75,
        }
    }
}

impl IntentAgentMapping {
    pub fn applies_to(&self, domain_key: &str, intent_key: &str) -> bool {
        self.intent_key == intent_key
            && self
                .domain_key
                .as_deref()
                .map_or(true, |domain| domain == domain_key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Agent {
    pub key: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_flow_agent: bool,
    pub enabled: bool,
    pub domain_key: Option<String>,
    pub priority: i32,
}

impl Default for Agent {
    fn default() -> Self {
        Self {
            key: String::new(),
            display_name: String::new(),
            description: None,
            is_flow_agent: false,
            enabled: true,
            domain_key: None,
            priority: 0,
        }
    }
}

impl Agent {
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.key
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeywordMapping {
    pub keyword: String,
    pub agent_key: String,
    pub enabled: bool,
    pub priority: i32,
}

impl Default for KeywordMapping {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            agent_key: String::new(),
            enabled: true,
            priority: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BypassRuleType {
    #[default]
    PhoneNumber,
    PhoneNumberList,
    WhatsappPhoneNumberId,
}

impl BypassRuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PhoneNumber => "phone_number",
            Self::PhoneNumberList => "phone_number_list",
            Self::WhatsappPhoneNumberId => "whatsapp_phone_number_id",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BypassRule {
    pub id: String,
    pub name: String,
    pub rule_type: BypassRuleType,
    /// Digits with `*` wildcards, used by `phone_number` rules.
    pub pattern: Option<String>,
    pub phone_numbers: Vec<String>,
    pub phone_number_id: Option<String>,
    pub priority: i32,
    pub enabled: bool,
    pub target_agent: String,
    pub target_domain: Option<String>,
}

impl Default for BypassRule {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            rule_type: BypassRuleType::PhoneNumber,
            pattern: None,
            phone_numbers: Vec::new(),
            phone_number_id: None,
            priority: 0,
            enabled: true,
            target_agent: String::new(),
            target_domain: None,
        }
    }
}
