use crate::model::{
    Agent, BypassRule, BypassRuleType, Domain, Intent, IntentAgentMapping, KeywordMapping,
    Snapshot,
};

pub(crate) fn intent(key: &str, enabled: bool) -> Intent {
    Intent {
        key: key.to_owned(),
        name: key.replace('_', " "),
        enabled,
        lemma_count: 3,
        keyword_count: 2,
        phrase_count: 1,
        ..Intent::default()
    }
}

pub(crate) fn domain(key: &str, intents: Vec<Intent>) -> Domain {
    Domain {
        key: key.to_owned(),
        display_name: key.to_uppercase(),
        intents,
        ..Domain::default()
    }
}

pub(crate) fn agent(key: &str, domain_key: Option<&str>) -> Agent {
    Agent {
        key: key.to_owned(),
        display_name: key.replace('_', " "),
        domain_key: domain_key.map(str::to_owned),
        ..Agent::default()
    }
}

pub(crate) fn mapping(intent_key: &str, agent_key: &str, enabled: bool) -> IntentAgentMapping {
    IntentAgentMapping {
        intent_key: intent_key.to_owned(),
        agent_key: agent_key.to_owned(),
        enabled,
        ..IntentAgentMapping::default()
    }
}

pub(crate) fn keyword(keyword: &str, agent_key: &str, enabled: bool) -> KeywordMapping {
    KeywordMapping {
        keyword: keyword.to_owned(),
        agent_key: agent_key.to_owned(),
        enabled,
        ..KeywordMapping::default()
    }
}

/// One pharmacy domain: `debt_query` mapped to the operations agent, `greeting` unmapped.
pub(crate) fn pharmacy_snapshot() -> Snapshot {
    Snapshot {
        domains: vec![domain(
            "pharmacy",
            vec![intent("debt_query", true), intent("greeting", true)],
        )],
        agents: vec![agent("pharmacy_operations_agent", Some("pharmacy"))],
        intent_mappings: vec![mapping("debt_query", "pharmacy_operations_agent", true)],
        ..Snapshot::default()
    }
}

pub(crate) fn multi_domain_snapshot() -> Snapshot {
    let mut ecommerce = domain("ecommerce", vec![intent("product_search", true)]);
    ecommerce.enabled = false;

    let mut product_agent = agent("product_agent", Some("ecommerce"));
    product_agent.enabled = false;

    let mut pharmacy_agent = agent("pharmacy_operations_agent", Some("pharmacy"));
    pharmacy_agent.is_flow_agent = true;

    let mut scoped_greeting = mapping("greeting", "greeting_agent", true);
    scoped_greeting.domain_key = Some("credit".to_owned());

    Snapshot {
        domains: vec![
            domain(
                "pharmacy",
                vec![
                    intent("debt_query", true),
                    intent("greeting", true),
                    intent("invoice", true),
                    intent("refill", false),
                ],
            ),
            domain(
                "credit",
                vec![
                    intent("balance_inquiry", true),
                    intent("payment_plan", true),
                    intent("greeting", true),
                ],
            ),
            ecommerce,
        ],
        agents: vec![
            pharmacy_agent,
            agent("credit_agent", Some("credit")),
            agent("greeting_agent", None),
            product_agent,
        ],
        intent_mappings: vec![
            mapping("debt_query", "pharmacy_operations_agent", true),
            mapping("invoice", "pharmacy_operations_agent", true),
            mapping("refill", "pharmacy_operations_agent", true),
            mapping("balance_inquiry", "credit_agent", false),
            mapping("payment_plan", "ghost_agent", true),
            scoped_greeting,
            mapping("product_search", "product_agent", true),
        ],
        keyword_mappings: vec![
            keyword("deuda", "pharmacy_operations_agent", true),
            keyword("factura", "pharmacy_operations_agent", false),
            keyword("hola", "greeting_agent", true),
            keyword("saldo", "credit_agent", true),
            keyword("fantasma", "ghost_agent", true),
        ],
        bypass_rules: vec![
            BypassRule {
                id: "r-pattern".to_owned(),
                name: "San Juan numbers".to_owned(),
                rule_type: BypassRuleType::PhoneNumber,
                pattern: Some("549264*".to_owned()),
                priority: 10,
                target_agent: "pharmacy_operations_agent".to_owned(),
                ..BypassRule::default()
            },
            BypassRule {
                id: "r-list".to_owned(),
                name: "QA testers".to_owned(),
                rule_type: BypassRuleType::PhoneNumberList,
                phone_numbers: vec!["+54 9 11 0000-0000".to_owned()],
                priority: 50,
                target_agent: "credit_agent".to_owned(),
                ..BypassRule::default()
            },
            BypassRule {
                id: "r-did".to_owned(),
                name: "Greeting line".to_owned(),
                rule_type: BypassRuleType::WhatsappPhoneNumberId,
                phone_number_id: Some("123456789".to_owned()),
                priority: 5,
                target_agent: "greeting_agent".to_owned(),
                ..BypassRule::default()
            },
            BypassRule {
                id: "r-ghost".to_owned(),
                name: "Retired rule".to_owned(),
                rule_type: BypassRuleType::PhoneNumber,
                pattern: Some("*".to_owned()),
                priority: 100,
                enabled: false,
                target_agent: "ghost_agent".to_owned(),
                ..BypassRule::default()
            },
        ],
    }
}
