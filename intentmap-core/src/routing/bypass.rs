use regex::Regex;
use serde::Serialize;

use crate::layout::{ordered_bypass_rules, RoutingFlowFilter};
use crate::model::{BypassRule, BypassRuleType};

/// Incoming message identity as the webhook sees it.
#[derive(Debug, Clone, Default)]
pub struct InboundMessage<'a> {
    pub phone_number: Option<&'a str>,
    /// WhatsApp business phone-number id (DID) the message arrived on.
    pub phone_number_id: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BypassMatch<'a> {
    pub rule: &'a BypassRule,
    pub target_agent: &'a str,
}

/// First enabled rule, by descending priority, that matches the message.
pub fn evaluate_bypass<'a>(
    rules: &'a [BypassRule],
    message: &InboundMessage<'_>,
) -> Option<BypassMatch<'a>> {
    let enabled_only = RoutingFlowFilter {
        show_disabled: false,
        ..RoutingFlowFilter::default()
    };

    ordered_bypass_rules(rules, &enabled_only)
        .into_iter()
        .find(|rule| rule_matches(rule, message))
        .map(|rule| BypassMatch {
            rule,
            target_agent: rule.target_agent.as_str(),
        })
}

pub fn rule_matches(rule: &BypassRule, message: &InboundMessage<'_>) -> bool {
    match rule.rule_type {
        BypassRuleType::PhoneNumber => {
            let (Some(pattern), Some(phone)) = (rule.pattern.as_deref(), message.phone_number)
            else {
                return false;
            };
            match compile_pattern(pattern) {
                Some(regex) => regex.is_match(&digits(phone)),
                None => {
                    tracing::warn!(
                        rule = %rule.id,
                        pattern,
                        "skipping bypass rule with invalid pattern"
                    );
                    false
                }
            }
        }
        BypassRuleType::PhoneNumberList => {
            let Some(phone) = message.phone_number else {
                return false;
            };
            let wanted = digits(phone);
            !wanted.is_empty()
                && rule
                    .phone_numbers
                    .iter()
                    .any(|listed| digits(listed) == wanted)
        }
        BypassRuleType::WhatsappPhoneNumberId => {
            match (rule.phone_number_id.as_deref(), message.phone_number_id) {
                (Some(expected), Some(actual)) => expected.trim() == actual.trim(),
                _ => false,
            }
        }
    }
}

/// Turns a `*`-wildcard phone pattern into an anchored regex over digits.
fn compile_pattern(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(|segment| regex::escape(&digits(segment)))
        .collect::<Vec<_>>()
        .join(".*");
    if body.is_empty() {
        return None;
    }
    Regex::new(&format!("^{body}$")).ok()
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
