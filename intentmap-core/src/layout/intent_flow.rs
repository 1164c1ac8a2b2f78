use std::collections::BTreeMap;

use super::constants::LayoutConstants;
use super::filter::IntentFlowFilter;
use super::status::IntentStatus;
use crate::graph::ids::{agent_node_id, domain_node_id, intent_node_id, keyword_group_node_id};
use crate::graph::{
    AgentNodeData, DomainNodeData, EdgeKind, FlowGraph, GraphEdge, IntentNodeData,
    KeywordGroupNodeData, NodeKind, NodePayload, Position,
};
use crate::model::{Intent, IntentAgentMapping, Snapshot};

const DOMAIN_COLUMN: usize = 0;
const INTENT_COLUMN: usize = 1;
const AGENT_COLUMN: usize = 2;
const KEYWORD_COLUMN: usize = 3;

struct VisibleIntent<'a> {
    intent: &'a Intent,
    status: IntentStatus,
    mapping: Option<&'a IntentAgentMapping>,
}

/// Agent nodes shared by several intents; counts accumulate until the walk ends.
struct AgentSlot {
    y: f64,
    mapping_count: usize,
}

/// Lays out domain → intent → agent → keyword-group columns.
pub fn build_intent_flow(
    snapshot: &Snapshot,
    filter: &IntentFlowFilter,
    layout: &LayoutConstants,
) -> FlowGraph {
    let mut graph = FlowGraph::default();
    let mut group_cursor = layout.cursor();
    let mut agent_cursor = layout.cursor();
    let mut agent_slots = BTreeMap::<String, AgentSlot>::new();
    let mut agent_order = Vec::<String>::new();

    for domain in snapshot
        .domains
        .iter()
        .filter(|domain| filter.accepts_domain(domain))
    {
        let visible = domain
            .intents
            .iter()
            .filter_map(|intent| {
                let mapping = snapshot.mapping_for(&domain.key, &intent.key);
                let status = IntentStatus::derive(intent.enabled, mapping.map(|m| m.enabled));
                filter
                    .accepts_intent(intent, status)
                    .then_some(VisibleIntent {
                        intent,
                        status,
                        mapping,
                    })
            })
            .collect::<Vec<_>>();

        if visible.is_empty() && filter.narrows_intents() {
            continue;
        }

        let domain_id = domain_node_id(&domain.key);
        graph.push_node(
            domain_id.clone(),
            NodeKind::Domain,
            Position::new(layout.column_x(DOMAIN_COLUMN), group_cursor.peek()),
            NodePayload::Domain(DomainNodeData {
                key: domain.key.clone(),
                label: domain.label().to_owned(),
                color: domain.color.clone(),
                enabled: domain.enabled,
                intent_count: visible.len(),
                active_intent_count: visible
                    .iter()
                    .filter(|entry| entry.status == IntentStatus::Active)
                    .count(),
            }),
        );

        for entry in &visible {
            let intent = entry.intent;
            let intent_id = intent_node_id(&domain.key, &intent.key);
            graph.push_node(
                intent_id.clone(),
                NodeKind::Intent,
                Position::new(layout.column_x(INTENT_COLUMN), group_cursor.take_row()),
                NodePayload::Intent(IntentNodeData {
                    key: intent.key.clone(),
                    name: intent.name.clone(),
                    domain_key: domain.key.clone(),
                    enabled: intent.enabled,
                    status: entry.status,
                    agent_key: entry.mapping.map(|mapping| mapping.agent_key.clone()),
                    lemma_count: intent.lemma_count,
                    keyword_count: intent.keyword_count,
                    phrase_count: intent.phrase_count,
                    confirmation_pattern_count: intent.confirmation_pattern_count,
                    total_patterns: intent.total_patterns(),
                }),
            );
            graph.push_edge(GraphEdge::new(
                &domain_id,
                &intent_id,
                EdgeKind::DomainIntent,
                intent.enabled,
            ));

            let Some(mapping) = entry
                .mapping
                .filter(|mapping| filter.accepts_mapping(mapping))
            else {
                continue;
            };
            let Some(agent) = snapshot
                .agent(&mapping.agent_key)
                .filter(|agent| filter.accepts_agent(agent))
            else {
                tracing::debug!(
                    intent = %intent_id,
                    agent = %mapping.agent_key,
                    "mapped agent is missing or hidden; skipping edge"
                );
                continue;
            };

            let slot = agent_slots.entry(agent.key.clone()).or_insert_with(|| {
                agent_order.push(agent.key.clone());
                AgentSlot {
                    y: agent_cursor.take_row(),
                    mapping_count: 0,
                }
            });
            slot.mapping_count += 1;

            graph.push_edge(GraphEdge::new(
                &intent_id,
                &agent_node_id(&agent.key),
                EdgeKind::IntentAgent,
                intent.enabled && mapping.enabled && agent.enabled,
            ));
        }

        if visible.is_empty() {
            group_cursor.take_row();
        }
        group_cursor.skip(layout.group_gap);
    }

    for agent_key in &agent_order {
        let (Some(slot), Some(agent)) = (agent_slots.get(agent_key), snapshot.agent(agent_key))
        else {
            continue;
        };
        let keywords = snapshot
            .keywords_for(agent_key)
            .filter(|keyword| filter.accepts_keyword(keyword))
            .collect::<Vec<_>>();

        let agent_id = agent_node_id(agent_key);
        graph.push_node(
            agent_id.clone(),
            NodeKind::Agent,
            Position::new(layout.column_x(AGENT_COLUMN), slot.y),
            NodePayload::Agent(AgentNodeData {
                key: agent.key.clone(),
                label: agent.label().to_owned(),
                is_flow_agent: agent.is_flow_agent,
                enabled: agent.enabled,
                mapping_count: slot.mapping_count,
                keyword_count: keywords.len(),
            }),
        );

        if keywords.is_empty() {
            continue;
        }

        let keywords_id = keyword_group_node_id(agent_key);
        graph.push_node(
            keywords_id.clone(),
            NodeKind::KeywordGroup,
            Position::new(layout.column_x(KEYWORD_COLUMN), slot.y),
            NodePayload::KeywordGroup(KeywordGroupNodeData {
                agent_key: agent_key.clone(),
                keywords: keywords
                    .iter()
                    .map(|keyword| keyword.keyword.clone())
                    .collect(),
                total_count: keywords.len(),
                enabled_count: keywords.iter().filter(|keyword| keyword.enabled).count(),
            }),
        );
        graph.push_edge(GraphEdge::new(
            &agent_id,
            &keywords_id,
            EdgeKind::AgentKeywords,
            agent.enabled,
        ));
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        agents = agent_order.len(),
        "built intent flow"
    );
    graph
}
