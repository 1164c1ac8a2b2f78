use std::collections::{BTreeMap, BTreeSet};

use super::constants::LayoutConstants;
use super::filter::RoutingFlowFilter;
use crate::graph::ids::{
    agent_node_id, bypass_rule_node_id, domain_group_node_id, END_ID, MESSAGE_INPUT_ID,
    ORCHESTRATOR_ID, SUPERVISOR_ID,
};
use crate::graph::{
    AgentNodeData, BypassRuleNodeData, DomainGroupNodeData, EdgeKind, FlowGraph, GraphEdge,
    LabelNodeData, NodeKind, NodePayload, Position,
};
use crate::model::{Agent, BypassRule, Snapshot};

const INPUT_COLUMN: usize = 0;
const BYPASS_COLUMN: usize = 1;
const ORCHESTRATOR_COLUMN: usize = 2;
const GROUP_COLUMN: usize = 3;
const AGENT_COLUMN: usize = 4;
const SUPERVISOR_COLUMN: usize = 5;
const END_COLUMN: usize = 6;

/// Group for agents without a known domain.
pub const GLOBAL_GROUP_KEY: &str = "global";

struct AgentGroup<'a> {
    key: String,
    label: String,
    color: Option<String>,
    enabled: bool,
    agents: Vec<&'a Agent>,
}

/// Bypass rules that pass the filter, highest priority first.
pub fn ordered_bypass_rules<'a>(
    rules: &'a [BypassRule],
    filter: &RoutingFlowFilter,
) -> Vec<&'a BypassRule> {
    let mut ordered = rules
        .iter()
        .filter(|rule| filter.accepts_rule(rule))
        .collect::<Vec<_>>();
    ordered.sort_by(|left, right| right.priority.cmp(&left.priority));
    ordered
}

/// Lays out message-input → bypass-rules → orchestrator → domain-group → agent →
/// supervisor → end.
pub fn build_routing_flow(
    snapshot: &Snapshot,
    filter: &RoutingFlowFilter,
    layout: &LayoutConstants,
) -> FlowGraph {
    let mut graph = FlowGraph::default();

    graph.push_node(
        MESSAGE_INPUT_ID.to_owned(),
        NodeKind::MessageInput,
        Position::new(layout.column_x(INPUT_COLUMN), layout.start_y),
        label("Incoming message"),
    );

    let rules = ordered_bypass_rules(&snapshot.bypass_rules, filter);
    let mut rule_cursor = layout.cursor();
    for rule in &rules {
        let rule_id = bypass_rule_node_id(&rule.id);
        graph.push_node(
            rule_id.clone(),
            NodeKind::BypassRule,
            Position::new(layout.column_x(BYPASS_COLUMN), rule_cursor.take_row()),
            NodePayload::BypassRule(BypassRuleNodeData {
                id: rule.id.clone(),
                name: rule.name.clone(),
                rule_type: rule.rule_type.as_str().to_owned(),
                priority: rule.priority,
                enabled: rule.enabled,
                target_agent: rule.target_agent.clone(),
            }),
        );
        graph.push_edge(GraphEdge::new(
            MESSAGE_INPUT_ID,
            &rule_id,
            EdgeKind::InputBypass,
            rule.enabled,
        ));
    }

    graph.push_node(
        ORCHESTRATOR_ID.to_owned(),
        NodeKind::Orchestrator,
        Position::new(layout.column_x(ORCHESTRATOR_COLUMN), layout.start_y),
        label("Orchestrator"),
    );
    graph.push_edge(GraphEdge::new(
        MESSAGE_INPUT_ID,
        ORCHESTRATOR_ID,
        EdgeKind::InputOrchestrator,
        true,
    ));
    graph.push_node(
        SUPERVISOR_ID.to_owned(),
        NodeKind::Supervisor,
        Position::new(layout.column_x(SUPERVISOR_COLUMN), layout.start_y),
        label("Supervisor"),
    );

    // agent key -> node that bypass edges should land on
    let mut bypass_targets = BTreeMap::<&str, (String, bool)>::new();
    let mut group_cursor = layout.cursor();
    let mut agent_cursor = layout.cursor();

    for group in collect_groups(snapshot, filter) {
        let row = group_cursor.peek().max(agent_cursor.peek());
        group_cursor.align_to(row);
        agent_cursor.align_to(row);

        let expanded = filter.is_expanded(&group.key);
        let enabled_agents = group.agents.iter().filter(|agent| agent.enabled).count();
        let group_id = domain_group_node_id(&group.key);
        graph.push_node(
            group_id.clone(),
            NodeKind::DomainGroup,
            Position::new(layout.column_x(GROUP_COLUMN), group_cursor.take_row()),
            NodePayload::DomainGroup(DomainGroupNodeData {
                key: group.key.clone(),
                label: group.label.clone(),
                color: group.color.clone(),
                collapsed: !expanded,
                agent_count: group.agents.len(),
                enabled_agent_count: enabled_agents,
            }),
        );
        graph.push_edge(GraphEdge::new(
            ORCHESTRATOR_ID,
            &group_id,
            EdgeKind::OrchestratorDomain,
            group.enabled,
        ));

        if expanded {
            for &agent in &group.agents {
                let agent_id = agent_node_id(&agent.key);
                graph.push_node(
                    agent_id.clone(),
                    NodeKind::Agent,
                    Position::new(layout.column_x(AGENT_COLUMN), agent_cursor.take_row()),
                    NodePayload::Agent(AgentNodeData {
                        key: agent.key.clone(),
                        label: agent.label().to_owned(),
                        is_flow_agent: agent.is_flow_agent,
                        enabled: agent.enabled,
                        mapping_count: 0,
                        keyword_count: snapshot
                            .keywords_for(&agent.key)
                            .filter(|keyword| filter.show_disabled || keyword.enabled)
                            .count(),
                    }),
                );
                graph.push_edge(GraphEdge::new(
                    &group_id,
                    &agent_id,
                    EdgeKind::DomainAgent,
                    group.enabled && agent.enabled,
                ));
                graph.push_edge(GraphEdge::new(
                    &agent_id,
                    SUPERVISOR_ID,
                    EdgeKind::AgentSupervisor,
                    agent.enabled,
                ));
                bypass_targets.insert(agent.key.as_str(), (agent_id, agent.enabled));
            }
        } else {
            graph.push_edge(GraphEdge::new(
                &group_id,
                SUPERVISOR_ID,
                EdgeKind::GroupSupervisor,
                group.enabled && enabled_agents > 0,
            ));
            for &agent in &group.agents {
                bypass_targets.insert(agent.key.as_str(), (group_id.clone(), agent.enabled));
            }
        }

        group_cursor.skip(layout.group_gap);
        agent_cursor.skip(layout.group_gap);
    }

    graph.push_node(
        END_ID.to_owned(),
        NodeKind::End,
        Position::new(layout.column_x(END_COLUMN), layout.start_y),
        label("End"),
    );
    graph.push_edge(GraphEdge::new(
        SUPERVISOR_ID,
        END_ID,
        EdgeKind::SupervisorEnd,
        true,
    ));

    for rule in &rules {
        let Some((target, agent_enabled)) = bypass_targets.get(rule.target_agent.as_str()) else {
            tracing::debug!(
                rule = %rule.id,
                agent = %rule.target_agent,
                "bypass target is missing or hidden; skipping edge"
            );
            continue;
        };
        graph.push_edge(
            GraphEdge::new(
                &bypass_rule_node_id(&rule.id),
                target,
                EdgeKind::BypassAgent,
                rule.enabled && *agent_enabled,
            )
            .with_label(format!("priority {}", rule.priority)),
        );
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        rules = rules.len(),
        "built routing flow"
    );
    graph
}

fn collect_groups<'a>(
    snapshot: &'a Snapshot,
    filter: &RoutingFlowFilter,
) -> Vec<AgentGroup<'a>> {
    let mut groups = snapshot
        .domains
        .iter()
        .filter(|domain| filter.accepts_domain(domain))
        .map(|domain| AgentGroup {
            key: domain.key.clone(),
            label: domain.label().to_owned(),
            color: domain.color.clone(),
            enabled: domain.enabled,
            agents: Vec::new(),
        })
        .collect::<Vec<_>>();
    let mut global = AgentGroup {
        key: GLOBAL_GROUP_KEY.to_owned(),
        label: "Global".to_owned(),
        color: None,
        enabled: true,
        agents: Vec::new(),
    };

    let mut seen = BTreeSet::new();
    for agent in &snapshot.agents {
        if !seen.insert(agent.key.as_str()) || !filter.accepts_agent(agent) {
            continue;
        }
        match agent.domain_key.as_deref() {
            Some(domain_key) if snapshot.domain(domain_key).is_some() => {
                // Agents of a hidden domain are hidden with it.
                if let Some(group) = groups.iter_mut().find(|group| group.key == domain_key) {
                    group.agents.push(agent);
                }
            }
            _ => global.agents.push(agent),
        }
    }

    // A real domain keyed `global` absorbs the agents without a domain.
    match groups.iter_mut().find(|group| group.key == GLOBAL_GROUP_KEY) {
        Some(group) => group.agents.extend(global.agents),
        None => groups.push(global),
    }
    groups.retain(|group| !group.agents.is_empty());
    groups
}

fn label(text: &str) -> NodePayload {
    NodePayload::Label(LabelNodeData {
        label: text.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::{build_routing_flow, ordered_bypass_rules, GLOBAL_GROUP_KEY};
    use crate::graph::{EdgeKind, FlowGraph, NodeKind};
    use crate::layout::{LayoutConstants, RoutingFlowFilter};
    use crate::model::Snapshot;
    use crate::test_fixtures::{agent, domain, multi_domain_snapshot};

    fn build(snapshot: &Snapshot, filter: &RoutingFlowFilter) -> FlowGraph {
        build_routing_flow(snapshot, filter, &LayoutConstants::routing_flow())
    }

    fn expanded(keys: &[&str]) -> RoutingFlowFilter {
        RoutingFlowFilter {
            expanded_domains: keys.iter().map(|key| (*key).to_owned()).collect(),
            ..RoutingFlowFilter::default()
        }
    }

    #[test]
    fn bypass_rules_are_ordered_by_priority_descending() {
        let snapshot = multi_domain_snapshot();
        let ordered = ordered_bypass_rules(&snapshot.bypass_rules, &RoutingFlowFilter::default())
            .into_iter()
            .map(|rule| rule.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ordered, vec!["r-ghost", "r-list", "r-pattern", "r-did"]);

        let graph = build(&snapshot, &RoutingFlowFilter::default());
        let ys = graph
            .nodes_of_kind(NodeKind::BypassRule)
            .map(|node| node.position.y)
            .collect::<Vec<_>>();
        assert_eq!(ys, vec![0.0, 90.0, 180.0, 270.0]);
    }

    #[test]
    fn collapsed_groups_hide_agents_and_absorb_bypass_edges() {
        let graph = build(&multi_domain_snapshot(), &RoutingFlowFilter::default());

        assert_eq!(graph.nodes_of_kind(NodeKind::Agent).count(), 0);
        let pharmacy = graph
            .node("domain-group-pharmacy")
            .and_then(|node| node.data.as_domain_group())
            .expect("pharmacy group");
        assert!(pharmacy.collapsed);
        assert_eq!(pharmacy.agent_count, 1);

        assert!(graph
            .edge("e-bypass-r-pattern-domain-group-pharmacy")
            .is_some());
        assert!(graph
            .edge("e-domain-group-pharmacy-supervisor")
            .is_some_and(|edge| edge.kind == EdgeKind::GroupSupervisor));
        assert!(graph
            .edges_of_kind(EdgeKind::BypassAgent)
            .all(|edge| edge.source != "bypass-r-ghost"));
        assert!(graph.dangling_edges().is_empty());
    }

    #[test]
    fn expanded_group_draws_agents_between_group_and_supervisor() {
        let graph = build(&multi_domain_snapshot(), &expanded(&["pharmacy"]));

        assert!(graph.contains_node("agent-pharmacy_operations_agent"));
        assert!(graph
            .edge("e-domain-group-pharmacy-agent-pharmacy_operations_agent")
            .is_some());
        assert!(graph
            .edge("e-agent-pharmacy_operations_agent-supervisor")
            .is_some());
        let bypass = graph
            .edge("e-bypass-r-pattern-agent-pharmacy_operations_agent")
            .expect("bypass edge to expanded agent");
        assert_eq!(bypass.label.as_deref(), Some("priority 10"));
        assert!(bypass.animated);
        assert!(!graph.contains_node("agent-credit_agent"));
        assert!(graph.dangling_edges().is_empty());
    }

    #[test]
    fn agents_without_domain_land_in_global_group() {
        let graph = build(&multi_domain_snapshot(), &expanded(&[GLOBAL_GROUP_KEY]));

        let global = graph
            .node("domain-group-global")
            .and_then(|node| node.data.as_domain_group())
            .expect("global group");
        assert_eq!(global.agent_count, 1);
        assert!(graph.contains_node("agent-greeting_agent"));
        assert!(graph
            .edge("e-bypass-r-did-agent-greeting_agent")
            .is_some());
    }

    #[test]
    fn hiding_disabled_drops_rules_agents_and_empty_groups() {
        let filter = RoutingFlowFilter {
            show_disabled: false,
            ..expanded(&["pharmacy", "credit", "ecommerce", GLOBAL_GROUP_KEY])
        };
        let graph = build(&multi_domain_snapshot(), &filter);

        assert!(!graph.contains_node("bypass-r-ghost"));
        assert!(!graph.contains_node("agent-product_agent"));
        assert!(!graph.contains_node("domain-group-ecommerce"));
        assert!(graph.dangling_edges().is_empty());
    }

    #[test]
    fn disabled_agent_group_edges_are_dashed() {
        let graph = build(&multi_domain_snapshot(), &expanded(&["ecommerce"]));

        let to_group = graph
            .edge("e-orchestrator-domain-group-ecommerce")
            .expect("orchestrator edge");
        assert!(!to_group.animated);
        let to_agent = graph
            .edge("e-domain-group-ecommerce-agent-product_agent")
            .expect("group edge");
        assert!(to_agent.style.stroke_dasharray.is_some());
    }

    #[test]
    fn expanded_groups_do_not_overlap() {
        let graph = build(&multi_domain_snapshot(), &expanded(&["pharmacy", "credit"]));
        let layout = LayoutConstants::routing_flow();

        let pharmacy = graph.node("domain-group-pharmacy").expect("pharmacy");
        let credit = graph.node("domain-group-credit").expect("credit");
        assert_eq!(pharmacy.position.y, layout.start_y);
        assert_eq!(
            credit.position.y,
            layout.start_y + layout.row_spacing + layout.group_gap
        );
        let credit_agent = graph.node("agent-credit_agent").expect("credit agent");
        assert_eq!(credit_agent.position.y, credit.position.y);
    }

    #[test]
    fn routing_flow_is_deterministic_and_closed() {
        let snapshot = multi_domain_snapshot();
        let filters = vec![
            RoutingFlowFilter::default(),
            expanded(&["pharmacy", "credit", "ecommerce", GLOBAL_GROUP_KEY]),
            RoutingFlowFilter {
                search: Some("credit".to_owned()),
                ..expanded(&["credit"])
            },
        ];
        let full_ids = build(
            &snapshot,
            &expanded(&["pharmacy", "credit", "ecommerce", GLOBAL_GROUP_KEY]),
        )
        .node_ids()
        .into_iter()
        .map(str::to_owned)
        .collect::<std::collections::BTreeSet<_>>();

        for filter in filters {
            let first = build(&snapshot, &filter);
            assert_eq!(first, build(&snapshot, &filter));
            assert!(first.dangling_edges().is_empty());
            assert!(first.duplicate_ids().is_empty(), "{filter:?}");
            assert!(first
                .node_ids()
                .iter()
                .all(|id| full_ids.contains(*id)));
        }
    }

    fn snapshot_with_real_global_domain() -> Snapshot {
        Snapshot {
            domains: vec![domain("global", Vec::new())],
            agents: vec![
                agent("scoped_agent", Some("global")),
                agent("loose_agent", None),
            ],
            ..Snapshot::default()
        }
    }

    #[test]
    fn domain_named_global_shares_the_implicit_group() {
        let snapshot = snapshot_with_real_global_domain();
        for filter in [RoutingFlowFilter::default(), expanded(&[GLOBAL_GROUP_KEY])] {
            let graph = build(&snapshot, &filter);
            assert!(graph.duplicate_ids().is_empty(), "{:?}", graph.duplicate_ids());
            assert_eq!(graph.nodes_of_kind(NodeKind::DomainGroup).count(), 1);
            assert_eq!(graph.edges_of_kind(EdgeKind::OrchestratorDomain).count(), 1);

            let group = graph
                .node("domain-group-global")
                .and_then(|node| node.data.as_domain_group())
                .expect("global group");
            assert_eq!(group.agent_count, 2);
        }

        let graph = build(&snapshot, &expanded(&[GLOBAL_GROUP_KEY]));
        assert!(graph.contains_node("agent-scoped_agent"));
        assert!(graph.contains_node("agent-loose_agent"));
    }

    #[test]
    fn keyword_count_respects_hidden_disabled_keywords() {
        let snapshot = multi_domain_snapshot();
        let count = |show_disabled: bool| {
            let filter = RoutingFlowFilter {
                show_disabled,
                ..expanded(&["pharmacy"])
            };
            build(&snapshot, &filter)
                .node("agent-pharmacy_operations_agent")
                .and_then(|node| node.data.as_agent())
                .map(|agent| agent.keyword_count)
                .expect("pharmacy agent")
        };
        assert_eq!(count(true), 2);
        assert_eq!(count(false), 1);
    }
}
