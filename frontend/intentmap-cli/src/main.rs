mod cli;
mod renderer;

use std::path::Path;

use intentmap_core::graph::connected_path;
use intentmap_core::layout::{IntentFlowFilter, IntentStatus, RoutingFlowFilter};
use intentmap_core::model::load_snapshot;
use intentmap_core::routing::{evaluate_bypass, InboundMessage};
use intentmap_core::workflows::{export_to_json, import_workflow};
use intentmap_core::{FlowGraph, IntentMap};

use cli::{Command, GraphView, WorkflowCommand};
use renderer::Renderer;

fn main() {
    if let Err(error) = run() {
        eprintln!("intentmap failed: {error}");
        std::process::exit(1);
    }
}

fn run() -> intentmap_core::Result<()> {
    let args = cli::Cli::parse_args();
    let mut config = intentmap_core::config::load(args.config.as_deref())?;
    if let Some(level) = args.log_level.as_deref() {
        config.logging.level = level.to_owned();
    }
    intentmap_core::logging::init_tracing(&config.logging);

    if let Command::ValidateConfig = args.command {
        intentmap_core::config::validate_config(&config)?;
        println!("Config is valid.");
        return Ok(());
    }

    let app = IntentMap::new(config)?;
    let renderer = Renderer::new(args.format);
    let output = execute(&app, &renderer, args.command)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn execute(
    app: &IntentMap,
    renderer: &Renderer,
    command: Command,
) -> intentmap_core::Result<String> {
    match command {
        Command::Intents {
            snapshot,
            domain,
            enabled_only,
            search,
            status,
            hide_disabled,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let filter = intent_filter(
                domain,
                enabled_only,
                search,
                status.as_deref(),
                hide_disabled,
            )?;
            renderer.graph(&app.intent_graph(&snapshot, &filter))
        }
        Command::Routing {
            snapshot,
            expand,
            search,
            hide_disabled,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let filter = routing_filter(expand, search, hide_disabled);
            renderer.graph(&app.routing_graph(&snapshot, &filter))
        }
        Command::Path {
            snapshot,
            node,
            view,
            domain,
            enabled_only,
            status,
            expand,
            search,
            hide_disabled,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let graph = match view {
                GraphView::Intent => {
                    let filter = intent_filter(
                        domain,
                        enabled_only,
                        search,
                        status.as_deref(),
                        hide_disabled,
                    )?;
                    app.intent_graph(&snapshot, &filter)
                }
                GraphView::Routing => {
                    let filter = routing_filter(expand, search, hide_disabled);
                    app.routing_graph(&snapshot, &filter)
                }
            };
            render_path(renderer, &graph, &node)
        }
        Command::Bypass {
            snapshot,
            phone,
            phone_number_id,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let message = InboundMessage {
                phone_number: phone.as_deref(),
                phone_number_id: phone_number_id.as_deref(),
            };
            let matched = evaluate_bypass(&snapshot.bypass_rules, &message);
            renderer.bypass(matched.as_ref())
        }
        Command::Workflow { command } => execute_workflow(app, renderer, command),
        Command::ValidateConfig => Ok(String::new()),
    }
}

fn execute_workflow(
    app: &IntentMap,
    renderer: &Renderer,
    command: WorkflowCommand,
) -> intentmap_core::Result<String> {
    match command {
        WorkflowCommand::Import { input } => {
            let editor = import_workflow(&read_file(&input)?)?;
            tracing::info!(workflow = %editor.meta().name, "workflow export is valid");
            renderer.graph(&editor.flow_graph())
        }
        WorkflowCommand::Export { input, output } => {
            let editor = import_workflow(&read_file(&input)?)?;
            let json = export_to_json(&app.export_workflow(&editor)?)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    tracing::info!(path = %path.display(), "wrote workflow export");
                    Ok(String::new())
                }
                None => Ok(json),
            }
        }
    }
}

fn intent_filter(
    domain: Option<String>,
    enabled_only: bool,
    search: Option<String>,
    status: Option<&str>,
    hide_disabled: bool,
) -> intentmap_core::Result<IntentFlowFilter> {
    Ok(IntentFlowFilter {
        domain_key: domain,
        enabled_only,
        search,
        status: status.map(str::parse::<IntentStatus>).transpose()?,
        show_disabled: !hide_disabled,
    })
}

fn routing_filter(
    expand: Vec<String>,
    search: Option<String>,
    hide_disabled: bool,
) -> RoutingFlowFilter {
    RoutingFlowFilter {
        show_disabled: !hide_disabled,
        search,
        expanded_domains: expand.into_iter().collect(),
    }
}

fn render_path(
    renderer: &Renderer,
    graph: &FlowGraph,
    node: &str,
) -> intentmap_core::Result<String> {
    if !graph.contains_node(node) {
        return Err(intentmap_core::Error::NotFound(format!("graph node '{node}'")));
    }
    renderer.path(graph, &connected_path(graph, node))
}

fn read_file(path: &Path) -> intentmap_core::Result<String> {
    std::fs::read_to_string(path).map_err(|err| {
        intentmap_core::Error::Workflow(format!("failed reading '{}': {err}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use intentmap_core::model::{Agent, Domain, Snapshot};
    use intentmap_core::{Config, Error, IntentMap};

    use super::{render_path, routing_filter};
    use crate::cli::OutputFormat;
    use crate::renderer::Renderer;

    fn credit_snapshot() -> Snapshot {
        Snapshot {
            domains: vec![Domain {
                key: "credit".to_owned(),
                ..Domain::default()
            }],
            agents: vec![Agent {
                key: "credit_agent".to_owned(),
                domain_key: Some("credit".to_owned()),
                ..Agent::default()
            }],
            ..Snapshot::default()
        }
    }

    #[test]
    fn routing_path_reaches_agent_of_expanded_group() {
        let app = IntentMap::new(Config::default()).expect("default config");
        let renderer = Renderer::new(OutputFormat::Text);
        let snapshot = credit_snapshot();

        let expanded = routing_filter(vec!["credit".to_owned()], None, false);
        let graph = app.routing_graph(&snapshot, &expanded);
        let rendered = render_path(&renderer, &graph, "agent-credit_agent").expect("path");
        assert!(rendered.contains("  node domain-group-credit"));
        assert!(rendered.contains("  node supervisor"));

        let collapsed = app.routing_graph(&snapshot, &routing_filter(Vec::new(), None, false));
        let err = render_path(&renderer, &collapsed, "agent-credit_agent")
            .expect_err("collapsed group hides the agent");
        assert!(matches!(err, Error::NotFound(_)));
    }
}
