use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "intentmap", about = "Intent and routing graph tooling")]
pub struct Cli {
    /// TOML config file; defaults apply when omitted.
    #[arg(long, env = "INTENTMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides `[logging] level`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphView {
    Intent,
    Routing,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Domain -> intent -> agent -> keyword graph.
    Intents {
        snapshot: PathBuf,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        enabled_only: bool,
        #[arg(long)]
        search: Option<String>,
        /// active, idle or unused
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        hide_disabled: bool,
    },
    /// Message routing graph from input to end.
    Routing {
        snapshot: PathBuf,
        /// Domain group to expand; repeatable.
        #[arg(long = "expand")]
        expand: Vec<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        hide_disabled: bool,
    },
    /// Nodes and edges highlighted when `node` is selected.
    Path {
        snapshot: PathBuf,
        node: String,
        #[arg(long, value_enum, default_value = "intent")]
        view: GraphView,
        /// Intent view only.
        #[arg(long)]
        domain: Option<String>,
        /// Intent view only.
        #[arg(long)]
        enabled_only: bool,
        /// Intent view only.
        #[arg(long)]
        status: Option<String>,
        /// Routing view only; repeatable.
        #[arg(long = "expand")]
        expand: Vec<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        hide_disabled: bool,
    },
    /// Which bypass rule, if any, captures a message.
    Bypass {
        snapshot: PathBuf,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        phone_number_id: Option<String>,
    },
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommand,
    },
    ValidateConfig,
}

#[derive(Debug, Clone, Subcommand)]
pub enum WorkflowCommand {
    /// Re-export a workflow file under the configured version.
    Export {
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate a workflow export and print its canvas graph.
    Import { input: PathBuf },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
