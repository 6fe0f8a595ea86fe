use clap::{Parser, Subcommand};
use dtcraft_monitor::source::DEFAULT_JSONP_CALLBACK;

#[derive(Debug, Parser)]
#[command(name = "dtcraft")]
#[command(about = "Terminal dashboard for a dtcraft cluster", long_about = None)]
pub struct Args {
    /// Master web UI URL
    #[arg(
        long,
        env = "DTCRAFT_MASTER_URL",
        default_value = "http://127.0.0.1:9912"
    )]
    pub master_url: String,

    /// Request `/cluster` as plain JSON instead of JSONP
    #[arg(long)]
    pub plain_json: bool,

    /// JSONP callback name (the master only answers names containing "callback")
    #[arg(long, default_value = DEFAULT_JSONP_CALLBACK, conflicts_with = "plain_json")]
    pub jsonp_callback: String,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// OTLP endpoint for exporting traces
    #[arg(long, env = "DTCRAFT_OTLP_URL")]
    pub otlp_endpoint: Option<String>,

    /// Bearer token for the OTLP endpoint
    #[arg(long, env = "DTCRAFT_OTLP_TOKEN")]
    pub otlp_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cluster status
    Cluster {
        #[command(subcommand)]
        subcommand: ClusterCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ClusterCommand {
    /// Fetch and print the cluster status once
    Status {
        /// Print the status as JSON
        #[arg(long)]
        raw: bool,
    },
    /// Poll the master and redraw on every change until Ctrl-C
    Watch {
        /// Delay between polls in milliseconds
        #[arg(long, default_value_t = 1_000)]
        interval_ms: u64,

        /// Print each snapshot as JSON instead of redrawing
        #[arg(long)]
        raw: bool,
    },
}
