mod args;
mod config;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::StreamExt;

use dtcraft_common::telemetry::init_tracing;
use dtcraft_monitor::{ClusterSnapshot, ClusterView, HttpStatusSource, StatusPoller, StatusSource};

use crate::args::{Args, ClusterCommand, Command};
use crate::config::{poller_config, source_config, telemetry_config};
use crate::output::{print_cluster, print_raw, redraw_cluster};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let telemetry = init_tracing(&telemetry_config(&args));
    if telemetry.exporting() {
        tracing::debug!("exporting traces over OTLP");
    }

    let source = HttpStatusSource::new(source_config(&args))
        .context("failed to set up cluster status source")?;
    tracing::debug!(url = source.url(), "using cluster status endpoint");

    match args.command {
        Command::Cluster { subcommand } => match subcommand {
            ClusterCommand::Status { raw } => {
                let status = source
                    .fetch()
                    .await
                    .with_context(|| format!("failed to fetch {}", source.url()))?;
                let snapshot = ClusterSnapshot::from(status);
                if raw {
                    print_raw(&snapshot);
                } else {
                    print_cluster(&snapshot);
                }
            }
            ClusterCommand::Watch { interval_ms, raw } => {
                watch(source, interval_ms, raw).await;
            }
        },
    }

    Ok(())
}

async fn watch(source: HttpStatusSource, interval_ms: u64, raw: bool) {
    let view = ClusterView::new();
    let mut poller = StatusPoller::new(Arc::new(source), view.clone(), poller_config(interval_ms));
    let mut updates = view.updates();

    poller.start();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            next = updates.next() => {
                let Some(snapshot) = next else { break };
                if raw {
                    if snapshot.is_loaded() {
                        print_raw(&snapshot);
                    }
                } else {
                    redraw_cluster(&snapshot);
                }
            }
            res = &mut shutdown => {
                if let Err(err) = res {
                    tracing::warn!(error = %err, "failed to listen for ctrl-c");
                }
                break;
            }
        }
    }

    poller.stop().await;
}
