use std::fmt::Write;

use chrono::{DateTime, Utc};
use dtcraft_common::{format_byte_count, AgentInfo};
use dtcraft_monitor::ClusterSnapshot;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub fn print_cluster(snapshot: &ClusterSnapshot) {
    print!("{}", render_cluster(snapshot, Utc::now()));
}

pub fn redraw_cluster(snapshot: &ClusterSnapshot) {
    print!("{CLEAR_SCREEN}{}", render_cluster(snapshot, Utc::now()));
}

pub fn print_raw(snapshot: &ClusterSnapshot) {
    println!("{}", serde_json::to_string_pretty(snapshot).unwrap_or_default());
}

pub fn render_cluster(snapshot: &ClusterSnapshot, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== dtcraft Cluster ===");

    let Some(master) = &snapshot.master else {
        let _ = writeln!(out, "\n  (waiting for master...)\n");
        return out;
    };

    let _ = writeln!(out, "\n[Master]");
    let _ = writeln!(out, "  Host:    {}", master.host);
    let _ = writeln!(out, "  Agents:  {}", master.num_agents);
    let _ = writeln!(out, "  Graphs:  {}", master.num_graphs);
    if let Some(at) = snapshot.updated_at {
        let _ = writeln!(out, "  Updated: {}", ago(at, now));
    }

    let _ = writeln!(out, "\n[Agents]");
    if snapshot.agents.is_empty() {
        let _ = writeln!(out, "  (No agents registered)");
    } else {
        let _ = writeln!(
            out,
            "  {:<20} {:<10} {:<22} {:<22} {:<6}",
            "Host", "CPUs", "Memory", "Disk", "Tasks"
        );
        let _ = writeln!(out, "  {:-<84}", "");
        for agent in &snapshot.agents {
            let _ = writeln!(out, "{}", agent_row(agent));
        }
    }
    out.push('\n');
    out
}

/// Free over total for each resource of one agent.
fn agent_row(agent: &AgentInfo) -> String {
    let (free, total) = (&agent.released, &agent.resource);
    format!(
        "  {:<20} {:<10} {:<22} {:<22} {:<6}",
        agent.host,
        format!("{}/{}", free.num_cpus, total.num_cpus),
        format!(
            "{} / {}",
            format_byte_count(free.memory_limit_in_bytes),
            format_byte_count(total.memory_limit_in_bytes)
        ),
        format!(
            "{} / {}",
            format_byte_count(free.space_limit_in_bytes),
            format_byte_count(total.space_limit_in_bytes)
        ),
        agent.num_tasks
    )
}

fn ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds().max(0);
    match secs {
        0 => "just now".to_string(),
        s if s < 60 => format!("{s}s ago"),
        s => format!("{}m{}s ago", s / 60, s % 60),
    }
}
