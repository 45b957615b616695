//! Inspect command - summarize a saved policy

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::to_writer_pretty;

use crate::{
    cli::{
        commands::benchmark::load_policy,
        output::{format_number, print_kv, print_section},
    },
    q_learning::{DEFAULT_POLICY_DIR, SavedPolicy},
};

#[derive(Parser, Debug)]
#[command(about = "Show the contents of a saved policy")]
pub struct InspectArgs {
    /// Policy file (latest policy in --policy-dir when omitted)
    pub policy: Option<PathBuf>,

    /// Directory searched for the latest policy
    #[arg(long, default_value = DEFAULT_POLICY_DIR)]
    pub policy_dir: PathBuf,

    /// Number of highest-valued entries to list
    #[arg(long, short = 'n', default_value_t = 20)]
    pub top: usize,

    /// Write the full policy as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Entries sorted by descending value, at most `limit` of them.
pub fn top_entries(policy: &SavedPolicy, limit: usize) -> Vec<(String, f64)> {
    let mut entries: Vec<_> = policy
        .q_table
        .iter()
        .map(|(state, action, value)| (format!("{state} {action}"), value))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(limit);
    entries
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let (path, policy) = load_policy(args.policy.as_deref(), &args.policy_dir)?;

    print_section(&format!("Policy {}", path.display()));
    print_kv("Version", &policy.version.to_string());
    print_kv("Table entries", &format_number(policy.q_table.len()));
    print_kv("Iterations", &policy.iterations.to_string());
    if let Some(episodes) = policy.metadata.episodes_trained {
        print_kv("Episodes trained", &format_number(episodes));
    }
    if let Some(saved_at) = &policy.metadata.saved_at {
        print_kv("Saved at", saved_at);
    }
    if let Some(agent) = &policy.metadata.agent {
        print_kv(
            "Hyper-parameters",
            &format!(
                "α={} γ={} ε={}",
                agent.learning_rate, agent.discount_factor, agent.exploration_rate
            ),
        );
    }

    if args.top > 0 && !policy.q_table.is_empty() {
        println!("\nTop {} entries:", args.top.min(policy.q_table.len()));
        for (key, value) in top_entries(&policy, args.top) {
            println!("  {value:>10.3}  {key}");
        }
    }

    if let Some(json) = &args.json {
        let file = File::create(json)
            .with_context(|| format!("Failed to create {}", json.display()))?;
        to_writer_pretty(file, &policy).context("Failed to write policy JSON")?;
        println!("\nPolicy exported to: {}", json.display());
    }

    Ok(())
}
