//! Stats and models commands

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::priority::{priority_statistics, DecayModel};
use crate::storage::{Config, TaskStore};

/// Prints priority statistics for a task file
pub fn run(output: &Output, config: &Config, tasks_path: &Path) -> Result<()> {
    let tasks = TaskStore::new(tasks_path).read_all()?;
    let stats = priority_statistics(&tasks, &config.priority);

    if output.is_json() {
        output.data(&stats);
        return Ok(());
    }

    println!("Priority statistics ({} tasks):", stats.count);
    println!("  Min:          {}", stats.min);
    println!("  Max:          {}", stats.max);
    println!("  Average:      {}", stats.average);
    println!("  Utilization:  {:.1}%", stats.utilization_ratio * 100.0);

    println!();
    println!("By band:");
    let bands = [
        ("critical", stats.distribution.critical),
        ("high", stats.distribution.high),
        ("medium", stats.distribution.medium),
        ("low", stats.distribution.low),
    ];
    for (band, count) in bands {
        output.row(&["", band, count.to_string().as_str()]);
    }

    Ok(())
}

/// Lists the time decay models, marking the configured one
pub fn run_models(output: &Output, config: &Config) -> Result<()> {
    let active = config.priority.time_decay.model;

    if output.is_json() {
        let models: Vec<_> = DecayModel::all()
            .iter()
            .map(|model| {
                serde_json::json!({
                    "name": model.as_str(),
                    "description": model.description(),
                    "use_case": model.use_case(),
                    "active": *model == active,
                })
            })
            .collect();
        output.data(&models);
        return Ok(());
    }

    println!("{:<2} {:<12} {:<60} USE CASE", "", "MODEL", "DESCRIPTION");
    println!("{}", "-".repeat(110));
    for model in DecayModel::all() {
        let marker = if model == active { "*" } else { "" };
        println!(
            "{:<2} {:<12} {:<60} {}",
            marker,
            model.as_str(),
            model.description(),
            model.use_case()
        );
    }

    Ok(())
}
