//! Recalc command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::output::Output;
use crate::priority::{check_capacity, PriorityEngine};
use crate::storage::{Config, TaskStore};

/// Parses an RFC 3339 timestamp into UTC
pub fn parse_now(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid --now timestamp '{}', expected RFC 3339", value))
}

/// Recalculates priorities in a task file
pub fn run(
    output: &Output,
    config: &Config,
    tasks_path: &Path,
    now: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let now = match now {
        Some(value) => parse_now(value)?,
        None => Utc::now(),
    };

    let store = TaskStore::new(tasks_path);
    let mut tasks = store.read_all()?;
    debug!(path = %store.path().display(), tasks = tasks.len(), "Loaded tasks");

    check_capacity(tasks.len(), &config.priority)
        .with_context(|| format!("Cannot recalculate {}", store.path().display()))?;

    let engine = PriorityEngine::new(config.priority.clone());
    let result = engine.recalculate_at(&mut tasks, now);

    if !dry_run {
        store.write_all(&tasks)?;
        debug!(path = %store.path().display(), "Wrote recalculated tasks");
    }

    if output.is_json() {
        let priorities: Vec<_> = tasks
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "title": t.title,
                    "priority": t.priority,
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "tasks": tasks.len(),
            "dry_run": dry_run,
            "adjustments": result.adjustments,
            "counts": result.counts_by_type(),
            "priorities": priorities,
        }));
        return Ok(());
    }

    if result.is_empty() {
        println!("No priority changes for {} tasks.", tasks.len());
    } else {
        println!(
            "Adjustments ({}) across {} of {} tasks:",
            result.adjustments.len(),
            result.touched_tasks().len(),
            tasks.len()
        );
        println!("{:<8} {:<26} {:>6} {:>6}  REASON", "ID", "TYPE", "OLD", "NEW");
        println!("{}", "-".repeat(80));
        for adj in &result.adjustments {
            println!(
                "{:<8} {:<26} {:>6} {:>6}  {}",
                adj.task_id.to_string(),
                adj.kind.label(),
                adj.old_priority,
                adj.new_priority,
                adj.reason
            );
        }

        println!();
        println!("By type:");
        for (label, count) in result.counts_by_type() {
            output.row(&["", label, count.to_string().as_str()]);
        }
    }

    if dry_run {
        output.success("Dry run: no changes written.");
    } else {
        output.success(&format!("Updated {}", store.path().display()));
    }

    Ok(())
}
