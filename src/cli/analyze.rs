//! Analyze command

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::priority::analyze_dependencies;
use crate::storage::{Config, TaskStore};

/// Prints the dependency summary of a task file
pub fn run(output: &Output, config: &Config, tasks_path: &Path) -> Result<()> {
    let tasks = TaskStore::new(tasks_path).read_all()?;
    let analysis = analyze_dependencies(&tasks, &config.priority);

    if output.is_json() {
        output.data(&analysis);
        return Ok(());
    }

    println!("Dependency analysis ({} tasks):", analysis.total_tasks);
    println!("  With dependencies:  {}", analysis.tasks_with_dependencies);
    println!("  Roots:              {}", analysis.root_tasks);
    println!("  Leaves:             {}", analysis.leaf_tasks);
    println!("  Critical paths:     {}", analysis.critical_path_count);
    println!("  Longest path:       {}", analysis.longest_path_length);

    println!();
    if analysis.blocking_tasks.is_empty() {
        println!("No blocking tasks.");
    } else {
        println!("Blocking tasks ({}):", analysis.blocking_tasks.len());
        println!("{:<8} {:<40} BLOCKS", "ID", "TITLE");
        println!("{}", "-".repeat(60));
        for blocking in &analysis.blocking_tasks {
            println!(
                "{:<8} {:<40} {}",
                blocking.task_id.to_string(),
                blocking.title,
                blocking.blocked_count
            );
        }
    }

    if !analysis.circular_dependencies.is_empty() {
        println!();
        println!(
            "Circular dependencies ({}):",
            analysis.circular_dependencies.len()
        );
        for cycle in &analysis.circular_dependencies {
            let members: Vec<String> = cycle.iter().map(ToString::to_string).collect();
            println!("  {}", members.join(" <-> "));
        }
    }

    Ok(())
}
