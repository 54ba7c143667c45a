//! Config command

use anyhow::Result;

use super::output::Output;
use crate::storage::Config;

/// Prints the effective settings
pub fn run(output: &Output, config: &Config) -> Result<()> {
    if output.is_json() {
        output.data(&serde_json::json!({
            "source": config.source.as_ref().map(|p| p.display().to_string()),
            "config": config.priority,
        }));
        return Ok(());
    }

    match &config.source {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# Built-in defaults"),
    }
    print!("{}", config.to_toml()?);

    Ok(())
}
