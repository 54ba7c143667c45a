//! # Command-Line Interface
//!
//! Thin layer over [`crate::priority`] and [`crate::storage`].
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `recalc <tasks.jsonl>` | Run the pipeline and write priorities back |
//! | `analyze <tasks.jsonl>` | Report roots, leaves, paths, blockers and cycles |
//! | `stats <tasks.jsonl>` | Min, max, average, band counts and utilization |
//! | `models` | List the time decay models |
//! | `config` | Print the effective settings as TOML |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. Use `--verbose` (or `-v`)
//! for per-stage debug output, or set `RUST_LOG`:
//! ```bash
//! shape-priority --verbose recalc tasks.jsonl --dry-run
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod analyze;
mod app;
mod config_cmd;
mod output;
mod recalc;
mod stats;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
