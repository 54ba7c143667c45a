//! # Storage Layer
//!
//! File persistence around the priority engine. The engine itself never
//! touches the filesystem; the command line reads tasks and settings through
//! this module and writes recalculated tasks back.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSONL (one JSON per line) | any path given on the command line |
//! | Config | TOML | `--config <path>` or `<user config dir>/priority.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`TaskStore`] uses file locking (`fs2`) for concurrent access
//! - Task writes are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`TaskStore`] - Read/write tasks as JSONL
//! - [`Config`] - Priority settings and their source

mod config;
mod jsonl;

pub use config::{Config, ConfigError, CONFIG_FILE_NAME};
pub use jsonl::TaskStore;
