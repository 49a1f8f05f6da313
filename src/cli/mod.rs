//! # CLI Module
//!
//! The CLI module provides command-line interface functionality for the
//! schemabind generator.
//!
//! ## Overview
//!
//! The CLI supports:
//! - **Generation** - Resolve schema documents and render the configured templates
//! - **Introspection** - Resolve a document and dump its model as JSON
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Resolve one or more schema documents and render templates:
//!
//! ```bash
//! schemabind-gen generate --config gen.yaml api.yaml definitions.yaml
//! ```
//!
//! Options:
//! - `--config <FILE>` - Path to the rule/template configuration (required)
//! - `--output-dir <DIR>` - Override the configured output directory
//! - `--dry-run` - Resolve everything but write no files
//!
//! ### `inspect`
//!
//! Resolve a single document and print the resulting model:
//!
//! ```bash
//! schemabind-gen inspect --config gen.yaml api.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use schemabind::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run_cli(cli)?;
//! ```

mod commands;

pub use commands::{run_cli, Cli, Commands};
