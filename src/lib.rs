//! # schemabind
//!
//! **schemabind** is a schema resolution and type-mapping engine: it reads
//! Swagger 2.0-style schema documents into a normalized model and hands that
//! model to a template renderer for code generation.
//!
//! ## Overview
//!
//! schemabind turns YAML or JSON schema documents into a language-neutral
//! model of types and calls, governed entirely by a declarative rule
//! configuration. Type mapping, identifier renaming, and cross-file `$ref`
//! resolution are all table-driven: there is no built-in knowledge of any
//! target language.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`node`]** - Document loading into a uniform tree with line diagnostics
//! - **[`model`]** - The normalized output model (type usages, schemas, calls)
//! - **[`translate`]** - Rule tables, the translator, and the cross-file cache
//! - **[`resolve`]** - Schema and operation resolution against the translator
//! - **[`render`]** - MiniJinja-based template rendering of resolved models
//! - **[`config`]** - The YAML rule/template configuration format
//! - **[`cli`]** - Command-line entry points (`generate`, `inspect`)
//!
//! ### Generation Flow
//!
//! ```text
//! document.yaml ──▶ node::load_document ──▶ Node tree (with line numbers)
//!                                               │
//!             Translator::process_file ◀────────┘
//!                       │
//!                       ▼
//!             resolve::resolve_document ──▶ Model { types, call_classes }
//!                       │
//!                       ▼
//!             Renderer::render_model ──▶ generated files
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use schemabind::config::GenConfig;
//! use schemabind::render::Renderer;
//! use schemabind::translate::Translator;
//!
//! let config = GenConfig::load("gen.yaml".as_ref())?;
//! let renderer = Renderer::new(&config);
//! let translator = Translator::new(config)?;
//!
//! let model = translator.process_file("api.yaml".as_ref(), ".".as_ref())?;
//! renderer.render_model(&model)?;
//! ```
//!
//! ## Configuration
//!
//! All mapping behavior lives in a single YAML file: ordered type rules
//! (per schema `type`, with per-`format` entries), ordered identifier rules
//! (literal or `/regex/` patterns), `$ref` shortcut mappings, and template
//! output declarations. See [`config`] for the full format.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod node;
pub mod render;
pub mod resolve;
pub mod translate;

pub use config::GenConfig;
pub use error::Error;
pub use model::{Call, CallClass, Direction, Model, ObjectSchema, TypeUsage, VarDecl};
pub use node::{Loc, Node};
pub use translate::Translator;
