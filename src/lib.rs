//! Tagscope - metadata extraction for web component libraries
//!
//! Tagscope reads TypeScript/JavaScript sources, finds custom element
//! classes through framework plugins, and produces one merged metadata
//! record per component: properties, attributes, events, slots, CSS custom
//! properties and parts, methods, and the components it depends on.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Analysis engine (model, heritage, merge, dependency graph, pipeline)
//! - `issues`: Diagnostic type definitions
//! - `plugins`: Plugin contract and the built-in framework plugins
//! - `reporter`: Cargo-style terminal output

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod plugins;
pub mod reporter;
