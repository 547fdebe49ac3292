//! Metadata engine.
//!
//! ## Pipeline
//!
//! ```text
//! context / file_scanner    config + files → parsed sources
//!        ↓
//! model                     lowered compilation units behind `SemanticModel`
//!        ↓
//! pipeline                  plugins drive discover/build; heritage, merge,
//!                           deps and validate run between plugin stages
//!        ↓
//! RunOutput                 sorted ComponentRecords + issues
//! ```
//!
//! `builder`, `docs`, `literal` and `typing` are the pieces plugins use to turn a
//! lowered class into a [`meta::ComponentRecord`].

pub mod builder;
pub mod context;
pub mod deps;
pub mod docs;
pub mod file_scanner;
pub mod heritage;
pub mod literal;
pub mod merge;
pub mod meta;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod state;
pub mod typing;
pub mod utils;
pub mod validate;

pub use context::DiscoverContext;
pub use pipeline::{Pipeline, RunOutput};
