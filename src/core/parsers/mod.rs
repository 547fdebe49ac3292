//! Source file parsers.
//!
//! - `typescript`: TS/TSX component source parser (uses swc for AST generation)

pub mod typescript;
