//! `isadef` compiles layered JSON descriptions of an instruction set into validated
//! definition tables and expands their mnemonic form templates.
//!
//! The [`loader`] module locates and parses raw documents; [`isa`] owns the merge,
//! validation, variant resolution and form expansion pipeline.

pub mod isa;
pub mod loader;

pub use isa::{DefError, IsaDefinition};
