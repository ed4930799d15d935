//! Definition compilation pipeline.
//!
//! Raw documents are folded into a single [`IsaDefinition`]: levels are accumulated,
//! comparisons and opcodes are merged against their default templates and validated,
//! variant-bearing opcodes are resolved into independent siblings, and every finalized
//! opcode can be expanded into its concrete mnemonic forms.

pub mod ast;
pub mod builder;
pub mod definition;
pub mod diagnostic;
pub mod error;
pub mod fingerprint;
pub mod form;
pub mod level;
pub mod merge;
pub mod model;
pub mod opcode;
pub mod report;
pub mod table;
pub mod validator;
pub mod variant;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::DefinitionBuilder;
pub use definition::IsaDefinition;
pub use error::DefError;
pub use fingerprint::Fingerprint;
pub use form::{FormExpander, Forms};
pub use level::LevelAccumulator;
pub use merge::{Overlay, merge_with_default};
pub use model::{ClassDef, ComparisonDef, LevelDef, OperandDef, TypeDef};
pub use opcode::{OpcodeAttachments, OpcodeDef, OpcodeShape, OperandLayout};
pub use report::{JsonReport, Report};
pub use table::{Named, Table};
pub use validator::ConstraintValidator;
pub use variant::VariantResolver;
