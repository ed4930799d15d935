//! The compiled definition set and the pipeline that produces it.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::loader::defs::{DefinitionLoader, DirectoryStore, DocumentStore};

use super::ast::{OpcodeFields, RawDefinitions};
use super::diagnostic::Subject;
use super::error::DefError;
use super::fingerprint::Fingerprint;
use super::form::{FormExpander, Forms};
use super::level::LevelAccumulator;
use super::merge::merge_with_default;
use super::model::{ClassDef, ComparisonDef, LevelDef, OperandDef, TypeDef};
use super::opcode::{OpcodeDef, OpcodeShape};
use super::table::Table;
use super::validator::ConstraintValidator;
use super::variant::VariantResolver;

/// Immutable, fully validated tables of one instruction set.
///
/// Every table keeps declaration order. Variant-bearing opcodes hold their resolved
/// variants inside their shape, so each opcode identifier appears exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsaDefinition {
    pub types: Table<TypeDef>,
    pub classes: Table<ClassDef>,
    pub operands: Table<OperandDef>,
    pub levels: Table<LevelDef>,
    pub comparisons: Table<ComparisonDef>,
    pub opcodes: Table<OpcodeDef>,
}

impl IsaDefinition {
    /// Loads and compiles the document set rooted at `root`.
    pub fn from_directory(root: impl AsRef<Path>) -> Result<Self, DefError> {
        let store = DirectoryStore::open(root)?;
        Self::from_store(&store)
    }

    /// Loads and compiles every document supplied by `store`.
    pub fn from_store<S: DocumentStore + ?Sized>(store: &S) -> Result<Self, DefError> {
        let raw = DefinitionLoader::new(store).load()?;
        Self::compile(&raw)
    }

    /// Runs accumulation, merging, validation and variant resolution over raw tables.
    /// Stops at the first violation.
    pub fn compile(raw: &RawDefinitions) -> Result<Self, DefError> {
        let types: Table<TypeDef> = raw.types.iter().cloned().collect();
        let classes: Table<ClassDef> = raw.classes.iter().cloned().collect();
        let operands: Table<OperandDef> = raw.operands.iter().cloned().collect();
        let levels = LevelAccumulator::accumulate(&raw.levels);
        debug!(
            types = types.len(),
            classes = classes.len(),
            operands = operands.len(),
            levels = levels.len(),
            "verbatim tables ready"
        );

        let validator = ConstraintValidator::new(&levels, &operands);
        let mut comparisons = Table::new();
        for (id, entry) in &raw.comparisons {
            let merged = merge_with_default(&raw.comparison_default, entry);
            let comparison = validator.validate_comparison(id, &merged)?;
            trace!(comparison = %id, "merged comparison");
            comparisons.insert(comparison);
        }
        debug!(comparisons = comparisons.len(), "comparisons validated");

        let resolver = VariantResolver::new(&validator);
        let mut opcodes = Table::new();
        for (id, entry) in &raw.opcodes {
            let merged = merge_with_default(&raw.opcode_default, entry);
            let opcode = finalize_opcode(id, &merged, &validator, &resolver, &classes)?;
            trace!(opcode = %id, variants = opcode.variants().len(), "merged opcode");
            opcodes.insert(opcode);
        }
        debug!(opcodes = opcodes.len(), "opcodes validated");

        Ok(Self {
            types,
            classes,
            operands,
            levels,
            comparisons,
            opcodes,
        })
    }

    pub fn opcode(&self, name: &str) -> Option<&OpcodeDef> {
        self.opcodes.get(name)
    }

    pub fn expander(&self) -> FormExpander<'_> {
        FormExpander::new(&self.comparisons)
    }

    /// Expanded forms of an opcode or a resolved variant of one.
    pub fn forms<'a>(&'a self, opcode: &'a OpcodeDef) -> Forms<'a> {
        self.expander().expand(opcode)
    }

    pub fn fingerprint(&self) -> Result<Fingerprint, DefError> {
        Fingerprint::of(self)
    }
}

fn finalize_opcode(
    id: &str,
    merged: &OpcodeFields,
    validator: &ConstraintValidator<'_>,
    resolver: &VariantResolver<'_, '_>,
    classes: &Table<ClassDef>,
) -> Result<OpcodeDef, DefError> {
    let layout = validator.validate_opcode(&Subject::opcode(id), merged)?;
    if let Some(class) = merged.class()
        && !classes.contains(class)
    {
        warn!(opcode = %id, class, "opcode references an undefined class");
    }
    let shape = if merged.is_variant() {
        OpcodeShape::VariantBearing {
            variants: resolver.resolve(id, merged)?,
        }
    } else {
        if merged.variants().is_some() {
            warn!(opcode = %id, "variants listed on a non-variant opcode are ignored");
        }
        OpcodeShape::plain(merged)
    };
    Ok(OpcodeDef::new(id, None, layout, shape, merged))
}
