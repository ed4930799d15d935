//! Structural validation for merged comparison and opcode records.
//!
//! Both checks are fail-fast: the first broken rule is returned and aborts compilation.

use super::ast::{ComparisonFields, OpcodeFields};
use super::diagnostic::{Subject, Violation};
use super::error::DefError;
use super::model::{ComparisonDef, LevelDef, OperandDef, unique_names, unique_sizes};
use super::opcode::OperandLayout;
use super::table::Table;

/// Combined width of operands A and B: the operand byte.
pub const BASE_OPERAND_BITS: u64 = 8;
/// Combined width of the operands of one extension word.
pub const EXTENSION_WORD_BITS: u64 = 16;
/// Maximum number of variants one opcode may declare.
pub const MAX_VARIANTS: usize = 16;

pub struct ConstraintValidator<'a> {
    levels: &'a Table<LevelDef>,
    operands: &'a Table<OperandDef>,
}

impl<'a> ConstraintValidator<'a> {
    pub fn new(levels: &'a Table<LevelDef>, operands: &'a Table<OperandDef>) -> Self {
        Self { levels, operands }
    }

    /// Checks a merged comparison and returns its finalized form.
    pub fn validate_comparison(
        &self,
        id: &str,
        fields: &ComparisonFields,
    ) -> Result<ComparisonDef, DefError> {
        let subject = Subject::comparison(id);
        let level_name = fields.level().unwrap_or_default();
        if level_name.is_empty() {
            return Err(DefError::Referential(Violation::new(
                subject,
                "comparison.level.missing",
                "no level declared",
            )));
        }
        let Some(level) = self.levels.get(level_name) else {
            return Err(DefError::Referential(Violation::new(
                subject,
                "comparison.level.unknown",
                format!("level '{level_name}' is not defined"),
            )));
        };
        let op_a = self.require_operand(&subject, "comparison", "A", fields.op_a())?;
        let op_b = self.require_operand(&subject, "comparison", "B", fields.op_b())?;

        let sizes = unique_sizes(fields.sizes());
        if sizes.is_empty() {
            return Err(DefError::Subset(Violation::new(
                subject,
                "comparison.sizes.missing",
                "no sizes declared",
            )));
        }
        if let Some(size) = sizes.iter().find(|size| !level.supports_size(**size)) {
            return Err(DefError::Subset(Violation::new(
                subject,
                "comparison.sizes.level",
                format!("size {size} is incompatible with level '{level_name}'"),
            )));
        }
        let types = unique_names(fields.types());
        if let Some(ty) = types.iter().find(|ty| !level.supports_type(ty)) {
            return Err(DefError::Subset(Violation::new(
                subject,
                "comparison.types.level",
                format!("type '{ty}' is incompatible with level '{level_name}'"),
            )));
        }

        Ok(ComparisonDef {
            name: id.to_string(),
            level: level.name.clone(),
            op_a: op_a.name.clone(),
            op_b: op_b.name.clone(),
            sizes,
            types,
            form: fields.form().unwrap_or_default().to_string(),
            description: fields.description().map(str::to_string),
        })
    }

    /// Checks a merged opcode or variant and returns its resolved operand layout.
    pub fn validate_opcode(
        &self,
        subject: &Subject,
        fields: &OpcodeFields,
    ) -> Result<OperandLayout, DefError> {
        let op_a = self.require_operand(subject, "opcode", "A", fields.op_a())?;
        let op_b = self.require_operand(subject, "opcode", "B", fields.op_b())?;

        let base_bits = u64::from(op_a.bits) + u64::from(op_b.bits);
        if base_bits != BASE_OPERAND_BITS {
            return Err(DefError::Budget(Violation::new(
                subject.clone(),
                "opcode.operand-budget",
                format!(
                    "operands '{}' + '{}' span {base_bits} bits, expected exactly {BASE_OPERAND_BITS}",
                    op_a.name, op_b.name
                ),
            )));
        }

        let mut selectors = usize::from(op_a.is_variant_selector())
            + usize::from(op_b.is_variant_selector());
        let ext_words = fields.extwords().to_vec();
        for (word, names) in ext_words.iter().enumerate() {
            let mut word_bits = 0u64;
            for name in names {
                let operand = self.operands.get(name).ok_or_else(|| {
                    DefError::Referential(Violation::new(
                        subject.clone(),
                        "opcode.extword.operand-unknown",
                        format!("extension word {word} references undefined operand '{name}'"),
                    ))
                })?;
                word_bits += u64::from(operand.bits);
                selectors += usize::from(operand.is_variant_selector());
            }
            if word_bits != EXTENSION_WORD_BITS {
                return Err(DefError::Budget(Violation::new(
                    subject.clone(),
                    "opcode.extword-budget",
                    format!(
                        "extension word {word} spans {word_bits} bits, expected exactly {EXTENSION_WORD_BITS}"
                    ),
                )));
            }
        }
        if selectors > 1 {
            return Err(DefError::Variant(Violation::new(
                subject.clone(),
                "opcode.variant-selector.multiple",
                format!("{selectors} variant selector operands declared, at most one allowed"),
            )));
        }

        if fields.is_variant() {
            let count = fields.variants().map_or(0, <[_]>::len);
            if count == 0 {
                return Err(DefError::Variant(Violation::new(
                    subject.clone(),
                    "opcode.variants.missing",
                    "variant opcode declares no variants",
                )));
            }
            if count > MAX_VARIANTS {
                return Err(DefError::Variant(Violation::new(
                    subject.clone(),
                    "opcode.variants.too-many",
                    format!("{count} variants declared, at most {MAX_VARIANTS} allowed"),
                )));
            }
        }

        Ok(OperandLayout {
            op_a: op_a.name.clone(),
            op_b: op_b.name.clone(),
            ext_words,
        })
    }

    fn require_operand(
        &self,
        subject: &Subject,
        scope: &str,
        slot: &str,
        name: Option<&str>,
    ) -> Result<&'a OperandDef, DefError> {
        let name = name.unwrap_or_default();
        if name.is_empty() {
            return Err(DefError::Referential(Violation::new(
                subject.clone(),
                operand_rule(scope, slot, false),
                format!("no operand {slot} declared"),
            )));
        }
        self.operands.get(name).ok_or_else(|| {
            DefError::Referential(Violation::new(
                subject.clone(),
                operand_rule(scope, slot, true),
                format!("operand {slot} '{name}' is not defined"),
            ))
        })
    }
}

fn operand_rule(scope: &str, slot: &str, unknown: bool) -> &'static str {
    match (scope, slot, unknown) {
        ("comparison", "A", false) => "comparison.operand-a.missing",
        ("comparison", "A", true) => "comparison.operand-a.unknown",
        ("comparison", _, false) => "comparison.operand-b.missing",
        ("comparison", _, true) => "comparison.operand-b.unknown",
        (_, "A", false) => "opcode.operand-a.missing",
        (_, "A", true) => "opcode.operand-a.unknown",
        (_, _, false) => "opcode.operand-b.missing",
        (_, _, true) => "opcode.operand-b.unknown",
    }
}
