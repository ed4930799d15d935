//! Human-readable and JSON renderings of a compiled definition set.

use std::fmt;

use serde::Serialize;

use super::definition::IsaDefinition;
use super::error::DefError;
use super::fingerprint::Fingerprint;
use super::opcode::OpcodeDef;

/// Text report: category counts, the fingerprint, then every opcode with its forms.
pub struct Report<'a> {
    definition: &'a IsaDefinition,
    fingerprint: Fingerprint,
    quiet: bool,
}

impl<'a> Report<'a> {
    pub fn new(definition: &'a IsaDefinition) -> Result<Self, DefError> {
        Ok(Self {
            definition,
            fingerprint: definition.fingerprint()?,
            quiet: false,
        })
    }

    /// Omits the per-opcode listing when set.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn write_opcode(&self, f: &mut fmt::Formatter<'_>, opcode: &OpcodeDef) -> fmt::Result {
        let attachments = opcode.attachments();
        if attachments.is_empty() {
            writeln!(f, "{}", opcode.name)?;
        } else {
            writeln!(f, "{} ({})", opcode.name, attachments.describe())?;
        }
        if opcode.is_variant_bearing() {
            for variant in opcode.variants() {
                let index = variant.variation.unwrap_or_default();
                for form in self.definition.forms(variant) {
                    writeln!(f, "\t[{index}] {form}")?;
                }
            }
            return Ok(());
        }
        for form in self.definition.forms(opcode) {
            writeln!(f, "\t{form}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let def = self.definition;
        writeln!(f, "Parsed:")?;
        for (count, label) in [
            (def.types.len(), "TypeDefs"),
            (def.classes.len(), "ClassDefs"),
            (def.operands.len(), "OperandDefs"),
            (def.levels.len(), "LevelDefs"),
            (def.comparisons.len(), "ComparisonDefs"),
            (def.opcodes.len(), "OpcodeDefs"),
        ] {
            writeln!(f, "\t{count} {label}")?;
        }
        writeln!(f, "Fingerprint: {}", self.fingerprint)?;
        if self.quiet {
            return Ok(());
        }
        for opcode in &def.opcodes {
            self.write_opcode(f, opcode)?;
        }
        Ok(())
    }
}

/// Expanded forms of one opcode, or of one variant when `variation` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpcodeForms<'a> {
    pub opcode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<usize>,
    pub forms: Vec<String>,
}

/// Machine-readable report: the compiled tables plus every expanded form.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub fingerprint: Fingerprint,
    pub definition: &'a IsaDefinition,
    pub forms: Vec<OpcodeForms<'a>>,
}

impl<'a> JsonReport<'a> {
    pub fn new(definition: &'a IsaDefinition) -> Result<Self, DefError> {
        let mut forms = Vec::new();
        for opcode in &definition.opcodes {
            if opcode.is_variant_bearing() {
                forms.extend(opcode.variants().iter().map(|variant| OpcodeForms {
                    opcode: &opcode.name,
                    variation: variant.variation,
                    forms: definition.forms(variant).collect(),
                }));
            } else {
                forms.push(OpcodeForms {
                    opcode: &opcode.name,
                    variation: None,
                    forms: definition.forms(opcode).collect(),
                });
            }
        }
        Ok(Self {
            fingerprint: definition.fingerprint()?,
            definition,
            forms,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, DefError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
