//! Expansion of form templates into concrete mnemonic strings.
//!
//! Templates use brace tokens. Register tokens are always rendered as generic indexed
//! placeholders; the remaining tokens are filled from the comparison table or from the
//! opcode's effective type enumeration.

use std::slice;

use super::model::ComparisonDef;
use super::opcode::OpcodeDef;
use super::table::Table;

pub const REGISTER_TOKEN: &str = "{r}";
pub const REGISTER_RENDERING: &str = "r<N>";
pub const FLOAT_REGISTER_TOKEN: &str = "{f}";
pub const FLOAT_REGISTER_RENDERING: &str = "f<N>";
pub const COMPARISON_TOKEN: &str = "{c}";
pub const TYPE_TOKEN: &str = "{t}";
pub const INT_FIT_TOKEN: &str = "{fi}";
pub const FLOAT_FIT_TOKEN: &str = "{ff}";
/// Rendered in place of a fit size the definition does not declare.
pub const FIT_SIZE_SENTINEL: &str = "??";
pub const FRACTION_SUFFIX: &str = ".0";

/// Replaces register and float-register tokens. Idempotent.
pub fn substitute_registers(template: &str) -> String {
    template
        .replace(REGISTER_TOKEN, REGISTER_RENDERING)
        .replace(FLOAT_REGISTER_TOKEN, FLOAT_REGISTER_RENDERING)
}

/// Expands finalized opcodes against a comparison table.
#[derive(Debug, Clone, Copy)]
pub struct FormExpander<'a> {
    comparisons: &'a Table<ComparisonDef>,
}

impl<'a> FormExpander<'a> {
    pub fn new(comparisons: &'a Table<ComparisonDef>) -> Self {
        Self { comparisons }
    }

    /// Returns the lazy form sequence of `opcode`. The sequence is a pure function of
    /// the opcode and the comparison table; clone it to iterate again from the start.
    pub fn expand(&self, opcode: &'a OpcodeDef) -> Forms<'a> {
        let template = substitute_registers(&opcode.form);
        let state = if opcode.comparison {
            FormsState::Comparisons {
                comparisons: self.comparisons.iter(),
                current: None,
            }
        } else if !opcode.types().is_empty() {
            let (fit_int, fit_float) = match opcode.fit_size {
                Some(size) => (size.to_string(), format!("{size}{FRACTION_SUFFIX}")),
                None => (FIT_SIZE_SENTINEL.to_string(), FIT_SIZE_SENTINEL.to_string()),
            };
            FormsState::Types {
                types: opcode.types().iter(),
                fit_int,
                fit_float,
            }
        } else {
            FormsState::Single { emitted: false }
        };
        Forms { template, state }
    }
}

/// Lazy sequence of expanded forms for one opcode or variant.
#[derive(Debug, Clone)]
pub struct Forms<'a> {
    template: String,
    state: FormsState<'a>,
}

#[derive(Debug, Clone)]
enum FormsState<'a> {
    Comparisons {
        comparisons: slice::Iter<'a, ComparisonDef>,
        current: Option<(&'a ComparisonDef, slice::Iter<'a, String>)>,
    },
    Types {
        types: slice::Iter<'a, String>,
        fit_int: String,
        fit_float: String,
    },
    Single {
        emitted: bool,
    },
}

impl Iterator for Forms<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let template = &self.template;
        match &mut self.state {
            FormsState::Comparisons {
                comparisons,
                current,
            } => loop {
                if let Some((comparison, types)) = current
                    && let Some(ty) = types.next()
                {
                    let rendered = template
                        .replace(COMPARISON_TOKEN, &comparison.form)
                        .replace(TYPE_TOKEN, ty);
                    return Some(substitute_registers(&rendered));
                }
                let comparison = comparisons.next()?;
                *current = Some((comparison, comparison.types.iter()));
            },
            FormsState::Types {
                types,
                fit_int,
                fit_float,
            } => {
                let ty = types.next()?;
                Some(
                    template
                        .replace(TYPE_TOKEN, ty)
                        .replace(INT_FIT_TOKEN, fit_int)
                        .replace(FLOAT_FIT_TOKEN, fit_float),
                )
            }
            FormsState::Single { emitted } => {
                if *emitted {
                    return None;
                }
                *emitted = true;
                Some(template.clone())
            }
        }
    }
}
