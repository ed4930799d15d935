//! Finalized opcode and variant definitions.

use bitflags::bitflags;
use serde::Serialize;

use super::ast::OpcodeFields;
use super::model::{SizeList, unique_names, unique_sizes};
use super::table::Named;

/// Resolved operand field names: the base pair plus any extension words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperandLayout {
    #[serde(rename = "opA")]
    pub op_a: String,
    #[serde(rename = "opB")]
    pub op_b: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ext_words: Vec<Vec<String>>,
}

impl OperandLayout {
    /// Every operand name across the base pair and all extension words.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        [self.op_a.as_str(), self.op_b.as_str()]
            .into_iter()
            .chain(self.ext_words.iter().flatten().map(String::as_str))
    }
}

/// Encoding shape of an opcode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum OpcodeShape {
    /// Sized opcode; `types` already include the sizes when `sizetype` is set.
    Sized {
        sizes: SizeList,
        types: Vec<String>,
        sizetype: bool,
    },
    /// Opcode without an operand size; `types` are taken literally.
    Unsized { types: Vec<String> },
    /// Opcode whose variants are independent resolved definitions, in variation order.
    VariantBearing { variants: Vec<OpcodeDef> },
}

impl OpcodeShape {
    /// Builds the shape of a non-variant opcode, applying the sizetype association.
    pub fn plain(fields: &OpcodeFields) -> Self {
        let types = fields.types();
        if fields.is_unsized() {
            return OpcodeShape::Unsized {
                types: unique_names(types),
            };
        }
        let sizes = unique_sizes(fields.sizes());
        let sizetype = fields.sizetype();
        let types = if sizetype {
            associate_sizetype(&sizes, types)
        } else {
            unique_names(types)
        };
        OpcodeShape::Sized {
            sizes,
            types,
            sizetype,
        }
    }
}

/// Sizes and type names share one enumeration namespace for expansion: sizes come
/// first, rendered as decimal names, followed by the type names.
pub fn associate_sizetype(sizes: &[u32], types: &[String]) -> Vec<String> {
    let sizes = sizes.iter().map(u32::to_string);
    unique_names(sizes.chain(types.iter().cloned()))
}

bitflags! {
    /// Optional attachments carried alongside an opcode's shape.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpcodeAttachments: u8 {
        const COMPARISON = 1 << 0;
        const EXTENDED = 1 << 1;
        const SIZETYPE = 1 << 2;
        const FIT_SIZE = 1 << 3;
    }
}

impl OpcodeAttachments {
    /// Lower-case, comma separated attachment names for listings.
    pub fn describe(&self) -> String {
        self.iter_names()
            .map(|(name, _)| name.to_ascii_lowercase().replace('_', "-"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A merged, validated opcode or a resolved variant of one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpcodeDef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<usize>,
    #[serde(flatten)]
    pub operands: OperandLayout,
    #[serde(flatten)]
    pub shape: OpcodeShape,
    pub comparison: bool,
    pub form: String,
    #[serde(rename = "fitsize", skip_serializing_if = "Option::is_none")]
    pub fit_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OpcodeDef {
    pub fn new(
        name: impl Into<String>,
        variation: Option<usize>,
        operands: OperandLayout,
        shape: OpcodeShape,
        fields: &OpcodeFields,
    ) -> Self {
        Self {
            name: name.into(),
            variation,
            operands,
            shape,
            comparison: fields.comparison(),
            form: fields.form().unwrap_or_default().to_string(),
            fit_size: fields.fitsize(),
            class: fields.class().map(str::to_string),
            description: fields.description().map(str::to_string),
        }
    }

    /// Effective type enumeration used for form expansion.
    pub fn types(&self) -> &[String] {
        match &self.shape {
            OpcodeShape::Sized { types, .. } | OpcodeShape::Unsized { types } => types,
            OpcodeShape::VariantBearing { .. } => &[],
        }
    }

    /// Resolved variants, empty unless the opcode is variant-bearing.
    pub fn variants(&self) -> &[OpcodeDef] {
        match &self.shape {
            OpcodeShape::VariantBearing { variants } => variants,
            _ => &[],
        }
    }

    pub fn is_variant_bearing(&self) -> bool {
        matches!(self.shape, OpcodeShape::VariantBearing { .. })
    }

    pub fn attachments(&self) -> OpcodeAttachments {
        let mut flags = OpcodeAttachments::empty();
        flags.set(OpcodeAttachments::COMPARISON, self.comparison);
        flags.set(
            OpcodeAttachments::EXTENDED,
            !self.operands.ext_words.is_empty(),
        );
        flags.set(
            OpcodeAttachments::SIZETYPE,
            matches!(self.shape, OpcodeShape::Sized { sizetype: true, .. }),
        );
        flags.set(OpcodeAttachments::FIT_SIZE, self.fit_size.is_some());
        flags
    }
}

impl Named for OpcodeDef {
    fn name(&self) -> &str {
        &self.name
    }
}
