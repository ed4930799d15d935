//! Raw, partially specified records as they appear in definition documents.
//!
//! Comparison and opcode entries share one fully enumerated schema with their default
//! templates: every key is optional so that an entry only carries the fields it
//! overrides. A key given as `null` is present and clears the inherited value. Unknown
//! keys are rejected at load time.

use serde::{Deserialize, Deserializer};

use super::model::{ClassDef, OperandDef, TypeDef};

/// Key that terminates every definition mapping and is discarded on load.
pub const END_MARKER: &str = "_end";

/// State of one key in a partial record: `None` when the key is absent, `Some(None)`
/// when it is given as `null`, `Some(Some(value))` when it is set.
pub type Slot<T> = Option<Option<T>>;

/// A slot holding `value`.
pub fn set<T>(value: T) -> Slot<T> {
    Some(Some(value))
}

/// A slot present as `null`.
pub fn cleared<T>() -> Slot<T> {
    Some(None)
}

fn value<T>(slot: &Slot<T>) -> Option<&T> {
    slot.as_ref().and_then(Option::as_ref)
}

fn present<'de, D, T>(deserializer: D) -> Result<Slot<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A level entry before accumulation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LevelFields {
    #[serde(default)]
    pub sizes: Vec<u32>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub addr: Option<u32>,
}

/// A comparison entry or the comparison default template.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonFields {
    #[serde(default, deserialize_with = "present")]
    pub level: Slot<String>,
    #[serde(rename = "opA", default, deserialize_with = "present")]
    pub op_a: Slot<String>,
    #[serde(rename = "opB", default, deserialize_with = "present")]
    pub op_b: Slot<String>,
    #[serde(default, deserialize_with = "present")]
    pub sizes: Slot<Vec<u32>>,
    #[serde(default, deserialize_with = "present")]
    pub types: Slot<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub form: Slot<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Slot<String>,
}

impl ComparisonFields {
    pub fn level(&self) -> Option<&str> {
        value(&self.level).map(String::as_str)
    }

    pub fn op_a(&self) -> Option<&str> {
        value(&self.op_a).map(String::as_str)
    }

    pub fn op_b(&self) -> Option<&str> {
        value(&self.op_b).map(String::as_str)
    }

    pub fn sizes(&self) -> &[u32] {
        value(&self.sizes).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn types(&self) -> &[String] {
        value(&self.types).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn form(&self) -> Option<&str> {
        value(&self.form).map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        value(&self.description).map(String::as_str)
    }
}

/// An opcode entry, a variant entry, or the opcode default template.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpcodeFields {
    #[serde(rename = "opA", default, deserialize_with = "present")]
    pub op_a: Slot<String>,
    #[serde(rename = "opB", default, deserialize_with = "present")]
    pub op_b: Slot<String>,
    #[serde(default, deserialize_with = "present")]
    pub sizes: Slot<Vec<u32>>,
    #[serde(default, deserialize_with = "present")]
    pub types: Slot<Vec<String>>,
    #[serde(default, deserialize_with = "present")]
    pub sizetype: Slot<bool>,
    #[serde(rename = "unsized", default, deserialize_with = "present")]
    pub is_unsized: Slot<bool>,
    #[serde(default, deserialize_with = "present")]
    pub variant: Slot<bool>,
    #[serde(default, deserialize_with = "present")]
    pub variants: Slot<Vec<OpcodeFields>>,
    #[serde(default, deserialize_with = "present")]
    pub extwords: Slot<Vec<Vec<String>>>,
    #[serde(default, deserialize_with = "present")]
    pub comparison: Slot<bool>,
    #[serde(default, deserialize_with = "present")]
    pub form: Slot<String>,
    #[serde(default, deserialize_with = "present")]
    pub fitsize: Slot<u32>,
    #[serde(default, deserialize_with = "present")]
    pub class: Slot<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Slot<String>,
}

impl OpcodeFields {
    pub fn op_a(&self) -> Option<&str> {
        value(&self.op_a).map(String::as_str)
    }

    pub fn op_b(&self) -> Option<&str> {
        value(&self.op_b).map(String::as_str)
    }

    pub fn sizes(&self) -> &[u32] {
        value(&self.sizes).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn types(&self) -> &[String] {
        value(&self.types).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn sizetype(&self) -> bool {
        value(&self.sizetype).copied().unwrap_or(false)
    }

    pub fn is_unsized(&self) -> bool {
        value(&self.is_unsized).copied().unwrap_or(false)
    }

    pub fn is_variant(&self) -> bool {
        value(&self.variant).copied().unwrap_or(false)
    }

    /// The partial variant list, if one is set.
    pub fn variants(&self) -> Option<&[OpcodeFields]> {
        value(&self.variants).map(Vec::as_slice)
    }

    pub fn extwords(&self) -> &[Vec<String>] {
        value(&self.extwords).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn comparison(&self) -> bool {
        value(&self.comparison).copied().unwrap_or(false)
    }

    pub fn form(&self) -> Option<&str> {
        value(&self.form).map(String::as_str)
    }

    pub fn fitsize(&self) -> Option<u32> {
        value(&self.fitsize).copied()
    }

    pub fn class(&self) -> Option<&str> {
        value(&self.class).map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        value(&self.description).map(String::as_str)
    }

    /// Copy of these fields with the variant markers removed, the seed for each variant.
    pub fn without_variants(&self) -> Self {
        Self {
            variant: None,
            variants: None,
            ..self.clone()
        }
    }
}

/// Every raw table handed to the compiler, each in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RawDefinitions {
    pub types: Vec<TypeDef>,
    pub classes: Vec<ClassDef>,
    pub operands: Vec<OperandDef>,
    pub levels: Vec<(String, LevelFields)>,
    pub comparison_default: ComparisonFields,
    pub comparisons: Vec<(String, ComparisonFields)>,
    pub opcode_default: OpcodeFields,
    pub opcodes: Vec<(String, OpcodeFields)>,
}
