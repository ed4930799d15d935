//! Finalized, immutable definition records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use super::table::Named;

/// Inline storage for the handful of operand sizes a level or definition declares.
pub type SizeList = SmallVec<[u32; 4]>;

/// Operand kind that marks a field as the variant selector.
pub const VARIANT_SELECTOR_KIND: &str = "variant";

/// Scalar type descriptor, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDef {
    pub name: String,
    pub descriptor: Value,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, descriptor: Value) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }
}

/// Opcode grouping descriptor, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDef {
    pub name: String,
    pub descriptor: Value,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, descriptor: Value) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }
}

/// A fixed-width encoded operand field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperandDef {
    #[serde(skip_deserializing)]
    pub name: String,
    pub bits: u32,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Addressing metadata carried through untouched.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl OperandDef {
    pub fn new(name: impl Into<String>, bits: u32) -> Self {
        Self {
            name: name.into(),
            bits,
            kind: None,
            attributes: Map::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn is_variant_selector(&self) -> bool {
        self.kind.as_deref() == Some(VARIANT_SELECTOR_KIND)
    }
}

/// Cumulative capability set of a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelDef {
    pub name: String,
    pub sizes: SizeList,
    pub types: Vec<String>,
    pub addr: u32,
}

impl LevelDef {
    pub fn supports_size(&self, size: u32) -> bool {
        self.sizes.contains(&size)
    }

    pub fn supports_type(&self, ty: &str) -> bool {
        self.types.iter().any(|candidate| candidate == ty)
    }
}

/// A merged and validated comparison predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonDef {
    pub name: String,
    pub level: String,
    #[serde(rename = "opA")]
    pub op_a: String,
    #[serde(rename = "opB")]
    pub op_b: String,
    pub sizes: SizeList,
    pub types: Vec<String>,
    pub form: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

macro_rules! impl_named {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Named for $ty {
                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

impl_named!(TypeDef, ClassDef, OperandDef, LevelDef, ComparisonDef);

/// De-duplicates sizes, keeping the first occurrence of each.
pub(crate) fn unique_sizes(sizes: &[u32]) -> SizeList {
    let mut out = SizeList::new();
    for &size in sizes {
        if !out.contains(&size) {
            out.push(size);
        }
    }
    out
}

/// De-duplicates names, keeping the first occurrence of each.
pub(crate) fn unique_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref();
        if !out.iter().any(|existing| existing == name) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operand_keeps_addressing_metadata() {
        let operand: OperandDef = serde_json::from_value(json!({
            "bits": 4,
            "type": "reg",
            "mode": "direct"
        }))
        .expect("parse operand");
        assert_eq!(operand.bits, 4);
        assert_eq!(operand.kind.as_deref(), Some("reg"));
        assert_eq!(operand.attributes.get("mode"), Some(&json!("direct")));
        assert!(!operand.is_variant_selector());
        assert!(OperandDef::new("v", 4).with_kind("variant").is_variant_selector());
    }

    #[test]
    fn uniqueness_preserves_first_position() {
        assert_eq!(unique_sizes(&[16, 8, 16, 32, 8]).as_slice(), &[16, 8, 32]);
        assert_eq!(unique_names(["W", "B", "W"]), vec!["W", "B"]);
    }
}
