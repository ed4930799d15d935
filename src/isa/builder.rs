//! Helpers for assembling definition document sets in memory without touching the
//! filesystem.
//!
//! The builder emits the same document layout the directory loader reads, so a set
//! built here exercises the full load path, end markers and opcode fragments included.

use serde_json::{Map, Value, json};

use crate::isa::ast::END_MARKER;
use crate::loader::defs::loader::{
    CLASSES_DOCUMENT, COMPARISONS_DOCUMENT, LEVELS_DOCUMENT, OPCODES_DOCUMENT,
    OPERANDS_DOCUMENT, TYPES_DOCUMENT,
};
use crate::loader::defs::store::{DATA_KEY, MemoryStore};

/// Name of the opcode fragment document the builder writes its opcodes to.
pub const DEFAULT_FRAGMENT: &str = "opcodes_main";

/// Convenience wrapper for producing a complete document set.
#[derive(Debug, Clone)]
pub struct DefinitionBuilder {
    types: Map<String, Value>,
    classes: Map<String, Value>,
    operands: Map<String, Value>,
    levels: Map<String, Value>,
    comparison_default: Value,
    comparisons: Map<String, Value>,
    opcode_default: Value,
    opcodes: Map<String, Value>,
    fragment: String,
}

impl Default for DefinitionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionBuilder {
    /// Creates an empty set with empty default templates.
    pub fn new() -> Self {
        Self {
            types: Map::new(),
            classes: Map::new(),
            operands: Map::new(),
            levels: Map::new(),
            comparison_default: json!({}),
            comparisons: Map::new(),
            opcode_default: json!({}),
            opcodes: Map::new(),
            fragment: DEFAULT_FRAGMENT.to_string(),
        }
    }

    /// A small valid set: one 4-bit register operand, one level, and defaults that make
    /// any `{}` comparison or opcode entry valid on their own.
    pub fn minimal() -> Self {
        let mut builder = Self::new();
        builder
            .type_def("B", json!({"bits": 8}))
            .type_def("W", json!({"bits": 16}))
            .class("alu", json!({"description": "arithmetic"}))
            .operand("r", json!({"bits": 4, "type": "register"}))
            .level("L0", json!({"sizes": [8], "types": ["B"], "addr": 0}))
            .comparison_default(json!({
                "level": "L0", "opA": "r", "opB": "r", "sizes": [8], "types": ["B"]
            }))
            .opcode_default(json!({"opA": "r", "opB": "r"}));
        builder
    }

    pub fn type_def(&mut self, name: impl Into<String>, descriptor: Value) -> &mut Self {
        self.types.insert(name.into(), descriptor);
        self
    }

    pub fn class(&mut self, name: impl Into<String>, descriptor: Value) -> &mut Self {
        self.classes.insert(name.into(), descriptor);
        self
    }

    pub fn operand(&mut self, name: impl Into<String>, entry: Value) -> &mut Self {
        self.operands.insert(name.into(), entry);
        self
    }

    /// Appends a level; levels accumulate in the order they are added.
    pub fn level(&mut self, name: impl Into<String>, entry: Value) -> &mut Self {
        self.levels.insert(name.into(), entry);
        self
    }

    pub fn comparison_default(&mut self, template: Value) -> &mut Self {
        self.comparison_default = template;
        self
    }

    pub fn comparison(&mut self, name: impl Into<String>, entry: Value) -> &mut Self {
        self.comparisons.insert(name.into(), entry);
        self
    }

    pub fn opcode_default(&mut self, template: Value) -> &mut Self {
        self.opcode_default = template;
        self
    }

    pub fn opcode(&mut self, name: impl Into<String>, entry: Value) -> &mut Self {
        self.opcodes.insert(name.into(), entry);
        self
    }

    /// Renames the fragment document that carries the opcode entries.
    pub fn fragment(&mut self, name: impl Into<String>) -> &mut Self {
        self.fragment = name.into();
        self
    }

    /// Renders every document into a fresh store.
    pub fn build(&self) -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .insert_value(TYPES_DOCUMENT, &section(TYPES_DOCUMENT, &self.types))
            .insert_value(CLASSES_DOCUMENT, &section(CLASSES_DOCUMENT, &self.classes))
            .insert_value(OPERANDS_DOCUMENT, &section(OPERANDS_DOCUMENT, &self.operands))
            .insert_value(LEVELS_DOCUMENT, &section(LEVELS_DOCUMENT, &self.levels))
            .insert_value(
                COMPARISONS_DOCUMENT,
                &json!({DATA_KEY: {
                    "default": self.comparison_default,
                    "comparisons": terminated(&self.comparisons),
                }}),
            )
            .insert_value(
                OPCODES_DOCUMENT,
                &json!({DATA_KEY: {
                    "default": self.opcode_default,
                    "opcodedefs": [self.fragment],
                }}),
            )
            .insert_value(
                self.fragment.as_str(),
                &section("opcodes", &self.opcodes),
            );
        store
    }
}

fn section(key: &str, entries: &Map<String, Value>) -> Value {
    json!({DATA_KEY: {key: terminated(entries)}})
}

fn terminated(entries: &Map<String, Value>) -> Value {
    let mut map = entries.clone();
    map.insert(END_MARKER.to_string(), Value::Null);
    Value::Object(map)
}
