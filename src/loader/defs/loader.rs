//! Loading pipeline that pulls every named document from a store and produces the raw
//! definition tables handed to the compiler.

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::isa::ast::{ComparisonFields, LevelFields, OpcodeFields, RawDefinitions};
use crate::isa::error::DefError;
use crate::isa::model::{ClassDef, OperandDef, TypeDef};

use super::document::{descriptors, entries, name_list, record};
use super::store::{DocumentStore, RawDocument};

pub const TYPES_DOCUMENT: &str = "types";
pub const CLASSES_DOCUMENT: &str = "classes";
pub const OPERANDS_DOCUMENT: &str = "operands";
pub const LEVELS_DOCUMENT: &str = "levels";
pub const COMPARISONS_DOCUMENT: &str = "comparisons";
pub const OPCODES_DOCUMENT: &str = "opcodes";

/// Every document the loader requires, in load order.
pub const DOCUMENTS: [&str; 6] = [
    TYPES_DOCUMENT,
    CLASSES_DOCUMENT,
    OPERANDS_DOCUMENT,
    LEVELS_DOCUMENT,
    COMPARISONS_DOCUMENT,
    OPCODES_DOCUMENT,
];

const DEFAULT_KEY: &str = "default";
const COMPARISONS_KEY: &str = "comparisons";
const OPCODES_KEY: &str = "opcodes";
const OPCODE_FRAGMENTS_KEY: &str = "opcodedefs";

pub struct DefinitionLoader<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: DocumentStore + ?Sized> DefinitionLoader<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Loads every required document, then extracts the raw tables in pipeline order.
    pub fn load(&self) -> Result<RawDefinitions, DefError> {
        let [types, classes, operands, levels, comparisons, opcodes] =
            DOCUMENTS.map(|name| self.store.load(name));
        let (types, classes, operands, levels, comparisons, opcodes) =
            (types?, classes?, operands?, levels?, comparisons?, opcodes?);

        let (comparison_default, comparison_entries) = Self::comparisons(&comparisons)?;
        let (opcode_default, opcode_entries) = self.opcodes(&opcodes)?;
        let raw = RawDefinitions {
            types: Self::types(&types)?,
            classes: Self::classes(&classes)?,
            operands: Self::operands(&operands)?,
            levels: Self::levels(&levels)?,
            comparison_default,
            comparisons: comparison_entries,
            opcode_default,
            opcodes: opcode_entries,
        };
        debug!(
            types = raw.types.len(),
            classes = raw.classes.len(),
            operands = raw.operands.len(),
            levels = raw.levels.len(),
            comparisons = raw.comparisons.len(),
            opcodes = raw.opcodes.len(),
            "loaded raw definitions"
        );
        Ok(raw)
    }

    fn types(doc: &RawDocument) -> Result<Vec<TypeDef>, DefError> {
        let map = doc.section(TYPES_DOCUMENT)?;
        Ok(descriptors(map)
            .into_iter()
            .map(|(name, descriptor)| TypeDef::new(name, descriptor))
            .collect())
    }

    fn classes(doc: &RawDocument) -> Result<Vec<ClassDef>, DefError> {
        let map = doc.section(CLASSES_DOCUMENT)?;
        Ok(descriptors(map)
            .into_iter()
            .map(|(name, descriptor)| ClassDef::new(name, descriptor))
            .collect())
    }

    fn operands(doc: &RawDocument) -> Result<Vec<OperandDef>, DefError> {
        let map = doc.section(OPERANDS_DOCUMENT)?;
        Ok(entries::<OperandDef>(doc, OPERANDS_DOCUMENT, map)?
            .into_iter()
            .map(|(name, operand)| OperandDef { name, ..operand })
            .collect())
    }

    fn levels(doc: &RawDocument) -> Result<Vec<(String, LevelFields)>, DefError> {
        entries(doc, LEVELS_DOCUMENT, doc.section(LEVELS_DOCUMENT)?)
    }

    fn comparisons(
        doc: &RawDocument,
    ) -> Result<(ComparisonFields, Vec<(String, ComparisonFields)>), DefError> {
        let default = record(doc, DEFAULT_KEY)?;
        let list = entries(doc, COMPARISONS_KEY, doc.section(COMPARISONS_KEY)?)?;
        Ok((default, list))
    }

    /// Reads the opcode default template and concatenates inline entries followed by
    /// every listed fragment document, in order.
    fn opcodes(
        &self,
        doc: &RawDocument,
    ) -> Result<(OpcodeFields, Vec<(String, OpcodeFields)>), DefError> {
        let default = record(doc, DEFAULT_KEY)?;
        let inline = doc.optional_section(OPCODES_KEY)?;
        let fragments = name_list(doc, OPCODE_FRAGMENTS_KEY)?;
        if inline.is_none() && fragments.is_none() {
            return Err(DefError::load(
                doc.name(),
                format!("missing '{OPCODE_FRAGMENTS_KEY}' list"),
            ));
        }

        let mut combined = OpcodeList::default();
        if let Some(map) = inline {
            combined.extend(doc.name(), entries(doc, OPCODES_KEY, map)?);
        }
        for name in fragments.unwrap_or_default() {
            let fragment = self.store.load(&name)?;
            let map = fragment.section(OPCODES_KEY)?;
            let list = entries(&fragment, OPCODES_KEY, map)?;
            debug!(fragment = %name, opcodes = list.len(), "loaded opcode fragment");
            combined.extend(fragment.name(), list);
        }
        Ok((default, combined.entries))
    }
}

/// Opcode entries concatenated across documents. A repeated identifier replaces the
/// earlier entry in place.
#[derive(Default)]
struct OpcodeList {
    entries: Vec<(String, OpcodeFields)>,
    index: AHashMap<String, usize>,
}

impl OpcodeList {
    fn extend(&mut self, document: &str, list: Vec<(String, OpcodeFields)>) {
        for (id, fields) in list {
            if let Some(&slot) = self.index.get(&id) {
                warn!(opcode = %id, document, "opcode redefined; later definition wins");
                self.entries[slot].1 = fields;
                continue;
            }
            self.index.insert(id.clone(), self.entries.len());
            self.entries.push((id, fields));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::builder::DefinitionBuilder;
    use crate::loader::defs::store::MemoryStore;
    use serde_json::json;

    fn ids(raw: &RawDefinitions) -> Vec<&str> {
        raw.opcodes.iter().map(|(id, _)| id.as_str()).collect()
    }

    #[test]
    fn loads_every_table_in_declaration_order() {
        let store = DefinitionBuilder::minimal()
            .operand("a", json!({"bits": 4, "type": "reg"}))
            .level("L1", json!({"sizes": [16], "types": ["W"]}))
            .opcode("ZZZ", json!({"opA": "a", "opB": "a"}))
            .opcode("AAA", json!({"opA": "a", "opB": "a"}))
            .build();
        let raw = DefinitionLoader::new(&store).load().expect("load");
        assert_eq!(raw.levels.last().map(|(id, _)| id.as_str()), Some("L1"));
        assert_eq!(raw.operands.last().map(|op| op.name.as_str()), Some("a"));
        assert_eq!(raw.operands.last().and_then(|op| op.kind.as_deref()), Some("reg"));
        assert_eq!(ids(&raw), vec!["ZZZ", "AAA"]);
    }

    #[test]
    fn fragments_concatenate_and_later_ids_win() {
        let mut store = DefinitionBuilder::minimal().build();
        store.insert_value(
            OPCODES_DOCUMENT,
            &json!({"data": {
                "default": {"opA": "r", "opB": "r"},
                "opcodes": {"INLINE": {}},
                "opcodedefs": ["first", "second"]
            }}),
        );
        store.insert_value(
            "first",
            &json!({"data": {"opcodes": {"A": {"form": "a1"}, "B": {}, "_end": null}}}),
        );
        store.insert_value(
            "second",
            &json!({"data": {"opcodes": {"C": {}, "A": {"form": "a2"}}}}),
        );
        let raw = DefinitionLoader::new(&store).load().expect("load");
        assert_eq!(ids(&raw), vec!["INLINE", "A", "B", "C"]);
        assert_eq!(raw.opcodes[1].1.form(), Some("a2"));
    }

    #[test]
    fn missing_fragment_is_a_load_error() {
        let mut store = DefinitionBuilder::minimal().build();
        store.insert_value(
            OPCODES_DOCUMENT,
            &json!({"data": {"default": {}, "opcodedefs": ["ghost"]}}),
        );
        let err = DefinitionLoader::new(&store).load().unwrap_err();
        assert!(matches!(err, DefError::Load { ref document, .. } if document == "ghost"));
    }

    #[test]
    fn missing_required_document_is_a_load_error() {
        let mut store: MemoryStore = DefinitionBuilder::minimal().build();
        store.remove(LEVELS_DOCUMENT);
        let err = DefinitionLoader::new(&store).load().unwrap_err();
        assert!(matches!(err, DefError::Load { ref document, .. } if document == LEVELS_DOCUMENT));
    }

    #[test]
    fn unknown_opcode_keys_are_rejected() {
        let store = DefinitionBuilder::minimal()
            .opcode("BAD", json!({"opA": "r", "opb": "r"}))
            .build();
        let err = DefinitionLoader::new(&store).load().unwrap_err();
        assert!(err.to_string().contains("opcodes entry 'BAD'"), "{err}");
    }

    #[test]
    fn opcode_document_needs_a_source_of_opcodes() {
        let mut store = DefinitionBuilder::minimal().build();
        store.insert_value(OPCODES_DOCUMENT, &json!({"data": {"default": {}}}));
        let err = DefinitionLoader::new(&store).load().unwrap_err();
        assert!(err.to_string().contains("opcodedefs"), "{err}");
    }
}
