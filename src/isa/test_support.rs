//! Shared fixtures for unit tests.

use serde_json::json;

use super::ast::LevelFields;
use super::builder::DefinitionBuilder;
use super::diagnostic::Violation;
use super::error::DefError;
use super::level::LevelAccumulator;
use super::model::{LevelDef, OperandDef};
use super::table::Table;

/// `L0` (size 8, type B, addr 0) followed by `L1` (adds size 16, type W, addr 1).
pub(crate) fn sample_levels() -> Table<LevelDef> {
    let levels = vec![
        (
            "L0".to_string(),
            LevelFields {
                sizes: vec![8],
                types: vec!["B".into()],
                addr: Some(0),
            },
        ),
        (
            "L1".to_string(),
            LevelFields {
                sizes: vec![16],
                types: vec!["W".into()],
                addr: Some(1),
            },
        ),
    ];
    LevelAccumulator::accumulate(&levels)
}

/// Operands `r` (4), `r5` (5), selector `v` (4), `i8` (8) and `i16` (16).
pub(crate) fn operand_table() -> Table<OperandDef> {
    [
        OperandDef::new("r", 4).with_kind("register"),
        OperandDef::new("r5", 5),
        OperandDef::new("v", 4).with_kind("variant"),
        OperandDef::new("i8", 8).with_kind("immediate"),
        OperandDef::new("i16", 16).with_kind("immediate"),
    ]
    .into_iter()
    .collect()
}

/// Builder mirroring [`sample_levels`] and [`operand_table`], with two comparisons.
pub(crate) fn sample_builder() -> DefinitionBuilder {
    let mut builder = DefinitionBuilder::minimal();
    builder
        .type_def("F", json!({"bits": 32, "float": true}))
        .operand("r5", json!({"bits": 5}))
        .operand("v", json!({"bits": 4, "type": "variant"}))
        .operand("i8", json!({"bits": 8, "type": "immediate"}))
        .operand("i16", json!({"bits": 16, "type": "immediate"}))
        .level("L1", json!({"sizes": [16], "types": ["W"], "addr": 1}))
        .comparison("EQ", json!({"form": "eq"}))
        .comparison("NE", json!({"level": "L1", "sizes": [8, 16], "types": ["B", "W"], "form": "ne"}));
    builder
}

/// Unwraps the violation of a validation failure and checks its rule code.
pub(crate) fn expect_violation<'e>(err: &'e DefError, code: &str) -> &'e Violation {
    let Some(violation) = err.violation() else {
        panic!("expected a rule violation, got: {err}");
    };
    assert_eq!(violation.code, code, "unexpected rule: {err}");
    violation
}
