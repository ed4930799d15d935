use std::fs;
use std::path::PathBuf;

use isadef::isa::{DefError, IsaDefinition, JsonReport, OpcodeAttachments, Report};
use tempfile::tempdir;

fn exvm_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("defs/exvm")
}

fn load_exvm() -> IsaDefinition {
    IsaDefinition::from_directory(exvm_root()).expect("compile exvm definitions")
}

fn forms(def: &IsaDefinition, name: &str) -> Vec<String> {
    let opcode = def.opcode(name).expect("opcode present");
    def.forms(opcode).collect()
}

#[test]
fn compiles_sample_definition_set() {
    let def = load_exvm();
    assert_eq!(def.types.len(), 5);
    assert_eq!(def.classes.len(), 5);
    assert_eq!(def.operands.len(), 8);
    assert_eq!(def.levels.len(), 3);
    assert_eq!(def.comparisons.len(), 5);

    let names: Vec<_> = def.opcodes.iter().map(|op| op.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["NOP", "MOV", "ADD", "LDI", "FADD", "CVT", "BR", "JMP", "SYS", "RET"]
    );

    let float = def.levels.get("float").expect("float level");
    assert_eq!(float.sizes.as_slice(), &[8, 16, 32, 64]);
    assert_eq!(float.types, vec!["B", "W", "L", "F", "D"]);
    assert_eq!(float.addr, 32);
}

#[test]
fn expands_sample_forms() {
    let def = load_exvm();
    assert_eq!(forms(&def, "NOP"), vec!["nop"]);
    assert_eq!(
        forms(&def, "MOV"),
        vec!["mov.B r<N>, r<N>", "mov.W r<N>, r<N>", "mov.L r<N>, r<N>"]
    );
    assert_eq!(
        forms(&def, "LDI"),
        vec!["ldi.B r<N>, #16", "ldi.W r<N>, #16", "ldi.L r<N>, #16"]
    );
    assert_eq!(
        forms(&def, "FADD"),
        vec![
            "fadd.32 f<N>, f<N>",
            "fadd.64 f<N>, f<N>",
            "fadd.F f<N>, f<N>",
            "fadd.D f<N>, f<N>",
        ]
    );
    assert_eq!(forms(&def, "CVT"), vec!["cvt.F f<N>, r<N> ; 32.0"]);

    let branches = forms(&def, "BR");
    assert_eq!(branches.len(), 10);
    assert_eq!(branches[0], "beq.B r<N>, r<N>, @rel");
    assert_eq!(branches[9], "bflt.D r<N>, r<N>, @rel");
}

#[test]
fn resolves_sample_variants() {
    let def = load_exvm();
    let sys = def.opcode("SYS").expect("SYS");
    assert!(sys.is_variant_bearing());
    let expanded: Vec<Vec<String>> = sys
        .variants()
        .iter()
        .map(|variant| def.forms(variant).collect())
        .collect();
    assert_eq!(
        expanded,
        vec![vec!["sys.halt"], vec!["sys.trap.B #4"], vec!["sys.call"]]
    );
    assert_eq!(sys.variants()[2].operands.ext_words, vec![vec!["imm8", "imm8"]]);
    assert_eq!(
        def.opcode("BR").map(|op| op.attachments()),
        Some(OpcodeAttachments::COMPARISON | OpcodeAttachments::EXTENDED)
    );
}

#[test]
fn report_summarises_and_lists() {
    let def = load_exvm();
    let text = Report::new(&def).expect("report").to_string();
    assert!(text.starts_with(
        "Parsed:\n\t5 TypeDefs\n\t5 ClassDefs\n\t8 OperandDefs\n\t3 LevelDefs\n\t5 ComparisonDefs\n\t10 OpcodeDefs\n"
    ));
    assert!(text.contains("LDI (extended, fit-size)\n\tldi.B r<N>, #16\n"));
    assert!(text.contains("SYS\n\t[0] sys.halt\n\t[1] sys.trap.B #4\n\t[2] sys.call\n"));

    let json = JsonReport::new(&def)
        .expect("json report")
        .to_json_pretty()
        .expect("render json");
    assert!(json.contains(&def.fingerprint().expect("fingerprint").to_string()));
}

#[test]
fn copied_set_compiles_identically() {
    let dir = tempdir().expect("tempdir");
    for entry in fs::read_dir(exvm_root()).expect("read exvm") {
        let path = entry.expect("dir entry").path();
        let name = path.file_name().expect("file name");
        fs::copy(&path, dir.path().join(name)).expect("copy document");
    }
    let copy = IsaDefinition::from_directory(dir.path()).expect("compile copy");
    let original = load_exvm();
    assert_eq!(copy, original);
    assert_eq!(
        copy.fingerprint().expect("fingerprint"),
        original.fingerprint().expect("fingerprint")
    );
}

#[test]
fn broken_fragment_stops_compilation() {
    let dir = tempdir().expect("tempdir");
    for entry in fs::read_dir(exvm_root()).expect("read exvm") {
        let path = entry.expect("dir entry").path();
        let name = path.file_name().expect("file name");
        fs::copy(&path, dir.path().join(name)).expect("copy document");
    }
    fs::remove_file(dir.path().join("opcodes_flow.json")).expect("remove fragment");
    let err = IsaDefinition::from_directory(dir.path()).unwrap_err();
    assert!(
        matches!(err, DefError::Load { ref document, .. } if document.ends_with("opcodes_flow.json")),
        "{err}"
    );
    assert!(matches!(
        IsaDefinition::from_directory(dir.path().join("missing")),
        Err(DefError::Path { .. })
    ));
}
