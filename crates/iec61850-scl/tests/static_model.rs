//! Integration tests for the static back end, compiled from the feeder fixture.

use iec61850_scl::{
    compile_static_from_str, AttributeKind, FunctionalConstraint, GeneratorConfig, IedSelection,
    NodeKind, NodePayload, StaticModel,
};
use std::fs;
use std::path::PathBuf;

/// Helper function to load a test file from the `tests/data` directory.
fn load_test_file(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {}", path, e))
}

fn compile_feeder() -> StaticModel {
    let xml = load_test_file("feeder.icd");
    let config = GeneratorConfig::default().with_source_name("feeder.icd");
    compile_static_from_str(&xml, &IedSelection::default(), &config)
        .unwrap_or_else(|e| panic!("feeder.icd failed to compile: {}", e))
}

fn labels<'a>(model: &'a StaticModel, parent: &str) -> Vec<&'a str> {
    model
        .children(parent)
        .iter()
        .map(|d| d.label.as_str())
        .collect()
}

/// Logical devices are named after the IED unless they carry an `ldName`.
#[test]
fn test_logical_devices() {
    let model = compile_feeder();
    assert_eq!(model.ied_name, "IED1");

    let ctrl = model.first_logical_device().unwrap();
    assert_eq!(ctrl.name, "iedModel_CTRL");
    assert_eq!(ctrl.label, "IED1CTRL");
    assert_eq!(ctrl.sibling.as_deref(), Some("iedModel_PROT"));

    let prot = model.declaration("iedModel_PROT").unwrap();
    assert_eq!(prot.label, "FeederProt");
    assert_eq!(prot.sibling, None);
    assert_eq!(prot.kind(), NodeKind::LogicalDevice);
}

/// Walking first-child and sibling links reproduces the document order.
#[test]
fn test_tree_round_trip() {
    let model = compile_feeder();
    assert_eq!(labels(&model, "iedModel_CTRL"), ["LLN0", "GGIO1"]);
    assert_eq!(labels(&model, "iedModel_PROT"), ["LLN0", "AaMMXU1"]);
    assert_eq!(labels(&model, "iedModel_CTRL_LLN0"), ["Mod", "Beh", "NamPlt"]);
    assert_eq!(labels(&model, "iedModel_CTRL_LLN0_Mod"), ["stVal", "q", "t", "ctlModel"]);
    assert_eq!(labels(&model, "iedModel_PROT_AaMMXU1_TotW_instMag"), ["f", "i"]);
    assert_eq!(
        labels(&model, "iedModel_PROT_AaMMXU1_A_phsA_cVal"),
        ["mag", "ang"]
    );

    // Every record except the devices points at an existing parent.
    for decl in &model.declarations {
        let parent = decl.parent.as_deref().unwrap();
        if decl.kind() != NodeKind::LogicalDevice {
            assert!(
                model.declaration(parent).is_some(),
                "{} has a dangling parent {}",
                decl.name,
                parent
            );
        }
    }
}

/// The last sub data object continues into the first attribute of its parent.
#[test]
fn test_sibling_chain_crosses_into_attributes() {
    let model = compile_feeder();
    let phs_b = model.declaration("iedModel_PROT_AaMMXU1_A_phsB").unwrap();
    assert_eq!(phs_b.sibling.as_deref(), Some("iedModel_PROT_AaMMXU1_A_d"));
    assert_eq!(labels(&model, "iedModel_PROT_AaMMXU1_A"), ["phsA", "phsB", "d"]);
}

/// Basic attributes of a structure inherit its constraint and trigger options.
#[test]
fn test_structure_leaves_inherit() {
    let model = compile_feeder();
    let f = model.declaration("iedModel_PROT_AaMMXU1_A_phsA_cVal_mag_f").unwrap();
    assert_eq!(
        f.payload,
        NodePayload::DataAttribute {
            count: 0,
            fc: FunctionalConstraint::MX,
            kind: AttributeKind::Float32,
            trigger_options: 1,
            short_address: 0,
        }
    );

    let ind2 = model.declaration("iedModel_CTRL_GGIO1_Ind2_stVal").unwrap();
    assert!(matches!(
        ind2.payload,
        NodePayload::DataAttribute { short_address: 101, .. }
    ));
}

/// Template defaults and instance values both end up in `initializeValues`.
#[test]
fn test_initializers() {
    let model = compile_feeder();
    let expression = |target: &str| {
        model
            .initializers
            .iter()
            .find(|i| i.target == target)
            .map(|i| i.expression.as_str())
    };

    assert_eq!(
        expression("iedModel_CTRL_LLN0_Mod_stVal"),
        Some("MmsValue_newIntegerFromInt32(1)")
    );
    assert_eq!(
        expression("iedModel_CTRL_LLN0_Mod_ctlModel"),
        Some("MmsValue_newIntegerFromInt32(0)")
    );
    assert_eq!(
        expression("iedModel_CTRL_LLN0_NamPlt_vendor"),
        Some("MmsValue_newVisibleString(\"ACME\")")
    );
    assert_eq!(
        expression("iedModel_CTRL_GGIO1_Ind1_stVal"),
        Some("MmsValue_newBoolean(false)")
    );
    assert_eq!(
        expression("iedModel_PROT_AaMMXU1_TotW_instMag_f"),
        Some("MmsValue_newFloat(1.5)")
    );
    assert_eq!(
        expression("iedModel_PROT_AaMMXU1_A_d"),
        Some("MmsValue_newVisibleString(\"Phase currents\")")
    );
    // No instance value on the second device's LLN0.
    assert_eq!(expression("iedModel_PROT_LLN0_Mod_ctlModel"), None);
}

/// Data set members name the logical device they live in.
#[test]
fn test_data_sets() {
    let model = compile_feeder();
    assert_eq!(model.data_sets.len(), 1);

    let ds = &model.data_sets[0];
    assert_eq!(ds.name, "ds_CTRL_LLN0_Events");
    assert_eq!(ds.logical_device, "IED1CTRL");
    assert_eq!(ds.qualified_name, "LLN0$Events");
    assert_eq!(ds.sibling, None);

    let entries: Vec<_> = ds
        .entries
        .iter()
        .map(|e| (e.logical_device.as_str(), e.variable.as_str()))
        .collect();
    assert_eq!(
        entries,
        [
            ("IED1CTRL", "GGIO1$ST$Ind1$stVal"),
            ("FeederProt", "AaMMXU1$MX$TotW$instMag$i"),
        ]
    );
    assert_eq!(
        ds.entries[0].sibling.as_deref(),
        Some("ds_CTRL_LLN0_Events_fcda1")
    );
}

/// Indexed report blocks become one record per instance, all in one list.
#[test]
fn test_report_instances() {
    let model = compile_feeder();
    let names: Vec<_> = model
        .report_controls
        .iter()
        .map(|r| r.rcb_name.as_str())
        .collect();
    assert_eq!(names, ["brcbEV01", "brcbEV02", "brcbEV03", "urcbMX"]);

    let first = &model.report_controls[0];
    assert_eq!(first.name, "iedModel_CTRL_LLN0_report0");
    assert_eq!(first.parent, "iedModel_CTRL_LLN0");
    assert_eq!(first.rpt_id.as_deref(), Some("IED1CTRL/LLN0$BR$brcbEV"));
    assert!(first.buffered);
    assert_eq!(first.trigger_options, 3);
    assert_eq!(first.option_fields, 3);
    assert_eq!(first.buffer_time, 100);
    assert_eq!(first.sibling.as_deref(), Some("iedModel_CTRL_LLN0_report1"));

    // No TrgOps/OptFields: configured defaults apply.
    let unindexed = &model.report_controls[3];
    assert_eq!(unindexed.trigger_options, 16);
    assert_eq!(unindexed.option_fields, 32);
    assert!(!unindexed.buffered);
    assert_eq!(unindexed.sibling, None);
}

/// A GSE block gets its address from the Communication section when listed there.
#[test]
fn test_gse_addresses() {
    let model = compile_feeder();
    assert_eq!(model.gse_controls.len(), 2);

    let events = &model.gse_controls[0];
    assert_eq!(events.cb_name, "gcbEvents");
    assert_eq!(events.app_id.as_deref(), Some("events"));
    assert_eq!(events.conf_rev, 2);
    let (name, address) = events.address.as_ref().unwrap();
    assert_eq!(name, "iedModel_CTRL_LLN0_gse0_address");
    assert_eq!(address.vlan_priority, 4);
    assert_eq!(address.vlan_id, 1);
    assert_eq!(address.app_id, 0x1000);
    assert_eq!(address.mac_address, [0x01, 0x0c, 0xcd, 0x01, 0x00, 0x01]);

    let unlisted = &model.gse_controls[1];
    assert_eq!(unlisted.cb_name, "gcbNoAddr");
    assert!(unlisted.address.is_none());
}

/// Spot checks of the rendered C unit and header.
#[test]
fn test_rendered_sources() {
    let sources = compile_feeder().render_c_named("feeder_model").unwrap();
    let c = &sources.c_source;

    assert!(c.starts_with("/*\n * feeder_model.c\n *\n * automatically generated from feeder.icd\n */\n"));
    assert!(c.contains("extern DataAttribute iedModel_CTRL_GGIO1_Ind2_stVal;"));
    assert!(c.contains(
        "DataAttribute iedModel_CTRL_GGIO1_Ind2_stVal = {\n    DataAttributeModelType,\n    \"stVal\",\n    (ModelNode*) &iedModel_CTRL_GGIO1_Ind2,\n    (ModelNode*) &iedModel_CTRL_GGIO1_Ind2_q,\n    NULL,\n    0,\n    ST,\n    BOOLEAN,\n    1,\n    NULL,\n    101\n};"
    ));
    assert!(c.contains("PhyComAddress iedModel_CTRL_LLN0_gse0_address = {\n  4,\n  1,\n  4096,\n  {0x01, 0x0c, 0xcd, 0x01, 0x00, 0x01}\n};"));
    assert!(c.contains(
        "GSEControlBlock iedModel_CTRL_LLN0_gse1 = {&iedModel_CTRL_LLN0, \"gcbNoAddr\", NULL, NULL, 0, false, NULL, NULL};"
    ));
    assert!(c.contains(
        "IedModel iedModel = {\n    \"IED1\",\n    &iedModel_CTRL,\n    &ds_CTRL_LLN0_Events,\n    &iedModel_CTRL_LLN0_report0,\n    &iedModel_CTRL_LLN0_gse0,\n    initializeValues\n};"
    ));

    // Every record is declared before it is defined.
    for decl in ["iedModel_PROT_AaMMXU1_A_d", "ds_CTRL_LLN0_Events_fcda1"] {
        let declared = c.find(&format!(" {};", decl)).unwrap();
        let defined = c.find(&format!(" {} = {{", decl)).unwrap();
        assert!(declared < defined, "{} used before declaration", decl);
    }

    let h = &sources.header;
    assert!(h.contains("#ifndef FEEDER_MODEL_H_"));
    assert!(h.contains("#define IEDMODEL_CTRL_GGIO1_Ind2_stVal (&iedModel_CTRL_GGIO1_Ind2_stVal)"));
    assert!(h.trim_end().ends_with("#endif /* FEEDER_MODEL_H_ */"));
}

/// Naming an access point the IED does not have is an error.
#[test]
fn test_unknown_selection_is_rejected() {
    let xml = load_test_file("feeder.icd");
    let result = compile_static_from_str(
        &xml,
        &IedSelection::new(Some("IED1".to_string()), Some("AP9".to_string())),
        &GeneratorConfig::default(),
    );
    assert!(result.is_err(), "Expected an error, got {:?}", result);
}
