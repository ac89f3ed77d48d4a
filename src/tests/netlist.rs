//! Serializer contract tests: emission order, deduplication, passthrough,
//! suppression, and the connectivity gates.

use std::sync::Arc;

use crate::backend::spice::{save_spice, SpiceBackend};
use crate::factory::Factory;
use crate::layout::geom::{Orient, Point};
use crate::schematic::gate::{and2, AndParams};
use crate::schematic::precharge::{precharge, PrechargeParams};
use crate::tech::sky130;
use crate::Error;

fn netlist_string(top: &Arc<crate::schematic::Module>) -> String {
    let mut backend = SpiceBackend::new(Vec::new());
    backend.netlist(top).unwrap();
    String::from_utf8(backend.output()).unwrap()
}

#[test]
fn test_and2_emission() {
    let mut fab = Factory::sky130().unwrap();
    let m = and2(
        &AndParams {
            name: "nl_and2".to_string(),
        },
        &mut fab,
    )
    .unwrap();
    let out = netlist_string(&m);

    // Each leaf body appears exactly once, before the compound that
    // references it.
    assert_eq!(out.matches(".SUBCKT nand2").count(), 1);
    assert_eq!(out.matches(".SUBCKT inv").count(), 1);
    assert!(out.find(".SUBCKT nand2").unwrap() < out.find(".SUBCKT nl_and2").unwrap());
    assert!(out.find(".SUBCKT inv").unwrap() < out.find(".SUBCKT nl_and2").unwrap());

    assert!(out.contains(".SUBCKT nl_and2 a b x vdd vss\n"));
    assert!(out.contains("Xnand a b xb vdd vss nand2\n"));
    assert!(out.contains("Xinv xb x vdd vss inv\n"));
    assert!(out.contains(".ENDS nl_and2\n"));
}

#[test]
fn test_shared_child_emitted_once() {
    let mut fab = Factory::sky130().unwrap();
    let shared = and2(
        &AndParams {
            name: "shared_gate".to_string(),
        },
        &mut fab,
    )
    .unwrap();

    let mut parents = Vec::new();
    for name in ["parent_a", "parent_b"] {
        let mut p = fab.compound(name).unwrap();
        p.add_pins(&["a", "b", "x", "vdd", "vss"]);
        let id = p
            .add_instance("g", &shared, Point::zero(), Orient::R0)
            .unwrap();
        p.connect(id, &["a", "b", "x", "vdd", "vss"]).unwrap();
        parents.push(Arc::new(p));
    }

    let mut top = fab.compound("dedup_top").unwrap();
    top.add_pins(&["a", "b", "x", "y", "vdd", "vss"]);
    let id = top
        .add_instance("p_a", &parents[0], Point::zero(), Orient::R0)
        .unwrap();
    top.connect(id, &["a", "b", "x", "vdd", "vss"]).unwrap();
    let id = top
        .add_instance("p_b", &parents[1], Point::zero(), Orient::R0)
        .unwrap();
    top.connect(id, &["a", "b", "y", "vdd", "vss"]).unwrap();

    let out = netlist_string(&Arc::new(top));
    assert_eq!(out.matches(".SUBCKT shared_gate").count(), 1);
    assert_eq!(out.matches(".SUBCKT parent_a").count(), 1);
    assert_eq!(out.matches(".SUBCKT parent_b").count(), 1);
}

#[test]
fn test_leaf_passthrough_is_byte_identical() {
    let mut fab = Factory::sky130().unwrap();
    let expected = fab.lib().get(sky130::INV).unwrap().spice.clone();
    let m = fab.leaf(sky130::INV).unwrap();
    assert_eq!(netlist_string(&m), expected);
}

#[test]
fn test_empty_compound_emits_nothing() {
    let mut fab = Factory::sky130().unwrap();
    let mut m = fab.compound("geometry_only").unwrap();
    m.add_pins(&["a", "b"]);
    assert!(netlist_string(&Arc::new(m)).is_empty());
}

#[test]
fn test_physical_only_instances_suppress_block() {
    let mut fab = Factory::sky130().unwrap();
    let inv = fab.leaf(sky130::INV).unwrap();
    let mut m = fab.compound("abutment_helper").unwrap();
    m.add_pins(&["a", "y"]);
    let id = m
        .add_instance("filler", &inv, Point::zero(), Orient::R0)
        .unwrap();
    m.connect(id, &[] as &[&str]).unwrap();
    let out = netlist_string(&Arc::new(m));
    // The filler has no electrical meaning, so no block is emitted; the
    // leaf definition still precedes any later use.
    assert!(!out.contains(".SUBCKT abutment_helper"));
}

#[test]
fn test_pinless_wrapper_emits_children_only() {
    let mut fab = Factory::sky130().unwrap();
    let gate = and2(
        &AndParams {
            name: "wrapped_gate".to_string(),
        },
        &mut fab,
    )
    .unwrap();
    let mut m = fab.compound("pinless_wrapper").unwrap();
    let id = m
        .add_instance("g", &gate, Point::zero(), Orient::R0)
        .unwrap();
    m.connect(id, &["a", "b", "x", "vdd", "vss"]).unwrap();
    let out = netlist_string(&Arc::new(m));
    assert!(out.contains(".SUBCKT wrapped_gate"));
    assert!(!out.contains("pinless_wrapper"));
}

#[test]
fn test_pin_count_mismatch_rejected_on_connect() {
    let mut fab = Factory::sky130().unwrap();
    let nand = fab.leaf(sky130::NAND2).unwrap();
    let mut m = fab.compound("mismatch_checked").unwrap();
    m.add_pins(&["a", "b", "x", "vdd", "vss"]);
    let id = m
        .add_instance("g1", &nand, Point::zero(), Orient::R0)
        .unwrap();
    // Four nets for a five-pin master.
    let err = m.connect(id, &["a", "b", "x", "vdd"]).unwrap_err();
    assert!(matches!(
        err,
        Error::PinCountMismatch {
            expected: 5,
            found: 4,
            ..
        }
    ));
}

#[test]
fn test_pin_count_mismatch_blocks_output_file() {
    let mut fab = Factory::sky130().unwrap();
    let nand = fab.leaf(sky130::NAND2).unwrap();
    let mut m = fab.compound("mismatch_unchecked").unwrap();
    m.add_pins(&["a", "b", "x", "vdd", "vss"]);
    let id = m
        .add_instance("g1", &nand, Point::zero(), Orient::R0)
        .unwrap();
    // The unchecked path defers validation to serialization.
    m.connect_unchecked(id, &["a", "b", "x", "vdd"]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mismatch.spice");
    let err = save_spice(&path, &Arc::new(m)).unwrap_err();
    assert!(matches!(err, Error::PinCountMismatch { .. }));
    assert!(!path.exists());
}

#[test]
fn test_unconnected_instance_rejected_at_serialization() {
    let mut fab = Factory::sky130().unwrap();
    let inv = fab.leaf(sky130::INV).unwrap();
    let mut m = fab.compound("unconnected").unwrap();
    m.add_pins(&["a", "y", "vdd", "vss"]);
    let id = m
        .add_instance("g1", &inv, Point::zero(), Orient::R0)
        .unwrap();
    m.connect(id, &["a", "y", "vdd", "vss"]).unwrap();
    let _ = m
        .add_instance("g2", &inv, Point::zero(), Orient::R0)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unconnected.spice");
    let err = save_spice(&path, &Arc::new(m)).unwrap_err();
    assert!(matches!(
        err,
        Error::UnconnectedInstance {
            instances: 2,
            connections: 1,
            ..
        }
    ));
    assert!(!path.exists());
}

#[test]
fn test_out_of_order_connect_rejected() {
    let mut fab = Factory::sky130().unwrap();
    let inv = fab.leaf(sky130::INV).unwrap();
    let mut m = fab.compound("out_of_order").unwrap();
    m.add_pins(&["a", "y", "vdd", "vss"]);
    let _ = m
        .add_instance("g1", &inv, Point::zero(), Orient::R0)
        .unwrap();
    let id2 = m
        .add_instance("g2", &inv, Point::zero(), Orient::R0)
        .unwrap();
    let err = m.connect(id2, &["a", "y", "vdd", "vss"]).unwrap_err();
    assert!(matches!(err, Error::UnconnectedInstance { .. }));
}

#[test]
fn test_duplicate_module_name_and_reset() {
    let mut fab = Factory::sky130().unwrap();
    let _ = fab.compound("collision").unwrap();
    let err = fab.compound("collision").unwrap_err();
    assert!(matches!(err, Error::DuplicateModuleName(_)));

    // Library cells are reusable without a reset.
    let _ = fab.leaf(sky130::INV).unwrap();
    let _ = fab.leaf(sky130::INV).unwrap();

    // An explicit reset starts an independent run.
    fab.reset();
    let _ = fab.compound("collision").unwrap();
}

#[test]
fn test_device_line_emission() {
    let mut fab = Factory::sky130().unwrap();
    let pc = precharge(
        &PrechargeParams {
            name: "nl_precharge".to_string(),
            pull_up_width: 1000,
            equalizer_width: 800,
            length: 150,
        },
        &mut fab,
    )
    .unwrap();
    let out = netlist_string(&pc);
    // Devices emit templated lines in their parent and no definition.
    assert!(out.contains("Mbl_pull_up bl en_b vdd vdd sky130_fd_pr__pfet_01v8 w=1 l=0.15\n"));
    assert!(out.contains("Mbl_equalizer bl en_b br vdd sky130_fd_pr__pfet_01v8 w=0.8 l=0.15\n"));
    assert!(!out.contains(".SUBCKT nl_precharge_pull_up"));
}
