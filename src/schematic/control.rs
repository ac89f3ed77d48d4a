//! Clocked control: precharge, wordline, write, and sense timing strobes
//! derived from the external clock with inverter-chain delays.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::{Orient, Point};
use crate::schematic::gate::{and2, inv_chain, AndParams, InvChainParams};
use crate::schematic::{Module, PinDir};
use crate::tech::sky130;
use crate::Result;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ControlParams {
    pub name: String,
}

/// Simple control scheme: precharge while the clock is low, open the
/// wordlines while it is high, fire the sense amps off a delayed copy of
/// the clock, and gate the write drivers with the registered write enable.
pub fn control_logic(params: &ControlParams, fab: &mut Factory) -> Result<Arc<Module>> {
    let inv = fab.leaf(sky130::INV)?;
    let pc_chain = inv_chain(
        &InvChainParams {
            name: format!("{}_pc_chain", params.name),
            n: 2,
        },
        fab,
    )?;
    let wl_chain = inv_chain(
        &InvChainParams {
            name: format!("{}_wl_chain", params.name),
            n: 4,
        },
        fab,
    )?;
    let sa_chain = inv_chain(
        &InvChainParams {
            name: format!("{}_sa_chain", params.name),
            n: 8,
        },
        fab,
    )?;
    let we_and = and2(
        &AndParams {
            name: format!("{}_we_and2", params.name),
        },
        fab,
    )?;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_pin("clk", PinDir::Input);
    m.add_pin("we", PinDir::Input);
    m.add_pin("pc_b", PinDir::Output);
    m.add_pin("wl_en", PinDir::Output);
    m.add_pin("wr_en", PinDir::Output);
    m.add_pin("sae", PinDir::Output);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    let mut y = 0;
    let mut place = |m: &mut Module, name: &str, master: &Arc<Module>| {
        let loc = Point::new(0, y);
        y += master.bbox().map(|b| b.height()).unwrap_or_default();
        m.add_instance(name, master, loc, Orient::R0)
    };

    // pc_b tracks the clock: precharge is active during the low phase.
    let id = place(&mut m, "pc_buf", &pc_chain)?;
    m.connect(id, &["clk", "pc_b", "vdd", "vss"])?;
    let id = place(&mut m, "wl_buf", &wl_chain)?;
    m.connect(id, &["clk", "wl_en", "vdd", "vss"])?;
    let id = place(&mut m, "sa_delay", &sa_chain)?;
    m.connect(id, &["clk", "sae", "vdd", "vss"])?;
    let id = place(&mut m, "we_gate", &we_and)?;
    m.connect(id, &["clk", "we", "wr_en", "vdd", "vss"])?;
    // Unused spare inverter; keeps the row height uniform. No electrical
    // role, so its connection record is empty and it never reaches the
    // netlist.
    let id = place(&mut m, "spare_inv", &inv)?;
    m.connect(id, &[] as &[&str])?;

    Ok(Arc::new(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_logic() {
        let mut fab = Factory::sky130().unwrap();
        let m = control_logic(
            &ControlParams {
                name: "test_control".to_string(),
            },
            &mut fab,
        )
        .unwrap();
        assert_eq!(m.instances().len(), 5);
        assert_eq!(m.children().len(), 5);
        // The spare inverter is physical-only.
        assert!(m.conns()[4].is_empty());
        m.validate_connectivity().unwrap();
    }
}
