//! Gates composed from library cells.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::{Orient, Point};
use crate::layout::wire::Path;
use crate::schematic::{Module, PinDir};
use crate::tech::sky130;
use crate::{bus_bit, Result};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AndParams {
    pub name: String,
}

/// AND2 from a library NAND2 followed by an inverter.
pub fn and2(params: &AndParams, fab: &mut Factory) -> Result<Arc<Module>> {
    let nand = fab.leaf(sky130::NAND2)?;
    let inv = fab.leaf(sky130::INV)?;
    let rail_width = 3 * fab.pdk().config().layer("met1").width;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_pin("a", PinDir::Input);
    m.add_pin("b", PinDir::Input);
    m.add_pin("x", PinDir::Output);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    let nand_width = nand.bbox().map(|b| b.width()).unwrap_or_default();
    let g1 = m.add_instance("nand", &nand, Point::zero(), Orient::R0)?;
    m.connect(g1, &["a", "b", "xb", "vdd", "vss"])?;
    let g2 = m.add_instance("inv", &inv, Point::new(nand_width, 0), Orient::R0)?;
    m.connect(g2, &["xb", "x", "vdd", "vss"])?;

    // Supply rails along the bottom (vss) and top (vdd) cell edges.
    let bbox = m.bbox().unwrap_or_default();
    for y in [bbox.p0.y, bbox.p1.y] {
        Path::new(
            "met1",
            rail_width,
            vec![Point::new(bbox.p0.x, y), Point::new(bbox.p1.x, y)],
        )
        .draw_into(&mut m);
    }

    Ok(Arc::new(m))
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct And3Params {
    pub name: String,
}

/// AND3 from a library NAND3 followed by an inverter.
pub fn and3(params: &And3Params, fab: &mut Factory) -> Result<Arc<Module>> {
    let nand = fab.leaf(sky130::NAND3)?;
    let inv = fab.leaf(sky130::INV)?;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_pin("a", PinDir::Input);
    m.add_pin("b", PinDir::Input);
    m.add_pin("c", PinDir::Input);
    m.add_pin("x", PinDir::Output);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    let nand_width = nand.bbox().map(|b| b.width()).unwrap_or_default();
    let g1 = m.add_instance("nand", &nand, Point::zero(), Orient::R0)?;
    m.connect(g1, &["a", "b", "c", "xb", "vdd", "vss"])?;
    let g2 = m.add_instance("inv", &inv, Point::new(nand_width, 0), Orient::R0)?;
    m.connect(g2, &["xb", "x", "vdd", "vss"])?;

    Ok(Arc::new(m))
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct InvChainParams {
    pub name: String,
    pub n: usize,
}

/// A chain of `n` inverters. Even `n` buffers, odd `n` inverts.
pub fn inv_chain(params: &InvChainParams, fab: &mut Factory) -> Result<Arc<Module>> {
    assert!(params.n >= 1);
    let inv = fab.leaf(sky130::INV)?;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_pin("din", PinDir::Input);
    m.add_pin("dout", PinDir::Output);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    let inv_width = inv.bbox().map(|b| b.width()).unwrap_or_default();
    for i in 0..params.n {
        let din = if i == 0 {
            "din".to_string()
        } else {
            bus_bit("int", i - 1)
        };
        let dout = if i == params.n - 1 {
            "dout".to_string()
        } else {
            bus_bit("int", i)
        };
        let id = m.add_instance(
            format!("inv_{}", i),
            &inv,
            Point::new(i as i64 * inv_width, 0),
            Orient::R0,
        )?;
        m.connect(id, &[din, dout, "vdd".to_string(), "vss".to_string()])?;
    }

    Ok(Arc::new(m))
}
