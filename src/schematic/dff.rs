//! Input register rows built from the library flip-flop.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::{Orient, Point};
use crate::layout::grid::{GridCell, GridLayout};
use crate::schematic::{Module, PinDir};
use crate::tech::sky130;
use crate::{bus_bit, Result};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DffArrayParams {
    pub name: String,
    pub width: usize,
}

/// A row of `width` flip-flops sharing one clock.
pub fn dff_array(params: &DffArrayParams, fab: &mut Factory) -> Result<Arc<Module>> {
    assert!(params.width > 0);
    let dff = fab.leaf(sky130::DFF)?;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_pin("clk", PinDir::Input);
    m.add_bus_pin("d", params.width, PinDir::Input);
    m.add_bus_pin("q", params.width, PinDir::Output);
    m.add_bus_pin("q_b", params.width, PinDir::Output);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    let mut g = grid::Grid::init(1, params.width, None);
    for j in 0..params.width {
        g[0][j] = Some(GridCell::new(Arc::clone(&dff), Orient::R0));
    }
    let ids = GridLayout::new(g).place(&mut m, "dff", Point::zero())?;
    for (k, id) in ids.into_iter().enumerate() {
        m.connect_unchecked(
            id,
            &[
                "clk".to_string(),
                bus_bit("d", k),
                bus_bit("q", k),
                bus_bit("q_b", k),
                "vdd".to_string(),
                "vss".to_string(),
            ],
        )?;
    }

    Ok(Arc::new(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dff_array() {
        let mut fab = Factory::sky130().unwrap();
        let m = dff_array(
            &DffArrayParams {
                name: "test_dff_array".to_string(),
                width: 6,
            },
            &mut fab,
        )
        .unwrap();
        assert_eq!(m.instances().len(), 6);
        assert_eq!(m.conns()[5][3].as_str(), "q_b[5]");
        m.validate_connectivity().unwrap();
        // Flops step across the row at the cell pitch.
        assert_eq!(m.instance(crate::schematic::InstanceId(1)).loc.x, 9200);
    }
}
