//! The memory core: a grid of library bitcells.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::{Orient, Point};
use crate::layout::grid::{GridCell, GridLayout};
use crate::layout::wire::{Path, Wire};
use crate::schematic::{Module, PinDir};
use crate::tech::sky130;
use crate::{bus_bit, Result};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BitcellArrayParams {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
}

pub fn bitcell_array(params: &BitcellArrayParams, fab: &mut Factory) -> Result<Arc<Module>> {
    assert!(params.rows > 0);
    assert!(params.cols > 0);

    let cell = fab.leaf(sky130::SRAM_CELL)?;
    let rail_width = 3 * fab.pdk().config().layer("met1").width;
    let pdk = fab.pdk().clone();

    let mut m = fab.compound(params.name.as_str())?;
    m.add_bus_pin("bl", params.cols, PinDir::InOut);
    m.add_bus_pin("br", params.cols, PinDir::InOut);
    m.add_bus_pin("wl", params.rows, PinDir::Input);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    // Alternate rows are mirrored so that neighboring cells share supply
    // and well geometry.
    let mut g = grid::Grid::init(params.rows, params.cols, None);
    for i in 0..params.rows {
        for j in 0..params.cols {
            let orient = if i % 2 == 1 { Orient::Mx } else { Orient::R0 };
            g[i][j] = Some(GridCell::new(Arc::clone(&cell), orient));
        }
    }
    let layout = GridLayout::new(g);
    let width = layout.width();
    let height = layout.height();
    let ids = layout.place(&mut m, "cell", Point::zero())?;

    // Whole rows are placed first and bulk-connected afterwards, in the
    // same row-major order. The serializer re-checks parity either way.
    let mut idx = 0;
    for i in 0..params.rows {
        for j in 0..params.cols {
            m.connect_unchecked(
                ids[idx],
                &[
                    bus_bit("bl", j),
                    bus_bit("br", j),
                    bus_bit("wl", i),
                    "vdd".to_string(),
                    "vss".to_string(),
                ],
            )?;
            idx += 1;
        }
    }

    // Horizontal supply rails at each mirrored row boundary, tied to a
    // vertical met2 spine at the left edge.
    let cell_height = cell.bbox().map(|b| b.height()).unwrap_or_default();
    for i in 0..=params.rows {
        let y = i as i64 * cell_height;
        Path::new(
            "met1",
            rail_width,
            vec![Point::new(0, y), Point::new(width, y)],
        )
        .draw_into(&mut m);
    }
    Wire::start("met1", rail_width, Point::new(0, 0))
        .switch("met2")
        .to(Point::new(0, height))
        .draw_into(&mut m, &pdk);

    Ok(Arc::new(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitcell_array_counts() {
        let mut fab = Factory::sky130().unwrap();
        let m = bitcell_array(
            &BitcellArrayParams {
                name: "test_array_4x8".to_string(),
                rows: 4,
                cols: 8,
            },
            &mut fab,
        )
        .unwrap();
        assert_eq!(m.instances().len(), 32);
        assert_eq!(m.conns().len(), 32);
        assert_eq!(m.pins().len(), 2 * 8 + 4 + 2);
        m.validate_connectivity().unwrap();
    }

    #[test]
    fn test_bitcell_array_net_binding() {
        let mut fab = Factory::sky130().unwrap();
        let m = bitcell_array(
            &BitcellArrayParams {
                name: "test_array_2x2".to_string(),
                rows: 2,
                cols: 2,
            },
            &mut fab,
        )
        .unwrap();
        // Row 1, column 0 binds [bl[0], br[0], wl[1], vdd, vss].
        let conns = &m.conns()[2];
        assert_eq!(conns[0].as_str(), "bl[0]");
        assert_eq!(conns[2].as_str(), "wl[1]");
    }
}
