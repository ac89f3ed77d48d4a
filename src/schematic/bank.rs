//! One memory bank: row decoder, bitcell array, and the column periphery.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::{Orient, Point};
use crate::layout::wire::Wire;
use crate::schematic::bitcell_array::{bitcell_array, BitcellArrayParams};
use crate::schematic::decoder::{decoder, DecoderParams};
use crate::schematic::gate::{and2, AndParams};
use crate::schematic::mux::{column_mux_array, ColumnMuxArrayParams, ColumnMuxParams};
use crate::schematic::precharge::{precharge_array, PrechargeArrayParams, PrechargeParams};
use crate::schematic::sense_amp::{sense_amp_array, SenseAmpArrayParams};
use crate::schematic::wrdriver::{write_driver_array, WriteDriverArrayParams};
use crate::schematic::{Module, PinDir};
use crate::{bus_bit, clog2, Result};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BankParams {
    pub name: String,
    pub rows: usize,
    pub cols: usize,
    pub mux_ratio: usize,
}

pub fn bank(params: &BankParams, fab: &mut Factory) -> Result<Arc<Module>> {
    assert!(params.rows >= 4);
    assert!(params.mux_ratio >= 2);
    assert_eq!(params.cols % params.mux_ratio, 0);
    assert!(params.rows.is_power_of_two());

    let row_bits = clog2(params.rows);
    let word = params.cols / params.mux_ratio;

    let row_decoder = decoder(
        &DecoderParams {
            name: format!("{}_row_decoder", params.name),
            bits: row_bits,
        },
        fab,
    )?;
    let wl_driver = and2(
        &AndParams {
            name: format!("{}_wl_driver", params.name),
        },
        fab,
    )?;
    let array = bitcell_array(
        &BitcellArrayParams {
            name: format!("{}_array", params.name),
            rows: params.rows,
            cols: params.cols,
        },
        fab,
    )?;
    let precharge = precharge_array(
        &PrechargeArrayParams {
            name: format!("{}_precharge", params.name),
            cols: params.cols,
            instance_params: PrechargeParams {
                name: format!("{}_precharge_cell", params.name),
                pull_up_width: 1000,
                equalizer_width: 1000,
                length: 150,
            },
        },
        fab,
    )?;
    let colmux = column_mux_array(
        &ColumnMuxArrayParams {
            name: format!("{}_colmux", params.name),
            cols: params.cols,
            mux_ratio: params.mux_ratio,
            mux_params: ColumnMuxParams {
                name: format!("{}_colmux_mux", params.name),
                width: 1200,
                length: 150,
            },
        },
        fab,
    )?;
    let drivers = write_driver_array(
        &WriteDriverArrayParams {
            name: format!("{}_wrdriver", params.name),
            width: word,
        },
        fab,
    )?;
    let amps = sense_amp_array(
        &SenseAmpArrayParams {
            name: format!("{}_sense_amps", params.name),
            width: word,
        },
        fab,
    )?;

    let rail_width = 3 * fab.pdk().config().layer("met1").width;
    let pdk = fab.pdk().clone();

    let mut m = fab.compound(params.name.as_str())?;
    m.add_bus_pin("addr", row_bits, PinDir::Input);
    m.add_bus_pin("addr_b", row_bits, PinDir::Input);
    m.add_bus_pin("din", word, PinDir::Input);
    m.add_bus_pin("dout", word, PinDir::Output);
    m.add_bus_pin("col_sel", params.mux_ratio, PinDir::Input);
    m.add_pin("wl_en", PinDir::Input);
    m.add_pin("pc_b", PinDir::Input);
    m.add_pin("wr_en", PinDir::Input);
    m.add_pin("sae", PinDir::Input);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    let array_height = array.bbox().map(|b| b.height()).unwrap_or_default();
    let decoder_width = row_decoder.bbox().map(|b| b.width()).unwrap_or_default();
    let driver_width = wl_driver.bbox().map(|b| b.width()).unwrap_or_default();
    let driver_height = wl_driver.bbox().map(|b| b.height()).unwrap_or_default();
    let periphery_pitch = 5000;

    // Row decoder to the left of the array, below the wordline drivers.
    let mut nets = Vec::new();
    for b in 0..row_bits {
        nets.push(bus_bit("addr", b));
    }
    for b in 0..row_bits {
        nets.push(bus_bit("addr_b", b));
    }
    for r in 0..params.rows {
        nets.push(bus_bit("wl_sel", r));
    }
    nets.push("vdd".to_string());
    nets.push("vss".to_string());
    let id = m.add_instance(
        "row_decoder",
        &row_decoder,
        Point::new(-(decoder_width + driver_width), 0),
        Orient::R0,
    )?;
    m.connect(id, &nets)?;

    // One wordline driver per row gates the decoded line with wl_en.
    for r in 0..params.rows {
        let id = m.add_instance(
            format!("wl_driver_{}", r),
            &wl_driver,
            Point::new(-driver_width, r as i64 * driver_height),
            Orient::R0,
        )?;
        m.connect(
            id,
            &[
                bus_bit("wl_sel", r),
                "wl_en".to_string(),
                bus_bit("wl", r),
                "vdd".to_string(),
                "vss".to_string(),
            ],
        )?;
    }

    // Bitcell array with the column periphery stacked underneath.
    let mut nets = Vec::new();
    for j in 0..params.cols {
        nets.push(bus_bit("bl", j));
    }
    for j in 0..params.cols {
        nets.push(bus_bit("br", j));
    }
    for r in 0..params.rows {
        nets.push(bus_bit("wl", r));
    }
    nets.push("vdd".to_string());
    nets.push("vss".to_string());
    let id = m.add_instance("array", &array, Point::zero(), Orient::R0)?;
    m.connect(id, &nets)?;

    let mut nets = Vec::new();
    for j in 0..params.cols {
        nets.push(bus_bit("bl", j));
    }
    for j in 0..params.cols {
        nets.push(bus_bit("br", j));
    }
    nets.push("pc_b".to_string());
    nets.push("vdd".to_string());
    let id = m.add_instance(
        "precharge",
        &precharge,
        Point::new(0, array_height),
        Orient::R0,
    )?;
    m.connect(id, &nets)?;

    let mut nets = Vec::new();
    for j in 0..params.cols {
        nets.push(bus_bit("bl", j));
    }
    for j in 0..params.cols {
        nets.push(bus_bit("br", j));
    }
    for k in 0..word {
        nets.push(bus_bit("bl_out", k));
    }
    for k in 0..word {
        nets.push(bus_bit("br_out", k));
    }
    for s in 0..params.mux_ratio {
        nets.push(bus_bit("col_sel", s));
    }
    nets.push("vss".to_string());
    let id = m.add_instance(
        "colmux",
        &colmux,
        Point::new(0, -periphery_pitch),
        Orient::Mx,
    )?;
    m.connect(id, &nets)?;

    let mut nets = vec!["wr_en".to_string()];
    for k in 0..word {
        nets.push(bus_bit("din", k));
    }
    for k in 0..word {
        nets.push(bus_bit("bl_out", k));
    }
    for k in 0..word {
        nets.push(bus_bit("br_out", k));
    }
    nets.push("vdd".to_string());
    nets.push("vss".to_string());
    let id = m.add_instance(
        "wrdriver",
        &drivers,
        Point::new(0, -2 * periphery_pitch),
        Orient::R0,
    )?;
    m.connect(id, &nets)?;

    let mut nets = vec!["sae".to_string()];
    for k in 0..word {
        nets.push(bus_bit("bl_out", k));
    }
    for k in 0..word {
        nets.push(bus_bit("br_out", k));
    }
    for k in 0..word {
        nets.push(bus_bit("dout", k));
    }
    nets.push("vdd".to_string());
    nets.push("vss".to_string());
    let id = m.add_instance(
        "sense_amps",
        &amps,
        Point::new(0, -3 * periphery_pitch),
        Orient::R0,
    )?;
    m.connect(id, &nets)?;

    // Strap the periphery supply up to the array's met2 spine.
    Wire::start("met1", rail_width, Point::new(0, -3 * periphery_pitch))
        .to(Point::new(0, 0))
        .switch("met2")
        .to(Point::new(0, array_height))
        .draw_into(&mut m, &pdk);

    Ok(Arc::new(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_structure() {
        let mut fab = Factory::sky130().unwrap();
        let m = bank(
            &BankParams {
                name: "test_bank".to_string(),
                rows: 16,
                cols: 16,
                mux_ratio: 4,
            },
            &mut fab,
        )
        .unwrap();
        // Decoder + 16 wordline drivers + array + precharge + mux +
        // drivers + sense amps.
        assert_eq!(m.instances().len(), 1 + 16 + 5);
        assert_eq!(m.children().len(), 7);
        m.validate_connectivity().unwrap();
    }

    #[test]
    fn test_bank_wordline_gating() {
        let mut fab = Factory::sky130().unwrap();
        let m = bank(
            &BankParams {
                name: "test_bank_wl".to_string(),
                rows: 8,
                cols: 8,
                mux_ratio: 2,
            },
            &mut fab,
        )
        .unwrap();
        // Wordline driver for row 3: (wl_sel[3], wl_en) -> wl[3].
        let conns = &m.conns()[1 + 3];
        assert_eq!(conns[0].as_str(), "wl_sel[3]");
        assert_eq!(conns[1].as_str(), "wl_en");
        assert_eq!(conns[2].as_str(), "wl[3]");
    }
}
