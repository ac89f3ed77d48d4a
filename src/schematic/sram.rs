//! The top-level macro: input registers, control, bank selection, and one
//! or more banks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::MemConfig;
use crate::factory::Factory;
use crate::layout::geom::{Orient, Point, Rect};
use crate::schematic::bank::{bank, BankParams};
use crate::schematic::control::{control_logic, ControlParams};
use crate::schematic::decoder::{decoder, DecoderParams};
use crate::schematic::dff::{dff_array, DffArrayParams};
use crate::schematic::gate::{and2, AndParams};
use crate::schematic::{Module, PinDir};
use crate::{bus_bit, clog2, Result};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SramParams {
    pub name: String,
    pub num_words: usize,
    pub data_width: usize,
    pub mux_ratio: usize,
    pub num_banks: usize,
}

impl SramParams {
    pub fn from_config(name: impl Into<String>, config: &MemConfig) -> Self {
        Self {
            name: name.into(),
            num_words: config.num_words,
            data_width: config.data_width,
            mux_ratio: config.mux_ratio,
            num_banks: config.num_banks,
        }
    }

    pub fn addr_width(&self) -> usize {
        clog2(self.num_words)
    }

    pub fn col_bits(&self) -> usize {
        clog2(self.mux_ratio)
    }

    pub fn bank_bits(&self) -> usize {
        clog2(self.num_banks)
    }

    pub fn row_bits(&self) -> usize {
        self.addr_width() - self.col_bits() - self.bank_bits()
    }

    pub fn rows(&self) -> usize {
        1 << self.row_bits()
    }

    pub fn cols(&self) -> usize {
        self.data_width * self.mux_ratio
    }
}

/// Address bit assignment, LSB first: column select, then bank select,
/// then row.
pub fn sram(params: &SramParams, fab: &mut Factory) -> Result<Arc<Module>> {
    assert!(params.num_words.is_power_of_two());
    assert!(params.mux_ratio >= 2);
    assert!(params.num_banks >= 1);

    let addr_width = params.addr_width();
    let col_bits = params.col_bits();
    let bank_bits = params.bank_bits();
    let row_bits = params.row_bits();
    let word = params.data_width;

    let addr_regs = dff_array(
        &DffArrayParams {
            name: format!("{}_addr_regs", params.name),
            width: addr_width,
        },
        fab,
    )?;
    let din_regs = dff_array(
        &DffArrayParams {
            name: format!("{}_din_regs", params.name),
            width: word,
        },
        fab,
    )?;
    let we_reg = dff_array(
        &DffArrayParams {
            name: format!("{}_we_reg", params.name),
            width: 1,
        },
        fab,
    )?;
    let control = control_logic(
        &ControlParams {
            name: format!("{}_control", params.name),
        },
        fab,
    )?;
    let col_decoder = decoder(
        &DecoderParams {
            name: format!("{}_col_decoder", params.name),
            bits: col_bits,
        },
        fab,
    )?;
    let bank_decoder = if bank_bits > 0 {
        Some(decoder(
            &DecoderParams {
                name: format!("{}_bank_decoder", params.name),
                bits: bank_bits,
            },
            fab,
        )?)
    } else {
        None
    };
    let bank_gate = if bank_bits > 0 {
        Some(and2(
            &AndParams {
                name: format!("{}_bank_gate", params.name),
            },
            fab,
        )?)
    } else {
        None
    };
    let mut banks = Vec::new();
    for b in 0..params.num_banks {
        banks.push(bank(
            &BankParams {
                name: format!("{}_bank_{}", params.name, b),
                rows: params.rows(),
                cols: params.cols(),
                mux_ratio: params.mux_ratio,
            },
            fab,
        )?);
    }

    let mut m = fab.compound(params.name.as_str())?;
    m.add_pin("clk", PinDir::Input);
    m.add_pin("we", PinDir::Input);
    m.add_bus_pin("addr", addr_width, PinDir::Input);
    m.add_bus_pin("din", word, PinDir::Input);
    m.add_bus_pin("dout", word, PinDir::Output);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    // Address registers.
    let mut nets = vec!["clk".to_string()];
    for b in 0..addr_width {
        nets.push(bus_bit("addr", b));
    }
    for b in 0..addr_width {
        nets.push(bus_bit("addr_q", b));
    }
    for b in 0..addr_width {
        nets.push(bus_bit("addr_qb", b));
    }
    nets.push("vdd".to_string());
    nets.push("vss".to_string());
    let id = m.add_instance("addr_regs", &addr_regs, Point::zero(), Orient::R0)?;
    m.connect(id, &nets)?;

    // Data-in registers; the complement outputs stay internal.
    let mut nets = vec!["clk".to_string()];
    for k in 0..word {
        nets.push(bus_bit("din", k));
    }
    for k in 0..word {
        nets.push(bus_bit("din_q", k));
    }
    for k in 0..word {
        nets.push(bus_bit("din_qb", k));
    }
    nets.push("vdd".to_string());
    nets.push("vss".to_string());
    let addr_regs_height = addr_regs.bbox().map(|b| b.height()).unwrap_or_default();
    let id = m.add_instance(
        "din_regs",
        &din_regs,
        Point::new(0, addr_regs_height),
        Orient::R0,
    )?;
    m.connect(id, &nets)?;

    // Write-enable register.
    let id = m.add_instance(
        "we_reg",
        &we_reg,
        Point::new(0, 2 * addr_regs_height),
        Orient::R0,
    )?;
    m.connect(
        id,
        &["clk", "we", "we_q[0]", "we_qb[0]", "vdd", "vss"],
    )?;

    // Control strobes.
    let id = m.add_instance(
        "control",
        &control,
        Point::new(0, 3 * addr_regs_height),
        Orient::R0,
    )?;
    m.connect(
        id,
        &[
            "clk", "we_q[0]", "pc_b", "wl_en", "wr_en", "sae", "vdd", "vss",
        ],
    )?;

    // Column select decode from the address LSBs.
    let mut nets = Vec::new();
    for b in 0..col_bits {
        nets.push(bus_bit("addr_q", b));
    }
    for b in 0..col_bits {
        nets.push(bus_bit("addr_qb", b));
    }
    for s in 0..params.mux_ratio {
        nets.push(bus_bit("col_sel", s));
    }
    nets.push("vdd".to_string());
    nets.push("vss".to_string());
    let id = m.add_instance(
        "col_decoder",
        &col_decoder,
        Point::new(0, 4 * addr_regs_height),
        Orient::R0,
    )?;
    m.connect(id, &nets)?;

    // Bank select decode and per-bank strobe gating.
    if let Some(bank_decoder) = &bank_decoder {
        let mut nets = Vec::new();
        for b in 0..bank_bits {
            nets.push(bus_bit("addr_q", col_bits + b));
        }
        for b in 0..bank_bits {
            nets.push(bus_bit("addr_qb", col_bits + b));
        }
        for s in 0..params.num_banks {
            nets.push(bus_bit("bank_sel", s));
        }
        nets.push("vdd".to_string());
        nets.push("vss".to_string());
        let id = m.add_instance(
            "bank_decoder",
            bank_decoder,
            Point::new(0, 5 * addr_regs_height),
            Orient::R0,
        )?;
        m.connect(id, &nets)?;

        let gate = bank_gate.as_ref().unwrap();
        for b in 0..params.num_banks {
            for (strobe, gated) in [("wl_en", "bank_wl_en"), ("wr_en", "bank_wr_en"), ("sae", "bank_sae")] {
                let id = m.add_instance(
                    format!("{}_gate_{}", strobe, b),
                    gate,
                    Point::new(0, 6 * addr_regs_height),
                    Orient::R0,
                )?;
                m.connect(
                    id,
                    &[
                        strobe.to_string(),
                        bus_bit("bank_sel", b),
                        bus_bit(gated, b),
                        "vdd".to_string(),
                        "vss".to_string(),
                    ],
                )?;
            }
        }
    }

    // Banks side by side; dout is shared, only the selected bank senses.
    let bank_width = banks[0].bbox().map(|b| b.width()).unwrap_or_default();
    let bank_gap = 10_000;
    for (b, bank_mod) in banks.iter().enumerate() {
        let (wl_en, wr_en, sae) = if bank_bits > 0 {
            (
                bus_bit("bank_wl_en", b),
                bus_bit("bank_wr_en", b),
                bus_bit("bank_sae", b),
            )
        } else {
            (
                "wl_en".to_string(),
                "wr_en".to_string(),
                "sae".to_string(),
            )
        };
        let mut nets = Vec::new();
        for r in 0..row_bits {
            nets.push(bus_bit("addr_q", col_bits + bank_bits + r));
        }
        for r in 0..row_bits {
            nets.push(bus_bit("addr_qb", col_bits + bank_bits + r));
        }
        for k in 0..word {
            nets.push(bus_bit("din_q", k));
        }
        for k in 0..word {
            nets.push(bus_bit("dout", k));
        }
        for s in 0..params.mux_ratio {
            nets.push(bus_bit("col_sel", s));
        }
        nets.push(wl_en);
        nets.push("pc_b".to_string());
        nets.push(wr_en);
        nets.push(sae);
        nets.push("vdd".to_string());
        nets.push("vss".to_string());
        let id = m.add_instance(
            format!("bank_{}", b),
            bank_mod,
            Point::new(40_000 + b as i64 * (bank_width + bank_gap), 0),
            Orient::R0,
        )?;
        m.connect(id, &nets)?;
    }

    // Top-level pin shapes for the layout backend, stepped up the left
    // edge on met2.
    let pin_pitch = 2 * fab.pdk().config().layer("met2").space
        + 2 * fab.pdk().config().layer("met2").width;
    let pin_size = 4 * fab.pdk().config().layer("met2").width;
    let pin_names: Vec<_> = m.pins().iter().map(|p| p.name.clone()).collect();
    for (i, pin) in pin_names.into_iter().enumerate() {
        let y = i as i64 * pin_pitch;
        m.add_pin_shape(
            pin,
            "met2",
            Rect::with_size(Point::new(0, y), pin_size, pin_size),
        );
    }

    Ok(Arc::new(m))
}
