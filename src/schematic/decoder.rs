//! Address decoding.
//!
//! Small address fields decode in a single stage of AND gates. Wider
//! fields are split into 2- and 3-bit groups, each predecoded, with one
//! AND per output row combining one line from every group.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::{Orient, Point};
use crate::schematic::gate::{and2, and3, And3Params, AndParams};
use crate::schematic::{Module, PinDir};
use crate::tech::sky130;
use crate::{bus_bit, Result};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DecoderParams {
    pub name: String,
    pub bits: usize,
}

/// Splits an address field into predecode groups of 2 or 3 bits.
fn partition(bits: usize) -> Vec<usize> {
    if bits <= 3 {
        return vec![bits];
    }
    let mut groups = Vec::new();
    let mut rem = bits;
    while rem > 3 {
        if rem % 3 == 0 {
            groups.push(3);
            rem -= 3;
        } else {
            groups.push(2);
            rem -= 2;
        }
    }
    groups.push(rem);
    groups
}

/// One-hot decoder: `decode[i]` goes high when the complementary address
/// pair `(addr, addr_b)` encodes `i`.
pub fn decoder(params: &DecoderParams, fab: &mut Factory) -> Result<Arc<Module>> {
    assert!(params.bits >= 1);
    let groups = partition(params.bits);
    if groups.len() == 1 {
        return single_stage(&params.name, params.bits, fab);
    }
    assert!(
        groups.len() <= 3,
        "decoder supports at most 9 address bits"
    );

    let mut pres = Vec::new();
    for (gi, &gbits) in groups.iter().enumerate() {
        pres.push(single_stage(
            &format!("{}_pre{}", params.name, gi),
            gbits,
            fab,
        )?);
    }
    let gate = if groups.len() == 2 {
        and2(
            &AndParams {
                name: format!("{}_row_and2", params.name),
            },
            fab,
        )?
    } else {
        and3(
            &And3Params {
                name: format!("{}_row_and3", params.name),
            },
            fab,
        )?
    };

    let rows = 1 << params.bits;
    let mut m = fab.compound(params.name.as_str())?;
    m.add_bus_pin("addr", params.bits, PinDir::Input);
    m.add_bus_pin("addr_b", params.bits, PinDir::Input);
    m.add_bus_pin("decode", rows, PinDir::Output);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    // Predecoders stack at the left, one per group.
    let mut shift = 0;
    let mut y = 0;
    let mut pre_width = 0;
    for (gi, (pre, &gbits)) in pres.iter().zip(&groups).enumerate() {
        let mut nets = Vec::new();
        for b in 0..gbits {
            nets.push(bus_bit("addr", shift + b));
        }
        for b in 0..gbits {
            nets.push(bus_bit("addr_b", shift + b));
        }
        for k in 0..(1 << gbits) {
            nets.push(format!("pre{}[{}]", gi, k));
        }
        nets.push("vdd".to_string());
        nets.push("vss".to_string());
        let id = m.add_instance(
            format!("pre{}", gi),
            pre,
            Point::new(0, y),
            Orient::R0,
        )?;
        m.connect(id, &nets)?;
        let bbox = pre.bbox().unwrap_or_default();
        y += bbox.height();
        pre_width = pre_width.max(bbox.width());
        shift += gbits;
    }

    // One AND per row combines one predecoded line from every group.
    let gate_height = gate.bbox().map(|b| b.height()).unwrap_or_default();
    for r in 0..rows {
        let mut nets = Vec::new();
        let mut shift = 0;
        for (gi, &gbits) in groups.iter().enumerate() {
            let idx = (r >> shift) & ((1 << gbits) - 1);
            nets.push(format!("pre{}[{}]", gi, idx));
            shift += gbits;
        }
        nets.push(bus_bit("decode", r));
        nets.push("vdd".to_string());
        nets.push("vss".to_string());
        let id = m.add_instance(
            format!("row_{}", r),
            &gate,
            Point::new(pre_width, r as i64 * gate_height),
            Orient::R0,
        )?;
        m.connect(id, &nets)?;
    }

    Ok(Arc::new(m))
}

/// Direct 1-, 2-, or 3-bit decode.
fn single_stage(name: &str, bits: usize, fab: &mut Factory) -> Result<Arc<Module>> {
    assert!((1..=3).contains(&bits));
    let outputs = 1 << bits;

    let gate = match bits {
        1 => fab.leaf(sky130::INV)?,
        2 => and2(
            &AndParams {
                name: format!("{}_and2", name),
            },
            fab,
        )?,
        _ => and3(
            &And3Params {
                name: format!("{}_and3", name),
            },
            fab,
        )?,
    };

    let mut m = fab.compound(name)?;
    m.add_bus_pin("addr", bits, PinDir::Input);
    m.add_bus_pin("addr_b", bits, PinDir::Input);
    m.add_bus_pin("decode", outputs, PinDir::Output);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    let gate_height = gate.bbox().map(|b| b.height()).unwrap_or_default();
    for k in 0..outputs {
        let mut nets = Vec::new();
        if bits == 1 {
            // decode[0] = !addr[0], decode[1] = !addr_b[0].
            nets.push(if k == 0 {
                bus_bit("addr", 0)
            } else {
                bus_bit("addr_b", 0)
            });
        } else {
            for b in 0..bits {
                nets.push(if (k >> b) & 1 == 1 {
                    bus_bit("addr", b)
                } else {
                    bus_bit("addr_b", b)
                });
            }
        }
        nets.push(bus_bit("decode", k));
        nets.push("vdd".to_string());
        nets.push("vss".to_string());
        let id = m.add_instance(
            format!("sel_{}", k),
            &gate,
            Point::new(0, k as i64 * gate_height),
            Orient::R0,
        )?;
        m.connect(id, &nets)?;
    }

    Ok(Arc::new(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition() {
        assert_eq!(partition(2), vec![2]);
        assert_eq!(partition(3), vec![3]);
        assert_eq!(partition(4), vec![2, 2]);
        assert_eq!(partition(5), vec![2, 3]);
        assert_eq!(partition(6), vec![3, 3]);
        assert_eq!(partition(8), vec![2, 3, 3]);
        assert_eq!(partition(9), vec![3, 3, 3]);
    }

    #[test]
    fn test_two_bit_decoder_truth_table() {
        let mut fab = Factory::sky130().unwrap();
        let m = decoder(
            &DecoderParams {
                name: "test_dec2".to_string(),
                bits: 2,
            },
            &mut fab,
        )
        .unwrap();
        assert_eq!(m.instances().len(), 4);
        // decode[2] selects addr = 0b10: inputs (addr_b[0], addr[1]).
        let conns = &m.conns()[2];
        assert_eq!(conns[0].as_str(), "addr_b[0]");
        assert_eq!(conns[1].as_str(), "addr[1]");
        assert_eq!(conns[2].as_str(), "decode[2]");
    }

    #[test]
    fn test_predecoded_decoder() {
        let mut fab = Factory::sky130().unwrap();
        let m = decoder(
            &DecoderParams {
                name: "test_dec5".to_string(),
                bits: 5,
            },
            &mut fab,
        )
        .unwrap();
        // 2 predecoders + 32 row gates.
        assert_eq!(m.instances().len(), 34);
        // Row 13 = 0b01101: group0 (2 bits) index 1, group1 (3 bits) index 3.
        let conns = &m.conns()[2 + 13];
        assert_eq!(conns[0].as_str(), "pre0[1]");
        assert_eq!(conns[1].as_str(), "pre1[3]");
        assert_eq!(conns[2].as_str(), "decode[13]");
        m.validate_connectivity().unwrap();
    }

    #[test]
    fn test_one_bit_decoder() {
        let mut fab = Factory::sky130().unwrap();
        let m = decoder(
            &DecoderParams {
                name: "test_dec1".to_string(),
                bits: 1,
            },
            &mut fab,
        )
        .unwrap();
        assert_eq!(m.instances().len(), 2);
        assert_eq!(m.conns()[0][0].as_str(), "addr[0]");
        assert_eq!(m.conns()[1][0].as_str(), "addr_b[0]");
    }
}
