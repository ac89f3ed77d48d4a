//! Bitline precharge and equalization.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::{Int, Orient, Point};
use crate::schematic::mos::{pmos, MosParams};
use crate::schematic::{Module, PinDir};
use crate::{bus_bit, Result};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PrechargeParams {
    pub name: String,
    pub pull_up_width: Int,
    pub equalizer_width: Int,
    pub length: Int,
}

/// One column's precharge cell: two pull-ups and a bitline equalizer, all
/// gated by the active-low enable.
pub fn precharge(params: &PrechargeParams, fab: &mut Factory) -> Result<Arc<Module>> {
    let pu = pmos(
        &MosParams {
            name: format!("{}_pull_up", params.name),
            width: params.pull_up_width,
            length: params.length,
        },
        fab,
    )?;
    let eq = pmos(
        &MosParams {
            name: format!("{}_equalizer", params.name),
            width: params.equalizer_width,
            length: params.length,
        },
        fab,
    )?;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_pin("bl", PinDir::InOut);
    m.add_pin("br", PinDir::InOut);
    m.add_pin("en_b", PinDir::Input);
    m.add_pin("vdd", PinDir::Power);

    // Device pin order is (d, g, s, b).
    let id = m.add_instance("bl_pull_up", &pu, Point::zero(), Orient::R0)?;
    m.connect(id, &["bl", "en_b", "vdd", "vdd"])?;
    let id = m.add_instance("br_pull_up", &pu, Point::zero(), Orient::R0)?;
    m.connect(id, &["br", "en_b", "vdd", "vdd"])?;
    let id = m.add_instance("bl_equalizer", &eq, Point::zero(), Orient::R0)?;
    m.connect(id, &["bl", "en_b", "br", "vdd"])?;

    Ok(Arc::new(m))
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PrechargeArrayParams {
    pub name: String,
    pub cols: usize,
    pub instance_params: PrechargeParams,
}

pub fn precharge_array(params: &PrechargeArrayParams, fab: &mut Factory) -> Result<Arc<Module>> {
    assert!(params.cols > 0);
    let pc = precharge(&params.instance_params, fab)?;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_bus_pin("bl", params.cols, PinDir::InOut);
    m.add_bus_pin("br", params.cols, PinDir::InOut);
    m.add_pin("en_b", PinDir::Input);
    m.add_pin("vdd", PinDir::Power);

    // Column pitch matches the bitcell array the precharge row abuts.
    let pitch = 1200;
    for j in 0..params.cols {
        let id = m.add_instance(
            format!("precharge_{}", j),
            &pc,
            Point::new(j as i64 * pitch, 0),
            Orient::R0,
        )?;
        m.connect(
            id,
            &[
                bus_bit("bl", j),
                bus_bit("br", j),
                "en_b".to_string(),
                "vdd".to_string(),
            ],
        )?;
    }

    Ok(Arc::new(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params(name: &str, cols: usize) -> PrechargeArrayParams {
        PrechargeArrayParams {
            name: name.to_string(),
            cols,
            instance_params: PrechargeParams {
                name: format!("{}_cell", name),
                pull_up_width: 1000,
                equalizer_width: 1000,
                length: 150,
            },
        }
    }

    #[test]
    fn test_precharge_array() {
        let mut fab = Factory::sky130().unwrap();
        let m = precharge_array(&test_params("test_precharge_array", 8), &mut fab).unwrap();
        assert_eq!(m.instances().len(), 8);
        assert_eq!(m.children().len(), 1);
        m.validate_connectivity().unwrap();
    }

    #[test]
    fn test_precharge_device_binding() {
        let mut fab = Factory::sky130().unwrap();
        let m = precharge(
            &PrechargeParams {
                name: "test_precharge".to_string(),
                pull_up_width: 1000,
                equalizer_width: 800,
                length: 150,
            },
            &mut fab,
        )
        .unwrap();
        assert_eq!(m.instances().len(), 3);
        // The equalizer bridges the bitline pair.
        let eq = &m.conns()[2];
        assert_eq!(eq[0].as_str(), "bl");
        assert_eq!(eq[2].as_str(), "br");
    }
}
