//! Sense amplifier columns.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::{Orient, Point};
use crate::schematic::{Module, PinDir};
use crate::tech::sky130;
use crate::{bus_bit, Result};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SenseAmpArrayParams {
    pub name: String,
    pub width: usize,
}

pub fn sense_amp_array(params: &SenseAmpArrayParams, fab: &mut Factory) -> Result<Arc<Module>> {
    assert!(params.width > 0);
    let amp = fab.leaf(sky130::SENSE_AMP)?;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_pin("en", PinDir::Input);
    m.add_bus_pin("bl", params.width, PinDir::InOut);
    m.add_bus_pin("br", params.width, PinDir::InOut);
    m.add_bus_pin("dout", params.width, PinDir::Output);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    let pitch = amp.bbox().map(|b| b.width()).unwrap_or_default();
    for k in 0..params.width {
        let id = m.add_instance(
            format!("amp_{}", k),
            &amp,
            Point::new(k as i64 * pitch, 0),
            Orient::R0,
        )?;
        m.connect(
            id,
            &[
                "en".to_string(),
                bus_bit("bl", k),
                bus_bit("br", k),
                bus_bit("dout", k),
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
    fn test_sense_amp_array() {
        let mut fab = Factory::sky130().unwrap();
        let m = sense_amp_array(
            &SenseAmpArrayParams {
                name: "test_sa_array".to_string(),
                width: 8,
            },
            &mut fab,
        )
        .unwrap();
        assert_eq!(m.instances().len(), 8);
        assert_eq!(m.children().len(), 1);
        assert_eq!(m.conns()[7][3].as_str(), "dout[7]");
        m.validate_connectivity().unwrap();
    }
}
