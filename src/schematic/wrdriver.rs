//! Write driver columns.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::{Orient, Point};
use crate::schematic::{Module, PinDir};
use crate::tech::sky130;
use crate::{bus_bit, Result};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct WriteDriverArrayParams {
    pub name: String,
    pub width: usize,
}

/// One library write driver per data column, driving the muxed bitline
/// pairs when write-enable is asserted.
pub fn write_driver_array(
    params: &WriteDriverArrayParams,
    fab: &mut Factory,
) -> Result<Arc<Module>> {
    assert!(params.width > 0);
    let driver = fab.leaf(sky130::WRITE_DRIVER)?;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_pin("we", PinDir::Input);
    m.add_bus_pin("din", params.width, PinDir::Input);
    m.add_bus_pin("bl", params.width, PinDir::InOut);
    m.add_bus_pin("br", params.width, PinDir::InOut);
    m.add_pin("vdd", PinDir::Power);
    m.add_pin("vss", PinDir::Ground);

    let pitch = driver.bbox().map(|b| b.width()).unwrap_or_default();
    for k in 0..params.width {
        let id = m.add_instance(
            format!("driver_{}", k),
            &driver,
            Point::new(k as i64 * pitch, 0),
            Orient::R0,
        )?;
        m.connect(
            id,
            &[
                "we".to_string(),
                bus_bit("din", k),
                bus_bit("bl", k),
                bus_bit("br", k),
                "vdd".to_string(),
                "vss".to_string(),
            ],
        )?;
    }

    Ok(Arc::new(m))
}
