//! Column multiplexing: NMOS pass gates between the array bitlines and the
//! sense/write columns.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::{Int, Orient, Point};
use crate::schematic::mos::{nmos, MosParams};
use crate::schematic::{Module, PinDir};
use crate::{bus_bit, Result};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ColumnMuxParams {
    pub name: String,
    pub width: Int,
    pub length: Int,
}

/// One mux leg: a pass-gate pair connecting a bitline pair through to the
/// muxed column when `sel` is high.
pub fn column_mux(params: &ColumnMuxParams, fab: &mut Factory) -> Result<Arc<Module>> {
    let pass = nmos(
        &MosParams {
            name: format!("{}_pass", params.name),
            width: params.width,
            length: params.length,
        },
        fab,
    )?;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_pin("sel", PinDir::Input);
    m.add_pin("bl", PinDir::InOut);
    m.add_pin("br", PinDir::InOut);
    m.add_pin("bl_out", PinDir::InOut);
    m.add_pin("br_out", PinDir::InOut);
    m.add_pin("vss", PinDir::Ground);

    let id = m.add_instance("bl_pass", &pass, Point::zero(), Orient::R0)?;
    m.connect(id, &["bl", "sel", "bl_out", "vss"])?;
    let id = m.add_instance("br_pass", &pass, Point::zero(), Orient::R0)?;
    m.connect(id, &["br", "sel", "br_out", "vss"])?;

    Ok(Arc::new(m))
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ColumnMuxArrayParams {
    pub name: String,
    pub cols: usize,
    pub mux_ratio: usize,
    pub mux_params: ColumnMuxParams,
}

/// `mux_ratio`-to-1 column mux array. Output column `k` is driven by array
/// columns `k * mux_ratio ..= k * mux_ratio + mux_ratio - 1`, one-hot
/// selected.
pub fn column_mux_array(params: &ColumnMuxArrayParams, fab: &mut Factory) -> Result<Arc<Module>> {
    assert!(params.mux_ratio >= 2);
    assert_eq!(params.cols % params.mux_ratio, 0);
    let out_cols = params.cols / params.mux_ratio;
    let mux = column_mux(&params.mux_params, fab)?;

    let mut m = fab.compound(params.name.as_str())?;
    m.add_bus_pin("bl", params.cols, PinDir::InOut);
    m.add_bus_pin("br", params.cols, PinDir::InOut);
    m.add_bus_pin("bl_out", out_cols, PinDir::InOut);
    m.add_bus_pin("br_out", out_cols, PinDir::InOut);
    m.add_bus_pin("sel", params.mux_ratio, PinDir::Input);
    m.add_pin("vss", PinDir::Ground);

    let pitch = 1200;
    for k in 0..out_cols {
        for s in 0..params.mux_ratio {
            let col = k * params.mux_ratio + s;
            let id = m.add_instance(
                format!("mux_{}", col),
                &mux,
                Point::new(col as i64 * pitch, 0),
                Orient::R0,
            )?;
            m.connect(
                id,
                &[
                    bus_bit("sel", s),
                    bus_bit("bl", col),
                    bus_bit("br", col),
                    bus_bit("bl_out", k),
                    bus_bit("br_out", k),
                    "vss".to_string(),
                ],
            )?;
        }
    }

    Ok(Arc::new(m))
}
