//! Primitive MOS device modules.
//!
//! Devices are definition-less: each carries a templated instantiation line
//! and emits one `M...` line per placement in its parent.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::factory::Factory;
use crate::layout::geom::Int;
use crate::schematic::{Module, Pin, PinDir};
use crate::tech::sky130::{NMOS_MODEL, PMOS_MODEL};
use crate::Result;

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MosParams {
    pub name: String,
    /// Gate width in nanometers.
    pub width: Int,
    /// Channel length in nanometers.
    pub length: Int,
}

fn device_pins() -> Vec<Pin> {
    vec![
        Pin::new("d", PinDir::InOut),
        Pin::new("g", PinDir::Input),
        Pin::new("s", PinDir::InOut),
        Pin::new("b", PinDir::InOut),
    ]
}

/// Formats nanometers as microns for the device line.
fn micron(nm: Int) -> String {
    format!("{}", nm as f64 / 1000.0)
}

pub fn nmos(params: &MosParams, fab: &mut Factory) -> Result<Arc<Module>> {
    let template = format!(
        "M{{name}} {{ports}} {} w={} l={}",
        NMOS_MODEL,
        micron(params.width),
        micron(params.length)
    );
    fab.device(params.name.as_str(), device_pins(), template)
}

pub fn pmos(params: &MosParams, fab: &mut Factory) -> Result<Arc<Module>> {
    let template = format!(
        "M{{name}} {{ports}} {} w={} l={}",
        PMOS_MODEL,
        micron(params.width),
        micron(params.length)
    );
    fab.device(params.name.as_str(), device_pins(), template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micron_formatting() {
        assert_eq!(micron(650), "0.65");
        assert_eq!(micron(1000), "1");
        assert_eq!(micron(150), "0.15");
    }

    #[test]
    fn test_nmos_template() {
        let mut fab = Factory::sky130().unwrap();
        let m = nmos(
            &MosParams {
                name: "test_nmos".to_string(),
                width: 1000,
                length: 150,
            },
            &mut fab,
        )
        .unwrap();
        assert_eq!(m.pins().len(), 4);
        match m.netlist() {
            crate::schematic::NetlistFacet::Device { template } => {
                assert_eq!(
                    template,
                    "M{name} {ports} sky130_fd_pr__nfet_01v8 w=1 l=0.15"
                );
            }
            _ => panic!("expected a device module"),
        }
    }
}
