//! Bundled sky130 technology: design rules, via stacks, and the leaf cell
//! library.

use std::path::PathBuf;

use crate::pdk::{Pdk, TechConfig};
use crate::schematic::PinDir::{Ground, InOut, Input, Output, Power};
use crate::tech::{CellLibrary, LibCell};
use crate::{Result, TECH_PATH};

pub const INV: &str = "inv";
pub const NAND2: &str = "nand2";
pub const NAND3: &str = "nand3";
pub const NOR2: &str = "nor2";
pub const SRAM_CELL: &str = "sram_cell";
pub const SENSE_AMP: &str = "sense_amp";
pub const DFF: &str = "dff";
pub const WRITE_DRIVER: &str = "write_driver";

pub const NMOS_MODEL: &str = "sky130_fd_pr__nfet_01v8";
pub const PMOS_MODEL: &str = "sky130_fd_pr__pfet_01v8";

pub fn pdk() -> Result<Pdk> {
    let path = PathBuf::from(TECH_PATH).join("sky130/tech.toml");
    Ok(Pdk::new(TechConfig::load(path)?))
}

pub fn cell_library() -> CellLibrary {
    let mut lib = CellLibrary::new();
    lib.add(LibCell::new(
        INV,
        vec![
            ("a", Input),
            ("y", Output),
            ("vdd", Power),
            ("vss", Ground),
        ],
        include_str!("../../lib/sky130/inv.sp"),
        1380,
        2720,
    ));
    lib.add(LibCell::new(
        NAND2,
        vec![
            ("a", Input),
            ("b", Input),
            ("y", Output),
            ("vdd", Power),
            ("vss", Ground),
        ],
        include_str!("../../lib/sky130/nand2.sp"),
        1840,
        2720,
    ));
    lib.add(LibCell::new(
        NAND3,
        vec![
            ("a", Input),
            ("b", Input),
            ("c", Input),
            ("y", Output),
            ("vdd", Power),
            ("vss", Ground),
        ],
        include_str!("../../lib/sky130/nand3.sp"),
        2300,
        2720,
    ));
    lib.add(LibCell::new(
        NOR2,
        vec![
            ("a", Input),
            ("b", Input),
            ("y", Output),
            ("vdd", Power),
            ("vss", Ground),
        ],
        include_str!("../../lib/sky130/nor2.sp"),
        1840,
        2720,
    ));
    lib.add(LibCell::new(
        SRAM_CELL,
        vec![
            ("bl", InOut),
            ("br", InOut),
            ("wl", Input),
            ("vdd", Power),
            ("vss", Ground),
        ],
        include_str!("../../lib/sky130/sram_cell.sp"),
        1200,
        1580,
    ));
    lib.add(LibCell::new(
        SENSE_AMP,
        vec![
            ("en", Input),
            ("bl", InOut),
            ("br", InOut),
            ("dout", Output),
            ("vdd", Power),
            ("vss", Ground),
        ],
        include_str!("../../lib/sky130/sense_amp.sp"),
        5060,
        4500,
    ));
    lib.add(LibCell::new(
        DFF,
        vec![
            ("clk", Input),
            ("d", Input),
            ("q", Output),
            ("q_b", Output),
            ("vdd", Power),
            ("vss", Ground),
        ],
        include_str!("../../lib/sky130/dff.sp"),
        9200,
        2720,
    ));
    lib.add(LibCell::new(
        WRITE_DRIVER,
        vec![
            ("we", Input),
            ("din", Input),
            ("bl", InOut),
            ("br", InOut),
            ("vdd", Power),
            ("vss", Ground),
        ],
        include_str!("../../lib/sky130/write_driver.sp"),
        3680,
        2720,
    ));
    lib
}
