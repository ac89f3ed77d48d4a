//! Technology library interface.
//!
//! A [`CellLibrary`] maps cell names to hand-authored circuit bodies, pin
//! lists, and pin geometry. Lookup failure is a hard error for cells the
//! caller expected to exist, and the expected non-error path for cells that
//! are generated dynamically instead.

use std::collections::HashMap;

use arcstr::ArcStr;

use crate::layout::geom::{Int, Point, Rect};
use crate::layout::{Element, LayoutFacet};
use crate::schematic::{Pin, PinDir};

pub mod sky130;

/// A hand-authored cell: verbatim circuit text plus the pin metadata the
/// netlist and layout views both key on.
#[derive(Debug, Clone)]
pub struct LibCell {
    pub name: ArcStr,
    pub pins: Vec<Pin>,
    pub spice: String,
    pub outline: Rect,
    pub pin_shapes: Vec<(ArcStr, Element)>,
}

impl LibCell {
    pub fn new(
        name: impl Into<ArcStr>,
        pins: Vec<(&str, PinDir)>,
        spice: impl Into<String>,
        width: Int,
        height: Int,
    ) -> Self {
        let name = name.into();
        let pins: Vec<Pin> = pins
            .into_iter()
            .map(|(name, dir)| Pin::new(name, dir))
            .collect();
        let outline = Rect::with_size(Point::zero(), width, height);
        // The library reports one bounding shape per pin; shapes are spaced
        // up the left edge of the cell on the local interconnect layer.
        let step = height / (pins.len() as Int + 1);
        let pin_shapes = pins
            .iter()
            .enumerate()
            .map(|(i, pin)| {
                let y = step * (i as Int + 1);
                (
                    pin.name.clone(),
                    Element::new("li1", Rect::with_size(Point::new(0, y), 170, 170)),
                )
            })
            .collect();
        Self {
            name,
            pins,
            spice: spice.into(),
            outline,
            pin_shapes,
        }
    }

    pub fn layout_facet(&self) -> LayoutFacet {
        LayoutFacet::from_library(self.outline, self.pin_shapes.clone())
    }
}

#[derive(Debug, Default)]
pub struct CellLibrary {
    cells: HashMap<ArcStr, LibCell>,
}

impl CellLibrary {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add(&mut self, cell: LibCell) {
        self.cells.insert(cell.name.clone(), cell);
    }

    pub fn get(&self, name: &str) -> Option<&LibCell> {
        self.cells.get(name)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sky130_library_contents() {
        let lib = sky130::cell_library();
        for name in [
            sky130::INV,
            sky130::NAND2,
            sky130::NAND3,
            sky130::NOR2,
            sky130::SRAM_CELL,
            sky130::SENSE_AMP,
            sky130::DFF,
            sky130::WRITE_DRIVER,
        ] {
            let cell = lib.get(name).unwrap_or_else(|| panic!("missing {}", name));
            assert!(cell.spice.starts_with(".SUBCKT"));
            assert!(cell.spice.ends_with('\n'));
            assert_eq!(cell.pin_shapes.len(), cell.pins.len());
        }
        assert!(lib.get("no_such_cell").is_none());
    }

    #[test]
    fn test_bitcell_pin_order() {
        let lib = sky130::cell_library();
        let cell = lib.get(sky130::SRAM_CELL).unwrap();
        let names: Vec<&str> = cell.pins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["bl", "br", "wl", "vdd", "vss"]);
        assert_eq!(cell.pins[2].dir, PinDir::Input);
        assert_eq!(cell.pins[3].dir, PinDir::Power);
    }
}
