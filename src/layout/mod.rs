//! Physical view: shapes, pin geometry, and placement helpers.
//!
//! Geometry is accumulated per module, alongside (and decoupled from) the
//! netlist view. The shapes recorded here are handed to the external layout
//! backend through [`export`]; no design-rule checking happens in this
//! crate.

use std::collections::HashMap;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

pub mod export;
pub mod geom;
pub mod grid;
pub mod wire;

pub use geom::{Dir, Int, Orient, Point, Rect};

/// One drawn shape on a named layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub layer: ArcStr,
    pub rect: Rect,
}

impl Element {
    pub fn new(layer: impl Into<ArcStr>, rect: Rect) -> Self {
        Self {
            layer: layer.into(),
            rect,
        }
    }
}

/// The geometry side of a module: drawn shapes plus the bounding shape of
/// each electrical pin, keyed by pin name. The pin map uses the same names,
/// in the same order, as the netlist pin list; the layout backend depends on
/// that to keep the electrical and physical views consistent.
#[derive(Debug, Clone, Default)]
pub struct LayoutFacet {
    pub(crate) elems: Vec<Element>,
    pub(crate) pin_shapes: HashMap<ArcStr, Vec<Element>>,
    /// Pre-computed outline for library cells whose internal shapes are not
    /// replicated here.
    pub(crate) outline: Option<Rect>,
}

impl LayoutFacet {
    pub fn new() -> Self {
        Default::default()
    }

    /// A facet holding only an outline and pin shapes, as reported by the
    /// technology library for hand-authored cells.
    pub fn from_library(outline: Rect, pin_shapes: Vec<(ArcStr, Element)>) -> Self {
        let mut shapes: HashMap<ArcStr, Vec<Element>> = HashMap::new();
        for (pin, elem) in pin_shapes {
            shapes.entry(pin).or_default().push(elem);
        }
        Self {
            elems: Vec::new(),
            pin_shapes: shapes,
            outline: Some(outline),
        }
    }

    pub fn add_element(&mut self, elem: Element) {
        self.elems.push(elem);
    }

    pub fn add_pin_shape(&mut self, pin: ArcStr, elem: Element) {
        self.pin_shapes.entry(pin).or_default().push(elem);
    }

    pub fn elems(&self) -> &[Element] {
        &self.elems
    }

    pub fn pin_shapes(&self, pin: &str) -> &[Element] {
        self.pin_shapes.get(pin).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bounding box of the shapes drawn directly in this facet.
    pub fn local_bbox(&self) -> Option<Rect> {
        let mut bbox: Option<Rect> = self.outline;
        for elem in &self.elems {
            bbox = Some(match bbox {
                Some(b) => b.union(&elem.rect),
                None => elem.rect,
            });
        }
        bbox
    }
}
