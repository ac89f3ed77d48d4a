//! Geometry view handed to the external layout backend.
//!
//! For each distinct module the exported view carries its shapes, its
//! placed instances, and its pin shapes keyed by pin name, in the same pin
//! order as the netlist. The physical backend relies on that ordering to
//! keep the electrical and physical views consistent.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use arcstr::ArcStr;
use log::debug;
use serde::Serialize;

use crate::layout::geom::{Orient, Point, Rect};
use crate::layout::Element;
use crate::schematic::{Module, PinDir};
use crate::Result;

#[derive(Debug, Clone, Serialize)]
pub struct PinView {
    pub name: ArcStr,
    pub dir: PinDir,
    pub shapes: Vec<Element>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstView {
    pub name: ArcStr,
    pub master: ArcStr,
    pub loc: Point,
    pub orient: Orient,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutView {
    pub name: ArcStr,
    pub pins: Vec<PinView>,
    pub elems: Vec<Element>,
    pub insts: Vec<InstView>,
    pub bbox: Option<Rect>,
}

impl LayoutView {
    fn from_module(module: &Module) -> Self {
        let pins = module
            .pins()
            .iter()
            .map(|pin| PinView {
                name: pin.name.clone(),
                dir: pin.dir,
                shapes: module.layout().pin_shapes(&pin.name).to_vec(),
            })
            .collect();
        let insts = module
            .instances()
            .iter()
            .map(|inst| InstView {
                name: inst.name.clone(),
                master: inst.master.name().clone(),
                loc: inst.loc,
                orient: inst.orient,
            })
            .collect();
        Self {
            name: module.name().clone(),
            pins,
            elems: module.layout().elems().to_vec(),
            insts,
            bbox: module.bbox(),
        }
    }
}

/// Collects one view per distinct module reachable from `top`, children
/// first.
pub fn layout_views(top: &Arc<Module>) -> Vec<LayoutView> {
    let mut views = Vec::new();
    let mut visited = HashSet::new();
    collect(top, &mut visited, &mut views);
    views
}

fn collect(module: &Arc<Module>, visited: &mut HashSet<ArcStr>, views: &mut Vec<LayoutView>) {
    if !visited.insert(module.name().clone()) {
        return;
    }
    for child in module.children() {
        collect(child, visited, views);
    }
    views.push(LayoutView::from_module(module));
}

/// Writes the layout views as JSON. Rendered fully in memory first so a
/// failure never leaves a partial file.
pub fn save_layout(path: impl AsRef<Path>, top: &Arc<Module>) -> Result<()> {
    let views = layout_views(top);
    let buf = serde_json::to_vec_pretty(&views)?;
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, buf)?;
    debug!("wrote layout view to {:?}", path);
    Ok(())
}
