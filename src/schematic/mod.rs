//! The circuit data model: modules, instances, pins, and connections.
//!
//! A [`Module`] is one reusable circuit definition. Its netlist content and
//! its geometry are separate facets: the body enum carries the electrical
//! view, a [`LayoutFacet`] carries the physical one, and the ordered pin
//! list is shared by both. Nets are plain strings; two connection entries
//! naming the same string are the same net.

use std::sync::Arc;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::layout::geom::{Orient, Point, Rect};
use crate::layout::{Element, LayoutFacet};
use crate::registry::{self, NameRegistry};
use crate::tech::CellLibrary;
use crate::{bus_bit, Error, Result};

pub mod bank;
pub mod bitcell_array;
pub mod control;
pub mod decoder;
pub mod dff;
pub mod gate;
pub mod mos;
pub mod mux;
pub mod precharge;
pub mod sense_amp;
pub mod sram;
pub mod wrdriver;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDir {
    Input,
    Output,
    InOut,
    Power,
    Ground,
}

/// A named external connection point. Pin lists are ordered: connections
/// bind positionally when the netlist is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub name: ArcStr,
    pub dir: PinDir,
}

impl Pin {
    pub fn new(name: impl Into<ArcStr>, dir: PinDir) -> Self {
        Self {
            name: name.into(),
            dir,
        }
    }
}

/// Handle to an instance within its parent module.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InstanceId(pub(crate) usize);

/// A placement of a master module inside a parent. The location and
/// orientation are consumed only by the geometry side.
#[derive(Debug, Clone)]
pub struct Instance {
    pub name: ArcStr,
    pub master: Arc<Module>,
    pub loc: Point,
    pub orient: Orient,
}

#[derive(Debug, Default)]
pub struct CompoundBody {
    /// Distinct child definitions, deduplicated by name.
    children: Vec<Arc<Module>>,
    instances: Vec<Instance>,
    /// One ordered net list per instance, in instance order. An empty entry
    /// marks a physical-only instance with no electrical meaning.
    conns: Vec<Vec<ArcStr>>,
}

/// The electrical body of a module.
#[derive(Debug)]
pub enum NetlistFacet {
    /// Hand-authored circuit text from the technology library, emitted
    /// verbatim.
    Leaf { spice: String },
    /// A primitive device with a specialized one-line output syntax. The
    /// template may reference `{name}` (instance name) and `{ports}`
    /// (space-joined connections in pin order); the definition itself emits
    /// nothing.
    Device { template: String },
    /// Built by placing and connecting instances of other modules.
    Compound(CompoundBody),
}

#[derive(Debug)]
pub struct Module {
    name: ArcStr,
    pins: Vec<Pin>,
    netlist: NetlistFacet,
    layout: LayoutFacet,
}

impl Module {
    /// Constructs a leaf module by looking up `name` in the technology
    /// library. Returns [`Error::LibraryCellNotFound`] when the library has
    /// no such cell; callers that generate the cell dynamically treat that
    /// as the fallback path, not a failure.
    pub fn leaf(
        name: impl Into<ArcStr>,
        lib: &CellLibrary,
        reg: &mut NameRegistry,
    ) -> Result<Module> {
        let name = name.into();
        let cell = lib
            .get(&name)
            .ok_or_else(|| Error::LibraryCellNotFound(name.clone()))?;
        reg.register(&name, registry::is_reusable(&name))?;
        Ok(Module {
            name,
            pins: cell.pins.clone(),
            netlist: NetlistFacet::Leaf {
                spice: cell.spice.clone(),
            },
            layout: cell.layout_facet(),
        })
    }

    /// Constructs an empty compound module. The caller adds pins, children,
    /// instances, and connections afterwards.
    pub fn compound(name: impl Into<ArcStr>, reg: &mut NameRegistry) -> Result<Module> {
        let name = name.into();
        reg.register(&name, false)?;
        Ok(Module {
            name,
            pins: Vec::new(),
            netlist: NetlistFacet::Compound(CompoundBody::default()),
            layout: LayoutFacet::new(),
        })
    }

    /// Constructs a primitive device module with a templated instantiation
    /// line.
    pub fn device(
        name: impl Into<ArcStr>,
        pins: Vec<Pin>,
        template: impl Into<String>,
        reg: &mut NameRegistry,
    ) -> Result<Module> {
        let name = name.into();
        reg.register(&name, registry::is_reusable(&name))?;
        Ok(Module {
            name,
            pins,
            netlist: NetlistFacet::Device {
                template: template.into(),
            },
            layout: LayoutFacet::new(),
        })
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    #[inline]
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    #[inline]
    pub fn netlist(&self) -> &NetlistFacet {
        &self.netlist
    }

    #[inline]
    pub fn layout(&self) -> &LayoutFacet {
        &self.layout
    }

    pub fn add_pin(&mut self, name: impl Into<ArcStr>, dir: PinDir) {
        self.pins.push(Pin::new(name, dir));
    }

    /// Appends pins with the default `InOut` direction.
    pub fn add_pins(&mut self, names: &[&str]) {
        for name in names {
            self.add_pin(*name, PinDir::InOut);
        }
    }

    /// Appends one pin per bit, named `name[0]` through `name[width-1]`.
    pub fn add_bus_pin(&mut self, name: &str, width: usize, dir: PinDir) {
        for i in 0..width {
            self.add_pin(bus_bit(name, i), dir);
        }
    }

    /// Adds a child definition. Adding the same child twice is a no-op.
    pub fn add_child(&mut self, child: &Arc<Module>) -> Result<()> {
        let body = self.compound_mut()?;
        if !body.children.iter().any(|c| c.name == child.name) {
            body.children.push(Arc::clone(child));
        }
        Ok(())
    }

    /// Records a new instance of `master` and returns its handle. The
    /// master is appended to the child set if not already present. Exactly
    /// one connection record must be added per instance, in the same order,
    /// before serialization.
    pub fn add_instance(
        &mut self,
        name: impl Into<ArcStr>,
        master: &Arc<Module>,
        loc: Point,
        orient: Orient,
    ) -> Result<InstanceId> {
        self.add_child(master)?;
        let body = self.compound_mut()?;
        body.instances.push(Instance {
            name: name.into(),
            master: Arc::clone(master),
            loc,
            orient,
        });
        Ok(InstanceId(body.instances.len() - 1))
    }

    /// Appends the connection record for `inst`, validating immediately:
    /// the net count must match the master's pin count
    /// ([`Error::PinCountMismatch`]) and every earlier instance must already
    /// be connected ([`Error::UnconnectedInstance`]). An empty net list
    /// marks a physical-only instance and skips the pin-count check.
    pub fn connect<S: AsRef<str>>(&mut self, inst: InstanceId, nets: &[S]) -> Result<()> {
        self.connect_inner(inst, nets, true)
    }

    /// Appends a connection record without validation. Generators that
    /// place a whole row and bulk-connect afterwards use this; the
    /// serializer still performs the full check before emitting anything.
    pub fn connect_unchecked<S: AsRef<str>>(&mut self, inst: InstanceId, nets: &[S]) -> Result<()> {
        self.connect_inner(inst, nets, false)
    }

    fn connect_inner<S: AsRef<str>>(
        &mut self,
        inst: InstanceId,
        nets: &[S],
        check: bool,
    ) -> Result<()> {
        let name = self.name.clone();
        let body = self.compound_mut()?;
        let nets: Vec<ArcStr> = nets.iter().map(|n| ArcStr::from(n.as_ref())).collect();
        if check {
            let instance = body.instances.get(inst.0).ok_or_else(|| {
                Error::MalformedHierarchy {
                    module: name.clone(),
                    reason: format!("no instance with index {}", inst.0),
                }
            })?;
            if !nets.is_empty() && nets.len() != instance.master.pins.len() {
                return Err(Error::PinCountMismatch {
                    module: name,
                    instance: instance.name.clone(),
                    master: instance.master.name.clone(),
                    expected: instance.master.pins.len(),
                    found: nets.len(),
                });
            }
            // Connecting out of order means an earlier instance was skipped.
            if body.conns.len() != inst.0 {
                return Err(Error::UnconnectedInstance {
                    module: name,
                    instances: inst.0,
                    connections: body.conns.len(),
                });
            }
        }
        body.conns.push(nets);
        Ok(())
    }

    /// Final connectivity gate, run by the serializer regardless of how
    /// connections were added.
    pub(crate) fn validate_connectivity(&self) -> Result<()> {
        let body = match &self.netlist {
            NetlistFacet::Compound(body) => body,
            _ => return Ok(()),
        };
        if body.instances.len() != body.conns.len() {
            return Err(Error::UnconnectedInstance {
                module: self.name.clone(),
                instances: body.instances.len(),
                connections: body.conns.len(),
            });
        }
        for (instance, conns) in body.instances.iter().zip(&body.conns) {
            if !conns.is_empty() && conns.len() != instance.master.pins.len() {
                return Err(Error::PinCountMismatch {
                    module: self.name.clone(),
                    instance: instance.name.clone(),
                    master: instance.master.name.clone(),
                    expected: instance.master.pins.len(),
                    found: conns.len(),
                });
            }
            if !body.children.iter().any(|c| c.name == instance.master.name) {
                return Err(Error::MalformedHierarchy {
                    module: self.name.clone(),
                    reason: format!(
                        "instance {} references master {} outside the child set",
                        instance.name, instance.master.name
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn children(&self) -> &[Arc<Module>] {
        match &self.netlist {
            NetlistFacet::Compound(body) => &body.children,
            _ => &[],
        }
    }

    pub fn instances(&self) -> &[Instance] {
        match &self.netlist {
            NetlistFacet::Compound(body) => &body.instances,
            _ => &[],
        }
    }

    pub fn conns(&self) -> &[Vec<ArcStr>] {
        match &self.netlist {
            NetlistFacet::Compound(body) => &body.conns,
            _ => &[],
        }
    }

    pub fn instance(&self, id: InstanceId) -> &Instance {
        &self.instances()[id.0]
    }

    fn compound_mut(&mut self) -> Result<&mut CompoundBody> {
        let name = self.name.clone();
        match &mut self.netlist {
            NetlistFacet::Compound(body) => Ok(body),
            _ => Err(Error::MalformedHierarchy {
                module: name,
                reason: "leaf and device modules cannot own instances".to_string(),
            }),
        }
    }

    // Geometry side.

    pub fn add_rect(&mut self, layer: impl Into<ArcStr>, rect: Rect) {
        self.layout.add_element(Element::new(layer, rect));
    }

    pub fn add_pin_shape(&mut self, pin: impl Into<ArcStr>, layer: impl Into<ArcStr>, rect: Rect) {
        self.layout.add_pin_shape(pin.into(), Element::new(layer, rect));
    }

    /// Bounding box of this module's own shapes plus every placed
    /// instance's footprint.
    pub fn bbox(&self) -> Option<Rect> {
        let mut bbox = self.layout.local_bbox();
        for instance in self.instances() {
            if let Some(fp) = instance.footprint() {
                bbox = Some(match bbox {
                    Some(b) => b.union(&fp),
                    None => fp,
                });
            }
        }
        bbox
    }
}

impl Instance {
    /// The area this placement occupies: the master's bounding box, rotated
    /// per the orientation, with its lower-left corner at `loc`.
    pub fn footprint(&self) -> Option<Rect> {
        let bbox = self.master.bbox()?;
        let (w, h) = match self.orient {
            Orient::R90 | Orient::R270 => (bbox.height(), bbox.width()),
            _ => (bbox.width(), bbox.height()),
        };
        Some(Rect::with_size(self.loc, w, h))
    }
}
