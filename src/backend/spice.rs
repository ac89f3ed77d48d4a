//! Hierarchical SPICE netlist serialization.
//!
//! The backend walks the module graph bottom-up and emits one subcircuit
//! definition per distinct compound module, leaves first, each exactly once.
//! The textual format is an ordered sequence of definitions, so every
//! definition must appear before its first reference.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arcstr::ArcStr;
use itertools::Itertools;
use log::debug;

use crate::schematic::{Instance, Module, NetlistFacet};
use crate::Result;

pub struct SpiceBackend<T>
where
    T: Write,
{
    emitted: HashSet<ArcStr>,
    out: T,
}

impl<T> SpiceBackend<T>
where
    T: Write,
{
    pub fn new(out: T) -> Self {
        Self {
            emitted: HashSet::new(),
            out,
        }
    }

    /// Serializes `top` and every module reachable from it.
    pub fn netlist(&mut self, top: &Arc<Module>) -> Result<()> {
        if !self.emitted.insert(top.name().clone()) {
            return Ok(());
        }

        // Connectivity is re-validated here no matter how connections were
        // added; a malformed netlist must never reach disk.
        top.validate_connectivity()?;

        for child in top.children() {
            self.netlist(child)?;
        }

        match top.netlist() {
            NetlistFacet::Leaf { spice } => {
                // Library text passes through byte-identical.
                write!(self.out, "{}", spice)?;
                Ok(())
            }
            // Devices emit per-instance lines in their parents; the
            // definition itself contributes nothing.
            NetlistFacet::Device { .. } => Ok(()),
            NetlistFacet::Compound(_) => self.netlist_compound(top),
        }
    }

    fn netlist_compound(&mut self, module: &Arc<Module>) -> Result<()> {
        // Pass-through modules exist only to group geometry; they must not
        // appear as electrical hierarchy.
        let electrical = module.conns().iter().any(|c| !c.is_empty());
        if module.pins().is_empty() || !electrical {
            debug!("suppressing pass-through module {}", module.name());
            return Ok(());
        }

        write!(self.out, ".SUBCKT {}", module.name())?;
        for pin in module.pins() {
            write!(self.out, " {}", pin.name)?;
        }
        writeln!(self.out)?;

        for (instance, conns) in module.instances().iter().zip(module.conns()) {
            if conns.is_empty() {
                continue;
            }
            match instance.master.netlist() {
                NetlistFacet::Device { template } => {
                    writeln!(self.out, "{}", device_line(template, instance, conns))?;
                }
                _ => {
                    write!(self.out, "X{}", instance.name)?;
                    for net in conns {
                        write!(self.out, " {}", net)?;
                    }
                    writeln!(self.out, " {}", instance.master.name())?;
                }
            }
        }

        writeln!(self.out, ".ENDS {}", module.name())?;
        Ok(())
    }

    pub fn output(self) -> T {
        self.out
    }
}

fn device_line(template: &str, instance: &Instance, conns: &[ArcStr]) -> String {
    template
        .replace("{name}", &instance.name)
        .replace("{ports}", &conns.iter().join(" "))
}

/// Serializes `top` into memory and writes the file only on success, so an
/// invariant violation never leaves a half-written netlist on disk.
pub fn save_spice(path: impl AsRef<Path>, top: &Arc<Module>) -> Result<()> {
    let mut backend = SpiceBackend::new(Vec::new());
    backend.netlist(top)?;
    let buf = backend.output();
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, buf)?;
    debug!("wrote netlist to {:?}", path);
    Ok(())
}
