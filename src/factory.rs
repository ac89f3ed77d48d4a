//! Compilation context.
//!
//! A [`Factory`] bundles the resources every generator needs: the
//! technology constants, the leaf cell library, and the name registry that
//! enforces global cell-name uniqueness. One factory corresponds to one
//! compilation run; call [`Factory::reset`] before reusing it for an
//! independent run in the same process.

use std::sync::Arc;

use arcstr::ArcStr;

use crate::pdk::Pdk;
use crate::registry::NameRegistry;
use crate::schematic::{Module, Pin};
use crate::tech::{sky130, CellLibrary};
use crate::Result;

pub struct Factory {
    pdk: Pdk,
    lib: CellLibrary,
    registry: NameRegistry,
}

impl Factory {
    pub fn new(pdk: Pdk, lib: CellLibrary) -> Self {
        Self {
            pdk,
            lib,
            registry: NameRegistry::new(),
        }
    }

    pub fn sky130() -> Result<Self> {
        Ok(Self::new(sky130::pdk()?, sky130::cell_library()))
    }

    #[inline]
    pub fn pdk(&self) -> &Pdk {
        &self.pdk
    }

    #[inline]
    pub fn lib(&self) -> &CellLibrary {
        &self.lib
    }

    #[inline]
    pub fn registry(&mut self) -> &mut NameRegistry {
        &mut self.registry
    }

    pub fn leaf(&mut self, name: impl Into<ArcStr>) -> Result<Arc<Module>> {
        Ok(Arc::new(Module::leaf(name, &self.lib, &mut self.registry)?))
    }

    pub fn compound(&mut self, name: impl Into<ArcStr>) -> Result<Module> {
        Module::compound(name, &mut self.registry)
    }

    pub fn device(
        &mut self,
        name: impl Into<ArcStr>,
        pins: Vec<Pin>,
        template: impl Into<String>,
    ) -> Result<Arc<Module>> {
        Ok(Arc::new(Module::device(
            name,
            pins,
            template,
            &mut self.registry,
        )?))
    }

    /// Clears per-run state. Required between independent compilation runs
    /// sharing one process.
    pub fn reset(&mut self) {
        self.registry.reset();
    }
}
