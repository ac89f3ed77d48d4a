//! Global cell name registry.
//!
//! The output layout database requires globally unique cell names, so every
//! module registers its name here at construction time. Hand-authored
//! library cells are exempt: they are instantiated by name from multiple
//! independent generators, and re-registering them is a no-op.

use std::collections::HashSet;

use arcstr::ArcStr;
use lazy_static::lazy_static;

use crate::{Error, Result};

lazy_static! {
    /// Library cells that may be registered more than once per run.
    static ref REUSABLE_CELLS: HashSet<&'static str> = HashSet::from_iter([
        "inv",
        "nand2",
        "nand3",
        "nor2",
        "sram_cell",
        "sense_amp",
        "dff",
        "write_driver",
    ]);
}

pub fn is_reusable(name: &str) -> bool {
    REUSABLE_CELLS.contains(name)
}

/// Tracks every module name registered during one compilation run.
///
/// The registry must be [`reset`](NameRegistry::reset) between independent
/// runs sharing one process; stale names cause spurious
/// [`Error::DuplicateModuleName`] failures across unrelated runs.
#[derive(Debug, Default)]
pub struct NameRegistry {
    names: HashSet<ArcStr>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn register(&mut self, name: &ArcStr, allow_reuse: bool) -> Result<()> {
        if !self.names.insert(name.clone()) && !allow_reuse {
            return Err(Error::DuplicateModuleName(name.clone()));
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Clears all registered names. Call between compilation runs.
    pub fn reset(&mut self) {
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcstr::literal;

    #[test]
    fn test_duplicate_name_rejected() {
        let mut reg = NameRegistry::new();
        reg.register(&literal!("decoder"), false).unwrap();
        let err = reg.register(&literal!("decoder"), false).unwrap_err();
        assert!(matches!(err, Error::DuplicateModuleName(_)));
    }

    #[test]
    fn test_reusable_registration_is_idempotent() {
        let mut reg = NameRegistry::new();
        reg.register(&literal!("inv"), true).unwrap();
        reg.register(&literal!("inv"), true).unwrap();
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_reset_clears_names() {
        let mut reg = NameRegistry::new();
        reg.register(&literal!("bank"), false).unwrap();
        reg.reset();
        assert!(reg.is_empty());
        reg.register(&literal!("bank"), false).unwrap();
    }

    #[test]
    fn test_curated_reuse_list() {
        assert!(is_reusable("inv"));
        assert!(is_reusable("sram_cell"));
        assert!(!is_reusable("bitcell_array"));
    }
}
