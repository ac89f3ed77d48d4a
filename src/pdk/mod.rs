//! Technology constants and via generation.
//!
//! Design rules are loaded once per compilation run into a read-only
//! [`TechConfig`] and shared by every generator. A missing rule is fatal: a
//! generator cannot proceed without the widths and spacings it was asked to
//! obey.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::layout::geom::Int;
use crate::Result;

mod via;

pub use via::{ViaParams, ViaParamsBuilder};

/// An ordered list of layers forming a conductive path through the stack,
/// e.g. `["met1", "via1", "met2"]`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct ViaStack {
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct SpacingConfig {
    pub from: String,
    pub to: String,
    pub dist: Int,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Enclosure {
    pub layer: String,
    pub enclosure: Int,
    #[serde(default)]
    pub one_side: bool,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct LayerConfig {
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub width: Int,
    #[serde(default)]
    pub space: Int,
    #[serde(default)]
    pub enclosures: Vec<Enclosure>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TechConfig {
    pub grid: Int,
    pub tech: String,
    pub beta: f64,
    layers: HashMap<String, LayerConfig>,
    spacing: Vec<SpacingConfig>,
    stacks: HashMap<String, ViaStack>,
}

impl TechConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let txt = std::fs::read_to_string(path)?;
        Self::from_toml(&txt)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn layer(&self, l: &str) -> &LayerConfig {
        self.layers
            .get(l)
            .unwrap_or_else(|| panic!("no design rules for layer: {}", l))
    }

    pub fn space(&self, from: &str, to: &str) -> Int {
        self.spacing
            .iter()
            .find(|s| (s.from == from && s.to == to) || (s.to == from && s.from == to))
            .map(|s| s.dist)
            .unwrap_or_default()
    }

    pub fn stack(&self, stack: &str) -> &ViaStack {
        self.stacks
            .get(stack)
            .unwrap_or_else(|| panic!("no such via stack: {}", stack))
    }

    /// Finds the via stack whose endpoint layers are `a` and `b`, in either
    /// order.
    pub fn stack_between(&self, a: &str, b: &str) -> (&str, &ViaStack) {
        self.stacks
            .iter()
            .find(|(_, s)| {
                let first = s.layers.first().map(String::as_str);
                let last = s.layers.last().map(String::as_str);
                (first == Some(a) && last == Some(b)) || (first == Some(b) && last == Some(a))
            })
            .map(|(name, s)| (name.as_str(), s))
            .unwrap_or_else(|| panic!("no via stack between {} and {}", a, b))
    }

    /// Scales an NMOS width by the technology's beta ratio, snapped to the
    /// manufacturing grid.
    pub fn scale_pmos(&self, nmos_width: Int) -> Int {
        let pmos_width = (nmos_width as f64 * self.beta) / (self.grid as f64);
        (pmos_width.round() as Int) * self.grid
    }
}

impl LayerConfig {
    fn enclosure_inner(&self, l: &str, one_sided: bool) -> Int {
        self.enclosures
            .iter()
            .filter(|enc| enc.layer == l && (one_sided || !enc.one_side))
            .map(|enc| enc.enclosure)
            .max()
            .unwrap_or_default()
    }

    pub fn enclosure(&self, l: &str) -> Int {
        self.enclosure_inner(l, false)
    }

    pub fn one_side_enclosure(&self, l: &str) -> Int {
        self.enclosure_inner(l, true)
    }
}

/// Shared handle to the technology constants for one compilation run.
#[derive(Debug, Clone)]
pub struct Pdk {
    pub config: Arc<TechConfig>,
}

impl Pdk {
    pub fn new(config: TechConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    #[inline]
    pub fn config(&self) -> &TechConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> Int {
        self.config.grid
    }
}
