//! Macro configuration, parsed from TOML.

use std::fmt::Display;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{clog2, Error, Result};

#[derive(Debug, Eq, PartialEq, Clone, Hash, Serialize, Deserialize)]
pub struct MemConfig {
    pub num_words: usize,
    pub data_width: usize,
    pub mux_ratio: usize,
    #[serde(default = "default_num_banks")]
    pub num_banks: usize,
    #[serde(default)]
    pub control: ControlMode,
}

fn default_num_banks() -> usize {
    1
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum ControlMode {
    Simple,
}

impl Default for ControlMode {
    fn default() -> Self {
        Self::Simple
    }
}

impl Display for ControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Simple => write!(f, "simple"),
        }
    }
}

impl MemConfig {
    pub fn validate(&self) -> Result<()> {
        let err = |msg: String| Err(Error::InvalidConfig(msg));
        if !self.num_words.is_power_of_two() || self.num_words < 32 {
            return err(format!(
                "num_words must be a power of two >= 32, got {}",
                self.num_words
            ));
        }
        if self.num_words > 65536 {
            return err(format!("num_words too large: {}", self.num_words));
        }
        if self.data_width == 0 {
            return err("data_width must be nonzero".to_string());
        }
        if ![2, 4, 8].contains(&self.mux_ratio) {
            return err(format!("mux_ratio must be 2, 4, or 8, got {}", self.mux_ratio));
        }
        if ![1, 2, 4].contains(&self.num_banks) {
            return err(format!("num_banks must be 1, 2, or 4, got {}", self.num_banks));
        }
        let bits_used = clog2(self.mux_ratio) + clog2(self.num_banks);
        let addr_width = clog2(self.num_words);
        if addr_width <= bits_used {
            return err("num_words too small for the mux ratio and bank count".to_string());
        }
        let row_bits = addr_width - bits_used;
        if !(2..=9).contains(&row_bits) {
            return err(format!(
                "unsupported row count: 2^{} rows per bank",
                row_bits
            ));
        }
        Ok(())
    }
}

pub fn parse_mem_config(path: impl AsRef<Path>) -> Result<MemConfig> {
    let contents = fs::read_to_string(path)?;
    let config: MemConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MemConfig {
        MemConfig {
            num_words: 1024,
            data_width: 8,
            mux_ratio: 4,
            num_banks: 1,
            control: ControlMode::Simple,
        }
    }

    #[test]
    fn test_valid_config() {
        base().validate().unwrap();
    }

    #[test]
    fn test_rejects_non_power_of_two_words() {
        let mut config = base();
        config.num_words = 1000;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_bad_mux_ratio() {
        let mut config = base();
        config.mux_ratio = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_with_defaults() {
        let config: MemConfig = toml::from_str(
            r#"
            num_words = 2048
            data_width = 16
            mux_ratio = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.num_banks, 1);
        assert_eq!(config.control, ControlMode::Simple);
        config.validate().unwrap();
    }
}
