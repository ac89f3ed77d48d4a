//! Behavioral Verilog model generation.

use std::path::Path;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::Result;

lazy_static! {
    pub static ref TEMPLATES: std::result::Result<Tera, tera::Error> =
        Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.v"));
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sram1RwParams {
    pub module_name: String,
    pub num_words: usize,
    pub data_width: usize,
    pub addr_width: usize,
}

pub fn generate_1rw_verilog(params: &Sram1RwParams) -> Result<String> {
    assert_eq!(params.num_words, 1 << params.addr_width);
    let tera = TEMPLATES
        .as_ref()
        .map_err(|e| tera::Error::msg(format!("failed to load templates: {e}")))?;
    Ok(tera.render("sram_1rw.v", &Context::from_serialize(params)?)?)
}

pub fn save_1rw_verilog(path: impl AsRef<Path>, params: &Sram1RwParams) -> Result<()> {
    let verilog = generate_1rw_verilog(params)?;
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, verilog)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verilog_model_ports() {
        let v = generate_1rw_verilog(&Sram1RwParams {
            module_name: "memgen_sram_8x1024m4b1_simple".to_string(),
            num_words: 1024,
            data_width: 8,
            addr_width: 10,
        })
        .unwrap();
        assert!(v.contains("module memgen_sram_8x1024m4b1_simple"));
        assert!(v.contains("[9:0]"));
        assert!(v.contains("[7:0]"));
    }

    #[test]
    #[should_panic]
    fn test_word_count_must_match_addr_width() {
        let _ = generate_1rw_verilog(&Sram1RwParams {
            module_name: "bad".to_string(),
            num_words: 1000,
            data_width: 8,
            addr_width: 10,
        });
    }
}
