use std::path::{Path, PathBuf};

use crate::config::MemConfig;

pub fn out_sram(config: &MemConfig) -> String {
    let &MemConfig {
        num_words,
        data_width,
        mux_ratio,
        num_banks,
        control,
    } = config;
    format!("memgen_sram_{data_width}x{num_words}m{mux_ratio}b{num_banks}_{control}")
}

pub fn out_spice(work_dir: impl AsRef<Path>, name: &str) -> PathBuf {
    PathBuf::from(work_dir.as_ref()).join(format!("{}.spice", name))
}

pub fn out_layout(work_dir: impl AsRef<Path>, name: &str) -> PathBuf {
    PathBuf::from(work_dir.as_ref()).join(format!("{}.layout.json", name))
}

pub fn out_verilog(work_dir: impl AsRef<Path>, name: &str) -> PathBuf {
    PathBuf::from(work_dir.as_ref()).join(format!("{}.v", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControlMode;

    #[test]
    fn test_macro_name() {
        let config = MemConfig {
            num_words: 1024,
            data_width: 8,
            mux_ratio: 4,
            num_banks: 2,
            control: ControlMode::Simple,
        };
        assert_eq!(out_sram(&config), "memgen_sram_8x1024m4b2_simple");
    }
}
