use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "memgen", author, version, about = "A configurable memory macro compiler")]
pub struct Args {
    /// Path to the macro configuration (TOML).
    #[arg(short, long)]
    pub config: PathBuf,

    /// Directory for output artifacts. Defaults to a directory named after
    /// the macro.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}
