use std::fs::canonicalize;
use std::path::PathBuf;

use clap::Parser;

use crate::cli::args::Args;
use crate::cli::progress::StepContext;
use crate::config::parse_mem_config;
use crate::paths::out_sram;
use crate::plan::{execute_plan, generate_plan, ExecutePlanParams, TaskKey};

pub mod args;
pub mod progress;

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = canonicalize(&args.config)?;
    let config = parse_mem_config(&config_path)?;
    let name = out_sram(&config);

    let work_dir = args.output_dir.unwrap_or_else(|| PathBuf::from(&name));
    std::fs::create_dir_all(&work_dir)?;
    let work_dir = canonicalize(work_dir)?;

    println!("memgen — memory macro compiler\n");
    println!("Configuration file: {:?}", &config_path);
    println!("Output directory: {:?}\n", &work_dir);
    println!("Macro parameters:");
    println!("\tNumber of words: {}", config.num_words);
    println!("\tData width: {}", config.data_width);
    println!("\tMux ratio: {}", config.mux_ratio);
    println!("\tBanks: {}", config.num_banks);
    println!("\tControl mode: {}\n", config.control);

    let mut ctx = StepContext::new();

    ctx.start(TaskKey::GeneratePlan);
    let plan = ctx.check(generate_plan(&config))?;
    ctx.finish(TaskKey::GeneratePlan);

    let res = execute_plan(ExecutePlanParams {
        work_dir: &work_dir,
        plan: &plan,
        ctx: Some(&mut ctx),
    });
    ctx.check(res)?;

    Ok(())
}
