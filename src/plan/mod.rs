//! Compilation planning and execution.
//!
//! A plan captures everything derived from the user config before any
//! generation happens; executing it produces the output artifacts in order:
//! netlist, layout view, behavioral model.

use std::path::Path;

use anyhow::Context;
use log::info;

use crate::backend::spice::save_spice;
use crate::cli::progress::StepContext;
use crate::config::MemConfig;
use crate::factory::Factory;
use crate::layout::export::save_layout;
use crate::paths::{out_layout, out_spice, out_sram, out_verilog};
use crate::schematic::sram::{sram, SramParams};
use crate::verilog::{save_1rw_verilog, Sram1RwParams};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TaskKey {
    GeneratePlan,
    GenerateNetlist,
    GenerateLayout,
    GenerateVerilog,
}

#[derive(Debug, Clone)]
pub struct MacroPlan {
    pub name: String,
    pub sram_params: SramParams,
}

pub fn generate_plan(config: &MemConfig) -> anyhow::Result<MacroPlan> {
    config.validate()?;
    let name = out_sram(config);
    let sram_params = SramParams::from_config(name.clone(), config);
    Ok(MacroPlan { name, sram_params })
}

pub struct ExecutePlanParams<'a> {
    pub work_dir: &'a Path,
    pub plan: &'a MacroPlan,
    pub ctx: Option<&'a mut StepContext>,
}

pub fn execute_plan(params: ExecutePlanParams) -> anyhow::Result<()> {
    let ExecutePlanParams {
        work_dir,
        plan,
        mut ctx,
    } = params;

    let mut fab = Factory::sky130()?;

    if let Some(ctx) = ctx.as_deref_mut() {
        ctx.start(TaskKey::GenerateNetlist);
    }
    let top = sram(&plan.sram_params, &mut fab).context("generate macro")?;
    let spice_path = out_spice(work_dir, &plan.name);
    save_spice(&spice_path, &top).context("write netlist")?;
    info!("netlist written to {:?}", spice_path);
    if let Some(ctx) = ctx.as_deref_mut() {
        ctx.finish(TaskKey::GenerateNetlist);
    }

    if let Some(ctx) = ctx.as_deref_mut() {
        ctx.start(TaskKey::GenerateLayout);
    }
    let layout_path = out_layout(work_dir, &plan.name);
    save_layout(&layout_path, &top).context("write layout view")?;
    info!("layout view written to {:?}", layout_path);
    if let Some(ctx) = ctx.as_deref_mut() {
        ctx.finish(TaskKey::GenerateLayout);
    }

    if let Some(ctx) = ctx.as_deref_mut() {
        ctx.start(TaskKey::GenerateVerilog);
    }
    let verilog_path = out_verilog(work_dir, &plan.name);
    save_1rw_verilog(
        &verilog_path,
        &Sram1RwParams {
            module_name: plan.name.clone(),
            num_words: plan.sram_params.num_words,
            data_width: plan.sram_params.data_width,
            addr_width: plan.sram_params.addr_width(),
        },
    )
    .context("write behavioral model")?;
    info!("behavioral model written to {:?}", verilog_path);
    if let Some(ctx) = ctx.as_deref_mut() {
        ctx.finish(TaskKey::GenerateVerilog);
    }

    Ok(())
}
