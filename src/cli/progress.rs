use std::time::Duration;

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::plan::TaskKey;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    InProgress,
    Done,
    Failed,
}

pub struct Step {
    desc: String,
    key: TaskKey,
    progress_bar: ProgressBar,
}

impl Step {
    fn set_status(&mut self, status: StepStatus) {
        match status {
            StepStatus::Pending => {
                self.progress_bar
                    .set_message(format!("{} {}", "…".dimmed(), self.desc));
            }
            StepStatus::InProgress => {
                self.progress_bar.enable_steady_tick(Duration::from_millis(100));
                self.progress_bar
                    .set_message(format!("{} {}", "▶".cyan(), self.desc));
            }
            StepStatus::Done => {
                self.progress_bar
                    .finish_with_message(format!("{} {}", "✔".green(), self.desc));
            }
            StepStatus::Failed => {
                self.progress_bar
                    .abandon_with_message(format!("{} {}", "✘".red(), self.desc));
            }
        }
    }
}

pub struct StepContext {
    steps: Vec<Step>,
}

impl StepContext {
    pub fn new() -> Self {
        let descs = [
            (TaskKey::GeneratePlan, "Generate plan"),
            (TaskKey::GenerateNetlist, "Generate netlist"),
            (TaskKey::GenerateLayout, "Generate layout view"),
            (TaskKey::GenerateVerilog, "Generate Verilog model"),
        ];
        let mp = MultiProgress::new();
        let style = ProgressStyle::with_template("{msg}").unwrap();
        let mut steps = Vec::new();
        for (i, (key, desc)) in descs.into_iter().enumerate() {
            let progress_bar = ProgressBar::new_spinner().with_style(style.clone());
            mp.insert(i + 1, progress_bar.clone());
            let mut step = Step {
                desc: format!("[{}/{}] {}", i + 1, descs.len(), desc),
                key,
                progress_bar,
            };
            step.set_status(StepStatus::Pending);
            steps.push(step);
        }
        Self { steps }
    }

    fn set_status(&mut self, key: TaskKey, status: StepStatus) {
        if let Some(step) = self.steps.iter_mut().find(|s| s.key == key) {
            step.set_status(status);
        }
    }

    pub fn start(&mut self, key: TaskKey) {
        self.set_status(key, StepStatus::InProgress);
    }

    pub fn finish(&mut self, key: TaskKey) {
        self.set_status(key, StepStatus::Done);
    }

    /// Marks any still-running step failed and passes the error through.
    pub fn check<T>(&mut self, res: anyhow::Result<T>) -> anyhow::Result<T> {
        if res.is_err() {
            for step in self.steps.iter_mut() {
                if !step.progress_bar.is_finished() {
                    step.set_status(StepStatus::Failed);
                }
            }
        }
        res
    }
}

impl Default for StepContext {
    fn default() -> Self {
        Self::new()
    }
}
