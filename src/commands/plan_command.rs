//! Dry-run command
//!
//! Resolves a clip and prints the engine command line without running it.

use clap::ArgMatches;
use log::info;

use crate::api::RasterClip;
use crate::clip::{ClipJob, ClipPlan};
use crate::commands::cli::job_from_args;
use crate::commands::command_traits::Command;
use crate::config::Config;
use crate::errors::ClipResult;
use crate::utils::logger::Logger;

/// Command for showing what a clip would do
pub struct PlanCommand<'a> {
    job: ClipJob,
    api: RasterClip,
    logger: &'a Logger,
}

impl<'a> PlanCommand<'a> {
    pub fn new(args: &ArgMatches, config: Config, logger: &'a Logger) -> ClipResult<Self> {
        Ok(PlanCommand {
            job: job_from_args(args)?,
            api: RasterClip::new(config),
            logger,
        })
    }
}

/// Text printed for a dry run
///
/// Temporary cutline datasets named in `command` only live as long as the
/// plan, so the summary says so instead of offering a runnable command line.
pub fn dry_run_summary(plan: &ClipPlan, command: &str) -> String {
    let mut lines = vec![
        format!("Mode: {}", plan.request.mode_name()),
        format!("Selected features: {}", plan.selected),
        format!("Extent: {}", plan.extent()),
    ];
    match &plan.crs {
        Some(crs) => lines.push(format!("Coordinate system: {}", crs)),
        None => lines.push("Coordinate system: unknown".to_string()),
    }
    lines.extend(plan.warnings.iter().map(|message| format!("Warning: {}", message)));
    lines.push(command.to_string());

    let temporary = plan.temporary_datasets();
    if !temporary.is_empty() {
        lines.push(format!(
            "Note: the command reads {} temporary cutline dataset(s) that are removed when the dry run exits:",
            temporary.len()
        ));
        lines.extend(temporary.iter().map(|path| format!("  {}", path.display())));
    }
    lines.join("\n")
}

impl<'a> Command for PlanCommand<'a> {
    fn execute(&self) -> ClipResult<()> {
        let plan = self.api.plan(&self.job)?;
        println!("{}", dry_run_summary(&plan, &self.api.describe(&plan)));

        let temporary = plan.temporary_datasets().len();
        if temporary > 0 {
            info!("Removing {} temporary dataset(s) after the dry run", temporary);
        }

        self.logger.log(&format!("dry run {} -> {}", self.job.input.display(), self.job.output.display()))?;
        plan.close()
    }
}
