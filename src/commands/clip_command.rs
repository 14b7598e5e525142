//! Clip command
//!
//! Runs a clip end to end, asking before an existing output is replaced.

use clap::ArgMatches;
use log::{error, info, warn};

use crate::api::RasterClip;
use crate::clip::ClipJob;
use crate::commands::cli::job_from_args;
use crate::commands::command_traits::Command;
use crate::config::Config;
use crate::errors::ClipResult;
use crate::utils::logger::Logger;
use crate::utils::prompt::confirm_overwrite;

/// Command for clipping a raster
pub struct ClipCommand<'a> {
    job: ClipJob,
    api: RasterClip,
    /// Run journal
    logger: &'a Logger,
}

impl<'a> ClipCommand<'a> {
    /// Create a new clip command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `config` - Loaded configuration
    /// * `logger` - Run journal
    pub fn new(args: &ArgMatches, config: Config, logger: &'a Logger) -> ClipResult<Self> {
        Ok(ClipCommand {
            job: job_from_args(args)?,
            api: RasterClip::new(config),
            logger,
        })
    }

    fn journal(&self, message: &str) {
        if let Err(e) = self.logger.log(message) {
            warn!("Could not write to the run journal: {}", e);
        }
    }
}

impl<'a> Command for ClipCommand<'a> {
    fn execute(&self) -> ClipResult<()> {
        let mut job = self.job.clone();

        if job.output.exists() && !job.options.overwrite {
            if !confirm_overwrite(&job.output)? {
                info!("Not overwriting {}, nothing written", job.output.display());
                self.journal(&format!("declined overwrite of {}", job.output.display()));
                return Ok(());
            }
            job.options.overwrite = true;
        }

        match self.api.run(&job) {
            Ok(report) => {
                info!(
                    "Clip complete: {} mode, {} features, extent {}",
                    report.mode, report.selected, report.extent
                );
                self.journal(&format!(
                    "ok {} {} {} -> {} ({} mode, extent {})",
                    job.input.display(),
                    job.cutline.display(),
                    report.selected,
                    report.output.display(),
                    report.mode,
                    report.extent
                ));
                Ok(())
            },
            Err(e) => {
                error!("Clip failed: {}", e);
                self.journal(&format!("failed {} -> {}: {}", job.input.display(), job.output.display(), e));
                Err(e)
            },
        }
    }
}
