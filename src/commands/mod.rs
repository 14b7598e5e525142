//! CLI command implementations
//!
//! This module contains the commands supported by the CLI
//! application using the Command pattern.

pub mod cli;
pub mod clip_command;
pub mod command_traits;
pub mod plan_command;

pub use cli::{build_cli, job_from_args};
pub use clip_command::ClipCommand;
pub use command_traits::{Command, CommandFactory};
pub use plan_command::{dry_run_summary, PlanCommand};

use clap::ArgMatches;

use crate::config::Config;
use crate::errors::ClipResult;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
pub struct RasterclipCommandFactory {
    config: Config,
}

impl RasterclipCommandFactory {
    pub fn new(config: Config) -> Self {
        RasterclipCommandFactory { config }
    }
}

impl<'a> CommandFactory<'a> for RasterclipCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> ClipResult<Box<dyn Command + 'a>> {
        if args.get_flag("dry-run") {
            Ok(Box::new(PlanCommand::new(args, self.config.clone(), logger)?))
        } else {
            Ok(Box::new(ClipCommand::new(args, self.config.clone(), logger)?))
        }
    }
}
