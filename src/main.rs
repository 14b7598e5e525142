use log::{debug, error};
use std::path::Path;
use std::process;

use rasterclip::commands::{build_cli, CommandFactory, RasterclipCommandFactory};
use rasterclip::config::Config;
use rasterclip::utils::logger::Logger;

fn main() {
    let matches = build_cli().get_matches();

    let config_path = matches.get_one::<String>("config").map(Path::new);
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let level = if matches.get_flag("verbose") { "debug" } else { config.log.level.as_str() };
    Logger::init_global_logger(level);
    debug!("Configuration: {:?}", config);

    let logger = match &config.log.journal {
        Some(path) => match Logger::new(path) {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error opening run journal {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Logger::disabled(),
    };

    let factory = RasterclipCommandFactory::new(config.clone());

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
