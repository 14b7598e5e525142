//! Raster engine backed by the GDAL command-line utilities
//!
//! Burn requests run `gdal_rasterize`, mask requests run `gdalwarp`. The
//! programs are spawned directly with an argument vector.

use log::{debug, info};
use std::process::{Command, Stdio};

use crate::config::EngineConfig;
use crate::coordinate::{BoundingRectangle, PixelSize};
use crate::engine::request::{BurnRequest, BurnSource, ClipRequest, MaskRequest};
use crate::engine::RasterEngine;
use crate::errors::{ClipError, ClipResult};
use crate::utils::progress::ProgressTracker;

/// Runs clip requests through `gdal_rasterize` and `gdalwarp`
#[derive(Debug, Clone)]
pub struct GdalCommandEngine {
    rasterize: String,
    warp: String,
    multithread: bool,
    show_progress: bool,
}

impl Default for GdalCommandEngine {
    fn default() -> Self {
        GdalCommandEngine::new(&EngineConfig::default())
    }
}

impl GdalCommandEngine {
    pub fn new(config: &EngineConfig) -> Self {
        GdalCommandEngine {
            rasterize: config.gdal_rasterize.clone(),
            warp: config.gdalwarp.clone(),
            multithread: config.multithread,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Program and arguments for a request
    pub fn command_line(&self, request: &ClipRequest) -> (String, Vec<String>) {
        match request {
            ClipRequest::Burn(burn) => (self.rasterize.clone(), self.rasterize_args(burn)),
            ClipRequest::Mask(mask) => (self.warp.clone(), self.warp_args(mask)),
        }
    }

    fn rasterize_args(&self, request: &BurnRequest) -> Vec<String> {
        let mut args = Vec::new();

        match &request.source {
            BurnSource::Value(value) => push_pair(&mut args, "-burn", format_number(*value)),
            BurnSource::Attribute(name) => push_pair(&mut args, "-a", name.clone()),
        }
        if let Some(selection) = &request.selection {
            if let Some(where_clause) = &selection.where_clause {
                push_pair(&mut args, "-where", where_clause.clone());
            }
            if let Some(sql) = &selection.sql {
                push_pair(&mut args, "-sql", sql.clone());
            }
        }
        if let Some(output_type) = request.output_type {
            push_pair(&mut args, "-ot", output_type.gdal_name().to_string());
        }
        push_pair(&mut args, "-init", format_number(request.init_value));
        push_extent(&mut args, &request.extent, &request.pixel_size);

        args.push(request.vector.display().to_string());
        args.push(request.output.display().to_string());
        args
    }

    fn warp_args(&self, request: &MaskRequest) -> Vec<String> {
        let mut args = Vec::new();

        if request.ignore_bad_cutline {
            args.extend(["--config", "GDALWARP_IGNORE_BAD_CUTLINE", "YES"].map(String::from));
        }
        push_extent(&mut args, &request.extent, &request.pixel_size);
        if request.alpha {
            args.push("-dstalpha".to_string());
        }
        if let Some(nodata) = request.nodata {
            push_pair(&mut args, "-dstnodata", format_number(nodata));
        }
        if let Some(selection) = &request.selection {
            if let Some(where_clause) = &selection.where_clause {
                push_pair(&mut args, "-cwhere", where_clause.clone());
            }
            if let Some(sql) = &selection.sql {
                push_pair(&mut args, "-csql", sql.clone());
            }
        }
        if let Some(output_type) = request.output_type {
            push_pair(&mut args, "-ot", output_type.gdal_name().to_string());
        }
        push_pair(&mut args, "-cutline", request.cutline.display().to_string());
        if self.multithread {
            args.push("-multi".to_string());
        }
        args.push("-overwrite".to_string());

        args.push(request.input.display().to_string());
        args.push(request.output.display().to_string());
        args
    }
}

impl RasterEngine for GdalCommandEngine {
    fn execute(&self, request: &ClipRequest) -> ClipResult<()> {
        let (program, args) = self.command_line(request);
        info!("Running {}", self.describe(request));

        let progress = if self.show_progress {
            ProgressTracker::spinner(&format!("Running {}", program))
        } else {
            ProgressTracker::hidden()
        };

        let output = match Command::new(&program).args(&args).stdin(Stdio::null()).output() {
            Ok(output) => output,
            Err(e) => {
                progress.abandon("Failed");
                return Err(ClipError::EngineFailure {
                    program,
                    status: None,
                    stderr: e.to_string(),
                });
            },
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("{} output: {}", program, stdout.trim());
        }

        if !output.status.success() {
            progress.abandon("Failed");
            return Err(ClipError::EngineFailure {
                program,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        progress.finish();
        info!("{} completed, wrote {}", program, request.output().display());
        Ok(())
    }

    fn describe(&self, request: &ClipRequest) -> String {
        let (program, args) = self.command_line(request);
        std::iter::once(program)
            .chain(args)
            .map(|arg| shell_quote(&arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn push_pair(args: &mut Vec<String>, flag: &str, value: String) {
    args.push(flag.to_string());
    args.push(value);
}

/// `-te xmin ymin xmax ymax` followed by `-tr xres yres`
fn push_extent(args: &mut Vec<String>, extent: &BoundingRectangle, pixel_size: &PixelSize) {
    args.push("-te".to_string());
    args.extend(extent.target_extent().iter().map(|v| format_number(*v)));
    args.push("-tr".to_string());
    args.push(format_number(pixel_size.width.abs()));
    args.push(format_number(pixel_size.height.abs()));
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        value.to_string()
    }
}

fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}
