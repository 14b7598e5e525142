//! Planning and running a clip
//!
//! Planning reads the inputs, resolves the geometry and materializes any
//! intermediate datasets. Running hands the plan to a raster engine and
//! moves the staged output into place.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::clip::job::ClipJob;
use crate::clip::staging::StagedOutput;
use crate::config::Config;
use crate::coordinate::{BoundingRectangle, CoordinateSystem, RasterMetadata};
use crate::engine::{ClipRequest, ClipRequestBuilder, CutlineSource, RasterEngine};
use crate::errors::{ClipError, ClipResult};
use crate::geometry::{common_crs, invert, resolve_extent, union_features};
use crate::tiff::read_raster_metadata;
use crate::vector::{ScopedDataset, VectorStore};

/// Pipeline behavior taken from configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    /// Write selected features to a scoped dataset instead of forwarding the filter
    pub materialize_selection: bool,
    pub ignore_bad_cutline: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        PipelineSettings {
            materialize_selection: true,
            ignore_bad_cutline: true,
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        PipelineSettings {
            materialize_selection: config.selection.materialize,
            ignore_bad_cutline: config.engine.ignore_bad_cutline,
        }
    }
}

/// A fully resolved clip, ready for an engine
///
/// The plan owns the temporary datasets its request reads. Dropping the
/// plan deletes them.
#[derive(Debug)]
pub struct ClipPlan {
    pub request: ClipRequest,
    pub raster: RasterMetadata,
    pub crs: Option<CoordinateSystem>,
    /// Number of features that passed the selection
    pub selected: usize,
    pub warnings: Vec<String>,
    datasets: Vec<ScopedDataset>,
}

impl ClipPlan {
    pub fn extent(&self) -> &BoundingRectangle {
        self.request.extent()
    }

    /// Paths of the temporary datasets held by the plan
    pub fn temporary_datasets(&self) -> Vec<&Path> {
        self.datasets.iter().map(ScopedDataset::path).collect()
    }

    /// Delete the temporary datasets now, reporting failures
    pub fn close(self) -> ClipResult<()> {
        for dataset in self.datasets {
            dataset.close()?;
        }
        Ok(())
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct ClipReport {
    pub output: PathBuf,
    pub extent: BoundingRectangle,
    pub mode: &'static str,
    pub selected: usize,
    pub warnings: Vec<String>,
}

/// Drives a clip from inputs to output raster
pub struct ClipPipeline<'a> {
    store: &'a dyn VectorStore,
    engine: &'a dyn RasterEngine,
    settings: PipelineSettings,
}

impl<'a> ClipPipeline<'a> {
    pub fn new(store: &'a dyn VectorStore, engine: &'a dyn RasterEngine, settings: PipelineSettings) -> Self {
        ClipPipeline { store, engine, settings }
    }

    /// Resolve everything the engine needs without running it
    pub fn plan(&self, job: &ClipJob) -> ClipResult<ClipPlan> {
        let options = &job.options;
        let builder = ClipRequestBuilder::new(options).ignore_bad_cutline(self.settings.ignore_bad_cutline);

        let mut warnings = builder.validate()?;
        options.selection.compile()?;

        let raster = read_raster_metadata(&job.input)?;
        info!(
            "Raster {}: {}x{} pixels, extent {}",
            job.input.display(),
            raster.cols,
            raster.rows,
            raster.extent()
        );

        let collection = self.store.open(&job.cutline)?;
        let selected = self.store.select(&collection, &options.selection)?;
        info!("Selected {} of {} features", selected.len(), collection.len());

        if selected.is_empty() {
            if options.crop_to_cutline || options.invert {
                return Err(ClipError::EmptySelection);
            }
            let message = "No features selected, the output will not be clipped by any shape".to_string();
            warn!("{}", message);
            warnings.push(message);
        }

        let crs = common_crs(raster.crs.as_ref(), &selected.features)?;
        let cutline = options.crop_to_cutline.then_some(selected.features.as_slice());
        let extent = resolve_extent(&raster, cutline)?;

        let mut datasets = Vec::new();
        let needs_selection = if options.invert {
            let merged = union_features(&selected.features)?;
            warnings.extend(
                merged
                    .skipped
                    .iter()
                    .map(|&feature| ClipError::PartialGeometry { feature }.to_string()),
            );
            let inverted = invert(&extent, &merged.geometry, crs.clone());
            datasets.push(self.store.persist_polygon(&inverted.geometry, inverted.crs.as_ref())?);
            false
        } else if !options.selection.is_empty() && self.settings.materialize_selection {
            let materialized = selected.clone().with_crs(crs.clone());
            datasets.push(self.store.persist_collection(&materialized)?);
            false
        } else {
            !options.selection.is_empty()
        };

        let cutline_path = datasets.last().map(ScopedDataset::path).unwrap_or(job.cutline.as_path());
        let request = builder.build(
            extent,
            &raster,
            CutlineSource {
                path: cutline_path,
                needs_selection,
            },
            &job.input,
            &job.output,
        );
        debug!("Planned {} clip reading {}", request.mode_name(), request.vector().display());

        Ok(ClipPlan {
            request,
            raster,
            crs,
            selected: selected.len(),
            warnings,
            datasets,
        })
    }

    /// Plan and execute a clip
    ///
    /// Refuses to touch an existing output unless overwriting was granted.
    pub fn run(&self, job: &ClipJob) -> ClipResult<ClipReport> {
        if job.output == job.input {
            return Err(ClipError::InvalidArgument("Output must differ from the input raster".to_string()));
        }
        if job.output.exists() && !job.options.overwrite {
            return Err(ClipError::InvalidArgument(format!(
                "{} exists; overwrite was not granted",
                job.output.display()
            )));
        }

        let plan = self.plan(job)?;
        let report = self.execute(&plan)?;
        plan.close()?;
        Ok(report)
    }

    /// Run a plan through the engine into a staged output
    pub fn execute(&self, plan: &ClipPlan) -> ClipResult<ClipReport> {
        let staged = StagedOutput::new(plan.request.output())?;
        let request = plan.request.with_output(staged.path());

        self.engine.execute(&request)?;
        let output = staged.commit()?;
        info!("Wrote {}", output.display());

        Ok(ClipReport {
            output,
            extent: *plan.extent(),
            mode: plan.request.mode_name(),
            selected: plan.selected,
            warnings: plan.warnings.clone(),
        })
    }
}
