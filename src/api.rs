use log::info;
use std::path::Path;

use crate::clip::{ClipJob, ClipPipeline, ClipPlan, ClipReport, PipelineSettings};
use crate::config::Config;
use crate::coordinate::RasterMetadata;
use crate::engine::{GdalCommandEngine, RasterEngine};
use crate::errors::ClipResult;
use crate::tiff::read_raster_metadata;
use crate::vector::GeoJsonStore;

/// Main interface to the RasterClip library
pub struct RasterClip {
    config: Config,
    store: GeoJsonStore,
    engine: Box<dyn RasterEngine>,
}

impl RasterClip {
    /// Create a RasterClip instance running the GDAL utilities named in `config`
    pub fn new(config: Config) -> Self {
        let store = GeoJsonStore::new(config.workspace.temp_dir.clone());
        let engine = Box::new(GdalCommandEngine::new(&config.engine));
        RasterClip { config, store, engine }
    }

    /// Replace the raster engine
    pub fn with_engine(mut self, engine: Box<dyn RasterEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the georeferencing of a raster
    pub fn raster_metadata(&self, path: &Path) -> ClipResult<RasterMetadata> {
        read_raster_metadata(path)
    }

    /// Resolve a clip without running the engine
    ///
    /// The returned plan keeps its temporary datasets alive until dropped.
    pub fn plan(&self, job: &ClipJob) -> ClipResult<ClipPlan> {
        self.pipeline().plan(job)
    }

    /// Command line the engine would run for a plan
    pub fn describe(&self, plan: &ClipPlan) -> String {
        self.engine.describe(&plan.request)
    }

    /// Clip, mask or burn a raster
    ///
    /// # Returns
    /// A report on the written output, or an error with nothing written
    pub fn run(&self, job: &ClipJob) -> ClipResult<ClipReport> {
        info!(
            "Clipping {} with {} into {}",
            job.input.display(),
            job.cutline.display(),
            job.output.display()
        );
        self.pipeline().run(job)
    }

    fn pipeline(&self) -> ClipPipeline<'_> {
        ClipPipeline::new(&self.store, self.engine.as_ref(), PipelineSettings::from(&self.config))
    }
}
