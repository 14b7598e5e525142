pub mod io;
pub mod tiff;
pub mod coordinate;
pub mod vector;
pub mod geometry;
pub mod engine;
pub mod clip;
pub mod config;
pub mod errors;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::RasterClip;

pub use clip::{ClipJob, ClipOptions, ClipPlan, ClipReport};
pub use config::Config;
pub use coordinate::{BoundingRectangle, CoordinateSystem, RasterMetadata};
pub use engine::{BurnSource, ClipRequest, GdalCommandEngine, OutputType, RasterEngine};
pub use errors::{ClipError, ClipResult};
pub use vector::{FeatureSelection, GeoJsonStore, VectorStore};
