//! Orchestration of a clip run

pub mod job;
pub mod pipeline;
pub mod staging;

pub use job::{ClipJob, ClipOptions};
pub use pipeline::{ClipPipeline, ClipPlan, ClipReport, PipelineSettings};
pub use staging::StagedOutput;
