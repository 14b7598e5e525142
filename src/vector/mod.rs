//! Vector features, selections and datasets
//!
//! Reading cutline layers, narrowing them with attribute predicates or
//! queries, and persisting intermediate geometries as scoped datasets.

pub mod feature;
pub mod selection;
pub mod store;

pub use feature::{Feature, FeatureCollection};
pub use selection::{CompiledSelection, FeatureSelection};
pub use store::{GeoJsonStore, ScopedDataset, VectorStore};
