//! Geometric reasoning behind a clip
//!
//! Extent resolution, feature union, inversion against the clip rectangle
//! and coordinate system agreement checks.

pub mod extent;
pub mod inversion;
pub mod reference;
pub mod union;

pub use extent::{features_envelope, resolve_extent};
pub use inversion::{invert, InvertedGeometry};
pub use reference::common_crs;
pub use union::{union_features, MergedGeometry};
