//! Vector dataset access and scoped intermediate datasets

use geo::MultiPolygon;
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::coordinate::CoordinateSystem;
use crate::errors::{ClipError, ClipResult};
use crate::vector::feature::{Feature, FeatureCollection};
use crate::vector::selection::FeatureSelection;

/// Sidecar extensions removed together with a dataset
const SIDECAR_EXTENSIONS: &[&str] = &["shp", "shx", "dbf", "prj", "cpg", "qix", "sbn", "sbx", "geojson", "json"];

/// Layer name given to persisted single-polygon datasets
const RESULT_LAYER: &str = "result";

/// Source and sink of vector datasets
pub trait VectorStore {
    /// Read a vector dataset
    fn open(&self, path: &Path) -> ClipResult<FeatureCollection>;

    /// Create a filtered copy of a layer
    fn select(&self, collection: &FeatureCollection, selection: &FeatureSelection) -> ClipResult<FeatureCollection> {
        if selection.is_empty() {
            return Ok(collection.clone());
        }
        selection.apply(collection)
    }

    /// Persist a collection as a new temporary dataset
    fn persist_collection(&self, collection: &FeatureCollection) -> ClipResult<ScopedDataset>;

    /// Persist one polygon as a new single-feature temporary dataset
    fn persist_polygon(&self, geometry: &MultiPolygon<f64>, crs: Option<&CoordinateSystem>) -> ClipResult<ScopedDataset> {
        let feature = Feature::new(0, Some(geometry.clone())).with_crs(crs.cloned());
        let collection = FeatureCollection::new(Some(RESULT_LAYER.to_string()), crs.cloned(), vec![feature]);
        self.persist_collection(&collection)
    }

    /// Delete a dataset and its sidecar files
    fn delete_dataset(&self, path: &Path) -> ClipResult<()>;
}

/// A temporary vector dataset deleted when dropped
///
/// The dataset lives alone in a uniquely named directory, so sidecar files
/// written next to it by other tools go away with it.
#[derive(Debug)]
pub struct ScopedDataset {
    dir: TempDir,
    path: PathBuf,
}

impl ScopedDataset {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the dataset now, reporting failures
    pub fn close(self) -> io::Result<()> {
        debug!("Removing temporary dataset {}", self.path.display());
        self.dir.close()
    }
}

/// GeoJSON-backed vector store
#[derive(Debug, Clone, Default)]
pub struct GeoJsonStore {
    /// Parent directory for temporary datasets, system default when `None`
    temp_dir: Option<PathBuf>,
}

impl GeoJsonStore {
    pub fn new(temp_dir: Option<PathBuf>) -> Self {
        GeoJsonStore { temp_dir }
    }

    fn scoped_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("rasterclip-");
        match &self.temp_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
    }
}

impl VectorStore for GeoJsonStore {
    fn open(&self, path: &Path) -> ClipResult<FeatureCollection> {
        info!("Opening vector dataset {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| ClipError::InputNotFound {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut collection = FeatureCollection::from_geojson(&text).map_err(|e| ClipError::InputNotFound {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if collection.name.is_none() {
            collection.name = path.file_stem().map(|stem| stem.to_string_lossy().to_string());
        }
        info!("Read {} features from layer {:?}", collection.len(), collection.name);
        Ok(collection)
    }

    fn persist_collection(&self, collection: &FeatureCollection) -> ClipResult<ScopedDataset> {
        let dir = self.scoped_dir()?;
        let stem: String = collection
            .name
            .as_deref()
            .unwrap_or(RESULT_LAYER)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        let path = dir.path().join(format!("{}.geojson", stem));

        let text = serde_json::to_string(&collection.to_geojson())
            .map_err(|e| ClipError::InvalidArgument(format!("Cannot serialize features: {}", e)))?;
        fs::write(&path, text)?;

        info!("Wrote {} features to temporary dataset {}", collection.len(), path.display());
        Ok(ScopedDataset { dir, path })
    }

    fn delete_dataset(&self, path: &Path) -> ClipResult<()> {
        let (Some(parent), Some(stem)) = (path.parent(), path.file_stem()) else {
            return Ok(());
        };

        let mut targets = vec![path.to_path_buf()];
        let stem = stem.to_string_lossy();
        targets.extend(SIDECAR_EXTENSIONS.iter().map(|ext| parent.join(format!("{}.{}", stem, ext))));
        targets.sort();
        targets.dedup();

        for target in targets {
            match fs::remove_file(&target) {
                Ok(()) => debug!("Removed {}", target.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {},
                Err(e) => {
                    warn!("Could not remove {}: {}", target.display(), e);
                    return Err(e.into());
                },
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![(x: 2.0, y: 2.0), (x: 4.0, y: 2.0), (x: 4.0, y: 4.0), (x: 2.0, y: 4.0)]])
    }

    #[test]
    fn test_persisted_polygon_is_readable_and_scoped() {
        let scratch = tempfile::tempdir().unwrap();
        let store = GeoJsonStore::new(Some(scratch.path().to_path_buf()));
        let crs = CoordinateSystem::UTM(33, true);

        let dataset = store.persist_polygon(&square(), Some(&crs)).unwrap();
        let path = dataset.path().to_path_buf();
        let reread = store.open(&path).unwrap();

        assert_eq!(reread.name.as_deref(), Some("result"));
        assert_eq!(reread.crs, Some(crs));
        assert_eq!(reread.len(), 1);
        assert_eq!(reread.features[0].geometry.as_ref().map(|g| g.0.len()), Some(1));

        drop(dataset);
        assert!(!path.exists());
    }

    #[test]
    fn test_concurrent_datasets_get_unique_paths() {
        let store = GeoJsonStore::default();
        let a = store.persist_polygon(&square(), None).unwrap();
        let b = store.persist_polygon(&square(), None).unwrap();
        assert_ne!(a.path(), b.path());
        a.close().unwrap();
        b.close().unwrap();
    }

    #[test]
    fn test_open_missing_dataset() {
        let result = GeoJsonStore::default().open(Path::new("/nonexistent/shapes.geojson"));
        assert!(matches!(result, Err(ClipError::InputNotFound { .. })));
    }

    #[test]
    fn test_open_names_layer_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lakes.geojson");
        fs::write(&path, r#"{"type":"FeatureCollection","features":[]}"#).unwrap();

        let collection = GeoJsonStore::default().open(&path).unwrap();
        assert_eq!(collection.name.as_deref(), Some("lakes"));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_delete_dataset_removes_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        for ext in ["shp", "shx", "dbf", "prj"] {
            fs::write(dir.path().join(format!("selected.{}", ext)), b"x").unwrap();
        }
        fs::write(dir.path().join("other.shp"), b"x").unwrap();

        GeoJsonStore::default().delete_dataset(&dir.path().join("selected.shp")).unwrap();

        assert!(!dir.path().join("selected.dbf").exists());
        assert!(!dir.path().join("selected.shp").exists());
        assert!(dir.path().join("other.shp").exists());
    }
}
