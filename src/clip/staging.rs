//! Staged output rasters
//!
//! The engine writes into a private directory beside the destination. The
//! result is moved into place only once the engine has succeeded, so a
//! failed run never leaves a partial raster at the destination.

use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::errors::{ClipError, ClipResult};

#[derive(Debug)]
pub struct StagedOutput {
    dir: TempDir,
    staged: PathBuf,
    target: PathBuf,
}

impl StagedOutput {
    /// Reserve a staging directory next to `target`
    pub fn new(target: &Path) -> ClipResult<Self> {
        let file_name = target
            .file_name()
            .ok_or_else(|| ClipError::InvalidArgument(format!("Output path {} has no file name", target.display())))?;
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let dir = tempfile::Builder::new().prefix(".rasterclip-").tempdir_in(parent)?;
        let staged = dir.path().join(file_name);
        debug!("Staging output at {}", staged.display());

        Ok(StagedOutput {
            dir,
            staged,
            target: target.to_path_buf(),
        })
    }

    /// Path the engine should write to
    pub fn path(&self) -> &Path {
        &self.staged
    }

    /// Move the staged raster and its sidecars to the destination
    pub fn commit(self) -> ClipResult<PathBuf> {
        if !self.staged.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Engine reported success but wrote no {}", self.staged.display()),
            )
            .into());
        }

        let name = self
            .staged
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let destination = self.target.parent().unwrap_or_else(|| Path::new(""));

        for entry in fs::read_dir(self.dir.path())? {
            let entry = entry?;
            let entry_name = entry.file_name();
            let entry_name = entry_name.to_string_lossy();
            if !entry_name.starts_with(name.as_str()) {
                continue;
            }
            let target = destination.join(entry_name.as_ref());
            if target.exists() {
                fs::remove_file(&target)?;
            }
            fs::rename(entry.path(), &target)?;
            debug!("Moved {} into place", target.display());
        }

        self.dir.close()?;
        Ok(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_moves_raster_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.tif");
        let staged = StagedOutput::new(&target).unwrap();
        assert!(staged.path().starts_with(dir.path()));
        assert!(!target.exists());

        fs::write(staged.path(), b"raster").unwrap();
        fs::write(staged.path().with_file_name("out.tif.aux.xml"), b"stats").unwrap();

        let committed = staged.commit().unwrap();
        assert_eq!(committed, target);
        assert_eq!(fs::read(&target).unwrap(), b"raster");
        assert!(dir.path().join("out.tif.aux.xml").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_commit_replaces_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.tif");
        fs::write(&target, b"old").unwrap();

        let staged = StagedOutput::new(&target).unwrap();
        fs::write(staged.path(), b"new").unwrap();
        staged.commit().unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn test_dropped_stage_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.tif");
        {
            let staged = StagedOutput::new(&target).unwrap();
            fs::write(staged.path(), b"partial").unwrap();
        }
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_commit_without_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedOutput::new(&dir.path().join("out.tif")).unwrap();
        assert!(matches!(staged.commit(), Err(ClipError::IoError(_))));
    }
}
