//! Loading, saving and comparing the persisted pose dataset.

use std::path::{Path, PathBuf};

use serde::Serialize;

use subdrawer_common::config::AppConfig;
use subdrawer_common::error::{SubdrawerError, SubdrawerResult};

use crate::dataset::PoseDataSet;

/// Reads and writes `pose_data.json` for one working folder.
///
/// Loading prefers the working folder's file and falls back to the bundled
/// `initial_pose.json`. Saving always targets the working folder.
#[derive(Debug, Clone)]
pub struct PoseStore {
    pose_file: PathBuf,
    initial_pose_file: PathBuf,
}

impl PoseStore {
    pub fn new(pose_file: impl Into<PathBuf>, initial_pose_file: impl Into<PathBuf>) -> Self {
        Self {
            pose_file: pose_file.into(),
            initial_pose_file: initial_pose_file.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.pose_file_path(), config.initial_pose_path())
    }

    /// Where `save` writes.
    pub fn pose_file(&self) -> &Path {
        &self.pose_file
    }

    pub fn initial_pose_file(&self) -> &Path {
        &self.initial_pose_file
    }

    /// The file `load` would read: the saved file if present, else the bundled default.
    pub fn source_path(&self) -> SubdrawerResult<&Path> {
        if self.pose_file.is_file() {
            Ok(self.pose_file.as_path())
        } else if self.initial_pose_file.is_file() {
            Ok(self.initial_pose_file.as_path())
        } else {
            Err(SubdrawerError::configuration(format!(
                "no pose file found: neither {} nor {} exists",
                self.pose_file.display(),
                self.initial_pose_file.display()
            )))
        }
    }

    pub fn load(&self) -> SubdrawerResult<PoseDataSet> {
        let path = self.source_path()?;
        let dataset = load_dataset(path)?;
        tracing::info!(
            path = %path.display(),
            images = dataset.len(),
            "Loaded pose data"
        );
        Ok(dataset)
    }

    pub fn save(&self, dataset: &PoseDataSet) -> SubdrawerResult<()> {
        save_dataset(&self.pose_file, dataset)?;
        tracing::info!(
            path = %self.pose_file.display(),
            images = dataset.len(),
            "Saved pose data"
        );
        Ok(())
    }

    /// Whether `dataset` matches what `load` returns right now.
    pub fn is_saved(&self, dataset: &PoseDataSet) -> SubdrawerResult<bool> {
        let snapshot = self.load()?;
        Ok(is_saved(dataset, &snapshot))
    }
}

/// Parse a pose file. The top level must be a non-empty mapping.
pub fn load_dataset(path: &Path) -> SubdrawerResult<PoseDataSet> {
    let content = std::fs::read_to_string(path).map_err(|e| SubdrawerError::io(path, e))?;
    let dataset: PoseDataSet =
        serde_json::from_str(&content).map_err(|e| SubdrawerError::data_format(path, e.to_string()))?;
    if dataset.is_empty() {
        return Err(SubdrawerError::data_format(path, "pose file contains no images"));
    }
    Ok(dataset)
}

/// Write a pose file with 4-space indentation, keeping in-memory order.
pub fn save_dataset(path: &Path, dataset: &PoseDataSet) -> SubdrawerResult<()> {
    let json = to_pretty_json(dataset)?;
    std::fs::write(path, json).map_err(|e| SubdrawerError::io(path, e))
}

/// Serialize with the indentation used by pose files.
pub fn to_pretty_json(dataset: &PoseDataSet) -> SubdrawerResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    dataset.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| SubdrawerError::Other(e.into()))
}

/// Structural, order-insensitive comparison against a disk snapshot.
pub fn is_saved(dataset: &PoseDataSet, snapshot: &PoseDataSet) -> bool {
    dataset == snapshot
}
