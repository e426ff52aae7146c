//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the persisted pose dataset inside the working folder.
pub const POSE_FILE_NAME: &str = "pose_data.json";

/// File name of the bundled default pose dataset inside the home directory.
pub const INITIAL_POSE_FILE_NAME: &str = "initial_pose.json";

/// Directory (under the working folder) that receives exported skeleton rasters.
pub const GENERATED_IMAGES_DIR: &str = "generated_images";

/// Pose identifier driven by the editor.
pub const DEFAULT_POSE_ID: &str = "pose1";

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Folder holding source images, `pose_data.json` and `generated_images/`.
    pub working_folder: PathBuf,

    /// Folder holding the bundled `initial_pose.json`.
    pub home_dir: PathBuf,

    /// Canvas and drawing parameters.
    pub canvas: CanvasDefaults,

    /// Number of synthesized image names when the working folder has no images.
    pub placeholder_count: usize,

    /// Pose identifier edited within each image.
    pub pose_id: String,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Initial canvas size and skeleton drawing metrics (pixels).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasDefaults {
    pub width: u32,
    pub height: u32,

    /// Pointer distance within which a keypoint counts as hovered.
    pub hit_radius: f64,

    pub keypoint_radius: f64,
    pub line_width: f64,

    /// Label font size; also the vertical label offset above a keypoint.
    pub text_size: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "subdrawer_editor=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            working_folder: cwd.clone(),
            home_dir: cwd,
            canvas: CanvasDefaults::default(),
            placeholder_count: 24,
            pose_id: DEFAULT_POSE_ID.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CanvasDefaults {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            hit_radius: 9.0,
            keypoint_radius: 6.0,
            line_width: 6.0,
            text_size: 12.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Path of the pose file inside the working folder.
    pub fn pose_file_path(&self) -> PathBuf {
        self.working_folder.join(POSE_FILE_NAME)
    }

    /// Path of the bundled default pose file.
    pub fn initial_pose_path(&self) -> PathBuf {
        self.home_dir.join(INITIAL_POSE_FILE_NAME)
    }

    /// Directory receiving exported skeleton rasters.
    pub fn generated_images_dir(&self) -> PathBuf {
        self.working_folder.join(GENERATED_IMAGES_DIR)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("subdrawer").join("config.json")
}
