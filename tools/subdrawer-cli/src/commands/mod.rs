pub mod export;
pub mod info;
pub mod list;
pub mod validate;

use std::path::PathBuf;

use subdrawer_common::config::AppConfig;

/// `config` retargeted at `folder`.
pub fn with_folder(mut config: AppConfig, folder: PathBuf) -> AppConfig {
    config.working_folder = folder;
    config
}
