//! Validate the pose data of a working folder.

use std::path::PathBuf;

use subdrawer_common::config::AppConfig;
use subdrawer_editor::ImageSequence;
use subdrawer_pose_model::PoseStore;

pub fn run(config: AppConfig, folder: PathBuf) -> anyhow::Result<()> {
    println!("Validating pose data in: {}", folder.display());

    let config = super::with_folder(config, folder);
    let store = PoseStore::from_config(&config);
    let dataset = store
        .load()
        .map_err(|e| anyhow::anyhow!("Failed to load pose data: {e}"))?;
    let sequence = ImageSequence::scan(&config.working_folder, config.placeholder_count)
        .map_err(|e| anyhow::anyhow!("Failed to list images: {e}"))?;

    println!("  Images with poses: {}", dataset.len());
    println!("  Images in folder: {}", sequence.len());

    let issues: Vec<String> = dataset
        .images_missing_pose(&config.pose_id)
        .map(|image| format!("{image} has no pose '{}'", config.pose_id))
        .collect();

    let unannotated: Vec<&String> = sequence
        .names()
        .iter()
        .filter(|name| !dataset.contains_image(name))
        .collect();

    if !unannotated.is_empty() && !sequence.is_placeholder() {
        println!("\nImages without a stored pose (copied from the last one when visited):");
        for name in &unannotated {
            println!("  - {name}");
        }
    }

    if issues.is_empty() {
        println!("\nPose data is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!("\n{} issue(s) found.", issues.len());
    }

    Ok(())
}
