//! Show pose data information.

use std::path::PathBuf;

use subdrawer_common::config::AppConfig;
use subdrawer_pose_model::PoseStore;

pub fn run(config: AppConfig, folder: PathBuf) -> anyhow::Result<()> {
    let config = super::with_folder(config, folder);
    let store = PoseStore::from_config(&config);

    let source = store
        .source_path()
        .map_err(|e| anyhow::anyhow!("Failed to locate pose data: {e}"))?
        .to_path_buf();
    let dataset = store
        .load()
        .map_err(|e| anyhow::anyhow!("Failed to load pose data: {e}"))?;

    println!("Pose data: {}", source.display());
    if source != store.pose_file() {
        println!("  (bundled default; nothing saved in this folder yet)");
    }
    println!("  Images: {}", dataset.len());
    println!("  Export directory: {}", config.generated_images_dir().display());
    println!();

    for (image, poses) in dataset.images() {
        println!("{image}");
        for (pose_id, pose) in poses.iter() {
            let names: Vec<&str> = pose.keypoints().map(|k| k.as_str()).collect();
            println!("  {pose_id}: {} keypoint(s) [{}]", pose.len(), names.join(", "));
        }
    }

    if let Some((last, _)) = dataset.last_image() {
        println!();
        println!("New images copy their pose from: {last}");
    }

    Ok(())
}
