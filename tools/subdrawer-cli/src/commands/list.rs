//! List the images of a working folder.

use std::path::PathBuf;

use subdrawer_common::config::AppConfig;
use subdrawer_editor::ImageSequence;

pub fn run(config: AppConfig, folder: PathBuf) -> anyhow::Result<()> {
    let sequence = ImageSequence::scan(&folder, config.placeholder_count)
        .map_err(|e| anyhow::anyhow!("Failed to list images: {e}"))?;

    println!("Images in: {}", folder.display());
    if sequence.is_placeholder() {
        println!("  (no jpg/jpeg/png files; the editor shows placeholders)");
    }
    for (index, name) in sequence.names().iter().enumerate() {
        println!("  {:>4}  {name}", index + 1);
    }
    println!("\n{} image(s)", sequence.len());

    Ok(())
}
