//! Export skeleton images and the pose file without the editor window.

use std::path::PathBuf;

use subdrawer_common::config::AppConfig;
use subdrawer_editor::{AnnotationSession, BackgroundMode};
use subdrawer_render_engine::DisplayList;

pub fn run(
    config: AppConfig,
    folder: PathBuf,
    width: Option<u32>,
    height: Option<u32>,
    background: Option<BackgroundMode>,
) -> anyhow::Result<()> {
    println!("Exporting skeletons in: {}", folder.display());

    let config = super::with_folder(config, folder);
    let mut session = AnnotationSession::open(config, DisplayList::new())
        .map_err(|e| anyhow::anyhow!("Failed to open working folder: {e}"))?;

    let fixed_size = width.is_some() || height.is_some();
    // A fixed canvas must not follow the background image's size.
    let background = background.or(fixed_size.then_some(BackgroundMode::BlackBg));
    if let Some(mode) = background {
        session.set_background_mode(mode)?;
    }

    if fixed_size {
        let canvas = *session.canvas();
        let width = width.unwrap_or(canvas.width);
        let height = height.unwrap_or_else(|| canvas.proportional_height(width));
        session.resize_canvas(width, height)?;
    }

    let canvas = *session.canvas();
    println!("  Images: {}", session.image_names().len());
    println!("  Canvas: {}x{}", canvas.width, canvas.height);

    let report = session
        .save_images_and_poses()
        .map_err(|e| anyhow::anyhow!("Export failed: {e}"))?;

    for image in &report.images {
        println!("  wrote {}", image.display());
    }
    println!("\nExport complete: {}", report.pose_file.display());

    Ok(())
}
