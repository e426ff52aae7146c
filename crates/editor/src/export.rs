//! Batch export of skeleton rasters followed by the pose file.

use std::path::{Path, PathBuf};

use subdrawer_common::config::GENERATED_IMAGES_DIR;
use subdrawer_common::error::{SubdrawerError, SubdrawerResult};
use subdrawer_pose_model::dataset::PoseDataSet;
use subdrawer_pose_model::store::PoseStore;
use subdrawer_render_engine::raster::{ColorMode, RasterSurface};
use subdrawer_render_engine::skeleton::SkeletonRenderer;
use subdrawer_render_engine::surface::{DrawingSurface, Tee};

use crate::canvas::CanvasState;
use crate::session::SessionContext;

/// Files written by one export run, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub images: Vec<PathBuf>,
    pub pose_file: PathBuf,
}

/// Renders each image's pose to `<working folder>/generated_images/` and
/// saves the dataset once all rasters are written.
///
/// A failure stops the run where it happened: rasters already written stay
/// on disk and the pose file is not saved.
pub struct ExportPipeline<'a> {
    store: &'a PoseStore,
    renderer: SkeletonRenderer,
    output_dir: PathBuf,
}

impl<'a> ExportPipeline<'a> {
    pub fn new(store: &'a PoseStore, renderer: SkeletonRenderer, working_folder: &Path) -> Self {
        Self {
            store,
            renderer,
            output_dir: working_folder.join(GENERATED_IMAGES_DIR),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export every name in `names`, in order, then save the dataset.
    ///
    /// Each name becomes the context's active image while it is processed.
    /// `display` receives the same skeleton geometry as each raster.
    pub fn run(
        &self,
        dataset: &mut PoseDataSet,
        names: &[String],
        context: &mut SessionContext,
        canvas: &CanvasState,
        mut display: Option<&mut dyn DrawingSurface>,
    ) -> SubdrawerResult<ExportReport> {
        tracing::info!(
            images = names.len(),
            output_dir = %self.output_dir.display(),
            width = canvas.width,
            height = canvas.height,
            "Exporting skeleton images"
        );

        let mut report = ExportReport::default();
        for name in names {
            context.active_image = name.clone();
            let path = self.export_image(
                dataset,
                name,
                &context.active_pose_id,
                canvas,
                display.as_mut().map(|d| &mut **d as &mut dyn DrawingSurface),
            )?;
            report.images.push(path);
        }

        self.store.save(dataset)?;
        report.pose_file = self.store.pose_file().to_path_buf();

        tracing::info!(
            images = report.images.len(),
            pose_file = %report.pose_file.display(),
            "Export finished"
        );
        Ok(report)
    }

    /// Render one image's pose to a fresh raster the size of the canvas and
    /// write it under the output directory, returning the written path.
    pub fn export_image(
        &self,
        dataset: &mut PoseDataSet,
        image: &str,
        pose_id: &str,
        canvas: &CanvasState,
        display: Option<&mut dyn DrawingSurface>,
    ) -> SubdrawerResult<PathBuf> {
        let pose = dataset.ensure_pose(image, pose_id)?;

        let mut raster = RasterSurface::new(canvas.width, canvas.height);
        match display {
            Some(display) => self.renderer.draw_skeleton(&mut Tee(&mut raster, display), pose),
            None => self.renderer.draw_skeleton(&mut raster, pose),
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|e| SubdrawerError::io(&self.output_dir, e))?;
        let path = self.output_dir.join(image);
        let mode = ColorMode::for_file_name(image);
        raster.save(&path, mode)?;

        tracing::debug!(image, path = %path.display(), ?mode, "Exported skeleton image");
        Ok(path)
    }
}
