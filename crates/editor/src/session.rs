//! The annotation session: the command surface a UI drives.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};

use subdrawer_common::config::AppConfig;
use subdrawer_common::error::{SubdrawerError, SubdrawerResult};
use subdrawer_pose_model::dataset::PoseDataSet;
use subdrawer_pose_model::keypoint::Keypoint;
use subdrawer_pose_model::pose::{Point2D, Pose};
use subdrawer_pose_model::store::PoseStore;
use subdrawer_pose_model::transform::rescale;
use subdrawer_render_engine::skeleton::SkeletonRenderer;
use subdrawer_render_engine::surface::DrawingSurface;

use crate::canvas::{BackgroundMode, CanvasState};
use crate::export::{ExportPipeline, ExportReport};
use crate::interaction::{self, InteractionController, InteractionState, Redraw, ToggleOutcome};
use crate::sequence::{load_background, Direction, ImageSequence};

/// Key the bundled default pose is stored under before any real image exists.
const PLACEHOLDER_POSE_KEY: &str = "image_1.jpg";

/// Which folder, image and pose every operation acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub working_folder: PathBuf,
    pub active_image: String,
    pub active_pose_id: String,
}

impl SessionContext {
    pub fn new(
        working_folder: PathBuf,
        active_image: impl Into<String>,
        active_pose_id: impl Into<String>,
    ) -> Self {
        Self {
            working_folder,
            active_image: active_image.into(),
            active_pose_id: active_pose_id.into(),
        }
    }
}

/// One editing session over a working folder.
///
/// Owns the dataset, the image list, canvas state and the hover/drag state,
/// and keeps `surface` in sync with the active pose.
pub struct AnnotationSession<S: DrawingSurface> {
    config: AppConfig,
    context: SessionContext,
    store: PoseStore,
    dataset: PoseDataSet,
    sequence: ImageSequence,
    canvas: CanvasState,
    interaction: InteractionController,
    renderer: SkeletonRenderer,
    surface: S,
    background: Option<DynamicImage>,
}

impl<S: DrawingSurface> AnnotationSession<S> {
    /// Load the pose data for `config.working_folder` and select its first image.
    pub fn open(config: AppConfig, surface: S) -> SubdrawerResult<Self> {
        let store = PoseStore::from_config(&config);
        let sequence = ImageSequence::placeholder(config.placeholder_count);
        let context = SessionContext::new(
            config.working_folder.clone(),
            sequence.first(),
            config.pose_id.clone(),
        );

        let mut session = Self {
            canvas: CanvasState::from_defaults(&config.canvas),
            interaction: InteractionController::new(config.canvas.hit_radius),
            renderer: SkeletonRenderer::from_canvas(&config.canvas),
            dataset: PoseDataSet::new(),
            background: None,
            config,
            context,
            store,
            sequence,
            surface,
        };

        session.load_pose()?;
        session.populate()?;
        tracing::info!(
            working_folder = %session.context.working_folder.display(),
            images = session.sequence.len(),
            placeholder = session.sequence.is_placeholder(),
            "Annotation session opened"
        );
        Ok(session)
    }

    // ------------------------------------------------------------------
    // Pose data
    // ------------------------------------------------------------------

    /// Reload the dataset from disk, discarding in-memory edits.
    ///
    /// When the working folder has images, a pose stored under the bundled
    /// placeholder key moves to the first of them. Every stored image must
    /// carry the session's pose id.
    pub fn load_pose(&mut self) -> SubdrawerResult<()> {
        let mut dataset = self.store.load()?;
        let missing: Vec<&str> = dataset.images_missing_pose(&self.context.active_pose_id).collect();
        if !missing.is_empty() {
            return Err(SubdrawerError::data_format(
                self.store.source_path()?,
                format!(
                    "no pose with id {} for: {}",
                    self.context.active_pose_id,
                    missing.join(", ")
                ),
            ));
        }

        let images = ImageSequence::scan(&self.context.working_folder, self.config.placeholder_count)?;
        if !images.is_placeholder() && dataset.rebind_image(PLACEHOLDER_POSE_KEY, images.first()) {
            tracing::info!(image = images.first(), "Bound initial pose to first image");
        }

        self.dataset = dataset;
        Ok(())
    }

    /// Write the in-memory dataset to the working folder's pose file.
    pub fn save_pose_data(&self) -> SubdrawerResult<()> {
        self.store.save(&self.dataset)
    }

    /// Whether the in-memory dataset equals what is on disk (or the bundled
    /// default when nothing has been saved yet).
    pub fn is_pose_data_saved(&self) -> SubdrawerResult<bool> {
        self.store.is_saved(&self.dataset)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Rebuild the image list from the working folder and select the first image.
    pub fn populate(&mut self) -> SubdrawerResult<()> {
        self.sequence = ImageSequence::scan(&self.context.working_folder, self.config.placeholder_count)?;
        self.select_image(0)
    }

    /// Select the image at `index`, wrapping out-of-range values.
    pub fn select_image(&mut self, index: isize) -> SubdrawerResult<()> {
        self.context.active_image = self.sequence.select(index).to_string();
        self.set_image_and_pose_now(true)
    }

    pub fn shift_image(&mut self, direction: Direction) -> SubdrawerResult<()> {
        self.context.active_image = self.sequence.shift(direction).to_string();
        self.set_image_and_pose_now(true)
    }

    /// Handle a key press. Returns whether the key was bound to anything.
    pub fn handle_key(&mut self, key: char) -> SubdrawerResult<bool> {
        match Direction::from_key(key) {
            Some(direction) => {
                self.shift_image(direction)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Make the context's active image current: ensure it has a pose, show
    /// its background if requested and available, and redraw the skeleton.
    ///
    /// Showing the background resizes the canvas to the scaled image, which
    /// rescales the active pose. An unreadable image is shown without one.
    pub fn set_image_and_pose_now(&mut self, show_background: bool) -> SubdrawerResult<()> {
        self.dataset
            .ensure_pose(&self.context.active_image, &self.context.active_pose_id)?;
        self.interaction.reset();
        self.background = None;

        if show_background && self.canvas.background == BackgroundMode::OriginalImage {
            let source = self
                .sequence
                .source_path(&self.context.working_folder, &self.context.active_image);
            if let Some(path) = source {
                match load_background(&path, self.canvas.height) {
                    Ok(Some(resized)) => {
                        let (width, height) = resized.dimensions();
                        self.background = Some(resized);
                        self.apply_canvas_size(width, height)?;
                    }
                    Ok(None) => {}
                    Err(e) => tracing::warn!(
                        image = %self.context.active_image,
                        error = %e,
                        "Failed to load background, showing none"
                    ),
                }
            }
        }

        let pose = self
            .dataset
            .ensure_pose(&self.context.active_image, &self.context.active_pose_id)?;
        self.renderer.draw_skeleton(&mut self.surface, pose);
        self.renderer.draw_labels(&mut self.surface, pose, None);
        Ok(())
    }

    /// Point the session at another folder. `None` means the folder picker
    /// was cancelled and nothing changes.
    ///
    /// If the new folder's pose data cannot be loaded, the previous folder
    /// and its dataset stay active and the error is returned.
    pub fn change_working_folder(&mut self, folder: Option<PathBuf>) -> SubdrawerResult<bool> {
        let Some(folder) = folder else {
            tracing::debug!("Working folder selection cancelled");
            return Ok(false);
        };

        let previous = std::mem::replace(&mut self.config.working_folder, folder.clone());
        let previous_store = std::mem::replace(&mut self.store, PoseStore::from_config(&self.config));
        self.context.working_folder = folder;

        if let Err(e) = self.load_pose() {
            tracing::warn!(
                folder = %self.context.working_folder.display(),
                error = %e,
                "Failed to load pose data, keeping previous folder"
            );
            self.config.working_folder = previous.clone();
            self.context.working_folder = previous;
            self.store = previous_store;
            return Err(e);
        }

        tracing::info!(folder = %self.context.working_folder.display(), "Working folder changed");
        self.populate()?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Add or remove `keypoint` on the active pose and redraw.
    pub fn toggle_keypoint(&mut self, keypoint: Keypoint) -> SubdrawerResult<ToggleOutcome> {
        let width = self.canvas.width;
        let outcome = interaction::toggle_keypoint(self.active_pose_mut()?, keypoint, width);
        tracing::debug!(keypoint = %keypoint, ?outcome, "Toggled keypoint");
        self.interaction.reset();
        self.redraw_skeleton()?;
        Ok(outcome)
    }

    /// Toggle by name as a UI button would. Unknown names are ignored.
    pub fn toggle_keypoint_named(&mut self, name: &str) -> SubdrawerResult<Option<ToggleOutcome>> {
        match name.parse::<Keypoint>() {
            Ok(keypoint) => self.toggle_keypoint(keypoint).map(Some),
            Err(e) => {
                tracing::warn!(name, "Ignoring toggle: {e}");
                Ok(None)
            }
        }
    }

    /// Resize the canvas, rescaling the active pose, and redraw.
    ///
    /// Poses of other images keep their coordinates until visited.
    pub fn resize_canvas(&mut self, width: u32, height: u32) -> SubdrawerResult<()> {
        self.apply_canvas_size(width, height)?;
        self.redraw_skeleton()
    }

    /// Width-slider handler: keep the aspect ratio and re-select the active
    /// image. Returns whether anything changed.
    pub fn set_canvas_width(&mut self, width: u32) -> SubdrawerResult<bool> {
        let width = width.max(1);
        if width == self.canvas.width {
            return Ok(false);
        }
        let height = self.canvas.proportional_height(width);
        self.apply_canvas_size(width, height)?;
        self.set_image_and_pose_now(true)?;
        Ok(true)
    }

    /// Switch the background and re-select the active image.
    pub fn set_background_mode(&mut self, mode: BackgroundMode) -> SubdrawerResult<()> {
        tracing::debug!(%mode, "Background mode changed");
        self.canvas.background = mode;
        self.set_image_and_pose_now(true)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, primary_down: bool) -> SubdrawerResult<Redraw> {
        let pose = self
            .dataset
            .ensure_pose(&self.context.active_image, &self.context.active_pose_id)?;
        let redraw = self
            .interaction
            .pointer_move(pose, Point2D::new(x, y), primary_down);

        match redraw {
            Redraw::Nothing => {}
            Redraw::Labels(only) => self.renderer.draw_labels(&mut self.surface, pose, only),
            Redraw::SkeletonAndLabel(keypoint) => {
                self.renderer.draw_skeleton(&mut self.surface, pose);
                self.renderer.draw_labels(&mut self.surface, pose, Some(keypoint));
            }
        }
        Ok(redraw)
    }

    pub fn pointer_release(&mut self) -> SubdrawerResult<Redraw> {
        let redraw = self.interaction.pointer_release();
        if let Redraw::Labels(only) = redraw {
            let pose = self
                .dataset
                .ensure_pose(&self.context.active_image, &self.context.active_pose_id)?;
            self.renderer.draw_labels(&mut self.surface, pose, only);
        }
        Ok(redraw)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Export the active image's skeleton raster.
    pub fn save_as_image(&mut self) -> SubdrawerResult<PathBuf> {
        let pipeline = ExportPipeline::new(&self.store, self.renderer, &self.context.working_folder);
        pipeline.export_image(
            &mut self.dataset,
            &self.context.active_image,
            &self.context.active_pose_id,
            &self.canvas,
            Some(&mut self.surface),
        )
    }

    /// Export every image in list order, then save the pose file.
    ///
    /// The previously active image is selected again afterwards, with its
    /// background, whether or not the export succeeded. An export error takes
    /// precedence over a failure to restore the selection.
    pub fn save_images_and_poses(&mut self) -> SubdrawerResult<ExportReport> {
        let previous = self.context.active_image.clone();

        let pipeline = ExportPipeline::new(&self.store, self.renderer, &self.context.working_folder);
        let result = pipeline.run(
            &mut self.dataset,
            self.sequence.names(),
            &mut self.context,
            &self.canvas,
            Some(&mut self.surface),
        );

        if let Some(index) = self.sequence.position(&previous) {
            self.sequence.select(index as isize);
        }
        self.context.active_image = previous;
        let restored = self.set_image_and_pose_now(true);

        match result {
            Ok(report) => restored.map(|()| report),
            Err(e) => {
                if let Err(restore) = restored {
                    tracing::warn!(
                        image = %self.context.active_image,
                        error = %restore,
                        "Failed to restore active image after export error"
                    );
                }
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn working_folder(&self) -> &Path {
        &self.context.working_folder
    }

    pub fn store(&self) -> &PoseStore {
        &self.store
    }

    pub fn dataset(&self) -> &PoseDataSet {
        &self.dataset
    }

    pub fn image_names(&self) -> &[String] {
        self.sequence.names()
    }

    pub fn sequence(&self) -> &ImageSequence {
        &self.sequence
    }

    pub fn active_image(&self) -> &str {
        &self.context.active_image
    }

    pub fn active_pose(&self) -> Option<&Pose> {
        self.dataset
            .pose(&self.context.active_image, &self.context.active_pose_id)
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    /// The resized source image shown behind the skeleton, if any.
    pub fn background(&self) -> Option<&DynamicImage> {
        self.background.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn active_pose_mut(&mut self) -> SubdrawerResult<&mut Pose> {
        self.dataset
            .ensure_pose(&self.context.active_image, &self.context.active_pose_id)
    }

    fn apply_canvas_size(&mut self, width: u32, height: u32) -> SubdrawerResult<()> {
        let (width, height) = (width.max(1), height.max(1));
        let rates = self.canvas.rates_to(width, height);
        if !rates.is_identity() {
            rescale(self.active_pose_mut()?, rates);
            tracing::debug!(width, height, ?rates, "Canvas resized");
        }
        self.canvas.width = width;
        self.canvas.height = height;
        Ok(())
    }

    fn redraw_skeleton(&mut self) -> SubdrawerResult<()> {
        let pose = self
            .dataset
            .ensure_pose(&self.context.active_image, &self.context.active_pose_id)?;
        self.renderer.draw_skeleton(&mut self.surface, pose);
        Ok(())
    }
}
