//! Subdrawer Editor
//!
//! The annotation engine behind the editor window:
//! - **Canvas:** Canvas size and background mode
//! - **Sequence:** The ordered image list and cyclic navigation
//! - **Interaction:** Hover/drag state machine and keypoint toggling
//! - **Export:** Skeleton-only rasters for every image, then the pose file
//! - **Session:** The command surface a UI calls into
//!
//! Everything runs on the caller's thread; nothing here blocks on anything
//! but local file I/O.

pub mod canvas;
pub mod export;
pub mod interaction;
pub mod sequence;
pub mod session;

pub use canvas::{BackgroundMode, CanvasState};
pub use export::{ExportPipeline, ExportReport};
pub use interaction::{InteractionController, InteractionState, Redraw, ToggleOutcome};
pub use sequence::{Direction, ImageSequence};
pub use session::{AnnotationSession, SessionContext};
