//! Subdrawer Render Engine
//!
//! Draws a pose's skeleton onto anything implementing [`DrawingSurface`]:
//! the editor's display list, an off-screen raster for export, or both at
//! once through [`Tee`].
//!
//! ```text
//!            ┌── Lines   (one per connection, colored by connection index)
//! Pose ──────┼── Circles (one per keypoint, colored by position in the pose)
//!            └── Labels  (hovered keypoint only)
//!                  │
//!                  ├──► DisplayList   (editor canvas)
//!                  └──► RasterSurface (generated_images/<name>)
//! ```

pub mod palette;
pub mod raster;
pub mod skeleton;
pub mod surface;

pub use palette::*;
pub use raster::*;
pub use skeleton::*;
pub use surface::*;
