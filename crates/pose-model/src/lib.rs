//! Subdrawer Pose Model
//!
//! Defines the core data contracts for skeleton annotation:
//! - **Keypoints:** The fixed 18-name landmark universe and skeleton topology
//! - **Pose:** An insertion-ordered mapping from keypoint to pixel coordinate
//! - **Dataset:** Image name -> pose id -> pose, with propagation to new images
//! - **Store:** Loading, saving and comparing the on-disk `pose_data.json`
//! - **Transform:** Rescaling poses when the canvas is resized
//!
//! Coordinates are canvas pixels, not normalized. Insertion order of every
//! mapping is preserved through mutation and serialization because keypoint
//! colors are assigned by position in a pose's own order.

pub mod dataset;
pub mod keypoint;
pub mod pose;
pub mod store;
pub mod transform;

pub use dataset::*;
pub use keypoint::*;
pub use pose::*;
pub use store::*;
pub use transform::*;
