//! Coordinate rescaling when the canvas changes size.

use crate::pose::Pose;

/// Per-axis scale factors between two canvas sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRates {
    pub width_rate: f64,
    pub height_rate: f64,
}

impl ScaleRates {
    pub fn new(width_rate: f64, height_rate: f64) -> Self {
        Self {
            width_rate,
            height_rate,
        }
    }

    /// Rates that map coordinates on a `from` canvas onto a `to` canvas.
    pub fn between(from: (u32, u32), to: (u32, u32)) -> Self {
        Self {
            width_rate: to.0 as f64 / from.0 as f64,
            height_rate: to.1 as f64 / from.1 as f64,
        }
    }

    /// The rates that undo this one.
    pub fn inverse(&self) -> Self {
        Self {
            width_rate: 1.0 / self.width_rate,
            height_rate: 1.0 / self.height_rate,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.width_rate == 1.0 && self.height_rate == 1.0
    }
}

/// Multiply every x by `width_rate` and every y by `height_rate`, in place.
///
/// The axes scale independently and results are not clamped to the canvas.
pub fn rescale(pose: &mut Pose, rates: ScaleRates) {
    for point in pose.points_mut() {
        point.x *= rates.width_rate;
        point.y *= rates.height_rate;
    }
}
