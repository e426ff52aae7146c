//! Skeleton drawing.

use subdrawer_common::config::CanvasDefaults;
use subdrawer_pose_model::keypoint::{Keypoint, CONNECTIONS};
use subdrawer_pose_model::pose::{Point2D, Pose};

use crate::palette::Color;
use crate::surface::{DrawingSurface, Layer};

/// Draws skeleton lines, keypoint circles and hover labels.
#[derive(Debug, Clone, Copy)]
pub struct SkeletonRenderer {
    pub line_width: f64,
    pub keypoint_radius: f64,
    /// Label font size, also used as the label's offset above its keypoint.
    pub text_size: f64,
}

impl Default for SkeletonRenderer {
    fn default() -> Self {
        Self::from_canvas(&CanvasDefaults::default())
    }
}

impl SkeletonRenderer {
    pub fn from_canvas(canvas: &CanvasDefaults) -> Self {
        Self {
            line_width: canvas.line_width,
            keypoint_radius: canvas.keypoint_radius,
            text_size: canvas.text_size,
        }
    }

    /// Replace the skeleton on `surface` with the one for `pose`.
    ///
    /// Lines take the palette color of their connection index. Circles take
    /// the color of the keypoint's position in `pose`'s own order, so a
    /// keypoint removed and re-added elsewhere in the order changes color.
    pub fn draw_skeleton(&self, surface: &mut impl DrawingSurface, pose: &Pose) {
        surface.clear(Layer::Lines);
        surface.clear(Layer::Circles);

        for (index, (start, end)) in CONNECTIONS.iter().enumerate() {
            if let (Some(a), Some(b)) = (pose.get(*start), pose.get(*end)) {
                surface.draw_line(a, b, self.line_width, Color::from_palette(index), Layer::Lines);
            }
        }

        for (index, (_, point)) in pose.iter().enumerate() {
            surface.draw_oval(
                point,
                self.keypoint_radius,
                Color::from_palette(index),
                Layer::Circles,
            );
        }
    }

    /// Replace labels on `surface`. Only `only` is labelled; `None` clears them.
    pub fn draw_labels(&self, surface: &mut impl DrawingSurface, pose: &Pose, only: Option<Keypoint>) {
        surface.clear(Layer::Labels);

        let Some(keypoint) = only else {
            return;
        };
        let (Some(index), Some(point)) = (pose.position_of(keypoint), pose.get(keypoint)) else {
            return;
        };

        surface.draw_text(
            Point2D::new(point.x, point.y - self.text_size),
            &keypoint.label(),
            self.text_size,
            Color::from_palette(index),
            Layer::Labels,
        );
    }
}
