//! Pointer hover/drag state machine and keypoint toggling.

use subdrawer_pose_model::keypoint::Keypoint;
use subdrawer_pose_model::pose::{Point2D, Pose};

/// Where the pointer stands relative to the active pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Hovering(Keypoint),
    Dragging(Keypoint),
}

impl InteractionState {
    /// The keypoint under the pointer or being dragged.
    pub fn keypoint(&self) -> Option<Keypoint> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Hovering(k) | InteractionState::Dragging(k) => Some(*k),
        }
    }
}

/// What the caller has to redraw after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Nothing,
    /// Replace the label layer: show `Some(k)`'s label, or none.
    Labels(Option<Keypoint>),
    /// The keypoint moved: redraw the skeleton, then its label.
    SkeletonAndLabel(Keypoint),
}

/// Result of toggling a keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Hover and drag tracking for one editing session.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    hit_radius: f64,
}

impl InteractionController {
    pub fn new(hit_radius: f64) -> Self {
        Self {
            state: InteractionState::Idle,
            hit_radius,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn hit_radius(&self) -> f64 {
        self.hit_radius
    }

    /// Forget any hover or drag, e.g. after the active image changed.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Handle pointer motion at `position`.
    ///
    /// With the primary button held over a hovered (or already dragged)
    /// keypoint, the keypoint follows the pointer without clamping. A press
    /// that started away from every keypoint grabs nothing. Without the
    /// button, the first keypoint in pose order within the hit radius becomes
    /// hovered.
    pub fn pointer_move(&mut self, pose: &mut Pose, position: Point2D, primary_down: bool) -> Redraw {
        if primary_down {
            return match self.state {
                InteractionState::Hovering(k) | InteractionState::Dragging(k) if pose.contains(k) => {
                    if self.state != InteractionState::Dragging(k) {
                        tracing::debug!(keypoint = %k, "Drag started");
                    }
                    pose.set(k, position);
                    self.state = InteractionState::Dragging(k);
                    Redraw::SkeletonAndLabel(k)
                }
                InteractionState::Idle => Redraw::Nothing,
                _ => self.hover(pose, position),
            };
        }
        self.hover(pose, position)
    }

    /// Primary button released: end any drag and hide labels.
    pub fn pointer_release(&mut self) -> Redraw {
        if let InteractionState::Dragging(k) = self.state {
            tracing::debug!(keypoint = %k, "Drag finished");
        }
        self.state = InteractionState::Idle;
        Redraw::Labels(None)
    }

    fn hover(&mut self, pose: &Pose, position: Point2D) -> Redraw {
        let next = match hit_test(pose, position, self.hit_radius) {
            Some(k) => InteractionState::Hovering(k),
            None => InteractionState::Idle,
        };
        if next == self.state {
            return Redraw::Nothing;
        }
        self.state = next;
        Redraw::Labels(next.keypoint())
    }
}

/// First keypoint, in pose order, within `radius` (inclusive) of `position`.
pub fn hit_test(pose: &Pose, position: Point2D, radius: f64) -> Option<Keypoint> {
    pose.iter()
        .find(|(_, point)| point.distance_to(&position) <= radius)
        .map(|(k, _)| k)
}

/// Remove `keypoint` if present, otherwise add it at the top-right corner
/// `(canvas_width, 0)`.
pub fn toggle_keypoint(pose: &mut Pose, keypoint: Keypoint, canvas_width: u32) -> ToggleOutcome {
    if pose.remove(keypoint).is_some() {
        ToggleOutcome::Removed
    } else {
        pose.set(keypoint, Point2D::new(canvas_width as f64, 0.0));
        ToggleOutcome::Added
    }
}
