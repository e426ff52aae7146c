//! A single subject's annotated keypoints.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::keypoint::Keypoint;

/// A canvas-pixel coordinate. Stored on disk as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2D> for [f64; 2] {
    fn from(p: Point2D) -> Self {
        [p.x, p.y]
    }
}

/// Annotated keypoints of one subject, in insertion order.
///
/// A keypoint missing from the pose is "not annotated". The order of entries
/// is part of the data: renderers color each keypoint by its position here,
/// so re-adding a removed keypoint moves it to the end.
///
/// Equality ignores order, matching how saved state is compared.
#[derive(Debug, Clone, Default)]
pub struct Pose {
    entries: Vec<(Keypoint, Point2D)>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pose from entries, keeping the last position of a repeated keypoint
    /// at the slot of its first occurrence.
    pub fn from_entries(entries: impl IntoIterator<Item = (Keypoint, Point2D)>) -> Self {
        let mut pose = Self::new();
        for (keypoint, point) in entries {
            pose.set(keypoint, point);
        }
        pose
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, keypoint: Keypoint) -> bool {
        self.position_of(keypoint).is_some()
    }

    pub fn get(&self, keypoint: Keypoint) -> Option<Point2D> {
        self.entries
            .iter()
            .find(|(k, _)| *k == keypoint)
            .map(|(_, p)| *p)
    }

    /// Index of `keypoint` in this pose's own order.
    pub fn position_of(&self, keypoint: Keypoint) -> Option<usize> {
        self.entries.iter().position(|(k, _)| *k == keypoint)
    }

    /// Set a keypoint's coordinate. Existing keypoints keep their slot;
    /// new ones are appended.
    pub fn set(&mut self, keypoint: Keypoint, point: Point2D) {
        match self.entries.iter_mut().find(|(k, _)| *k == keypoint) {
            Some((_, existing)) => *existing = point,
            None => self.entries.push((keypoint, point)),
        }
    }

    /// Remove a keypoint, returning its last coordinate.
    pub fn remove(&mut self, keypoint: Keypoint) -> Option<Point2D> {
        let index = self.position_of(keypoint)?;
        Some(self.entries.remove(index).1)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Keypoint, Point2D)> + '_ {
        self.entries.iter().copied()
    }

    /// Keypoint names in insertion order.
    pub fn keypoints(&self) -> impl Iterator<Item = Keypoint> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Mutable access to every coordinate, in insertion order.
    pub fn points_mut(&mut self) -> impl Iterator<Item = &mut Point2D> {
        self.entries.iter_mut().map(|(_, p)| p)
    }
}

impl PartialEq for Pose {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, p)| other.get(*k).is_some_and(|q| q == *p))
    }
}

impl Serialize for Pose {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (keypoint, point) in &self.entries {
            map.serialize_entry(keypoint, point)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Pose {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PoseVisitor;

        impl<'de> Visitor<'de> for PoseVisitor {
            type Value = Pose;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from keypoint name to [x, y]")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Pose, A::Error> {
                let mut pose = Pose::new();
                while let Some((keypoint, point)) = access.next_entry::<Keypoint, Point2D>()? {
                    if pose.contains(keypoint) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate keypoint `{keypoint}`"
                        )));
                    }
                    pose.entries.push((keypoint, point));
                }
                Ok(pose)
            }
        }

        deserializer.deserialize_map(PoseVisitor)
    }
}
