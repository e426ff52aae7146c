//! The per-image pose dataset.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use subdrawer_common::error::{SubdrawerError, SubdrawerResult};

use crate::pose::Pose;

/// A string-keyed mapping that remembers insertion order.
///
/// Equality ignores order.
#[derive(Debug, Clone)]
pub struct NamedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for NamedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> NamedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert or replace. A replaced key keeps its slot; a new key goes last.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(existing) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// The most recently inserted entry.
    pub fn last(&self) -> Option<(&str, &V)> {
        self.entries.last().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: PartialEq> PartialEq for NamedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|w| w == v))
    }
}

impl<V: Serialize> Serialize for NamedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for NamedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NamedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for NamedMapVisitor<V> {
            type Value = NamedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<NamedMap<V>, A::Error> {
                let mut map = NamedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    if map.contains_key(&key) {
                        return Err(serde::de::Error::custom(format!("duplicate key `{key}`")));
                    }
                    map.entries.push((key, value));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(NamedMapVisitor(PhantomData))
    }
}

/// All poses of one image, keyed by pose identifier.
pub type ImagePoses = NamedMap<Pose>;

/// Image file name -> pose identifier -> pose.
///
/// The most recently inserted image is the propagation source for images
/// visited for the first time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseDataSet {
    images: NamedMap<ImagePoses>,
}

impl PoseDataSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of images with stored poses.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn contains_image(&self, image: &str) -> bool {
        self.images.contains_key(image)
    }

    pub fn image_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.images.keys()
    }

    pub fn images(&self) -> impl Iterator<Item = (&str, &ImagePoses)> + '_ {
        self.images.iter()
    }

    pub fn image(&self, image: &str) -> Option<&ImagePoses> {
        self.images.get(image)
    }

    pub fn pose(&self, image: &str, pose_id: &str) -> Option<&Pose> {
        self.images.get(image)?.get(pose_id)
    }

    pub fn pose_mut(&mut self, image: &str, pose_id: &str) -> Option<&mut Pose> {
        self.images.get_mut(image)?.get_mut(pose_id)
    }

    /// Insert or replace every pose of an image.
    pub fn insert_image(&mut self, image: impl Into<String>, poses: ImagePoses) {
        self.images.insert(image, poses);
    }

    /// Convenience for inserting a single pose under an image.
    pub fn insert_pose(&mut self, image: &str, pose_id: impl Into<String>, pose: Pose) {
        match self.images.get_mut(image) {
            Some(poses) => {
                poses.insert(pose_id, pose);
            }
            None => {
                let mut poses = ImagePoses::new();
                poses.insert(pose_id, pose);
                self.images.insert(image, poses);
            }
        }
    }

    pub fn remove_image(&mut self, image: &str) -> Option<ImagePoses> {
        self.images.remove(image)
    }

    /// The most recently inserted image and its poses.
    pub fn last_image(&self) -> Option<(&str, &ImagePoses)> {
        self.images.last()
    }

    /// Move the poses stored under `from` to `to`. The moved entry becomes the
    /// most recent one unless `to` already existed, in which case it is
    /// overwritten in place. Returns whether anything moved.
    pub fn rebind_image(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        match self.images.remove(from) {
            Some(poses) => {
                self.images.insert(to, poses);
                true
            }
            None => false,
        }
    }

    /// Images that have no pose under `pose_id`, in insertion order.
    pub fn images_missing_pose<'a>(&'a self, pose_id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.images
            .iter()
            .filter(move |(_, poses)| !poses.contains_key(pose_id))
            .map(|(image, _)| image)
    }

    /// Return the pose `pose_id` of `image`, first propagating an independent
    /// copy of the most recently inserted image's poses if `image` has none.
    ///
    /// On error the dataset is left unchanged.
    pub fn ensure_pose(&mut self, image: &str, pose_id: &str) -> SubdrawerResult<&mut Pose> {
        if !self.images.contains_key(image) {
            let (source_name, source) = self.images.last().ok_or_else(|| {
                SubdrawerError::state_inconsistency(format!(
                    "no pose to propagate to {image}: dataset is empty"
                ))
            })?;
            if !source.contains_key(pose_id) {
                return Err(SubdrawerError::state_inconsistency(format!(
                    "cannot propagate to {image}: {source_name} has no pose with id {pose_id}"
                )));
            }
            tracing::debug!(image, source = source_name, "Propagating pose to new image");
            let copy = source.clone();
            self.images.insert(image, copy);
        }

        self.images
            .get_mut(image)
            .and_then(|poses| poses.get_mut(pose_id))
            .ok_or_else(|| {
                SubdrawerError::state_inconsistency(format!(
                    "image {image} has no pose with id {pose_id}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoint::Keypoint;
    use crate::pose::Point2D;

    fn dataset_with(images: &[(&str, Pose)]) -> PoseDataSet {
        let mut dataset = PoseDataSet::new();
        for (name, pose) in images {
            dataset.insert_pose(name, "pose1", pose.clone());
        }
        dataset
    }

    fn nose_at(x: f64, y: f64) -> Pose {
        Pose::from_entries([(Keypoint::Nose, Point2D::new(x, y))])
    }

    #[test]
    fn test_ensure_pose_copies_most_recent_image() {
        let mut dataset = dataset_with(&[
            ("image_1.jpg", nose_at(1.0, 1.0)),
            ("image_2.jpg", nose_at(10.0, 10.0)),
        ]);

        let pose = dataset.ensure_pose("image_5.jpg", "pose1").unwrap();
        assert_eq!(pose.get(Keypoint::Nose), Some(Point2D::new(10.0, 10.0)));
        assert_eq!(dataset.last_image().unwrap().0, "image_5.jpg");
    }

    #[test]
    fn test_ensure_pose_copy_is_independent() {
        let mut dataset = dataset_with(&[("image_1.jpg", nose_at(10.0, 10.0))]);

        dataset
            .ensure_pose("image_2.jpg", "pose1")
            .unwrap()
            .set(Keypoint::Nose, Point2D::new(99.0, 99.0));

        assert_eq!(
            dataset.pose("image_1.jpg", "pose1").unwrap().get(Keypoint::Nose),
            Some(Point2D::new(10.0, 10.0))
        );
    }

    #[test]
    fn test_ensure_pose_existing_image_is_untouched() {
        let mut dataset = dataset_with(&[
            ("a.png", nose_at(1.0, 1.0)),
            ("b.png", nose_at(2.0, 2.0)),
        ]);
        let pose = dataset.ensure_pose("a.png", "pose1").unwrap();
        assert_eq!(pose.get(Keypoint::Nose), Some(Point2D::new(1.0, 1.0)));
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.last_image().unwrap().0, "b.png");
    }

    #[test]
    fn test_ensure_pose_on_empty_dataset_is_inconsistent() {
        let mut dataset = PoseDataSet::new();
        let err = dataset.ensure_pose("a.png", "pose1").unwrap_err();
        assert!(matches!(err, SubdrawerError::StateInconsistency { .. }));
    }

    #[test]
    fn test_ensure_pose_missing_pose_id_is_inconsistent() {
        let mut dataset = dataset_with(&[("a.png", nose_at(1.0, 1.0))]);
        let err = dataset.ensure_pose("a.png", "pose2").unwrap_err();
        assert!(matches!(err, SubdrawerError::StateInconsistency { .. }));
    }

    #[test]
    fn test_failed_propagation_leaves_dataset_unchanged() {
        let mut dataset = PoseDataSet::new();
        dataset.insert_pose("a.jpg", "pose2", nose_at(1.0, 1.0));
        let before = dataset.clone();

        let err = dataset.ensure_pose("b.jpg", "pose1").unwrap_err();

        assert!(matches!(err, SubdrawerError::StateInconsistency { .. }));
        assert_eq!(dataset.image_names().collect::<Vec<_>>(), vec!["a.jpg"]);
        assert_eq!(dataset, before);
    }

    #[test]
    fn test_images_missing_pose_keeps_order() {
        let mut dataset = dataset_with(&[("a.png", nose_at(1.0, 1.0))]);
        dataset.insert_pose("c.png", "pose2", nose_at(3.0, 3.0));
        dataset.insert_pose("b.png", "pose2", nose_at(2.0, 2.0));

        assert_eq!(
            dataset.images_missing_pose("pose1").collect::<Vec<_>>(),
            vec!["c.png", "b.png"]
        );
        assert_eq!(dataset.images_missing_pose("pose2").count(), 1);
    }

    #[test]
    fn test_rebind_moves_entry_to_end() {
        let mut dataset = dataset_with(&[
            ("image_1.jpg", nose_at(1.0, 1.0)),
            ("other.png", nose_at(2.0, 2.0)),
        ]);
        assert!(dataset.rebind_image("image_1.jpg", "dsc001.jpg"));
        let names: Vec<_> = dataset.image_names().collect();
        assert_eq!(names, vec!["other.png", "dsc001.jpg"]);
        assert!(!dataset.rebind_image("image_1.jpg", "dsc001.jpg"));
        assert!(!dataset.rebind_image("dsc001.jpg", "dsc001.jpg"));
    }

    #[test]
    fn test_equality_ignores_image_order() {
        let a = dataset_with(&[("a.png", nose_at(1.0, 1.0)), ("b.png", nose_at(2.0, 2.0))]);
        let b = dataset_with(&[("b.png", nose_at(2.0, 2.0)), ("a.png", nose_at(1.0, 1.0))]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_deserialize_keeps_file_order_and_rejects_duplicates() {
        let dataset: PoseDataSet = serde_json::from_str(
            r#"{"z.png": {"pose1": {"nose": [1, 1]}}, "a.png": {"pose1": {"neck": [2, 2]}}}"#,
        )
        .unwrap();
        let names: Vec<_> = dataset.image_names().collect();
        assert_eq!(names, vec!["z.png", "a.png"]);

        assert!(serde_json::from_str::<PoseDataSet>(
            r#"{"a.png": {"pose1": {}}, "a.png": {"pose1": {}}}"#
        )
        .is_err());
    }
}
