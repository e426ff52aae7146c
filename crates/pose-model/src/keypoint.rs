//! The keypoint universe and skeleton topology.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the 18 named anatomical landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keypoint {
    Nose,
    Neck,
    RightEye,
    LeftEye,
    RightEar,
    LeftEar,
    RightShoulder,
    LeftShoulder,
    RightElbow,
    LeftElbow,
    RightWrist,
    LeftWrist,
    RightHip,
    LeftHip,
    RightKnee,
    LeftKnee,
    RightAnkle,
    LeftAnkle,
}

impl Keypoint {
    /// Canonical order of the universe (also the order of the toggle buttons).
    pub const ALL: [Keypoint; 18] = [
        Keypoint::Nose,
        Keypoint::Neck,
        Keypoint::RightEye,
        Keypoint::LeftEye,
        Keypoint::RightEar,
        Keypoint::LeftEar,
        Keypoint::RightShoulder,
        Keypoint::LeftShoulder,
        Keypoint::RightElbow,
        Keypoint::LeftElbow,
        Keypoint::RightWrist,
        Keypoint::LeftWrist,
        Keypoint::RightHip,
        Keypoint::LeftHip,
        Keypoint::RightKnee,
        Keypoint::LeftKnee,
        Keypoint::RightAnkle,
        Keypoint::LeftAnkle,
    ];

    /// Name as stored in pose files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Keypoint::Nose => "nose",
            Keypoint::Neck => "neck",
            Keypoint::RightEye => "right_eye",
            Keypoint::LeftEye => "left_eye",
            Keypoint::RightEar => "right_ear",
            Keypoint::LeftEar => "left_ear",
            Keypoint::RightShoulder => "right_shoulder",
            Keypoint::LeftShoulder => "left_shoulder",
            Keypoint::RightElbow => "right_elbow",
            Keypoint::LeftElbow => "left_elbow",
            Keypoint::RightWrist => "right_wrist",
            Keypoint::LeftWrist => "left_wrist",
            Keypoint::RightHip => "right_hip",
            Keypoint::LeftHip => "left_hip",
            Keypoint::RightKnee => "right_knee",
            Keypoint::LeftKnee => "left_knee",
            Keypoint::RightAnkle => "right_ankle",
            Keypoint::LeftAnkle => "left_ankle",
        }
    }

    /// Human-readable label (`right_eye` -> `right eye`).
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for Keypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the 18 keypoint names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown keypoint name: {0:?}")]
pub struct UnknownKeypoint(pub String);

impl FromStr for Keypoint {
    type Err = UnknownKeypoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Keypoint::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKeypoint(s.to_string()))
    }
}

/// Skeleton edges. The index of an edge selects its palette color.
pub const CONNECTIONS: [(Keypoint, Keypoint); 17] = [
    (Keypoint::Nose, Keypoint::Neck),
    (Keypoint::RightEye, Keypoint::RightEar),
    (Keypoint::LeftEye, Keypoint::LeftEar),
    (Keypoint::RightEye, Keypoint::Nose),
    (Keypoint::LeftEye, Keypoint::Nose),
    (Keypoint::Neck, Keypoint::RightShoulder),
    (Keypoint::Neck, Keypoint::LeftShoulder),
    (Keypoint::Neck, Keypoint::RightHip),
    (Keypoint::Neck, Keypoint::LeftHip),
    (Keypoint::RightShoulder, Keypoint::RightElbow),
    (Keypoint::RightElbow, Keypoint::RightWrist),
    (Keypoint::LeftShoulder, Keypoint::LeftElbow),
    (Keypoint::LeftElbow, Keypoint::LeftWrist),
    (Keypoint::RightHip, Keypoint::RightKnee),
    (Keypoint::RightKnee, Keypoint::RightAnkle),
    (Keypoint::LeftHip, Keypoint::LeftKnee),
    (Keypoint::LeftKnee, Keypoint::LeftAnkle),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for keypoint in Keypoint::ALL {
            assert_eq!(keypoint.as_str().parse::<Keypoint>().unwrap(), keypoint);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = "left_toe".parse::<Keypoint>().unwrap_err();
        assert_eq!(err, UnknownKeypoint("left_toe".to_string()));
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for keypoint in Keypoint::ALL {
            let json = serde_json::to_string(&keypoint).unwrap();
            assert_eq!(json, format!("\"{}\"", keypoint.as_str()));
        }
    }

    #[test]
    fn test_label_replaces_underscores() {
        assert_eq!(Keypoint::RightShoulder.label(), "right shoulder");
        assert_eq!(Keypoint::Nose.label(), "nose");
    }

    #[test]
    fn test_connections_only_use_universe_and_have_no_self_loops() {
        for (start, end) in CONNECTIONS {
            assert_ne!(start, end);
            assert!(Keypoint::ALL.contains(&start));
            assert!(Keypoint::ALL.contains(&end));
        }
    }
}
