//! Body-pose joint vocabulary and skeleton topology.
//!
//! Pose requests report up to nineteen named joints per person. The limb
//! pairs here describe which joints connect into a drawable skeleton; a pair
//! only yields a segment when both endpoints were detected confidently.

use serde::{Deserialize, Serialize};

use crate::observation::{Joint, PoseObservation};

/// Named body joints reported by pose requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointName {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    Neck,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    /// Pelvis center, the root of the skeleton.
    Root,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl JointName {
    /// Every joint a backend can report, in a stable order.
    pub const ALL: [JointName; 19] = [
        JointName::Nose,
        JointName::LeftEye,
        JointName::RightEye,
        JointName::LeftEar,
        JointName::RightEar,
        JointName::Neck,
        JointName::LeftShoulder,
        JointName::RightShoulder,
        JointName::LeftElbow,
        JointName::RightElbow,
        JointName::LeftWrist,
        JointName::RightWrist,
        JointName::Root,
        JointName::LeftHip,
        JointName::RightHip,
        JointName::LeftKnee,
        JointName::RightKnee,
        JointName::LeftAnkle,
        JointName::RightAnkle,
    ];

    /// Wire name of the joint, matching its serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            JointName::Nose => "nose",
            JointName::LeftEye => "left_eye",
            JointName::RightEye => "right_eye",
            JointName::LeftEar => "left_ear",
            JointName::RightEar => "right_ear",
            JointName::Neck => "neck",
            JointName::LeftShoulder => "left_shoulder",
            JointName::RightShoulder => "right_shoulder",
            JointName::LeftElbow => "left_elbow",
            JointName::RightElbow => "right_elbow",
            JointName::LeftWrist => "left_wrist",
            JointName::RightWrist => "right_wrist",
            JointName::Root => "root",
            JointName::LeftHip => "left_hip",
            JointName::RightHip => "right_hip",
            JointName::LeftKnee => "left_knee",
            JointName::RightKnee => "right_knee",
            JointName::LeftAnkle => "left_ankle",
            JointName::RightAnkle => "right_ankle",
        }
    }
}

impl std::fmt::Display for JointName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joint pairs that form the drawable skeleton.
pub const LIMB_PAIRS: [(JointName, JointName); 11] = [
    (JointName::Neck, JointName::Root),
    (JointName::LeftShoulder, JointName::RightShoulder),
    (JointName::LeftShoulder, JointName::LeftElbow),
    (JointName::RightShoulder, JointName::RightElbow),
    (JointName::LeftElbow, JointName::LeftWrist),
    (JointName::RightElbow, JointName::RightWrist),
    (JointName::LeftHip, JointName::RightHip),
    (JointName::LeftHip, JointName::LeftKnee),
    (JointName::RightHip, JointName::RightKnee),
    (JointName::LeftKnee, JointName::LeftAnkle),
    (JointName::RightKnee, JointName::RightAnkle),
];

/// A skeleton segment between two confidently detected joints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimbSegment {
    /// First endpoint.
    pub from: Joint,
    /// Second endpoint.
    pub to: Joint,
}

/// Extracts drawable limb segments from a pose.
///
/// A pair from [`LIMB_PAIRS`] produces a segment only when both joints are
/// present in the pose and both meet `min_confidence`. Segments come back in
/// topology order.
pub fn limb_segments(pose: &PoseObservation, min_confidence: f32) -> Vec<LimbSegment> {
    let mut segments = Vec::new();
    for (first, second) in LIMB_PAIRS {
        let (Some(from), Some(to)) = (pose.joint(first), pose.joint(second)) else {
            continue;
        };
        if from.confidence < min_confidence || to.confidence < min_confidence {
            continue;
        }
        segments.push(LimbSegment {
            from: *from,
            to: *to,
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NormalizedPoint;

    fn joint(name: JointName, confidence: f32) -> Joint {
        Joint {
            name,
            location: NormalizedPoint::new(0.5, 0.5),
            confidence,
        }
    }

    #[test]
    fn limb_pairs_cover_known_joints_without_duplicates() {
        assert_eq!(LIMB_PAIRS.len(), 11);
        for (i, (a, b)) in LIMB_PAIRS.iter().enumerate() {
            assert_ne!(a, b, "pair {i} connects a joint to itself");
            assert!(JointName::ALL.contains(a));
            assert!(JointName::ALL.contains(b));
            for (j, other) in LIMB_PAIRS.iter().enumerate().skip(i + 1) {
                assert_ne!((a, b), (&other.0, &other.1), "pairs {i} and {j} repeat");
            }
        }
    }

    #[test]
    fn joint_names_serialize_snake_case() {
        for name in JointName::ALL {
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, format!("\"{}\"", name.as_str()));
            let parsed: JointName = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, name);
        }
    }

    #[test]
    fn confident_joints_form_segments() {
        let pose = PoseObservation {
            joints: vec![
                joint(JointName::Neck, 0.9),
                joint(JointName::Root, 0.8),
                joint(JointName::LeftShoulder, 0.7),
                joint(JointName::RightShoulder, 0.6),
            ],
        };
        let segments = limb_segments(&pose, 0.5);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].from.name, JointName::Neck);
        assert_eq!(segments[0].to.name, JointName::Root);
        assert_eq!(segments[1].from.name, JointName::LeftShoulder);
        assert_eq!(segments[1].to.name, JointName::RightShoulder);
    }

    #[test]
    fn low_confidence_joint_suppresses_its_segments() {
        let pose = PoseObservation {
            joints: vec![
                joint(JointName::Neck, 0.9),
                joint(JointName::Root, 0.49),
                joint(JointName::LeftShoulder, 0.9),
                joint(JointName::RightShoulder, 0.9),
            ],
        };
        let segments = limb_segments(&pose, 0.5);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].from.name, JointName::LeftShoulder);
    }

    #[test]
    fn missing_joint_suppresses_its_segments() {
        let pose = PoseObservation {
            joints: vec![joint(JointName::LeftKnee, 1.0)],
        };
        assert!(limb_segments(&pose, 0.5).is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let pose = PoseObservation {
            joints: vec![joint(JointName::Neck, 0.5), joint(JointName::Root, 0.5)],
        };
        assert_eq!(limb_segments(&pose, 0.5).len(), 1);
    }
}
