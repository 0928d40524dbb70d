//! Converts raw keypoint records from a pose estimator into play-field wrist
//! samples.
//!
//! Keypoints arrive in camera space. A front-facing camera shows a mirror
//! image, so every x coordinate is flipped across the field width before use,
//! both for hit testing and for the skeleton overlay handed to renderers.

use crate::config::GameConfig;
use crate::geometry::{Hand, PlayField, Position};
use serde::{Deserialize, Serialize};

/// MoveNet keypoint layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    pub fn wrist(hand: Hand) -> Self {
        match hand {
            Hand::Left => KeypointIndex::LeftWrist,
            Hand::Right => KeypointIndex::RightWrist,
        }
    }

    pub fn elbow(hand: Hand) -> Self {
        match hand {
            Hand::Left => KeypointIndex::LeftElbow,
            Hand::Right => KeypointIndex::RightElbow,
        }
    }
}

/// Body links drawn in the overlay. Face links are left out.
pub const SKELETON_CONNECTIONS: [(KeypointIndex, KeypointIndex); 12] = [
    (KeypointIndex::LeftShoulder, KeypointIndex::RightShoulder),
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftElbow),
    (KeypointIndex::LeftElbow, KeypointIndex::LeftWrist),
    (KeypointIndex::RightShoulder, KeypointIndex::RightElbow),
    (KeypointIndex::RightElbow, KeypointIndex::RightWrist),
    (KeypointIndex::LeftShoulder, KeypointIndex::LeftHip),
    (KeypointIndex::RightShoulder, KeypointIndex::RightHip),
    (KeypointIndex::LeftHip, KeypointIndex::RightHip),
    (KeypointIndex::LeftHip, KeypointIndex::LeftKnee),
    (KeypointIndex::LeftKnee, KeypointIndex::LeftAnkle),
    (KeypointIndex::RightHip, KeypointIndex::RightKnee),
    (KeypointIndex::RightKnee, KeypointIndex::RightAnkle),
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Keypoint {
    pub fn new(x: f64, y: f64, score: f64) -> Self {
        Self {
            x,
            y,
            score: Some(score),
            name: None,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One detected person, keypoints in camera pixel space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPose {
    pub keypoints: Vec<Keypoint>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl RawPose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self {
            keypoints,
            score: None,
        }
    }

    pub fn keypoint(&self, index: KeypointIndex) -> Option<&Keypoint> {
        self.keypoints.get(index as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WristSample {
    Tracked {
        position: Position,
        /// Radians, pointing from the wrist toward the elbow.
        forearm_angle: Option<f64>,
    },
    #[default]
    Untracked,
}

impl WristSample {
    pub fn tracked(position: Position, forearm_angle: Option<f64>) -> Self {
        WristSample::Tracked {
            position,
            forearm_angle,
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            WristSample::Tracked { position, .. } => Some(*position),
            WristSample::Untracked => None,
        }
    }

    pub fn forearm_angle(&self) -> Option<f64> {
        match self {
            WristSample::Tracked { forearm_angle, .. } => *forearm_angle,
            WristSample::Untracked => None,
        }
    }
}

/// Both wrists of one pose for one frame, already in play-field space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseSample {
    pub left: WristSample,
    pub right: WristSample,
}

impl PoseSample {
    pub fn new(left: WristSample, right: WristSample) -> Self {
        Self { left, right }
    }

    pub fn wrist(&self, hand: Hand) -> &WristSample {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    pub fn wrist_mut(&mut self, hand: Hand) -> &mut WristSample {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoseOverlay {
    pub segments: Vec<(Position, Position)>,
    pub wrists: Vec<(Hand, Position)>,
}

pub fn mirror_x(raw_x: f64, field_width: f64) -> f64 {
    field_width - raw_x
}

/// Angle in radians of the vector from `from` to `to`.
pub fn direction_angle(from: Position, to: Position) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseAdapter {
    field_width: f64,
    confidence_threshold: f64,
}

impl PoseAdapter {
    pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.3;

    pub fn new(field_width: f64, confidence_threshold: f64) -> Self {
        Self {
            field_width,
            confidence_threshold,
        }
    }

    pub fn from_config(field: &PlayField, config: &GameConfig) -> Self {
        Self::new(field.width, config.confidence_threshold)
    }

    pub fn field_width(&self) -> f64 {
        self.field_width
    }

    /// Scores at or above the threshold are accepted. A missing or zero score
    /// never is, whatever the threshold.
    pub fn is_confident(&self, keypoint: &Keypoint) -> bool {
        keypoint
            .score
            .is_some_and(|score| score > 0.0 && score >= self.confidence_threshold)
    }

    pub fn to_field(&self, keypoint: &Keypoint) -> Position {
        Position::new(mirror_x(keypoint.x, self.field_width), keypoint.y)
    }

    pub fn wrist(&self, pose: &RawPose, hand: Hand) -> WristSample {
        let Some(wrist) = pose.keypoint(KeypointIndex::wrist(hand)) else {
            return WristSample::Untracked;
        };
        if !self.is_confident(wrist) || !wrist.is_finite() {
            return WristSample::Untracked;
        }

        let position = self.to_field(wrist);
        // The elbow's own score does not gate the angle, only its coordinates do.
        let forearm_angle = pose
            .keypoint(KeypointIndex::elbow(hand))
            .filter(|elbow| elbow.is_finite())
            .map(|elbow| direction_angle(position, self.to_field(elbow)));

        WristSample::tracked(position, forearm_angle)
    }

    pub fn adapt(&self, pose: &RawPose) -> PoseSample {
        PoseSample::new(self.wrist(pose, Hand::Left), self.wrist(pose, Hand::Right))
    }

    pub fn adapt_all(&self, poses: &[RawPose]) -> Vec<PoseSample> {
        poses.iter().map(|pose| self.adapt(pose)).collect()
    }

    pub fn overlay(&self, pose: &RawPose) -> PoseOverlay {
        let confident = |index: KeypointIndex| {
            pose.keypoint(index)
                .filter(|keypoint| self.is_confident(keypoint) && keypoint.is_finite())
                .map(|keypoint| self.to_field(keypoint))
        };

        let segments = SKELETON_CONNECTIONS
            .iter()
            .filter_map(|&(start, end)| Some((confident(start)?, confident(end)?)))
            .collect();

        let wrists = Hand::BOTH
            .iter()
            .filter_map(|&hand| confident(KeypointIndex::wrist(hand)).map(|p| (hand, p)))
            .collect();

        PoseOverlay { segments, wrists }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const WIDTH: f64 = 640.0;

    fn adapter() -> PoseAdapter {
        PoseAdapter::new(WIDTH, PoseAdapter::DEFAULT_CONFIDENCE_THRESHOLD)
    }

    fn pose_with(entries: &[(KeypointIndex, Keypoint)]) -> RawPose {
        let mut keypoints = vec![Keypoint::new(0.0, 0.0, 0.0); KeypointIndex::COUNT];
        for (index, keypoint) in entries {
            keypoints[*index as usize] = keypoint.clone();
        }
        RawPose::new(keypoints)
    }

    #[test]
    fn mirror_is_an_involution() {
        assert_eq!(mirror_x(100.0, WIDTH), 540.0);
        assert_eq!(mirror_x(mirror_x(123.5, WIDTH), WIDTH), 123.5);
    }

    #[test]
    fn confidence_boundary_is_inclusive() {
        let adapter = adapter();
        let below = pose_with(&[(KeypointIndex::LeftWrist, Keypoint::new(10.0, 20.0, 0.29))]);
        let at = pose_with(&[(KeypointIndex::LeftWrist, Keypoint::new(10.0, 20.0, 0.3))]);

        assert_eq!(adapter.wrist(&below, Hand::Left), WristSample::Untracked);
        assert_eq!(
            adapter.wrist(&at, Hand::Left).position(),
            Some(Position::new(630.0, 20.0))
        );
    }

    #[test]
    fn missing_score_is_untracked() {
        let mut wrist = Keypoint::new(10.0, 20.0, 0.9);
        wrist.score = None;
        let pose = pose_with(&[(KeypointIndex::RightWrist, wrist)]);

        assert_eq!(adapter().wrist(&pose, Hand::Right), WristSample::Untracked);
    }

    #[test]
    fn forearm_angle_uses_mirrored_coordinates() {
        // Raw elbow sits to the right of the wrist; after mirroring it is to the left.
        let pose = pose_with(&[
            (KeypointIndex::RightWrist, Keypoint::new(100.0, 200.0, 0.9)),
            (KeypointIndex::RightElbow, Keypoint::new(150.0, 200.0, 0.9)),
        ]);
        let angle = adapter().wrist(&pose, Hand::Right).forearm_angle().unwrap();
        assert!((angle.abs() - std::f64::consts::PI).abs() < 1e-9);

        let pose = pose_with(&[
            (KeypointIndex::LeftWrist, Keypoint::new(100.0, 200.0, 0.9)),
            (KeypointIndex::LeftElbow, Keypoint::new(100.0, 260.0, 0.9)),
        ]);
        let angle = adapter().wrist(&pose, Hand::Left).forearm_angle().unwrap();
        assert!((angle - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn low_confidence_elbow_still_yields_angle() {
        let pose = pose_with(&[
            (KeypointIndex::LeftWrist, Keypoint::new(100.0, 200.0, 0.8)),
            (KeypointIndex::LeftElbow, Keypoint::new(100.0, 260.0, 0.01)),
        ]);
        assert!(adapter().wrist(&pose, Hand::Left).forearm_angle().is_some());
    }

    #[test]
    fn truncated_record_degrades_to_untracked() {
        let pose = RawPose::new(vec![Keypoint::new(1.0, 1.0, 1.0); 3]);
        let sample = adapter().adapt(&pose);
        assert_eq!(sample, PoseSample::default());
    }

    #[test]
    fn elbow_without_score_still_yields_angle() {
        let mut elbow = Keypoint::new(50.0, 120.0, 0.0);
        elbow.score = None;
        let pose = pose_with(&[
            (KeypointIndex::LeftWrist, Keypoint::new(50.0, 60.0, 0.9)),
            (KeypointIndex::LeftElbow, elbow),
        ]);
        let sample = adapter().wrist(&pose, Hand::Left);

        assert_eq!(sample.position(), Some(Position::new(590.0, 60.0)));
        assert!((sample.forearm_angle().unwrap() - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn non_finite_elbow_has_no_angle() {
        let pose = pose_with(&[
            (KeypointIndex::LeftWrist, Keypoint::new(50.0, 60.0, 0.9)),
            (KeypointIndex::LeftElbow, Keypoint::new(f64::NAN, 120.0, 0.9)),
        ]);
        let sample = adapter().wrist(&pose, Hand::Left);

        assert_eq!(sample.position(), Some(Position::new(590.0, 60.0)));
        assert_eq!(sample.forearm_angle(), None);
    }

    #[test]
    fn non_finite_wrist_is_untracked() {
        let pose = pose_with(&[(KeypointIndex::RightWrist, Keypoint::new(f64::INFINITY, 60.0, 0.9))]);
        assert_eq!(adapter().wrist(&pose, Hand::Right), WristSample::Untracked);
    }

    #[test]
    fn zero_score_is_untracked_even_with_zero_threshold() {
        let adapter = PoseAdapter::new(WIDTH, 0.0);
        let pose = pose_with(&[
            (KeypointIndex::RightWrist, Keypoint::new(10.0, 20.0, 0.0)),
            (KeypointIndex::LeftWrist, Keypoint::new(10.0, 20.0, 0.01)),
        ]);
        let sample = adapter.adapt(&pose);

        assert_eq!(sample.right, WristSample::Untracked);
        assert_eq!(sample.left.position(), Some(Position::new(630.0, 20.0)));
        assert!(adapter.overlay(&pose).wrists.iter().all(|(hand, _)| *hand == Hand::Left));
    }

    #[test]
    fn adapts_movenet_json() {
        let json = r#"{
            "score": 0.7,
            "keypoints": [
                {"x": 0, "y": 0, "score": 0.9, "name": "nose"},
                {"x": 0, "y": 0, "score": 0.9}, {"x": 0, "y": 0, "score": 0.9},
                {"x": 0, "y": 0, "score": 0.9}, {"x": 0, "y": 0, "score": 0.9},
                {"x": 0, "y": 0, "score": 0.9}, {"x": 0, "y": 0, "score": 0.9},
                {"x": 0, "y": 0, "score": 0.9}, {"x": 0, "y": 0, "score": 0.9},
                {"x": 40, "y": 300, "score": 0.9, "name": "left_wrist"},
                {"x": 600, "y": 120, "score": 0.1, "name": "right_wrist"}
            ]
        }"#;
        let pose: RawPose = serde_json::from_str(json).unwrap();
        let samples = adapter().adapt_all(&[pose]);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].left.position(), Some(Position::new(600.0, 300.0)));
        assert_eq!(samples[0].right, WristSample::Untracked);
    }

    #[test]
    fn overlay_only_links_confident_keypoints() {
        let pose = pose_with(&[
            (KeypointIndex::LeftShoulder, Keypoint::new(200.0, 100.0, 0.9)),
            (KeypointIndex::LeftElbow, Keypoint::new(220.0, 180.0, 0.9)),
            (KeypointIndex::LeftWrist, Keypoint::new(240.0, 260.0, 0.2)),
            (KeypointIndex::RightWrist, Keypoint::new(400.0, 260.0, 0.5)),
        ]);
        let overlay = adapter().overlay(&pose);

        assert_eq!(
            overlay.segments,
            vec![(Position::new(440.0, 100.0), Position::new(420.0, 180.0))]
        );
        assert_eq!(overlay.wrists, vec![(Hand::Right, Position::new(240.0, 260.0))]);
    }
}
