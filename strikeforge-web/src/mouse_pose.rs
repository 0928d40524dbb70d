//! Mouse stand-in for the camera. Clicks place the wrists; the rest of the
//! body is posed around them and reported as a camera-space keypoint record,
//! so it takes the same adapter path as a real detection.

use macroquad::prelude::{
    KeyCode, MouseButton, is_key_pressed, is_mouse_button_pressed, mouse_position, vec2,
};
use strikeforge_core::{Hand, Keypoint, KeypointIndex, PlayField, Position, RawPose, mirror_x};

use crate::viewport::FieldViewport;

const TRACKED_SCORE: f64 = 0.9;

#[derive(Debug, Clone, Default)]
pub struct MousePose {
    left: Option<Position>,
    right: Option<Position>,
}

impl MousePose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wrist(&self, hand: Hand) -> Option<Position> {
        match hand {
            Hand::Left => self.left,
            Hand::Right => self.right,
        }
    }

    pub fn set_wrist(&mut self, hand: Hand, position: Position) {
        match hand {
            Hand::Left => self.left = Some(position),
            Hand::Right => self.right = Some(position),
        }
    }

    pub fn clear(&mut self) {
        self.left = None;
        self.right = None;
    }

    /// Left button places the left wrist, right button the right wrist, `C` clears both.
    pub fn poll(&mut self, viewport: &FieldViewport) -> bool {
        let (mouse_x, mouse_y) = mouse_position();
        let pointer = vec2(mouse_x, mouse_y);
        let mut changed = false;

        for (button, hand) in [(MouseButton::Left, Hand::Left), (MouseButton::Right, Hand::Right)] {
            if is_mouse_button_pressed(button) && viewport.contains_screen(pointer) {
                self.set_wrist(hand, viewport.to_field(pointer));
                changed = true;
            }
        }

        if is_key_pressed(KeyCode::C) {
            self.clear();
            changed = true;
        }

        changed
    }

    pub fn raw_pose(&self, field: &PlayField) -> RawPose {
        let unit = field.unit();
        let center_x = field.center_x();
        let mut keypoints = vec![Keypoint::default(); KeypointIndex::COUNT];
        let mut place = |index: KeypointIndex, position: Position, score: f64| {
            keypoints[index as usize] =
                Keypoint::new(mirror_x(position.x, field.width), position.y, score);
        };

        let head = Position::new(center_x, 0.9 * unit);
        for index in [
            KeypointIndex::Nose,
            KeypointIndex::LeftEye,
            KeypointIndex::RightEye,
            KeypointIndex::LeftEar,
            KeypointIndex::RightEar,
        ] {
            place(index, head, TRACKED_SCORE);
        }

        for hand in Hand::BOTH {
            // The player's right side shows on screen-right.
            let side = match hand {
                Hand::Left => -1.0,
                Hand::Right => 1.0,
            };
            let shoulder = Position::new(center_x + side * 0.6 * unit, 1.6 * unit);
            let hip = Position::new(center_x + side * 0.4 * unit, 3.2 * unit);
            let knee = Position::new(hip.x, 4.1 * unit);
            let ankle = Position::new(hip.x, 4.9 * unit);

            let (wrist, wrist_score) = match self.wrist(hand) {
                Some(wrist) => (wrist, TRACKED_SCORE),
                None => (Position::new(shoulder.x, shoulder.y + 1.5 * unit), 0.0),
            };
            let elbow = Position::new(
                (shoulder.x + wrist.x) * 0.5,
                (shoulder.y + wrist.y) * 0.5 + 0.35 * unit,
            );

            let (shoulder_index, hip_index, knee_index, ankle_index) = match hand {
                Hand::Left => (
                    KeypointIndex::LeftShoulder,
                    KeypointIndex::LeftHip,
                    KeypointIndex::LeftKnee,
                    KeypointIndex::LeftAnkle,
                ),
                Hand::Right => (
                    KeypointIndex::RightShoulder,
                    KeypointIndex::RightHip,
                    KeypointIndex::RightKnee,
                    KeypointIndex::RightAnkle,
                ),
            };

            place(shoulder_index, shoulder, TRACKED_SCORE);
            place(KeypointIndex::elbow(hand), elbow, TRACKED_SCORE);
            place(KeypointIndex::wrist(hand), wrist, wrist_score);
            place(hip_index, hip, TRACKED_SCORE);
            place(knee_index, knee, TRACKED_SCORE);
            place(ankle_index, ankle, TRACKED_SCORE);
        }

        RawPose::new(keypoints)
    }
}
