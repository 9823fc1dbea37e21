//! T-Pose template: both arms straight and held horizontally.

use stance_models::{BodyLandmark, Landmark, PoseLandmarks};

use super::PosePredicate;
use crate::geometry::joint_angle;

/// Thresholds for the T-Pose rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TPoseConfig {
    /// Allowed deviation of the elbow angle from 180 degrees.
    ///
    /// Joint angles never exceed 180, so the effective window is
    /// `[180 - tolerance, 180]`.
    pub elbow_tolerance_deg: f64,
    /// Maximum normalized vertical offset between adjacent arm joints.
    pub max_vertical_offset: f64,
}

impl Default for TPoseConfig {
    fn default() -> Self {
        Self {
            elbow_tolerance_deg: 40.0,
            max_vertical_offset: 0.15,
        }
    }
}

/// T-Pose predicate.
#[derive(Debug, Clone, Default)]
pub struct TPose {
    config: TPoseConfig,
}

impl TPose {
    pub const NAME: &'static str = "T-Pose";

    pub fn new(config: TPoseConfig) -> Self {
        Self { config }
    }

    fn is_straight(&self, shoulder: &Landmark, elbow: &Landmark, wrist: &Landmark) -> bool {
        let elbow_angle = joint_angle(shoulder, elbow, wrist);
        let tolerance = self.config.elbow_tolerance_deg;
        (180.0 - tolerance..=180.0 + tolerance).contains(&elbow_angle)
    }

    fn is_horizontal(&self, shoulder: &Landmark, elbow: &Landmark, wrist: &Landmark) -> bool {
        let limit = self.config.max_vertical_offset;
        (shoulder.y - elbow.y).abs() < limit && (elbow.y - wrist.y).abs() < limit
    }

    fn arm_matches(&self, landmarks: &PoseLandmarks, arm: [BodyLandmark; 3]) -> bool {
        let [shoulder, elbow, wrist] = arm.map(|part| landmarks.get(part));
        self.is_straight(shoulder, elbow, wrist) && self.is_horizontal(shoulder, elbow, wrist)
    }
}

const LEFT_ARM: [BodyLandmark; 3] = [
    BodyLandmark::LeftShoulder,
    BodyLandmark::LeftElbow,
    BodyLandmark::LeftWrist,
];

const RIGHT_ARM: [BodyLandmark; 3] = [
    BodyLandmark::RightShoulder,
    BodyLandmark::RightElbow,
    BodyLandmark::RightWrist,
];

impl PosePredicate for TPose {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn evaluate(&self, landmarks: &PoseLandmarks) -> bool {
        self.arm_matches(landmarks, LEFT_ARM) && self.arm_matches(landmarks, RIGHT_ARM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lm(x: f64, y: f64) -> Landmark {
        Landmark::new(x, y, 0.0)
    }

    fn t_pose_landmarks() -> PoseLandmarks {
        PoseLandmarks::zeroed()
            .with(BodyLandmark::LeftShoulder, lm(0.4, 0.4))
            .with(BodyLandmark::LeftElbow, lm(0.3, 0.4))
            .with(BodyLandmark::LeftWrist, lm(0.2, 0.4))
            .with(BodyLandmark::RightShoulder, lm(0.6, 0.4))
            .with(BodyLandmark::RightElbow, lm(0.7, 0.4))
            .with(BodyLandmark::RightWrist, lm(0.8, 0.4))
    }

    /// Left elbow at (0.4, 0.5) with the wrist bent `angle_deg` away from the shoulder ray.
    fn with_left_elbow_angle(angle_deg: f64) -> PoseLandmarks {
        let theta = angle_deg.to_radians();
        t_pose_landmarks()
            .with(BodyLandmark::LeftShoulder, lm(0.5, 0.5))
            .with(BodyLandmark::LeftElbow, lm(0.4, 0.5))
            .with(
                BodyLandmark::LeftWrist,
                lm(0.4 + 0.1 * theta.cos(), 0.5 + 0.1 * theta.sin()),
            )
    }

    #[test]
    fn test_detects_t_pose() {
        assert!(TPose::default().evaluate(&t_pose_landmarks()));
    }

    #[test]
    fn test_rejects_bent_arm() {
        // left arm bent, right arm collapsed onto the origin
        let landmarks = PoseLandmarks::zeroed()
            .with(BodyLandmark::LeftShoulder, lm(0.4, 0.4))
            .with(BodyLandmark::LeftElbow, lm(0.3, 0.3))
            .with(BodyLandmark::LeftWrist, lm(0.2, 0.4));
        assert!(!TPose::default().evaluate(&landmarks));
    }

    #[test]
    fn test_rejects_raised_elbow() {
        // straight arm, but raised diagonally: each joint 0.16 above the previous
        let landmarks = t_pose_landmarks()
            .with(BodyLandmark::RightShoulder, lm(0.5, 0.4))
            .with(BodyLandmark::RightElbow, lm(0.7, 0.24))
            .with(BodyLandmark::RightWrist, lm(0.9, 0.08));
        let [shoulder, elbow, wrist] = RIGHT_ARM.map(|part| *landmarks.get(part));
        assert!((joint_angle(&shoulder, &elbow, &wrist) - 180.0).abs() < 1e-6);
        assert!(!TPose::default().evaluate(&landmarks));
    }

    #[test]
    fn test_rejects_dropped_wrist() {
        let landmarks = t_pose_landmarks()
            .with(BodyLandmark::LeftShoulder, lm(0.95, 0.4))
            .with(BodyLandmark::LeftElbow, lm(0.65, 0.4))
            .with(BodyLandmark::LeftWrist, lm(0.05, 0.56));
        let pose = TPose::default();
        let [shoulder, elbow, wrist] = LEFT_ARM.map(|part| *landmarks.get(part));
        assert!(pose.is_straight(&shoulder, &elbow, &wrist));
        assert!(!pose.evaluate(&landmarks));
    }

    #[test]
    fn test_straightness_window() {
        let pose = TPose::default();
        assert!(pose.evaluate(&with_left_elbow_angle(150.0)));
        assert!(!pose.evaluate(&with_left_elbow_angle(120.0)));
    }

    #[test]
    fn test_custom_tolerance() {
        let strict = TPose::new(TPoseConfig {
            elbow_tolerance_deg: 10.0,
            ..TPoseConfig::default()
        });
        assert!(!strict.evaluate(&with_left_elbow_angle(150.0)));
        assert!(strict.evaluate(&with_left_elbow_angle(175.0)));
    }

    #[test]
    fn test_ignores_depth() {
        let landmarks = t_pose_landmarks()
            .with(BodyLandmark::LeftWrist, Landmark::new(0.2, 0.4, -5.0))
            .with(BodyLandmark::RightWrist, Landmark::new(0.8, 0.4, 5.0));
        assert!(TPose::default().evaluate(&landmarks));
    }
}
