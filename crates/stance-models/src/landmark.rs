//! Body landmark models.
//!
//! Landmarks follow the MediaPipe Pose topology: 33 named body points, each
//! normalized to `[0, 1]` image-relative coordinates on x and y, with z as a
//! relative depth estimate.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmarks in one MediaPipe Pose skeleton.
pub const BODY_LANDMARK_COUNT: usize = 33;

/// A single 3D landmark as reported by the pose-estimation provider.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Landmark {
    /// Horizontal position, normalized to image width
    pub x: f64,
    /// Vertical position, normalized to image height (grows downwards)
    pub y: f64,
    /// Relative depth (smaller is closer to the camera)
    pub z: f64,
    /// Likelihood that the landmark is visible in the frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: None,
        }
    }
}

/// MediaPipe Pose body landmark indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    /// Position of this landmark in a provider's landmark list.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Expected {BODY_LANDMARK_COUNT} body landmarks, got {0}")]
pub struct LandmarkCountError(pub usize);

/// One frame's full skeleton.
///
/// Always holds exactly [`BODY_LANDMARK_COUNT`] points, so lookups by
/// [`BodyLandmark`] cannot go out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseLandmarks {
    points: Vec<Landmark>,
}

impl PoseLandmarks {
    /// Build a skeleton from a provider's landmark list.
    pub fn from_points(points: Vec<Landmark>) -> Result<Self, LandmarkCountError> {
        if points.len() != BODY_LANDMARK_COUNT {
            return Err(LandmarkCountError(points.len()));
        }
        Ok(Self { points })
    }

    /// Skeleton with every landmark at the origin.
    pub fn zeroed() -> Self {
        Self {
            points: vec![Landmark::default(); BODY_LANDMARK_COUNT],
        }
    }

    /// Replace a single landmark (builder style).
    pub fn with(mut self, part: BodyLandmark, landmark: Landmark) -> Self {
        self.points[part.index()] = landmark;
        self
    }

    pub fn get(&self, part: BodyLandmark) -> &Landmark {
        &self.points[part.index()]
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }
}
