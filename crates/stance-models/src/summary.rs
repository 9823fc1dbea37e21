//! Analysis summary returned to clients.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-pose statistics for a single analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseDetail {
    /// Matched frames converted to seconds (`duration_frames / fps`)
    pub total_seconds: f64,
    /// Number of frames in which the pose matched
    pub duration_frames: u64,
    /// Matched frame indices, strictly ascending
    pub frames: Vec<u64>,
}

/// Terminal record of a video analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisSummary {
    /// Basename of the analyzed source
    pub video_path: String,
    /// Frame count of the source video
    pub total_frames: u64,
    /// Source frame rate
    pub fps: f64,
    /// Pose names with at least one match
    pub poses_detected: Vec<String>,
    /// Details for each detected pose
    pub pose_details: BTreeMap<String, PoseDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_json_shape() {
        let mut pose_details = BTreeMap::new();
        pose_details.insert(
            "T-Pose".to_string(),
            PoseDetail {
                total_seconds: 0.12,
                duration_frames: 3,
                frames: vec![2, 5, 7],
            },
        );
        let summary = AnalysisSummary {
            video_path: "dance.mp4".to_string(),
            total_frames: 10,
            fps: 25.0,
            poses_detected: vec!["T-Pose".to_string()],
            pose_details,
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["video_path"], "dance.mp4");
        assert_eq!(value["total_frames"], 10);
        assert_eq!(value["poses_detected"][0], "T-Pose");
        assert_eq!(value["pose_details"]["T-Pose"]["duration_frames"], 3);
        assert_eq!(value["pose_details"]["T-Pose"]["frames"][2], 7);
    }
}
