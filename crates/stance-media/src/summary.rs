//! Per-pose accumulation and summary building.

use std::collections::BTreeMap;

use stance_models::{basename, AnalysisSummary, PoseDetail};

use crate::error::{MediaError, MediaResult};

/// Running match state for one pose during an analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseAccumulator {
    name: &'static str,
    frames: Vec<u64>,
}

impl PoseAccumulator {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            frames: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Record a match. Frames must arrive in increasing order.
    pub fn record(&mut self, frame: u64) {
        debug_assert!(
            self.frames.last().map_or(true, |last| *last < frame),
            "frame {frame} recorded out of order"
        );
        self.frames.push(frame);
    }

    pub fn count(&self) -> u64 {
        self.frames.len() as u64
    }

    /// Convert into a summary entry, or `None` when the pose never matched.
    fn into_detail(self, fps: f64) -> Option<(String, PoseDetail)> {
        if self.frames.is_empty() {
            return None;
        }
        let duration_frames = self.count();
        Some((
            self.name.to_string(),
            PoseDetail {
                total_seconds: duration_frames as f64 / fps,
                duration_frames,
                frames: self.frames,
            },
        ))
    }
}

/// Build the final summary from the accumulators of one analysis.
///
/// Poses without matches are omitted; detected poses keep accumulator order.
/// Seconds can only be derived from a positive finite `fps`, so a degenerate
/// rate is an error as soon as any pose matched.
pub fn build_summary(
    source_name: &str,
    total_frames: u64,
    fps: f64,
    accumulators: Vec<PoseAccumulator>,
) -> MediaResult<AnalysisSummary> {
    let any_match = accumulators.iter().any(|acc| acc.count() > 0);
    if any_match && (!fps.is_finite() || fps <= 0.0) {
        return Err(MediaError::DegenerateFrameRate(fps));
    }

    let mut poses_detected = Vec::new();
    let mut pose_details = BTreeMap::new();
    for (name, detail) in accumulators.into_iter().filter_map(|acc| acc.into_detail(fps)) {
        poses_detected.push(name.clone());
        pose_details.insert(name, detail);
    }

    Ok(AnalysisSummary {
        video_path: basename(source_name).to_string(),
        total_frames,
        fps,
        poses_detected,
        pose_details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc(name: &'static str, frames: &[u64]) -> PoseAccumulator {
        let mut acc = PoseAccumulator::new(name);
        for f in frames {
            acc.record(*f);
        }
        acc
    }

    #[test]
    fn test_build_summary_with_matches() {
        let summary = build_summary("uploads/dance.mp4", 10, 25.0, vec![acc("T-Pose", &[2, 5, 7])]).unwrap();

        assert_eq!(summary.video_path, "dance.mp4");
        assert_eq!(summary.total_frames, 10);
        assert_eq!(summary.poses_detected, vec!["T-Pose"]);
        let detail = &summary.pose_details["T-Pose"];
        assert_eq!(detail.duration_frames, 3);
        assert_eq!(detail.frames, vec![2, 5, 7]);
        assert!((detail.total_seconds - 0.12).abs() < 1e-9);
    }

    #[test]
    fn test_build_summary_omits_unmatched_poses() {
        let summary = build_summary(
            "dance.mov",
            100,
            30.0,
            vec![acc("T-Pose", &[]), acc("Star", &[40])],
        )
        .unwrap();

        assert_eq!(summary.poses_detected, vec!["Star"]);
        assert!(!summary.pose_details.contains_key("T-Pose"));
    }

    #[test]
    fn test_build_summary_rejects_degenerate_rate() {
        for fps in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = build_summary("a.mp4", 10, fps, vec![acc("T-Pose", &[1])]).unwrap_err();
            assert!(matches!(err, MediaError::DegenerateFrameRate(_)));
        }
    }

    #[test]
    fn test_build_summary_without_matches_tolerates_missing_rate() {
        let summary = build_summary("a.mp4", 10, 0.0, vec![acc("T-Pose", &[])]).unwrap();
        assert!(summary.poses_detected.is_empty());
        assert!(summary.pose_details.is_empty());
    }

    #[test]
    fn test_detail_lengths_agree() {
        let summary = build_summary("a.mp4", 50, 10.0, vec![acc("T-Pose", &[0, 1, 2, 10, 49])]).unwrap();
        for detail in summary.pose_details.values() {
            assert_eq!(detail.frames.len() as u64, detail.duration_frames);
            assert!(detail.frames.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
