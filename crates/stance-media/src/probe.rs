//! FFprobe video information.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::command::check_ffprobe;
use crate::error::{MediaError, MediaResult};

/// Video stream information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Duration in seconds
    pub duration: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Frame rate (fps), 0 when the container does not report one
    pub fps: f64,
    /// Declared frame count, 0 when unknown
    pub frame_count: u64,
    /// Video codec
    pub codec: String,
    /// Display rotation in degrees (phone footage is often stored rotated)
    #[serde(default)]
    pub rotation: i32,
}

impl VideoInfo {
    /// Frame size after FFmpeg applies the display rotation.
    pub fn display_dimensions(&self) -> (u32, u32) {
        if self.rotation.rem_euclid(180) == 90 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
    #[serde(default)]
    tags: Option<FfprobeTags>,
    #[serde(default)]
    side_data_list: Vec<FfprobeSideData>,
}

#[derive(Debug, Deserialize)]
struct FfprobeTags {
    rotate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeSideData {
    rotation: Option<i32>,
}

/// Probe a video file for stream information.
pub async fn probe_video(path: impl AsRef<Path>) -> MediaResult<VideoInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    check_ffprobe()?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        debug!(
            path = %path.display(),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "FFprobe rejected input"
        );
        return Err(MediaError::unreadable(format!(
            "ffprobe exited with {:?}",
            output.status.code()
        )));
    }

    parse_probe_output(&output.stdout)
}

/// Parse FFprobe's JSON report into [`VideoInfo`].
pub fn parse_probe_output(stdout: &[u8]) -> MediaResult<VideoInfo> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| MediaError::unreadable(format!("Unparseable ffprobe output: {}", e)))?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::unreadable("No video stream found"))?;

    let duration = video_stream
        .duration
        .as_deref()
        .or(probe.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    // avg_frame_rate is "0/0" for some streams; fall back to r_frame_rate
    let fps = [&video_stream.avg_frame_rate, &video_stream.r_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|r| parse_frame_rate(r))
        .unwrap_or(0.0);

    let frame_count = video_stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or_else(|| {
            if duration > 0.0 && fps > 0.0 {
                (duration * fps).round() as u64
            } else {
                0
            }
        });

    let rotation = video_stream
        .side_data_list
        .iter()
        .find_map(|sd| sd.rotation)
        .or_else(|| {
            video_stream
                .tags
                .as_ref()
                .and_then(|t| t.rotate.as_deref())
                .and_then(|r| r.parse().ok())
        })
        .unwrap_or(0);

    Ok(VideoInfo {
        duration,
        width: video_stream.width.unwrap_or(0),
        height: video_stream.height.unwrap_or(0),
        fps,
        frame_count,
        codec: video_stream.codec_name.clone().unwrap_or_default(),
        rotation,
    })
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
pub fn parse_frame_rate(s: &str) -> Option<f64> {
    let rate = if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den <= 0.0 {
            return None;
        }
        num / den
    } else {
        s.parse().ok()?
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert!((parse_frame_rate("30/1").unwrap() - 30.0).abs() < 0.01);
        assert!((parse_frame_rate("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert!((parse_frame_rate("29.97").unwrap() - 29.97).abs() < 0.01);
        assert!(parse_frame_rate("0/0").is_none());
        assert!(parse_frame_rate("0").is_none());
        assert!(parse_frame_rate("N/A").is_none());
    }

    #[test]
    fn test_parse_probe_output() {
        let json = br#"{
            "streams": [
                {"codec_type": "audio", "codec_name": "aac"},
                {"codec_type": "video", "codec_name": "h264", "width": 1280, "height": 720,
                 "avg_frame_rate": "25/1", "r_frame_rate": "25/1", "nb_frames": "250", "duration": "10.0"}
            ],
            "format": {"duration": "10.02"}
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.width, 1280);
        assert_eq!(info.height, 720);
        assert_eq!(info.frame_count, 250);
        assert!((info.fps - 25.0).abs() < 1e-9);
        assert!((info.duration - 10.0).abs() < 1e-9);
        assert_eq!(info.codec, "h264");
    }

    #[test]
    fn test_parse_probe_output_estimates_frame_count() {
        let json = br#"{
            "streams": [{"codec_type": "video", "width": 640, "height": 480,
                         "avg_frame_rate": "0/0", "r_frame_rate": "30/1"}],
            "format": {"duration": "2.0"}
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert!((info.fps - 30.0).abs() < 1e-9);
        assert_eq!(info.frame_count, 60);
    }

    #[test]
    fn test_parse_probe_output_missing_rate_is_zero() {
        let json = br#"{"streams": [{"codec_type": "video", "width": 640, "height": 480}]}"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.fps, 0.0);
        assert_eq!(info.frame_count, 0);
    }

    #[test]
    fn test_rotation_swaps_display_dimensions() {
        let json = br#"{
            "streams": [{"codec_type": "video", "width": 1920, "height": 1080,
                         "r_frame_rate": "30/1", "side_data_list": [{"rotation": -90}]}]
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.rotation, -90);
        assert_eq!(info.display_dimensions(), (1080, 1920));

        let json = br#"{
            "streams": [{"codec_type": "video", "width": 1920, "height": 1080,
                         "r_frame_rate": "30/1", "tags": {"rotate": "180"}}]
        }"#;
        let info = parse_probe_output(json).unwrap();
        assert_eq!(info.display_dimensions(), (1920, 1080));
    }

    #[test]
    fn test_parse_probe_output_without_video_stream() {
        let json = br#"{"streams": [{"codec_type": "audio"}], "format": {}}"#;
        let err = parse_probe_output(json).unwrap_err();
        assert!(matches!(err, MediaError::UnreadableSource(_)));
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let err = probe_video("/nonexistent/clip.mp4").await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_probe_non_video_file_is_unreadable() {
        let file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        std::fs::write(file.path(), b"definitely not a video").unwrap();

        // Without ffprobe installed this still classifies as an unreadable source
        let err = probe_video(file.path()).await.unwrap_err();
        assert_eq!(err.kind(), "unreadable_source");
    }
}
