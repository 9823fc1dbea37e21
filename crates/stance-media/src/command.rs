//! FFmpeg decode command builder.

use std::path::{Path, PathBuf};

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg commands that decode a video to raw frames on stdout.
#[derive(Debug, Clone)]
pub struct DecodeCommand {
    /// Input file path
    input: PathBuf,
    /// Video filters, joined with ',' into one -vf chain
    filters: Vec<String>,
    /// Output pixel format
    pix_fmt: String,
}

impl DecodeCommand {
    /// Create a new decode command producing packed RGB24 frames.
    pub fn new(input: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            filters: Vec::new(),
            pix_fmt: "rgb24".to_string(),
        }
    }

    /// Append a video filter.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Scale output frames to the given size.
    pub fn scale(self, width: u32, height: u32) -> Self {
        self.filter(format!("scale={}:{}", width, height))
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-v".to_string(),
            "error".to_string(),
        ];

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        // Keep every decoded frame; no duplication or dropping to a nominal rate
        args.push("-vsync".to_string());
        args.push("passthrough".to_string());

        if !self.filters.is_empty() {
            args.push("-vf".to_string());
            args.push(self.filters.join(","));
        }

        args.extend(
            ["-an", "-sn", "-pix_fmt", &self.pix_fmt, "-f", "rawvideo", "pipe:1"]
                .iter()
                .map(|s| s.to_string()),
        );

        args
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder() {
        let cmd = DecodeCommand::new("input.mp4").scale(640, 360);

        let args = cmd.build_args();
        let input_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input_pos + 1], "input.mp4");
        assert!(args.contains(&"scale=640:360".to_string()));
        assert!(args.contains(&"rgb24".to_string()));
        assert_eq!(args.last().unwrap(), "pipe:1");
    }

    #[test]
    fn test_no_filter_chain_without_filters() {
        let args = DecodeCommand::new("input.mov").build_args();
        assert!(!args.contains(&"-vf".to_string()));
    }

    #[test]
    fn test_filters_join_into_one_chain() {
        let args = DecodeCommand::new("input.mp4")
            .filter("transpose=1")
            .scale(360, 640)
            .build_args();
        let vf = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[vf + 1], "transpose=1,scale=360:640");
    }
}
