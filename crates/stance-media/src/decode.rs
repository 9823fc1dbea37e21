//! Sequential frame decoding through FFmpeg's rawvideo output.
//!
//! FFmpeg writes packed RGB24 frames to stdout; each frame is exactly
//! `width * height * 3` bytes, so frames are cut from the stream by size.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use image::RgbImage;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::command::{check_ffmpeg, DecodeCommand};
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_video, VideoInfo};

/// Maximum amount of FFmpeg stderr kept for error reports.
const STDERR_TAIL_BYTES: usize = 4096;

/// One decoded frame.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Zero-based position in the source video
    pub index: u64,
    /// Packed RGB pixels
    pub image: RgbImage,
}

impl VideoFrame {
    pub fn new(index: u64, image: RgbImage) -> Self {
        Self { index, image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Ordered stream of decoded frames.
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame in presentation order, `None` once the stream is exhausted.
    async fn next_frame(&mut self) -> MediaResult<Option<VideoFrame>>;
}

/// A video opened for analysis.
pub struct OpenedVideo {
    pub info: VideoInfo,
    pub frames: Box<dyn FrameSource>,
}

/// Opens video files for sequential decoding.
#[async_trait]
pub trait VideoDecoder: Send + Sync {
    async fn open(&self, path: &Path) -> MediaResult<OpenedVideo>;

    /// Decoder name for logging.
    fn name(&self) -> &'static str;
}

/// FFmpeg/FFprobe CLI decoder.
#[derive(Debug, Clone, Default)]
pub struct FfmpegDecoder {
    /// Downscale frames wider than this before handing them to the provider
    max_width: Option<u32>,
}

impl FfmpegDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit decoded frame width (0 disables the limit).
    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = (max_width > 0).then_some(max_width);
        self
    }

    /// Output frame size for a source of the given display size.
    fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        match self.max_width {
            Some(max_width) if width > max_width => {
                let scaled = (height as u64 * max_width as u64 / width as u64) as u32;
                // Most encoders and scalers want even dimensions
                (max_width & !1, (scaled & !1).max(2))
            }
            _ => (width, height),
        }
    }
}

#[async_trait]
impl VideoDecoder for FfmpegDecoder {
    async fn open(&self, path: &Path) -> MediaResult<OpenedVideo> {
        let info = probe_video(path).await?;

        let (display_width, display_height) = info.display_dimensions();
        if display_width == 0 || display_height == 0 {
            return Err(MediaError::unreadable("Video stream has no frame size"));
        }

        let (width, height) = self.output_dimensions(display_width, display_height);
        let command = DecodeCommand::new(path).scale(width, height);
        let frames = FfmpegFrameSource::spawn(&command, width, height)?;

        debug!(
            path = %path.display(),
            width,
            height,
            fps = info.fps,
            frame_count = info.frame_count,
            "Opened video for decoding"
        );

        Ok(OpenedVideo {
            info,
            frames: Box::new(frames),
        })
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}

/// Frame source reading an FFmpeg child process's stdout.
pub struct FfmpegFrameSource {
    child: Child,
    reader: RawFrameReader<BufReader<ChildStdout>>,
    stderr_task: Option<JoinHandle<String>>,
    finished: bool,
}

impl FfmpegFrameSource {
    /// Spawn FFmpeg for the given decode command.
    pub fn spawn(command: &DecodeCommand, width: u32, height: u32) -> MediaResult<Self> {
        check_ffmpeg()?;

        let args = command.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MediaError::ffmpeg_failed(format!("Failed to spawn FFmpeg: {}", e), None, None))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::ffmpeg_failed("Failed to capture FFmpeg stdout", None, None))?;

        // Drain stderr so FFmpeg never blocks on a full pipe
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf).await;
                let start = buf.len().saturating_sub(STDERR_TAIL_BYTES);
                String::from_utf8_lossy(&buf[start..]).trim().to_string()
            })
        });

        Ok(Self {
            child,
            reader: RawFrameReader::new(BufReader::new(stdout), width, height),
            stderr_task,
            finished: false,
        })
    }

    /// Reap the child process once stdout is exhausted.
    async fn finish(&mut self) -> MediaResult<()> {
        self.finished = true;
        let status = self.child.wait().await?;
        let stderr = match self.stderr_task.take() {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if status.success() {
            return Ok(());
        }

        if self.reader.frames_read() == 0 {
            return Err(MediaError::unreadable(if stderr.is_empty() {
                "FFmpeg could not decode any frame".to_string()
            } else {
                stderr
            }));
        }

        Err(MediaError::ffmpeg_failed(
            "FFmpeg exited with non-zero status",
            (!stderr.is_empty()).then_some(stderr),
            status.code(),
        ))
    }
}

#[async_trait]
impl FrameSource for FfmpegFrameSource {
    async fn next_frame(&mut self) -> MediaResult<Option<VideoFrame>> {
        if self.finished {
            return Ok(None);
        }

        match self.reader.read_frame().await? {
            Some(frame) => Ok(Some(frame)),
            None => {
                self.finish().await?;
                Ok(None)
            }
        }
    }
}

/// Cuts fixed-size RGB24 frames out of a byte stream.
pub struct RawFrameReader<R> {
    inner: R,
    width: u32,
    height: u32,
    frame_size: usize,
    next_index: u64,
}

impl<R: AsyncRead + Unpin + Send> RawFrameReader<R> {
    pub fn new(inner: R, width: u32, height: u32) -> Self {
        Self {
            inner,
            width,
            height,
            frame_size: width as usize * height as usize * 3,
            next_index: 0,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.next_index
    }

    /// Read the next frame; a trailing partial frame is discarded.
    pub async fn read_frame(&mut self) -> MediaResult<Option<VideoFrame>> {
        let mut buf = vec![0u8; self.frame_size];
        let mut filled = 0;

        while filled < self.frame_size {
            let n = self.inner.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            return Ok(None);
        }

        if filled < self.frame_size {
            warn!(
                frame = self.next_index,
                bytes = filled,
                expected = self.frame_size,
                "Discarding truncated trailing frame"
            );
            return Ok(None);
        }

        let image = RgbImage::from_raw(self.width, self.height, buf)
            .ok_or_else(|| MediaError::internal("Frame buffer does not match frame size"))?;

        let frame = VideoFrame::new(self.next_index, image);
        self.next_index += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_raw_reader_splits_frames_in_order() {
        // three 2x1 frames, each pixel colored by frame number
        let mut data = Vec::new();
        for i in 0..3u8 {
            data.extend_from_slice(&[i; 6]);
        }

        let mut reader = RawFrameReader::new(&data[..], 2, 1);
        for expected in 0..3u64 {
            let frame = reader.read_frame().await.unwrap().unwrap();
            assert_eq!(frame.index, expected);
            assert_eq!(frame.width(), 2);
            assert_eq!(frame.height(), 1);
            assert_eq!(frame.image.get_pixel(1, 0).0, [expected as u8; 3]);
        }
        assert!(reader.read_frame().await.unwrap().is_none());
        assert_eq!(reader.frames_read(), 3);
    }

    #[tokio::test]
    async fn test_raw_reader_drops_partial_frame() {
        let data = vec![7u8; 6 + 4];
        let mut reader = RawFrameReader::new(&data[..], 2, 1);
        assert!(reader.read_frame().await.unwrap().is_some());
        assert!(reader.read_frame().await.unwrap().is_none());
        assert_eq!(reader.frames_read(), 1);
    }

    #[test]
    fn test_output_dimensions() {
        let decoder = FfmpegDecoder::new().with_max_width(640);
        assert_eq!(decoder.output_dimensions(1920, 1080), (640, 360));
        assert_eq!(decoder.output_dimensions(480, 640), (480, 640));

        let unlimited = FfmpegDecoder::new().with_max_width(0);
        assert_eq!(unlimited.output_dimensions(1920, 1080), (1920, 1080));
    }

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let result = FfmpegDecoder::new().open(Path::new("/nonexistent/clip.mp4")).await;
        assert!(matches!(result, Err(MediaError::FileNotFound(_))));
    }
}
