//! Slideshow video assembly via FFmpeg

use crate::config::VideoConfig;
use crate::ffmpeg::{FfmpegCommand, FfmpegError};
use std::path::{Path, PathBuf};
use tracing::info;

/// Encodes still frames, in the given order, into one video file.
pub trait VideoEncoder {
    /// `work_dir` is scratch space that outlives the call.
    fn encode(&self, frames: &[PathBuf], output: &Path, work_dir: &Path) -> Result<(), FfmpegError>;
}

/// H.264 MP4 at a fixed frame rate, one frame per image.
pub struct FfmpegSlideshow {
    fps: u32,
    binary: PathBuf,
}

impl FfmpegSlideshow {
    pub fn new(config: &VideoConfig) -> Self {
        Self {
            fps: config.fps.max(1),
            binary: config.ffmpeg.clone(),
        }
    }

    /// ffconcat script showing each frame for `1/fps` seconds.
    pub fn concat_script(&self, frames: &[PathBuf]) -> Result<String, FfmpegError> {
        let duration = 1.0 / f64::from(self.fps);
        let mut script = String::from("ffconcat version 1.0\n");

        for frame in frames {
            let path = std::fs::canonicalize(frame)?;
            script.push_str(&format!("file '{}'\n", escape(&path)));
            script.push_str(&format!("duration {}\n", duration));
        }
        // concat demuxer drops the last duration unless the final file repeats
        if let Some(last) = frames.last() {
            let path = std::fs::canonicalize(last)?;
            script.push_str(&format!("file '{}'\n", escape(&path)));
        }

        Ok(script)
    }
}

impl VideoEncoder for FfmpegSlideshow {
    fn encode(&self, frames: &[PathBuf], output: &Path, work_dir: &Path) -> Result<(), FfmpegError> {
        if frames.is_empty() {
            return Err(FfmpegError::InvalidInput("no frames to encode".to_string()));
        }

        let list = work_dir.join("frames.ffconcat");
        std::fs::write(&list, self.concat_script(frames)?)?;

        info!("Encoding {} frames at {} fps into {}", frames.len(), self.fps, output.display());
        FfmpegCommand::new(&self.binary)
            .args(&["-f", "concat", "-safe", "0"])
            .input(&list)
            .args(&[
                "-vf", &format!("fps={},format=yuv420p", self.fps),
                "-c:v", "libx264",
            ])
            .output(output)
            .execute()?;

        Ok(())
    }
}

fn escape(path: &Path) -> String {
    path.display().to_string().replace('\'', r"'\''")
}
