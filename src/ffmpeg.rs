//! FFmpeg command wrapper utilities

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FfmpegError {
    #[error("FFmpeg not found: {0}")]
    NotInstalled(String),

    #[error("FFmpeg execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct FfmpegCommand {
    binary: PathBuf,
    args: Vec<OsString>,
}

impl FfmpegCommand {
    pub fn new(binary: impl AsRef<Path>) -> Self {
        Self {
            binary: binary.as_ref().to_path_buf(),
            args: vec![
                "-hide_banner".into(),
                "-loglevel".into(),
                "error".into(),
                "-y".into(),
            ],
        }
    }

    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.args.push("-i".into());
        self.args.push(path.as_ref().as_os_str().to_owned());
        self
    }

    pub fn output(mut self, path: impl AsRef<Path>) -> Self {
        self.args.push(path.as_ref().as_os_str().to_owned());
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(OsString::from));
        self
    }

    pub fn execute(self) -> Result<Output, FfmpegError> {
        if !is_installed(&self.binary) {
            return Err(FfmpegError::NotInstalled(self.binary.display().to_string()));
        }

        debug!("{} {:?}", self.binary.display(), self.args);
        let output = Command::new(&self.binary)
            .args(&self.args)
            .output()
            .map_err(|e| FfmpegError::ExecutionFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FfmpegError::ExecutionFailed(stderr.trim().to_string()));
        }

        Ok(output)
    }
}

impl Default for FfmpegCommand {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

pub fn is_installed(binary: impl AsRef<Path>) -> bool {
    Command::new(binary.as_ref())
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_reports_not_installed() {
        let err = FfmpegCommand::new("/nonexistent/ffmpeg")
            .args(&["-version"])
            .execute()
            .unwrap_err();
        assert!(matches!(err, FfmpegError::NotInstalled(_)));
    }

    #[test]
    fn test_failing_run_carries_stderr() {
        if !is_installed("ffmpeg") {
            return;
        }
        let err = FfmpegCommand::default()
            .input("/nonexistent/input.jpg")
            .output("/nonexistent/out.mp4")
            .execute()
            .unwrap_err();
        match err {
            FfmpegError::ExecutionFailed(msg) => assert!(!msg.is_empty()),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
