// src/downloader/muxer.rs

use crate::error::*;
use async_trait::async_trait;
use log::{debug, info};
use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::Stdio,
};

/// 把独立的视频流和音频流合并为一个文件
#[async_trait]
pub trait Muxer: Send + Sync {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> AppResult<()>;
}

/// 调用外部 ffmpeg 进行无重编码合并
pub struct FfmpegMuxer {
    program: PathBuf,
}

impl FfmpegMuxer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// 两路输入全部映射到输出，流复制，按较短的一路截断
    pub fn command_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(16);
        args.extend(["-y", "-loglevel", "error", "-i"].map(OsString::from));
        args.push(video.into());
        args.push("-i".into());
        args.push(audio.into());
        args.extend(["-c", "copy", "-map", "0", "-map", "1", "-shortest"].map(OsString::from));
        args.push(output.into());
        args
    }
}

#[async_trait]
impl Muxer for FfmpegMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> AppResult<()> {
        let args = Self::command_args(video, audio, output);
        debug!("执行: {:?} {:?}", self.program, args);
        let status = tokio::process::Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => AppError::Mux(format!(
                    "未找到 '{}'，请确认已安装 ffmpeg 并加入 PATH",
                    self.program.display()
                )),
                _ => AppError::Io(e),
            })?;

        if !status.success() {
            return Err(AppError::Mux(format!("ffmpeg 异常退出 ({})", status)));
        }
        info!("合并完成: {:?}", output);
        Ok(())
    }
}
