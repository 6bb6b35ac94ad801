// src/downloader/job.rs

use super::{
    candidate::keep_largest,
    fetcher::{FetchOutcome, fetch_to_file},
    muxer::Muxer,
    negotiator::{QualityNegotiator, organize_by_quality},
};
use crate::{
    DownloadJobContext,
    constants::bilibili as consts,
    error::*,
    extractor::bilibili,
    models::{DownloadTask, MediaKind, StreamVariant},
    symbols,
    ui::{self, Prompter},
};
use anyhow::anyhow;
use log::{debug, info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Bilibili 视频下载流程：解析播放信息、选择清晰度、下载音视频并合并
pub struct VideoJob {
    context: DownloadJobContext,
    prompter: Arc<dyn Prompter>,
    muxer: Arc<dyn Muxer>,
}

impl VideoJob {
    pub fn new(
        context: DownloadJobContext,
        prompter: Arc<dyn Prompter>,
        muxer: Arc<dyn Muxer>,
    ) -> Self {
        Self {
            context,
            prompter,
            muxer,
        }
    }

    /// 处理一个视频链接，返回合并后的文件路径；页面中没有播放信息时返回 `None`
    pub async fn run(&self, url: &str) -> AppResult<Option<PathBuf>> {
        info!("开始处理 URL: {}", url);
        let video_id = bilibili::extract_video_id(url)?;
        ui::print_header(&format!("Bilibili 视频: {}", video_id));
        let page = bilibili::fetch_video_page(
            &self.context.http_client,
            &self.context.config.bilibili_base_url,
            &video_id,
        )
        .await?;
        let Some(play_info) = page.play_info else {
            ui::warn("未找到播放信息。");
            return Ok(None);
        };

        let tiers = organize_by_quality(&play_info)?;
        let negotiator = QualityNegotiator::new(self.prompter.as_ref());
        let selection = negotiator.select_quality(&tiers).await?;
        let title = bilibili::build_title(&page.html, &selection.tier.label)?;
        let variants = negotiator.select_variants(&selection.tier).await?;

        let output_dir = self.prepare_output_dir()?;
        let video_path = output_dir.join(format!("{}.{}", title, consts::VIDEO_EXT));
        let audio_path = output_dir.join(format!("{}.{}", title, consts::AUDIO_EXT));

        let candidates = self.download_videos(&output_dir, &title, &variants).await?;
        keep_largest(&candidates, &video_path)?;

        let audio = play_info
            .data
            .dash
            .audio
            .first()
            .ok_or_else(|| AppError::Manifest("播放信息中没有音频流".to_string()))?;
        let audio_task = DownloadTask {
            url: audio.base_url.clone(),
            filepath: audio_path.clone(),
            kind: MediaKind::Audio,
        };
        let outcome = self.download(&audio_task).await?;
        if !outcome.is_completed() {
            return Err(AppError::Other(anyhow!("音频下载失败: {:?}", outcome)));
        }

        let final_path = self.mux_and_cleanup(&output_dir, &title, &video_path, &audio_path).await?;
        println!("{} Done  ! 已保存到: {}", *symbols::OK, final_path.display());
        Ok(Some(final_path))
    }

    /// 下载选中的视频流，返回实际写入成功的文件列表
    pub async fn download_videos(
        &self,
        output_dir: &Path,
        title: &str,
        variants: &[(usize, StreamVariant)],
    ) -> AppResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(variants.len());
        for (index, variant) in variants {
            ui::print_sub_header(&format!("视频流 {} - {}", index, variant));
            let task = DownloadTask {
                url: variant.url.clone(),
                filepath: output_dir.join(format!("{}_{}.{}", title, index, consts::VIDEO_EXT)),
                kind: MediaKind::Video,
            };
            match self.download(&task).await? {
                FetchOutcome::Completed { .. } => written.push(task.filepath),
                other => warn!("视频流 {} 未能下载: {:?}", index, other),
            }
        }
        if written.is_empty() {
            return Err(AppError::Other(anyhow!("所选视频流均下载失败")));
        }
        debug!("已下载的视频候选: {:?}", written);
        Ok(written)
    }

    async fn download(&self, task: &DownloadTask) -> AppResult<FetchOutcome> {
        fetch_to_file(
            self.context.http_client.raw(),
            &task.url,
            &task.filepath,
            self.context.config.retry,
            task.kind.label(),
        )
        .await
    }

    async fn mux_and_cleanup(
        &self,
        output_dir: &Path,
        title: &str,
        video_path: &Path,
        audio_path: &Path,
    ) -> AppResult<PathBuf> {
        let muxed_path = output_dir.join(format!(
            "{}{}.{}",
            title,
            consts::MUXED_SUFFIX,
            consts::VIDEO_EXT
        ));
        ui::info("正在合并音视频...");
        self.muxer.mux(video_path, audio_path, &muxed_path).await?;

        fs::remove_file(video_path)?;
        fs::remove_file(audio_path)?;
        fs::rename(&muxed_path, video_path)?;
        Ok(video_path.to_path_buf())
    }

    fn prepare_output_dir(&self) -> AppResult<PathBuf> {
        let dir = &self.context.config.output_dir;
        fs::create_dir_all(dir)?;
        let absolute = dunce::canonicalize(dir)?;
        info!("文件将保存到目录: \"{}\"", absolute.display());
        Ok(absolute)
    }
}
