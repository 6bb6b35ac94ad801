// src/downloader/images.rs

use crate::{
    DownloadJobContext,
    constants::{self, jike as consts},
    error::*,
    extractor::jike,
    models::{DownloadStatus, DownloadTask, MediaKind},
    symbols, ui, utils,
};
use colored::*;
use log::{error, info, warn};
use std::{fs, path::PathBuf};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageReport {
    /// 图片保存目录；页面获取或解析失败时为 `None`
    pub folder: Option<PathBuf>,
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// 即刻动态图片下载流程
pub struct ImageJob {
    context: DownloadJobContext,
}

impl ImageJob {
    pub fn new(context: DownloadJobContext) -> Self {
        Self { context }
    }

    pub async fn run(&self, url: &str) -> AppResult<ImageReport> {
        info!("开始处理即刻动态: {}", url);
        let page_url = Url::parse(url)?;
        let res = self.context.http_client.get(url).await?;
        if !res.status().is_success() {
            warn!("页面 {} 返回状态码 {}", url, res.status());
            ui::error(&format!("页面获取失败，状态码: {}", res.status()));
            return Ok(ImageReport::default());
        }
        let html = res.text().await?;

        let Some(post) = jike::parse_post(&html, &page_url)? else {
            ui::error("页面中未找到图片容器或标题元素。");
            return Ok(ImageReport::default());
        };

        ui::print_header(&format!("即刻动态: {}", post.title));
        let folder = self.context.config.output_dir.join(&post.title);
        fs::create_dir_all(&folder)?;

        let tasks: Vec<DownloadTask> = post
            .image_urls
            .iter()
            .enumerate()
            .map(|(i, src)| DownloadTask {
                url: src.clone(),
                filepath: folder.join(format!("image_{}.{}", i + 1, consts::IMAGE_EXT)),
                kind: MediaKind::Image,
            })
            .collect();

        let mut report = ImageReport {
            folder: Some(folder),
            total: tasks.len(),
            ..Default::default()
        };
        let pbar = ui::new_tasks_progress_bar(tasks.len() as u64, MediaKind::Image.label());
        pbar.set_message(utils::truncate_text(&post.title, constants::FILENAME_TRUNCATE_LENGTH));
        for (i, task) in tasks.iter().enumerate() {
            let status = self.download_image(task).await;
            if status == DownloadStatus::Success {
                report.success += 1;
            } else {
                report.failed += 1;
                let (symbol, color_fn, msg) = status.get_display_info();
                pbar.println(format!(
                    "{} 第 {}/{} 张图片下载失败: {}",
                    symbol,
                    i + 1,
                    report.total,
                    color_fn(msg.into())
                ));
            }
            pbar.inc(1);
        }
        pbar.finish_and_clear();

        println!(
            "\n{} 「{}」的图片下载完成 | {} | {}",
            *symbols::OK,
            post.title,
            format!("成功: {}", report.success).green(),
            format!("失败: {}", report.failed).red()
        );
        Ok(report)
    }

    async fn download_image(&self, task: &DownloadTask) -> DownloadStatus {
        let result: AppResult<DownloadStatus> = async {
            let res = self.context.http_client.get(&task.url).await?;
            if !res.status().is_success() {
                warn!("图片 {} 返回状态码 {}", task.url, res.status());
                return Ok(DownloadStatus::HttpError);
            }
            let bytes = res.bytes().await?;
            tokio::fs::write(&task.filepath, &bytes).await?;
            Ok(DownloadStatus::Success)
        }
        .await;

        result.unwrap_or_else(|e| {
            error!("下载图片 '{}' 失败: {}", task.url, e);
            DownloadStatus::from(&e)
        })
    }
}
