// src/lib.rs

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    cli::{BiliCli, JikeCli},
    client::RobustClient,
    config::AppConfig,
    downloader::{FfmpegMuxer, ImageJob, VideoJob},
    error::AppResult,
    ui::ConsolePrompter,
};
use log::debug;
use std::sync::Arc;

/// 一次下载任务所需的配置与 HTTP 客户端
#[derive(Clone)]
pub struct DownloadJobContext {
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
}

impl DownloadJobContext {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let http_client = Arc::new(RobustClient::new(&config)?);
        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }
}

/// `jike-dl` 的入口
pub async fn run_jike(args: JikeCli) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    let context = DownloadJobContext::new(AppConfig::for_jike(&args)?)?;
    ImageJob::new(context).run(&args.url).await?;
    Ok(())
}

/// `bili-dl` 的入口
pub async fn run_bili(args: BiliCli) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    let config = AppConfig::for_bili(&args)?;
    let muxer = Arc::new(FfmpegMuxer::new(config.ffmpeg_path.clone()));
    let context = DownloadJobContext::new(config)?;

    let prompter = Arc::new(ConsolePrompter::stdin());
    let url = match &args.url {
        Some(url) => url.clone(),
        None => ui::prompt(prompter.source(), "请输入 Bilibili 视频链接").await?,
    };

    VideoJob::new(context, prompter, muxer).run(&url).await?;
    Ok(())
}
