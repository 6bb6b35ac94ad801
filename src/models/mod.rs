// src/models/mod.rs

pub mod api;

use crate::error::AppError;
use crate::symbols;
use colored::{ColoredString, Colorize};
use std::{fmt, path::PathBuf};

/// 清晰度分组中的一路具体视频流
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamVariant {
    /// 在播放信息视频列表中的序号 (从 1 开始)
    pub index: usize,
    pub resolution: String,
    pub frame_rate: String,
    pub codecs: String,
    pub url: String,
}

impl fmt::Display for StreamVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "分辨率: {}, 帧率: {}, Codecs: {}",
            self.resolution, self.frame_rate, self.codecs
        )
    }
}

/// 一个清晰度标签及其下的视频流，`variants` 构造后不为空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityTier {
    pub label: String,
    pub variants: Vec<StreamVariant>,
}

/// 按首次出现顺序排列的清晰度分组
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityTiers {
    tiers: Vec<QualityTier>,
}

impl QualityTiers {
    /// 将视频流追加到对应标签的分组中，标签首次出现时新建分组
    pub fn push(&mut self, label: &str, variant: StreamVariant) {
        match self.tiers.iter_mut().find(|t| t.label == label) {
            Some(tier) => tier.variants.push(variant),
            None => self.tiers.push(QualityTier {
                label: label.to_string(),
                variants: vec![variant],
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QualityTier> {
        self.tiers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QualityTier> {
        self.tiers.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(|t| t.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    /// 从 0 开始，始终在分组范围内
    pub tier_index: usize,
    pub tier: QualityTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl MediaKind {
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Video => "视频",
            MediaKind::Audio => "音频",
            MediaKind::Image => "图片",
        }
    }
}

/// 单次文件传输任务，写完即丢弃
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub url: String,
    pub filepath: PathBuf,
    pub kind: MediaKind,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadStatus {
    Success,
    HttpError,
    NetworkError,
    ConnectionError,
    TimeoutError,
    IoError,
    UnexpectedError,
}

impl DownloadStatus {
    pub fn get_display_info(
        &self,
    ) -> (
        &'static ColoredString,
        fn(ColoredString) -> ColoredString,
        &'static str,
    ) {
        match self {
            DownloadStatus::Success => (&symbols::OK, |s| s.green(), "下载成功"),
            DownloadStatus::HttpError => (&symbols::ERROR, |s| s.red(), "服务器返回错误"),
            DownloadStatus::NetworkError => (&symbols::ERROR, |s| s.red(), "网络请求失败"),
            DownloadStatus::ConnectionError => (&symbols::ERROR, |s| s.red(), "无法建立连接"),
            DownloadStatus::TimeoutError => (&symbols::WARN, |s| s.yellow(), "网络连接超时"),
            DownloadStatus::IoError => (&symbols::ERROR, |s| s.red(), "本地文件读写错误"),
            DownloadStatus::UnexpectedError => {
                (&symbols::ERROR, |s| s.red(), "发生未预期的程序错误")
            }
        }
    }
}

impl From<&reqwest::Error> for DownloadStatus {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            DownloadStatus::TimeoutError
        } else if err.is_connect() {
            DownloadStatus::ConnectionError
        } else if err.is_status() {
            DownloadStatus::HttpError
        } else {
            DownloadStatus::NetworkError
        }
    }
}

impl From<&AppError> for DownloadStatus {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => err.into(),
            AppError::NetworkMiddleware(_) => DownloadStatus::NetworkError,
            AppError::Io(_) => DownloadStatus::IoError,
            _ => DownloadStatus::UnexpectedError,
        }
    }
}
