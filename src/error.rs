// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("无效的 Bilibili 视频 URL: {0}")]
    InvalidVideoId(String),
    #[error("播放信息格式错误: {0}")]
    Manifest(String),
    #[error("页面结构不符合预期: {0}")]
    PageStructure(String),
    #[error("选择无效: {0}")]
    Selection(String),
    #[error("音视频合并失败: {0}")]
    Mux(String),
    #[error("用户中断")]
    UserInterrupt,
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
