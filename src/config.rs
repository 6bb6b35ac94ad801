// src/config.rs

pub mod session;

use self::session::{load_or_create_external_config, resolve_sessdata};
use crate::{
    cli::{BiliCli, JikeCli},
    constants,
    error::AppResult,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessdata: Option<String>,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bilibili_base_url: Option<String>,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        Self {
            sessdata: None,
            network: NetworkConfig {
                connect_timeout_secs: Some(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
                timeout_secs: Some(constants::DEFAULT_TIMEOUT_SECS),
                max_retries: Some(constants::DEFAULT_MAX_RETRIES),
                retry_delay_secs: Some(constants::DEFAULT_RETRY_DELAY_SECS),
            },
            ffmpeg_path: None,
            bilibili_base_url: None,
        }
    }
}

/// 单个文件下载的重试策略：总尝试次数与两次尝试之间的固定间隔
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: constants::DEFAULT_MAX_RETRIES,
            delay: Duration::from_secs(constants::DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub user_agent: String,
    pub referer: Option<String>,
    /// 以 Cookie 头发送的会话凭据
    pub cookie: Option<String>,
    pub connect_timeout: Duration,
    /// 页面请求的整体超时；流式下载中只作为两次读取之间的停滞超时
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry: RetryPolicy,
    pub output_dir: PathBuf,
    pub ffmpeg_path: PathBuf,
    pub bilibili_base_url: String,
}

impl AppConfig {
    /// 即刻图片下载：不需要 Referer 和 Cookie
    pub fn for_jike(args: &JikeCli) -> AppResult<Self> {
        let external = load_or_create_external_config()?;
        Ok(Self::from_external(&external, args.output.clone()))
    }

    /// Bilibili 视频下载：合并配置文件、环境变量与命令行参数
    pub fn for_bili(args: &BiliCli) -> AppResult<Self> {
        let external = load_or_create_external_config()?;
        let mut config = Self::from_external(&external, args.output.clone());

        let (sessdata, source) = resolve_sessdata(args.sessdata.as_deref(), &external);
        match sessdata {
            Some(value) => {
                info!("从 {} 加载 SESSDATA", source);
                config.cookie = Some(format!("{}={}", constants::bilibili::SESSION_COOKIE, value));
            }
            None => info!("未找到 SESSDATA，将以游客身份访问"),
        }
        config.referer = Some(constants::bilibili::REFERER.to_string());
        if let Some(path) = &args.ffmpeg {
            config.ffmpeg_path = path.clone();
        }
        Ok(config)
    }

    pub(crate) fn from_external(external: &ExternalConfig, output_dir: PathBuf) -> Self {
        let network = &external.network;
        let max_retries = network.max_retries.unwrap_or(constants::DEFAULT_MAX_RETRIES);
        Self {
            user_agent: constants::USER_AGENT.into(),
            referer: None,
            cookie: None,
            connect_timeout: Duration::from_secs(
                network
                    .connect_timeout_secs
                    .unwrap_or(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
            timeout: Duration::from_secs(
                network.timeout_secs.unwrap_or(constants::DEFAULT_TIMEOUT_SECS),
            ),
            max_retries,
            retry: RetryPolicy {
                max_attempts: max_retries.max(1),
                delay: Duration::from_secs(
                    network
                        .retry_delay_secs
                        .unwrap_or(constants::DEFAULT_RETRY_DELAY_SECS),
                ),
            },
            output_dir,
            ffmpeg_path: external
                .ffmpeg_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(constants::DEFAULT_FFMPEG)),
            bilibili_base_url: external
                .bilibili_base_url
                .clone()
                .unwrap_or_else(|| constants::bilibili::BASE_URL.to_string()),
        }
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: "test-agent/1.0".to_string(),
            referer: None,
            cookie: None,
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 3,
            retry: RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(50),
            },
            output_dir: PathBuf::from("."),
            ffmpeg_path: PathBuf::from(constants::DEFAULT_FFMPEG),
            bilibili_base_url: constants::bilibili::BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_external_applies_defaults() {
        let config = AppConfig::from_external(&ExternalConfig::default(), PathBuf::from("out"));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.bilibili_base_url, "https://www.bilibili.com");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.cookie.is_none());
    }

    #[test]
    fn test_from_external_zero_retries_still_attempts_once() {
        let external = ExternalConfig {
            network: NetworkConfig {
                max_retries: Some(0),
                retry_delay_secs: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        let config = AppConfig::from_external(&external, PathBuf::from("."));
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.retry.delay, Duration::from_secs(5));
    }
}
