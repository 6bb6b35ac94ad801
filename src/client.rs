// src/client.rs

use crate::{config::AppConfig, error::*};
use anyhow::anyhow;
use log::debug;
use reqwest::{
    Response,
    header::{self, HeaderMap, HeaderValue},
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
    RetryTransientMiddleware, Retryable, RetryableStrategy, default_on_request_failure,
    policies::ExponentialBackoff,
};
use url::Url;

/// 只重试传输层失败；收到任何响应（包括 5xx、429）都直接交给调用方
struct TransportOnly;

impl RetryableStrategy for TransportOnly {
    fn handle(&self, res: &Result<Response, reqwest_middleware::Error>) -> Option<Retryable> {
        match res {
            Ok(_) => None,
            Err(error) => default_on_request_failure(error),
        }
    }
}

/// 带默认请求头的 HTTP 客户端。
///
/// 页面与图片请求经过重试中间件，受整体超时限制；大文件下载使用 `raw()` 拿到的裸客户端，
/// 只有连接超时和读取停滞超时，由 `downloader::fetcher` 自己控制重试。
#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    raw: reqwest::Client,
}

impl RobustClient {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        // 流式下载可能持续很久，只限制两次读取之间的间隔
        let raw = base_builder(config)?.read_timeout(config.timeout).build()?;
        let pages = base_builder(config)?.timeout(config.timeout).build()?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(pages)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                TransportOnly,
            ))
            .build();

        Ok(Self { client, raw })
    }

    /// 发送 GET 请求。非 2xx 状态码不视为错误，由调用方检查并报告。
    pub async fn get(&self, url: &str) -> AppResult<Response> {
        let url = Url::parse(url)?;
        debug!("GET {}", url);
        Ok(self.client.get(url).send().await?)
    }

    pub fn raw(&self) -> &reqwest::Client {
        &self.raw
    }
}

fn base_builder(config: &AppConfig) -> AppResult<reqwest::ClientBuilder> {
    Ok(reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(default_headers(config)?)
        .connect_timeout(config.connect_timeout))
}

fn default_headers(config: &AppConfig) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(referer) = &config.referer {
        headers.insert(header::REFERER, header_value(referer)?);
    }
    if let Some(cookie) = &config.cookie {
        let mut value = header_value(cookie)?;
        value.set_sensitive(true);
        headers.insert(header::COOKIE, value);
    }
    Ok(headers)
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Other(anyhow!("无效的请求头内容 '{}': {}", value, e)))
}
