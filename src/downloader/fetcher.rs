// src/downloader/fetcher.rs

use crate::{config::RetryPolicy, error::*, ui};
use futures::StreamExt;
use log::{debug, error, info, warn};
use reqwest::StatusCode;
use std::path::Path;
use tokio::{fs::File, io::AsyncWriteExt};

/// 一次带重试的下载的最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 响应体已完整写入目标文件
    Completed { bytes: u64 },
    /// 服务器返回非 2xx 状态码，不会重试
    HttpStatus(StatusCode),
    /// 每次尝试都遇到网络层错误
    Exhausted { attempts: u32 },
}

impl FetchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, FetchOutcome::Completed { .. })
    }
}

/// 以流的方式把 `url` 的响应体写入 `destination`，并显示字节进度。
///
/// 只有网络层错误（连接失败、超时、读取响应体中断）才会按 `policy` 重试，
/// 非 2xx 状态码直接返回 `HttpStatus`。每次尝试都会截断重写目标文件，
/// 失败尝试留下的部分内容不会被清理。本地 I/O 错误直接返回 `Err`。
pub async fn fetch_to_file(
    client: &reqwest::Client,
    url: &str,
    destination: &Path,
    policy: RetryPolicy,
    label: &str,
) -> AppResult<FetchOutcome> {
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        debug!("下载 '{}' -> {:?} (第 {}/{} 次尝试)", url, destination, attempt, attempts);
        match fetch_once(client, url, destination, label).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) if is_transport_error(&e) => {
                warn!("下载 '{}' 第 {} 次尝试失败: {}", url, attempt, e);
                ui::error(&format!("文件下载失败: {}", e));
                if attempt < attempts {
                    ui::info(&format!("重试下载，尝试次数: {}", attempt + 1));
                    tokio::time::sleep(policy.delay).await;
                }
            }
            Err(e) => return Err(e),
        }
    }
    error!("下载 '{}' 达到最大重试次数 ({})", url, attempts);
    ui::error(&format!("达到最大重试次数 ({})，放弃下载。", attempts));
    Ok(FetchOutcome::Exhausted { attempts })
}

fn is_transport_error(error: &AppError) -> bool {
    matches!(error, AppError::Network(e) if !e.is_builder())
}

async fn fetch_once(
    client: &reqwest::Client,
    url: &str,
    destination: &Path,
    label: &str,
) -> AppResult<FetchOutcome> {
    let res = client.get(url).send().await?;
    let status = res.status();
    if !status.is_success() {
        warn!("下载 '{}' 返回状态码 {}", url, status);
        ui::error(&format!("文件下载失败。状态码: {}", status));
        return Ok(FetchOutcome::HttpStatus(status));
    }

    let file_name = destination
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    ui::info(&format!("文件名称：{}", file_name));

    let total = res.content_length();
    let mut file = File::create(destination).await?;
    let pbar = ui::new_bytes_progress_bar(total, label);
    let mut stream = res.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                pbar.abandon();
                return Err(e.into());
            }
        };
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        pbar.inc(chunk.len() as u64);
    }
    file.flush().await?;
    pbar.finish_and_clear();

    info!("'{}' 下载完成，共 {} 字节", file_name, written);
    Ok(FetchOutcome::Completed { bytes: written })
}
