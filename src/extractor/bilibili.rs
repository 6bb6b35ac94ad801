// src/extractor/bilibili.rs

use super::{element_text, selector};
use crate::{
    client::RobustClient,
    constants::bilibili as consts,
    error::*,
    models::api::PlayInfo,
    ui, utils,
};
use log::{debug, info, warn};
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/video/([a-zA-Z0-9]+)").unwrap());
static PLAYINFO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<script>window\.__playinfo__=(.*?)</script>").unwrap());
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"title="(.*?)" class="video-title""#).unwrap());

/// 视频页面的原始 HTML 与其中嵌入的播放信息
#[derive(Debug)]
pub struct VideoPage {
    pub html: String,
    pub play_info: Option<PlayInfo>,
}

/// 从视频链接中提取 BV/av 号
pub fn extract_video_id(url: &str) -> AppResult<String> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| AppError::InvalidVideoId(url.to_string()))
}

pub fn video_page_url(base_url: &str, video_id: &str) -> String {
    format!("{}/video/{}", base_url.trim_end_matches('/'), video_id)
}

/// 解析页面中的 `window.__playinfo__`；找不到标记时返回 `None`
pub fn parse_play_info(html: &str) -> AppResult<Option<PlayInfo>> {
    let Some(raw) = PLAYINFO_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return Ok(None);
    };
    let play_info = serde_json::from_str(raw)
        .map_err(|e| AppError::Manifest(format!("播放信息 JSON 解析失败: {}", e)))?;
    Ok(Some(play_info))
}

/// 获取视频页面并解析播放信息。
///
/// 网络请求失败或返回非 2xx 时只打印错误，返回不含播放信息的页面。
pub async fn fetch_video_page(
    client: &RobustClient,
    base_url: &str,
    video_id: &str,
) -> AppResult<VideoPage> {
    let url = video_page_url(base_url, video_id);
    info!("获取视频页面: {}", url);
    let html = match download_page(client, &url).await {
        Ok(html) => html,
        Err(e @ (AppError::Network(_) | AppError::NetworkMiddleware(_))) => {
            warn!("获取页面 {} 失败: {}", url, e);
            ui::error(&format!("视频页面获取失败: {}", e));
            return Ok(VideoPage {
                html: String::new(),
                play_info: None,
            });
        }
        Err(e) => return Err(e),
    };
    let play_info = parse_play_info(&html)?;
    if play_info.is_none() {
        warn!("页面 {} 中未找到播放信息", url);
    }
    Ok(VideoPage { html, play_info })
}

async fn download_page(client: &RobustClient, url: &str) -> AppResult<String> {
    let res = client.get(url).await?.error_for_status()?;
    Ok(res.text().await?)
}

/// 生成 `<UP主>_<标题>_<清晰度>` 形式的文件名主干
pub fn build_title(html: &str, quality_label: &str) -> AppResult<String> {
    let document = Html::parse_document(html);
    let up_name = document
        .select(&selector("a.up-name")?)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| consts::UNKNOWN_UPLOADER.to_string());

    let title = TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| consts::UNKNOWN_TITLE.to_string());

    debug!("UP主: '{}', 标题: '{}', 清晰度: '{}'", up_name, title, quality_label);
    Ok(utils::sanitize_filename(&format!(
        "{}_{}_{}",
        up_name, title, quality_label
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
<script>window.__playinfo__={"data":{"accept_quality":[80,64],"accept_description":["高清 1080P","高清 720P"],"dash":{"video":[{"id":80,"base_url":"https://cdn/v1.m4s","width":1920,"height":1080,"frame_rate":"30.000","codecs":"avc1.640032"}],"audio":[{"id":30280,"base_url":"https://cdn/a.m4s"}]}}}</script>
</head><body>
<h1 title="测试视频" class="video-title">测试视频</h1>
<div class="up-info"><a href="//space.bilibili.com/1" class="up-name">
   某UP主
</a></div>
</body></html>"#;

    #[test]
    fn test_extract_video_id() {
        assert_eq!(
            extract_video_id("https://www.bilibili.com/video/BV1GJ411x7h7/?spm_id_from=333").unwrap(),
            "BV1GJ411x7h7"
        );
        assert!(matches!(
            extract_video_id("https://www.bilibili.com/bangumi/play/ep1"),
            Err(AppError::InvalidVideoId(_))
        ));
    }

    #[test]
    fn test_parse_play_info() {
        let info = parse_play_info(PAGE).unwrap().expect("应当找到播放信息");
        assert_eq!(info.data.accept_quality, vec![80, 64]);
        assert_eq!(info.data.dash.video.len(), 1);
        assert_eq!(info.data.dash.video[0].frame_rate.as_deref(), Some("30.000"));
        assert_eq!(info.data.dash.audio[0].base_url, "https://cdn/a.m4s");
        assert!(info.data.dash.audio[0].width.is_none());
    }

    #[test]
    fn test_parse_play_info_missing_marker_and_bad_json() {
        assert!(parse_play_info("<html></html>").unwrap().is_none());
        let broken = "<script>window.__playinfo__={\"data\":</script>";
        assert!(matches!(parse_play_info(broken), Err(AppError::Manifest(_))));
    }

    #[test]
    fn test_build_title() {
        assert_eq!(build_title(PAGE, "高清 720P").unwrap(), "某UP主_测试视频_高清 720P");
        assert_eq!(
            build_title("<html></html>", "1080P").unwrap(),
            "未知上传者_video_1080P"
        );
    }

    #[test]
    fn test_video_page_url() {
        assert_eq!(
            video_page_url("https://www.bilibili.com/", "BV1xx"),
            "https://www.bilibili.com/video/BV1xx"
        );
    }
}
