// src/extractor/jike.rs

use super::{element_text, selector};
use crate::{constants::jike as consts, error::AppResult, utils};
use log::{debug, warn};
use scraper::Html;
use url::Url;

/// 一条即刻动态中解析出的目录名与图片地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    pub title: String,
    pub image_urls: Vec<String>,
}

/// 解析动态页面。图片容器或任一标题元素缺失时返回 `None`。
///
/// 图片按文档顺序收集，跨容器连续编号；相对地址以 `page_url` 为基准补全。
pub fn parse_post(html: &str, page_url: &Url) -> AppResult<Option<PostPage>> {
    let document = Html::parse_document(html);

    let containers: Vec<_> = document
        .select(&selector(consts::IMAGE_CONTAINER_SELECTOR)?)
        .collect();
    let title = document.select(&selector(consts::TITLE_SELECTOR)?).next();
    let subtitle = document.select(&selector(consts::SUBTITLE_SELECTOR)?).next();

    let (Some(title), Some(subtitle)) = (title, subtitle) else {
        return Ok(None);
    };
    if containers.is_empty() {
        return Ok(None);
    }

    let img = selector("img")?;
    let mut image_urls = Vec::new();
    for container in containers {
        for image in container.select(&img) {
            let Some(src) = image.value().attr("src") else {
                warn!("跳过缺少 src 属性的图片元素");
                continue;
            };
            match page_url.join(src) {
                Ok(url) => image_urls.push(url.to_string()),
                Err(e) => warn!("跳过无法解析的图片地址 '{}': {}", src, e),
            }
        }
    }

    let folder = format!("{}_{}", element_text(title), element_text(subtitle));
    debug!("动态目录: '{}', 图片数量: {}", folder, image_urls.len());
    Ok(Some(PostPage {
        title: utils::sanitize_filename(&folder),
        image_urls,
    }))
}
