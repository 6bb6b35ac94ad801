// src/extractor/mod.rs

pub mod bilibili;
pub mod jike;

use crate::error::{AppError, AppResult};
use scraper::{ElementRef, Selector};

/// 解析固定的 CSS 选择器
pub(crate) fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css)
        .map_err(|e| AppError::PageStructure(format!("无效的选择器 '{}': {}", css, e)))
}

/// 元素内全部文本拼接并去除首尾空白
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
