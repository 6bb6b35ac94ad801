// src/utils.rs

use crate::constants;
use regex::Regex;
use std::sync::LazyLock;

static ILLEGAL_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|\x00-\x1f]"#).unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const WINDOWS_RESERVED: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// 将页面标题等任意文本转换为可用作文件名或目录名的字符串（不含扩展名）
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = WHITESPACE_RE.replace_all(name.trim(), " ");
    let cleaned = ILLEGAL_CHARS_RE.replace_all(&cleaned, "_");
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if cleaned.is_empty() {
        return "unnamed".to_string();
    }

    let stem = cleaned.split('.').next().unwrap_or(cleaned).to_uppercase();
    let name = if WINDOWS_RESERVED.contains(&stem.as_str()) {
        format!("_{}", cleaned)
    } else {
        cleaned.to_string()
    };
    safe_truncate_utf8(&name, constants::MAX_FILENAME_BYTES).to_string()
}

fn safe_truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut i = max_bytes;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    &s[..i]
}

/// 按显示宽度截断文本（非 ASCII 字符按 2 计），超出时以 "..." 结尾
pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            return format!("{}...", &text[..i]);
        }
    }
    text.to_string()
}
