// src/models/api.rs

use serde::Deserialize;

// --- window.__playinfo__ 结构 ---

#[derive(Deserialize, Debug, Clone)]
pub struct PlayInfo {
    pub data: PlayData,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlayData {
    /// 与 `accept_description` 按位置一一对应的清晰度 ID
    pub accept_quality: Vec<u32>,
    pub accept_description: Vec<String>,
    pub dash: Dash,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Dash {
    #[serde(default)]
    pub video: Vec<DashStream>,
    #[serde(default)]
    pub audio: Vec<DashStream>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DashStream {
    pub id: u32,
    pub base_url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub frame_rate: Option<String>,
    #[serde(default)]
    pub codecs: Option<String>,
}
