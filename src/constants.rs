// src/constants.rs

use std::time::Duration;

pub const UI_WIDTH: usize = 88;
pub const FILENAME_TRUNCATE_LENGTH: usize = 60;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/87.0.4280.66 Safari/537.36";
pub const SESSDATA_ENV: &str = "BILI_SESSDATA";

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// 交互选择的等待时长
pub const CHOICE_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_QUALITY_CHOICE: &str = "1";
pub const DEFAULT_VARIANT_CHOICE: &str = "2";
pub const FALLBACK_VARIANT_NUMBER: usize = 2;

pub mod bilibili {
    pub const BASE_URL: &str = "https://www.bilibili.com";
    pub const REFERER: &str = "https://www.bilibili.com";
    pub const SESSION_COOKIE: &str = "SESSDATA";
    pub const UNKNOWN_UPLOADER: &str = "未知上传者";
    pub const UNKNOWN_TITLE: &str = "video";
    pub const UNKNOWN_FRAME_RATE: &str = "未知帧率";
    pub const UNKNOWN_CODECS: &str = "未知编码";
    pub const VIDEO_EXT: &str = "mp4";
    pub const AUDIO_EXT: &str = "mp3";
    pub const MUXED_SUFFIX: &str = "_muxed";
}

pub mod jike {
    pub const IMAGE_CONTAINER_SELECTOR: &str =
        "div.jsx-1271604522.wrap, div.jsx-1271604522.wrap.single";
    pub const TITLE_SELECTOR: &str = "div.jsx-3802438259.title";
    pub const SUBTITLE_SELECTOR: &str = "div.jsx-3930310120.wrap";
    pub const IMAGE_EXT: &str = "jpg";
}
