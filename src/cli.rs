// src/cli.rs

use clap::{Parser, ValueEnum, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// 下载即刻动态中的全部图片，保存到以动态标题命名的目录
#[derive(Parser, Debug, Clone)]
#[command(name = "jike-dl", version = crate_version!(), about, long_about = None)]
pub struct JikeCli {
    /// 即刻动态页面链接
    #[arg(value_name = "JIKE_URL")]
    pub url: String,
    /// 设置图片保存的根目录
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from("."))]
    pub output: PathBuf,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, hide = true)]
    pub log_level: LogLevel,
}

/// 下载 Bilibili 视频：选择清晰度，分别下载音视频流后用 ffmpeg 合并
#[derive(Parser, Debug, Clone)]
#[command(name = "bili-dl", version = crate_version!(), about, long_about = None)]
pub struct BiliCli {
    /// 视频链接；不提供时将在启动后交互式输入
    #[arg(long)]
    pub url: Option<String>,
    /// SESSDATA Cookie，优先级高于环境变量和配置文件
    #[arg(long)]
    pub sessdata: Option<String>,
    /// 设置文件保存目录
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from("."))]
    pub output: PathBuf,
    /// ffmpeg 可执行文件路径
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, hide = true)]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jike_cli_takes_single_positional_url() {
        let cli = JikeCli::try_parse_from(["jike-dl", "https://m.okjike.com/originalPosts/abc"]).unwrap();
        assert_eq!(cli.url, "https://m.okjike.com/originalPosts/abc");
        assert_eq!(cli.output, PathBuf::from("."));

        assert!(JikeCli::try_parse_from(["jike-dl"]).is_err());
        assert!(JikeCli::try_parse_from(["jike-dl", "a", "b"]).is_err());
    }

    #[test]
    fn test_bili_cli_url_is_optional() {
        let cli = BiliCli::try_parse_from(["bili-dl"]).unwrap();
        assert!(cli.url.is_none());
        assert_eq!(cli.log_level, LogLevel::Off);

        let cli = BiliCli::try_parse_from(["bili-dl", "--url", "https://www.bilibili.com/video/BV1xx", "--sessdata", "abc"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://www.bilibili.com/video/BV1xx"));
        assert_eq!(cli.sessdata.as_deref(), Some("abc"));
    }
}
