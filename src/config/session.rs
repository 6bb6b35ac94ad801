// src/config/session.rs

use crate::{
    config::ExternalConfig,
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(super) fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub(crate) fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    load_or_create_at(&get_config_path()?)
}

/// 读取指定位置的配置文件；不存在时写入一份默认配置
pub(crate) fn load_or_create_at(config_path: &Path) -> AppResult<ExternalConfig> {
    if config_path.is_file() {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let config = ExternalConfig::default_app_config();

        if let Some(dir) = config_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json_content = serde_json::to_string_pretty(&config)?;
        fs::write(config_path, json_content)?;

        Ok(config)
    }
}

/// 按 命令行参数 > 环境变量 > 配置文件 的顺序查找 SESSDATA，同时返回来源描述
pub fn resolve_sessdata(
    cli_value: Option<&str>,
    external: &ExternalConfig,
) -> (Option<String>, String) {
    if let Some(value) = cli_value
        && !value.is_empty()
    {
        debug!("使用来自命令行参数的 SESSDATA");
        return (Some(value.to_string()), "命令行参数".to_string());
    }
    if let Ok(value) = std::env::var(constants::SESSDATA_ENV)
        && !value.is_empty()
    {
        debug!("使用来自环境变量 {} 的 SESSDATA", constants::SESSDATA_ENV);
        return (
            Some(value),
            format!("环境变量 ({})", constants::SESSDATA_ENV),
        );
    }
    if let Some(value) = external.sessdata.as_ref()
        && !value.is_empty()
    {
        debug!("使用来自本地配置文件的 SESSDATA");
        return (Some(value.clone()), "本地配置文件".to_string());
    }
    debug!("未在任何位置找到可用的 SESSDATA");
    (None, "未找到".to_string())
}
