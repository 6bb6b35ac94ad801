// src/downloader/candidate.rs

use crate::error::*;
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// 在同一用途的多个已下载文件中保留体积最大的一个。
///
/// 先读取全部候选文件的大小（任一文件不存在即返回错误，不做任何改动），
/// 删除其余候选后把胜出者重命名为 `final_path`。大小相同时取输入顺序中靠前的。
pub fn keep_largest(candidates: &[PathBuf], final_path: &Path) -> AppResult<PathBuf> {
    let mut sized = Vec::with_capacity(candidates.len());
    for path in candidates {
        let size = fs::metadata(path)?.len();
        debug!("候选文件 {:?}: {} 字节", path, size);
        sized.push((path, size));
    }

    let (winner, winner_size) = sized
        .iter()
        .copied()
        .reduce(|best, current| if current.1 > best.1 { current } else { best })
        .ok_or_else(|| AppError::Selection("没有可供选择的候选文件".to_string()))?;

    for (path, _) in sized.iter().filter(|(path, _)| *path != winner) {
        fs::remove_file(path)?;
    }
    if winner.as_path() != final_path {
        fs::rename(winner, final_path)?;
    }
    info!(
        "保留最大的候选文件 {:?} ({} 字节) 为 {:?}",
        winner, winner_size, final_path
    );
    Ok(final_path.to_path_buf())
}
