// src/downloader/negotiator.rs

use crate::{
    constants::{self, bilibili as consts},
    error::*,
    models::{QualityTier, QualityTiers, SelectionResult, StreamVariant, api::PlayInfo},
    symbols,
    ui::{self, Prompter},
};
use colored::Colorize;
use itertools::Itertools;
use log::{debug, info, warn};

/// 视频流选择的解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantChoice {
    All,
    /// 从 0 开始的序号
    One(usize),
    Fallback,
}

/// 按清晰度标签对播放信息中的视频流分组。
///
/// 第 i 路视频流的清晰度 ID 在 `accept_quality` 中的位置决定它在
/// `accept_description` 中的标签；找不到时视为播放信息格式错误。
pub fn organize_by_quality(play_info: &PlayInfo) -> AppResult<QualityTiers> {
    let data = &play_info.data;
    let mut tiers = QualityTiers::default();
    for (i, video) in data.dash.video.iter().enumerate() {
        let position = data
            .accept_quality
            .iter()
            .position(|q| *q == video.id)
            .ok_or_else(|| {
                AppError::Manifest(format!("视频流的清晰度 ID {} 不在 accept_quality 中", video.id))
            })?;
        let label = data.accept_description.get(position).ok_or_else(|| {
            AppError::Manifest(format!("清晰度 ID {} 缺少对应的描述", video.id))
        })?;

        let resolution = match (video.width, video.height) {
            (Some(w), Some(h)) => format!("{}x{}", w, h),
            _ => "未知分辨率".to_string(),
        };
        tiers.push(
            label,
            StreamVariant {
                index: i + 1,
                resolution,
                frame_rate: video
                    .frame_rate
                    .clone()
                    .unwrap_or_else(|| consts::UNKNOWN_FRAME_RATE.to_string()),
                codecs: video
                    .codecs
                    .clone()
                    .unwrap_or_else(|| consts::UNKNOWN_CODECS.to_string()),
                url: video.base_url.clone(),
            },
        );
    }
    debug!("清晰度分组: [{}]", tiers.labels().join(", "));
    Ok(tiers)
}

/// 输入为 `[1, tier_count]` 内的整数时返回从 0 开始的序号，否则返回 `None`
pub fn resolve_tier_choice(input: &str, tier_count: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|k| (1..=tier_count).contains(k))
        .map(|k| k - 1)
}

/// "all"（不区分大小写）选择全部，范围内的整数选择对应一路，其余为回退
pub fn resolve_variant_choice(input: &str, variant_count: usize) -> VariantChoice {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return VariantChoice::All;
    }
    match input.parse::<usize>() {
        Ok(k) if (1..=variant_count).contains(&k) => VariantChoice::One(k - 1),
        _ => VariantChoice::Fallback,
    }
}

pub struct QualityNegotiator<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> QualityNegotiator<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }

    /// 列出清晰度并限时等待选择，无效输入回退到第一个清晰度
    pub async fn select_quality(&self, tiers: &QualityTiers) -> AppResult<SelectionResult> {
        if tiers.is_empty() {
            return Err(AppError::Manifest("播放信息中没有可用的视频流".to_string()));
        }

        ui::print_sub_header("可选的视频");
        for (i, label) in tiers.labels().enumerate() {
            println!("  [{}] 视频清晰度: {}", format!("{}", i + 1).yellow(), label);
        }

        let answer = self
            .prompter
            .ask(
                &format!("请输入所需视频清晰度的序号（默认为{}）", constants::DEFAULT_QUALITY_CHOICE),
                constants::CHOICE_TIMEOUT,
                constants::DEFAULT_QUALITY_CHOICE,
            )
            .await;

        let tier_index = resolve_tier_choice(&answer, tiers.len()).unwrap_or_else(|| {
            warn!("无效的清晰度选择 '{}'，回退到第 1 个", answer);
            println!("{} 无效的选择，将默认选择第 1 个视频清晰度", *symbols::WARN);
            0
        });
        let tier = tiers
            .get(tier_index)
            .cloned()
            .ok_or_else(|| AppError::Selection(format!("清晰度序号 {} 越界", tier_index + 1)))?;

        info!("已选择清晰度: {}", tier.label);
        for variant in &tier.variants {
            println!("  {}). - {}", variant.index, variant);
        }
        Ok(SelectionResult { tier_index, tier })
    }

    /// 在选定清晰度下选择要下载的视频流，返回 (从 1 开始的序号, 视频流)
    pub async fn select_variants(
        &self,
        tier: &QualityTier,
    ) -> AppResult<Vec<(usize, StreamVariant)>> {
        let answer = self
            .prompter
            .ask(
                &format!(
                    "请输入要下载的视频序号，输入 all 下载全部（默认为{}）",
                    constants::DEFAULT_VARIANT_CHOICE
                ),
                constants::CHOICE_TIMEOUT,
                constants::DEFAULT_VARIANT_CHOICE,
            )
            .await;

        let selected = match resolve_variant_choice(&answer, tier.variants.len()) {
            VariantChoice::All => tier
                .variants
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, v)| (i + 1, v))
                .collect(),
            VariantChoice::One(i) => vec![(i + 1, tier.variants[i].clone())],
            VariantChoice::Fallback => {
                let number = constants::FALLBACK_VARIANT_NUMBER;
                warn!("无效的视频流选择 '{}'，回退到第 {} 个", answer, number);
                println!("{} 无效的选择，将默认选择第 {} 个视频编码", *symbols::WARN, number);
                let variant = tier.variants.get(number - 1).cloned().ok_or_else(|| {
                    AppError::Selection(format!(
                        "清晰度 '{}' 只有 {} 路视频流，无法选择第 {} 路",
                        tier.label,
                        tier.variants.len(),
                        number
                    ))
                })?;
                vec![(number, variant)]
            }
        };
        debug!(
            "已选择视频流: {:?}",
            selected.iter().map(|(i, _)| i).collect::<Vec<_>>()
        );
        Ok(selected)
    }
}
