// src/downloader/mod.rs

mod candidate;
mod fetcher;
mod images;
mod job;
mod muxer;
mod negotiator;

pub use candidate::keep_largest;
pub use fetcher::{FetchOutcome, fetch_to_file};
pub use images::{ImageJob, ImageReport};
pub use job::VideoJob;
pub use muxer::{FfmpegMuxer, Muxer};
pub use negotiator::{
    QualityNegotiator, VariantChoice, organize_by_quality, resolve_tier_choice,
    resolve_variant_choice,
};
