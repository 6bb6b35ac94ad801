// tests/video_job_test.rs

use async_trait::async_trait;
use mediagrab::DownloadJobContext;
use mediagrab::config::AppConfig;
use mediagrab::downloader::{Muxer, VideoJob};
use mediagrab::error::{AppError, AppResult};
use mediagrab::ui::ScriptedPrompter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::{TempDir, tempdir};

/// 把视频和音频内容拼接写入输出文件，并记录调用参数
#[derive(Default)]
struct ConcatMuxer {
    calls: Mutex<Vec<(PathBuf, PathBuf, PathBuf)>>,
}

#[async_trait]
impl Muxer for ConcatMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> AppResult<()> {
        let mut content = std::fs::read(video)?;
        content.extend(std::fs::read(audio)?);
        std::fs::write(output, content)?;
        self.calls
            .lock()
            .unwrap()
            .push((video.to_path_buf(), audio.to_path_buf(), output.to_path_buf()));
        Ok(())
    }
}

struct FailingMuxer;

#[async_trait]
impl Muxer for FailingMuxer {
    async fn mux(&self, _video: &Path, _audio: &Path, _output: &Path) -> AppResult<()> {
        Err(AppError::Mux("ffmpeg 返回非零退出码".into()))
    }
}

fn video_page(base: &str) -> String {
    page_with(serde_json::json!({
        "code": 0,
        "data": {
            "accept_quality": [80, 64],
            "accept_description": ["高清 1080P", "高清 720P"],
            "dash": {
                "video": [
                    { "id": 80, "base_url": format!("{base}/v1.m4s"), "width": 1920, "height": 1080, "frame_rate": "30", "codecs": "avc1.640032" },
                    { "id": 64, "base_url": format!("{base}/v2.m4s"), "width": 1280, "height": 720, "frame_rate": "30", "codecs": "avc1.64001F" },
                    { "id": 64, "base_url": format!("{base}/v3.m4s"), "width": 1280, "height": 720, "frame_rate": "30", "codecs": "hev1.1.6.L120.90" }
                ],
                "audio": [
                    { "id": 30280, "base_url": format!("{base}/a1.m4s"), "codecs": "mp4a.40.2" }
                ]
            }
        }
    }))
}

/// 第一个清晰度下有两路视频流
fn two_variant_first_tier_page(base: &str) -> String {
    page_with(serde_json::json!({
        "data": {
            "accept_quality": [64, 32],
            "accept_description": ["高清 720P", "清晰 480P"],
            "dash": {
                "video": [
                    { "id": 64, "base_url": format!("{base}/h264.m4s"), "width": 1280, "height": 720 },
                    { "id": 64, "base_url": format!("{base}/hevc.m4s"), "width": 1280, "height": 720 },
                    { "id": 32, "base_url": format!("{base}/480.m4s"), "width": 852, "height": 480 }
                ],
                "audio": [ { "id": 30216, "base_url": format!("{base}/a1.m4s") } ]
            }
        }
    }))
}

fn page_with(play_info: serde_json::Value) -> String {
    format!(
        r#"<html><head><title>测试</title></head><body>
        <h1 title="周末 vlog" class="video-title">周末 vlog</h1>
        <a class="up-name" href="//space.bilibili.com/1"> 某UP </a>
        <script>window.__playinfo__={}</script>
        </body></html>"#,
        play_info
    )
}

fn context_for(server: &mockito::Server, out: &TempDir) -> DownloadJobContext {
    let config = AppConfig {
        bilibili_base_url: server.url(),
        output_dir: out.path().to_path_buf(),
        ..AppConfig::default()
    };
    DownloadJobContext::new(config).unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test(flavor = "multi_thread")]
async fn test_video_job_keeps_largest_variant_and_muxes() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    server
        .mock("GET", "/video/BV1test")
        .with_body(video_page(&base))
        .create_async()
        .await;
    let v1 = server.mock("GET", "/v1.m4s").expect(0).create_async().await;
    server.mock("GET", "/v2.m4s").with_body("small-720").create_async().await;
    server
        .mock("GET", "/v3.m4s")
        .with_body("the-larger-720p-stream")
        .create_async()
        .await;
    server.mock("GET", "/a1.m4s").with_body("|audio").create_async().await;

    let out = tempdir().unwrap();
    let muxer = Arc::new(ConcatMuxer::default());
    let job = VideoJob::new(
        context_for(&server, &out),
        Arc::new(ScriptedPrompter::new(["2", "all"])),
        muxer.clone(),
    );

    let final_path = job
        .run("https://www.bilibili.com/video/BV1test?p=1")
        .await
        .unwrap()
        .expect("playinfo present");

    assert_eq!(
        final_path.file_name().unwrap().to_string_lossy(),
        "某UP_周末 vlog_高清 720P.mp4"
    );
    assert_eq!(
        std::fs::read_to_string(&final_path).unwrap(),
        "the-larger-720p-stream|audio"
    );
    assert_eq!(file_names(out.path()), vec!["某UP_周末 vlog_高清 720P.mp4"]);

    let calls = muxer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1.to_string_lossy().ends_with(".mp3"));
    assert!(calls[0].2.to_string_lossy().ends_with("_muxed.mp4"));
    v1.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_video_job_default_variant_out_of_range_is_selection_error() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    server
        .mock("GET", "/video/BV1test")
        .with_body(video_page(&base))
        .create_async()
        .await;
    server.mock("GET", "/v1.m4s").with_body("1080p").create_async().await;
    server.mock("GET", "/a1.m4s").with_body("+a").create_async().await;

    let out = tempdir().unwrap();
    // 1080P 只有一个视频流，默认的 "2" 号不存在
    let job = VideoJob::new(
        context_for(&server, &out),
        Arc::new(ScriptedPrompter::new(Vec::<String>::new())),
        Arc::new(ConcatMuxer::default()),
    );
    let result = job.run("https://www.bilibili.com/video/BV1test").await;
    assert!(matches!(result, Err(AppError::Selection(_))), "{:?}", result);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_video_job_single_variant_choice() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    server
        .mock("GET", "/video/BV1test")
        .with_body(video_page(&base))
        .create_async()
        .await;
    let v2 = server.mock("GET", "/v2.m4s").expect(0).create_async().await;
    server.mock("GET", "/v3.m4s").with_body("hevc").create_async().await;
    server.mock("GET", "/a1.m4s").with_body("+a").create_async().await;

    let out = tempdir().unwrap();
    let job = VideoJob::new(
        context_for(&server, &out),
        Arc::new(ScriptedPrompter::new(["2", " 2 "])),
        Arc::new(ConcatMuxer::default()),
    );
    let final_path = job
        .run("https://www.bilibili.com/video/BV1test")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(std::fs::read_to_string(final_path).unwrap(), "hevc+a");
    v2.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_video_job_without_playinfo_returns_none() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/video/BV1none")
        .with_body("<html><body>页面已失效</body></html>")
        .create_async()
        .await;

    let out = tempdir().unwrap();
    let job = VideoJob::new(
        context_for(&server, &out),
        Arc::new(ScriptedPrompter::new(["1", "1"])),
        Arc::new(ConcatMuxer::default()),
    );
    let result = job.run("https://www.bilibili.com/video/BV1none").await.unwrap();
    assert!(result.is_none());
    assert!(file_names(out.path()).is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_video_job_rejects_url_without_video_id() {
    let server = mockito::Server::new_async().await;
    let out = tempdir().unwrap();
    let job = VideoJob::new(
        context_for(&server, &out),
        Arc::new(ScriptedPrompter::new(["1"])),
        Arc::new(ConcatMuxer::default()),
    );
    let result = job.run("https://www.bilibili.com/bangumi/play/ep1").await;
    assert!(matches!(result, Err(AppError::InvalidVideoId(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_video_job_mux_failure_keeps_intermediate_files() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    server
        .mock("GET", "/video/BV1test")
        .with_body(video_page(&base))
        .create_async()
        .await;
    server.mock("GET", "/v1.m4s").with_body("1080p").create_async().await;
    server.mock("GET", "/a1.m4s").with_body("+a").create_async().await;

    let out = tempdir().unwrap();
    let job = VideoJob::new(
        context_for(&server, &out),
        Arc::new(ScriptedPrompter::new(["1", "1"])),
        Arc::new(FailingMuxer),
    );
    let result = job.run("https://www.bilibili.com/video/BV1test").await;
    assert!(matches!(result, Err(AppError::Mux(_))));
    assert_eq!(
        file_names(out.path()),
        vec!["某UP_周末 vlog_高清 1080P.mp3", "某UP_周末 vlog_高清 1080P.mp4"]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_video_job_defaults_pick_first_tier_and_second_variant() {
    let mut server = mockito::Server::new_async().await;
    let base = server.url();
    server
        .mock("GET", "/video/BV1two")
        .with_body(two_variant_first_tier_page(&base))
        .create_async()
        .await;
    let h264 = server.mock("GET", "/h264.m4s").expect(0).create_async().await;
    let p480 = server.mock("GET", "/480.m4s").expect(0).create_async().await;
    server.mock("GET", "/hevc.m4s").with_body("hevc-720").create_async().await;
    server.mock("GET", "/a1.m4s").with_body("+a").create_async().await;

    let out = tempdir().unwrap();
    // 没有任何回答，两次选择都走默认值
    let job = VideoJob::new(
        context_for(&server, &out),
        Arc::new(ScriptedPrompter::new(Vec::<String>::new())),
        Arc::new(ConcatMuxer::default()),
    );
    let final_path = job
        .run("https://www.bilibili.com/video/BV1two")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        final_path.file_name().unwrap().to_string_lossy(),
        "某UP_周末 vlog_高清 720P.mp4"
    );
    assert_eq!(std::fs::read_to_string(final_path).unwrap(), "hevc-720+a");
    h264.assert_async().await;
    p480.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_video_job_page_error_status_returns_none() {
    let mut server = mockito::Server::new_async().await;
    let page = server
        .mock("GET", "/video/BV1gone")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let out = tempdir().unwrap();
    let job = VideoJob::new(
        context_for(&server, &out),
        Arc::new(ScriptedPrompter::new(["1", "1"])),
        Arc::new(ConcatMuxer::default()),
    );
    let result = job.run("https://www.bilibili.com/video/BV1gone").await.unwrap();
    assert!(result.is_none());
    assert!(file_names(out.path()).is_empty());
    page.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_video_job_unreachable_page_returns_none() {
    let out = tempdir().unwrap();
    let config = AppConfig {
        bilibili_base_url: "http://127.0.0.1:9".to_string(),
        output_dir: out.path().to_path_buf(),
        max_retries: 0,
        ..AppConfig::default()
    };
    let job = VideoJob::new(
        DownloadJobContext::new(config).unwrap(),
        Arc::new(ScriptedPrompter::new(["1", "1"])),
        Arc::new(ConcatMuxer::default()),
    );
    let result = job.run("https://www.bilibili.com/video/BV1xx").await.unwrap();
    assert!(result.is_none());
}
