// src/ui.rs

use crate::{
    constants,
    error::{AppError, AppResult},
    symbols,
};
use async_trait::async_trait;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::{
    io::{self, BufRead, Write},
    sync::{Arc, LazyLock},
    time::Duration,
};
use tokio::sync::{
    Mutex as TokioMutex,
    mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError},
};

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

pub fn info(message: &str) {
    println!("{} {}", *symbols::INFO, message);
}

pub fn warn(message: &str) {
    println!("{} {}", *symbols::WARN, message.yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {}", *symbols::ERROR, message.red());
}

pub fn new_bytes_progress_bar(total: Option<u64>, prefix: &str) -> ProgressBar {
    let pbar = match total {
        Some(len) => {
            let style = ProgressStyle::with_template(
                "{prefix:7.bold.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            )
            .expect("进度条模板无效")
            .progress_chars("#>-");
            ProgressBar::new(len).with_style(style)
        }
        None => {
            let style = ProgressStyle::with_template(
                "{prefix:7.bold.cyan} {spinner} [{elapsed_precise}] {bytes} ({bytes_per_sec})",
            )
            .expect("进度条模板无效");
            ProgressBar::new_spinner().with_style(style)
        }
    };
    pbar.set_prefix(prefix.to_string());
    pbar.enable_steady_tick(Duration::from_millis(100));
    pbar
}

pub fn new_tasks_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{prefix:7.bold.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}/{len:3} ({percent:>3}%) {msg}",
    )
    .expect("进度条模板无效")
    .progress_chars("#>-");
    let pbar = ProgressBar::new(total).with_style(style);
    pbar.set_prefix(prefix.to_string());
    pbar
}

/// 一次读取的结果
#[derive(Debug, PartialEq, Eq)]
pub enum LineRead {
    Line(String),
    TimedOut,
    Closed,
}

/// 控制台输入行的来源。
///
/// 标准输入由一个常驻后台线程逐行读取并送入通道，每次提示只在通道上等待，
/// 因此超时可以准时返回，也不会有多个线程争抢同一行输入。
/// 上一次提示超时后才到达的行会被丢弃，不会被后续提示读到。
pub struct LineSource {
    inner: TokioMutex<LineState>,
}

struct LineState {
    rx: UnboundedReceiver<String>,
    /// 上一次等待以超时结束
    timed_out: bool,
}

static STDIN_LINES: LazyLock<Arc<LineSource>> = LazyLock::new(|| {
    let (tx, source) = LineSource::channel();
    let spawned = std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || read_stdin_lines(tx));
    if let Err(e) = spawned {
        warn!("无法启动标准输入读取线程: {}", e);
    }
    Arc::new(source)
});

fn read_stdin_lines(tx: UnboundedSender<String>) {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                if tx.send(strip_line_ending(&line).to_string()).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("读取标准输入失败: {}", e);
                break;
            }
        }
    }
    debug!("标准输入读取线程退出");
}

pub(crate) fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

impl LineSource {
    pub fn new(rx: UnboundedReceiver<String>) -> Self {
        Self {
            inner: TokioMutex::new(LineState { rx, timed_out: false }),
        }
    }

    /// 创建一个由调用方喂入内容的输入源
    pub fn channel() -> (UnboundedSender<String>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx))
    }

    /// 进程级的标准输入源，首次调用时启动读取线程
    pub fn stdin() -> Arc<LineSource> {
        STDIN_LINES.clone()
    }

    /// 等待下一行输入。上一次等待超时的话，先丢弃其间积压的旧输入。
    pub async fn next_fresh_line(&self, timeout: Option<Duration>) -> LineRead {
        let mut state = self.inner.lock().await;
        if std::mem::take(&mut state.timed_out) {
            loop {
                match state.rx.try_recv() {
                    Ok(stale) => debug!("丢弃超时后才到达的输入: {:?}", stale),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return LineRead::Closed,
                }
            }
        }
        let received = match timeout {
            Some(limit) => match tokio::time::timeout(limit, state.rx.recv()).await {
                Ok(received) => received,
                Err(_) => {
                    state.timed_out = true;
                    return LineRead::TimedOut;
                }
            },
            None => state.rx.recv().await,
        };
        received.map_or(LineRead::Closed, LineRead::Line)
    }
}

/// 显示提示并在 `timeout` 内等待一行输入；超时或输入流关闭时返回 `default`
pub async fn prompt_with_timeout(
    source: &LineSource,
    message: &str,
    timeout: Duration,
    default: &str,
) -> String {
    print!("\n{} {}: ", *symbols::PROMPT, message);
    let _ = io::stdout().flush();
    match source.next_fresh_line(Some(timeout)).await {
        LineRead::Line(input) => input,
        LineRead::TimedOut | LineRead::Closed => {
            println!(
                "\n{} 无用户输入，将使用默认选择: {}",
                *symbols::TIMEOUT,
                default.yellow()
            );
            debug!("提示 '{}' 超时，使用默认值 '{}'", message, default);
            default.to_string()
        }
    }
}

/// 不限时地等待一行输入，返回去除首尾空白后的内容
pub async fn prompt(source: &LineSource, message: &str) -> AppResult<String> {
    print!("\n{} {} (按 {} 退出): ", *symbols::PROMPT, message, *symbols::CTRL_C);
    io::stdout().flush()?;
    match source.next_fresh_line(None).await {
        LineRead::Line(input) => Ok(input.trim().to_string()),
        LineRead::TimedOut | LineRead::Closed => Err(AppError::UserInterrupt),
    }
}

/// 交互式选择的抽象，便于用预设答案驱动选择逻辑
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn ask(&self, message: &str, timeout: Duration, default: &str) -> String;
}

pub struct ConsolePrompter {
    source: Arc<LineSource>,
}

impl ConsolePrompter {
    pub fn new(source: Arc<LineSource>) -> Self {
        Self { source }
    }

    pub fn stdin() -> Self {
        Self::new(LineSource::stdin())
    }

    pub fn source(&self) -> &LineSource {
        &self.source
    }
}

#[async_trait]
impl Prompter for ConsolePrompter {
    async fn ask(&self, message: &str, timeout: Duration, default: &str) -> String {
        prompt_with_timeout(&self.source, message, timeout, default).await
    }
}

/// 按顺序返回预设答案；答案用完后等同于超时，返回默认值
#[cfg(any(test, feature = "testing"))]
pub struct ScriptedPrompter {
    answers: std::sync::Mutex<std::collections::VecDeque<String>>,
}

#[cfg(any(test, feature = "testing"))]
impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: std::sync::Mutex::new(answers.into_iter().map(Into::into).collect()),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask(&self, _message: &str, _timeout: Duration, default: &str) -> String {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| default.to_string())
    }
}
