// src/bin/jike_dl.rs

use clap::{CommandFactory, FromArgMatches, error::ErrorKind};
use colored::*;
use mediagrab::{cli::JikeCli, logging::init_logger, run_jike};

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let cmd = JikeCli::command().after_help("示例:\n  jike-dl \"https://m.okjike.com/originalPosts/...\"");
    let matches = match cmd.try_get_matches() {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => exit_with_usage(e),
    };
    let args = JikeCli::from_arg_matches(&matches).unwrap_or_else(|e| exit_with_usage(e));
    init_logger(args.log_level);

    if let Err(e) = run_jike(args).await {
        eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}

/// 参数个数不正确时打印用法并以状态码 1 退出
fn exit_with_usage(e: clap::Error) -> ! {
    let _ = e.print();
    std::process::exit(1);
}
