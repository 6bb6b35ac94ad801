// src/bin/bili_dl.rs

use clap::Parser;
use colored::*;
use mediagrab::{cli::BiliCli, logging::init_logger, run_bili};
use std::time::Duration;

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户强制中断程序。", "[!]".yellow());
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    let args = BiliCli::parse();
    init_logger(args.log_level);

    if let Err(e) = run_bili(args).await {
        eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
