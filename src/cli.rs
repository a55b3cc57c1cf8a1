use crate::models::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "webpeditor",
    about = "批量上传、转换并下载图片",
    long_about = "图片编辑器后端的命令行客户端。\n服务地址、令牌和限制从 webpeditor.toml 或 WEBPEDITOR_* 环境变量读取。",
    arg_required_else_help = true
)]
pub struct Cli {
    /// 显示详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 上传并转换一批图片
    Convert {
        /// 待转换的文件
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// 输出格式（jpeg / bmp / tiff / webp / png / gif / ico）
        #[arg(short, long)]
        format: OutputFormat,
        /// 质量（5-100），不指定时由服务端决定
        #[arg(short, long)]
        quality: Option<u8>,
    },
    /// 列出已转换的图片
    List,
    /// 下载一张已转换的图片
    Download {
        /// 图片短名称
        short_name: String,
    },
    /// 下载全部已转换的图片
    DownloadAll {
        /// 下载服务端打包好的 ZIP
        #[arg(long)]
        zip: bool,
    },
    /// 删除一张已转换的图片
    Delete {
        /// 图片短名称
        short_name: String,
    },
    /// 单张图片编辑操作
    #[command(subcommand)]
    Edit(EditCommand),
}

#[derive(Subcommand, Debug)]
pub enum EditCommand {
    /// 由服务端按 MIME 类型重新编码后下载
    Download {
        file: PathBuf,
        #[arg(long)]
        mime: String,
    },
    /// 保存为编辑结果
    Save { file: PathBuf },
    /// 取回原图
    Original,
}
