/// 日志工具模块
///
/// 提供运行日志文件和启动/统计信息输出的辅助函数
use crate::error::{AppError, AppResult};
use std::fs;
use tracing::info;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n图片转换日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(base_url: &str, max_files: usize, max_file_size: u64) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 图片批量转换客户端");
    info!("🌐 服务地址: {}", base_url);
    info!("📊 每批最多 {} 个文件，单个文件不超过 {} 字节", max_files, max_file_size);
    info!("{}", "=".repeat(60));
}

/// 记录待上传文件信息
///
/// # 参数
/// - `total`: 文件数量
/// - `total_bytes`: 总字节数
/// - `format`: 输出格式
pub fn log_files_loaded(total: usize, total_bytes: u64, format: &str) {
    info!("✓ 找到 {} 个待转换的文件，共 {} 字节", total, total_bytes);
    info!("📋 输出格式: {}", format);
}

/// 打印已转换图片统计
pub fn print_asset_stats(listed: usize, downloaded: usize, failed: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📁 列表中的图片: {}", listed);
    info!("✅ 下载成功: {}", downloaded);
    info!("❌ 下载失败: {}", failed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
