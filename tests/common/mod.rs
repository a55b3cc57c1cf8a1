#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use webpeditor_client::{Config, ConvertedAssetBrowser, EditorClient, MemoryNotifier, UploadFile};

pub const TOKEN: &str = "test-token";

/// 指向 mock 服务器的配置，下载目录和日志文件放在临时目录
pub fn test_config(base_url: String, dir: &Path) -> Config {
    Config {
        base_url,
        csrf_token: Some(TOKEN.to_string()),
        request_timeout_secs: 10,
        download_dir: dir.join("downloads").to_string_lossy().to_string(),
        output_log_file: dir.join("output.txt").to_string_lossy().to_string(),
        ..Config::default()
    }
}

pub fn test_client(config: &Config) -> EditorClient {
    EditorClient::new(config).expect("创建客户端失败")
}

pub fn test_browser(config: &Config, notifier: Arc<MemoryNotifier>) -> Arc<ConvertedAssetBrowser> {
    Arc::new(ConvertedAssetBrowser::new(
        test_client(config),
        notifier,
        &config.download_dir,
    ))
}

pub fn file_of(name: &str, size: usize) -> UploadFile {
    UploadFile::new(name, vec![b'x'; size])
}

/// 列表接口的响应体
pub fn asset_list_json(entries: &[(&str, &str)]) -> String {
    let items: Vec<serde_json::Value> = entries
        .iter()
        .map(|(short, url)| {
            serde_json::json!([
                url,
                format!("{short}.webp"),
                format!("user/converted/{short}"),
                short
            ])
        })
        .collect();
    serde_json::json!({ "converted_images": items }).to_string()
}
