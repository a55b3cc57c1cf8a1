//! 应用编排 - 编排层
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件头、提取防伪令牌、构造所有组件
//! 2. **命令分派**：转换、列表、下载、删除、打包下载、单张编辑
//! 3. **并发下载**：全部下载时用 Semaphore 限制并发数，tokio::spawn 执行
//! 4. **统计输出**：下载成功 / 失败数量

use crate::clients::EditorClient;
use crate::config::Config;
use crate::models::{load_upload_file, load_upload_files, ConvertedAsset, OriginalImage, OutputFormat};
use crate::services::{
    AssetCommand, BatchSubmitter, ConsoleNotifier, ConvertedAssetBrowser, ImageEditor, Notifier,
};
use crate::utils::logging::{
    init_log_file, log_files_loaded, log_startup, print_asset_stats, truncate_text,
};
use crate::workflow::{ConvertCtx, ConvertFlow, FlowOutcome};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    browser: Arc<ConvertedAssetBrowser>,
    flow: ConvertFlow,
    editor: ImageEditor,
    runs: AtomicUsize,
}

/// 全部下载的统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadStats {
    pub listed: usize,
    pub downloaded: usize,
    pub failed: usize,
}

impl App {
    /// 初始化应用，提示输出到终端
    pub async fn initialize(config: Config) -> Result<Self> {
        let notifier = Arc::new(ConsoleNotifier::from_millis(config.toast_duration_ms));
        Self::initialize_with(config, notifier).await
    }

    /// 使用指定的提示接收端初始化应用
    pub async fn initialize_with(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config.base_url, config.max_files, config.max_file_size);

        // 防伪令牌只在启动时读取一次
        let mut client = EditorClient::new(&config)?;
        client
            .bootstrap_csrf_token(&config.csrf_page_path)
            .await
            .context("无法获取 CSRF 令牌")?;
        info!("✓ 已获取 CSRF 令牌");

        Ok(Self::from_parts(config, client, notifier))
    }

    /// 由已准备好的客户端构造全部组件
    pub fn from_parts(config: Config, client: EditorClient, notifier: Arc<dyn Notifier>) -> Self {
        let browser = Arc::new(ConvertedAssetBrowser::new(
            client.clone(),
            notifier.clone(),
            &config.download_dir,
        ));
        let flow = ConvertFlow::new(
            &config,
            BatchSubmitter::new(client.clone()),
            notifier.clone(),
            browser.clone(),
        );
        let editor = ImageEditor::new(client, notifier, &config.download_dir, config.max_file_size);

        Self {
            config,
            browser,
            flow,
            editor,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn browser(&self) -> &ConvertedAssetBrowser {
        &self.browser
    }

    /// 读取本地文件并执行一次批量转换
    pub async fn convert(
        &self,
        paths: &[PathBuf],
        output_format: OutputFormat,
        quality: Option<u8>,
    ) -> Result<FlowOutcome> {
        info!("\n📁 正在读取待转换的文件...");
        let files = load_upload_files(paths).await?;
        let total_bytes = files.iter().map(|f| f.size()).sum();
        log_files_loaded(files.len(), total_bytes, output_format.as_form_value());

        let run_index = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
        let ctx = ConvertCtx::new(run_index, output_format, quality);
        Ok(self.flow.run(&ctx, files).await?)
    }

    /// 拉取并返回已转换图片列表
    pub async fn list(&self) -> Result<Vec<ConvertedAsset>> {
        self.browser.init().await?;
        let assets = self.browser.assets();
        for asset in &assets {
            info!(
                "  • {} ({}) → {}",
                asset.name,
                asset.short_name,
                truncate_text(&asset.url, 80)
            );
        }
        if assets.is_empty() {
            warn!("⚠️ 还没有已转换的图片");
        }
        Ok(assets)
    }

    /// 下载一张已转换图片
    pub async fn download(&self, short_name: &str) -> Result<PathBuf> {
        self.browser.init().await?;
        Ok(self.browser.download(short_name).await?)
    }

    /// 删除一张已转换图片
    pub async fn delete(&self, short_name: &str) -> Result<String> {
        self.browser.init().await?;
        Ok(self.browser.delete(short_name).await?)
    }

    /// 打包下载全部已转换图片
    pub async fn download_zip(&self) -> Result<PathBuf> {
        Ok(self.browser.download_all_zip().await?)
    }

    /// 逐张下载全部已转换图片，各行之间互不影响
    ///
    /// 使用 Semaphore 限制同时进行的下载数量
    pub async fn download_all(&self) -> Result<DownloadStats> {
        self.browser.init().await?;

        let downloads: Vec<String> = self
            .browser
            .commands()
            .into_iter()
            .filter(|c| matches!(c, AssetCommand::Download { .. }))
            .map(|c| c.short_name().to_string())
            .collect();

        let mut stats = DownloadStats {
            listed: downloads.len(),
            ..Default::default()
        };

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_downloads));
        let mut handles = Vec::with_capacity(downloads.len());

        for short_name in downloads {
            let permit = semaphore.clone().acquire_owned().await?;
            let browser = self.browser.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                browser.download(&short_name).await.is_ok()
            }));
        }

        for result in join_all(handles).await {
            match result {
                Ok(true) => stats.downloaded += 1,
                Ok(false) => stats.failed += 1,
                Err(e) => {
                    error!("下载任务执行失败: {}", e);
                    stats.failed += 1;
                }
            }
        }

        print_asset_stats(stats.listed, stats.downloaded, stats.failed);
        Ok(stats)
    }

    /// 请服务端按 MIME 类型重新编码本地图片并下载
    pub async fn edit_download(&self, path: &Path, mime_type: &str) -> Result<PathBuf> {
        let file = load_upload_file(path).await?;
        Ok(self
            .editor
            .download_edited(file.bytes, &file.name, mime_type)
            .await?)
    }

    /// 保存本地图片为编辑结果
    pub async fn edit_save(&self, path: &Path) -> Result<()> {
        let file = load_upload_file(path).await?;
        Ok(self.editor.save_edited(file.bytes, &file.name).await?)
    }

    /// 取回原图并保存到下载目录
    pub async fn edit_original(&self) -> Result<PathBuf> {
        let OriginalImage { name, bytes, .. } = self.editor.get_original().await?;
        let name = name.unwrap_or_else(|| "original_image".to_string());
        let path = crate::services::asset_browser::save_blob(
            Path::new(&self.config.download_dir),
            &name,
            &bytes,
        )
        .await?;
        info!("✓ 原图已保存至: {}", path.display());
        Ok(path)
    }
}
