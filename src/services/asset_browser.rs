//! 已转换图片列表服务 - 业务能力层
//!
//! 负责已转换图片的列表、逐张下载、删除和打包下载。
//! 列表始终从服务端重新获取，不做跨刷新缓存。

use crate::clients::{endpoints, EditorClient};
use crate::error::{AppError, AppResult, BrowserError, FileError};
use crate::models::{
    AssetRow, ConvertedAsset, ConvertedAssetList, DeleteRequest, DeleteResponse, RowState,
    ZipResponse,
};
use crate::services::notifier::Notifier;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

pub const DOWNLOADED_MESSAGE: &str = "Converted image has been downloaded";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Failed to download converted image";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete converted image";
pub const ZIP_DOWNLOADED_MESSAGE: &str = "Zip with converted images has been downloaded";
pub const ZIP_FAILED_MESSAGE: &str = "Failed to download zip with converted images";
pub const LIST_FAILED_MESSAGE: &str = "Failed to fetch the converted image";
/// 打包下载的保存文件名
pub const ZIP_FILE_NAME: &str = "webpeditor_converted_images.zip";

/// 针对某一行的操作，由外部界面层绑定到按钮等控件上
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetCommand {
    Download { short_name: String },
    Delete { short_name: String },
}

impl AssetCommand {
    pub fn short_name(&self) -> &str {
        match self {
            AssetCommand::Download { short_name } | AssetCommand::Delete { short_name } => {
                short_name
            }
        }
    }
}

/// 操作结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// 已下载到本地路径
    Downloaded(PathBuf),
    /// 已删除，附带服务端返回的消息
    Deleted(String),
}

/// 已转换图片列表服务
///
/// 职责：
/// - 初始化时拉取一次列表
/// - 每行提供下载 / 删除操作，同一行同时只允许一个操作
/// - 删除最后一行后从服务端刷新列表
pub struct ConvertedAssetBrowser {
    client: EditorClient,
    notifier: Arc<dyn Notifier>,
    download_dir: PathBuf,
    /// None 表示尚未加载
    rows: Mutex<Option<Vec<AssetRow>>>,
}

impl ConvertedAssetBrowser {
    pub fn new(
        client: EditorClient,
        notifier: Arc<dyn Notifier>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            notifier,
            download_dir: download_dir.into(),
            rows: Mutex::new(None),
        }
    }

    /// 初始化：拉取已转换图片列表，失败时提示用户
    pub async fn init(&self) -> AppResult<usize> {
        self.refresh().await.map_err(|e| {
            self.notifier.notify(LIST_FAILED_MESSAGE, false);
            e
        })
    }

    /// 从服务端重新获取列表并替换本地的行
    ///
    /// 转换和删除之后调用；失败只记录日志，不提示
    pub async fn refresh(&self) -> AppResult<usize> {
        debug!("正在获取已转换图片列表...");
        let list: ConvertedAssetList = match self.client.get_json(endpoints::LIST_CONVERTED).await {
            Ok(list) => list,
            Err(e) => {
                error!("获取已转换图片列表失败: {}", e);
                return Err(e);
            }
        };

        let count = list.converted_images.len();
        *self.lock_rows() = Some(list.converted_images.into_iter().map(AssetRow::new).collect());
        info!("✓ 已转换图片列表: {} 张", count);
        Ok(count)
    }

    /// 当前所有行
    pub fn rows(&self) -> Vec<AssetRow> {
        self.lock_rows().clone().unwrap_or_default()
    }

    /// 当前列表中的图片
    pub fn assets(&self) -> Vec<ConvertedAsset> {
        self.rows().into_iter().map(|row| row.asset).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_rows().as_ref().map_or(true, Vec::is_empty)
    }

    /// 为每个空闲的行生成下载和删除操作
    pub fn commands(&self) -> Vec<AssetCommand> {
        self.rows()
            .into_iter()
            .filter(|row| row.state == RowState::Listed)
            .flat_map(|row| {
                let short_name = row.asset.short_name;
                [
                    AssetCommand::Download {
                        short_name: short_name.clone(),
                    },
                    AssetCommand::Delete { short_name },
                ]
            })
            .collect()
    }

    /// 执行一个操作
    pub async fn execute(&self, command: &AssetCommand) -> AppResult<CommandOutcome> {
        match command {
            AssetCommand::Download { short_name } => {
                self.download(short_name).await.map(CommandOutcome::Downloaded)
            }
            AssetCommand::Delete { short_name } => {
                self.delete(short_name).await.map(CommandOutcome::Deleted)
            }
        }
    }

    /// 下载一张图片，按显示名称保存到下载目录
    ///
    /// 行状态：Listed → Downloading → Listed
    pub async fn download(&self, short_name: &str) -> AppResult<PathBuf> {
        let asset = self.begin(short_name, RowState::Downloading)?;
        info!("⬇️ 正在下载 {}...", asset.name);

        let result = self.fetch_and_save(&asset.url, &asset.name).await;
        self.set_state(short_name, RowState::Listed);

        match result {
            Ok(path) => {
                self.notifier.notify(DOWNLOADED_MESSAGE, true);
                Ok(path)
            }
            Err(e) => {
                error!("下载 {} 失败: {}", asset.name, e);
                self.notifier.notify(DOWNLOAD_FAILED_MESSAGE, false);
                Err(e)
            }
        }
    }

    /// 删除一张图片
    ///
    /// 行状态：Listed → Deleting → Removed；失败时回到 Listed。
    /// 删除后列表为空时从服务端刷新。
    pub async fn delete(&self, short_name: &str) -> AppResult<String> {
        let asset = self.begin(short_name, RowState::Deleting)?;
        info!("🗑️ 正在删除 {}...", asset.name);

        let request = DeleteRequest {
            public_id: &asset.public_id,
        };
        let response: AppResult<DeleteResponse> = self
            .client
            .post_json(endpoints::DELETE_CONVERTED, &request)
            .await;

        match response {
            Ok(DeleteResponse { message }) => {
                let remaining = self.remove_row(short_name);
                self.notifier.notify(&message, true);
                info!("✓ 已删除 {}，剩余 {} 张", asset.name, remaining);

                if remaining == 0 {
                    if let Err(e) = self.refresh().await {
                        warn!("删除后刷新列表失败: {}", e);
                    }
                }
                Ok(message)
            }
            Err(e) => {
                self.set_state(short_name, RowState::Listed);
                error!("删除 {} 失败: {}", asset.name, e);
                self.notifier.notify(DELETE_FAILED_MESSAGE, false);
                Err(e)
            }
        }
    }

    /// 打包下载全部已转换图片
    pub async fn download_all_zip(&self) -> AppResult<PathBuf> {
        info!("📦 正在获取打包下载地址...");
        let result = async {
            let zip: ZipResponse = self
                .client
                .get_json(endpoints::DOWNLOAD_ALL_CONVERTED)
                .await?;
            self.fetch_and_save(&zip.zip_url, ZIP_FILE_NAME).await
        }
        .await;

        match result {
            Ok(path) => {
                self.notifier.notify(ZIP_DOWNLOADED_MESSAGE, true);
                Ok(path)
            }
            Err(e) => {
                error!("打包下载失败: {}", e);
                self.notifier.notify(ZIP_FAILED_MESSAGE, false);
                Err(e)
            }
        }
    }

    async fn fetch_and_save(&self, url: &str, name: &str) -> AppResult<PathBuf> {
        let bytes = self.client.fetch_bytes(url).await?;
        save_blob(&self.download_dir, name, &bytes).await
    }

    fn lock_rows(&self) -> MutexGuard<'_, Option<Vec<AssetRow>>> {
        // 锁内不会 panic，中毒时直接取回数据
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 把空闲的行切换到 `next` 状态，返回对应的图片
    fn begin(&self, short_name: &str, next: RowState) -> Result<ConvertedAsset, BrowserError> {
        let mut guard = self.lock_rows();
        let rows = guard.as_mut().ok_or(BrowserError::NotInitialized)?;
        let row = rows
            .iter_mut()
            .find(|row| row.asset.short_name == short_name)
            .ok_or_else(|| BrowserError::UnknownAsset {
                short_name: short_name.to_string(),
            })?;

        if row.state != RowState::Listed {
            warn!("图片 {} 正处于 {} 状态", short_name, row.state);
            return Err(BrowserError::RowBusy {
                short_name: short_name.to_string(),
                state: row.state.to_string(),
            });
        }

        row.state = next;
        Ok(row.asset.clone())
    }

    fn set_state(&self, short_name: &str, state: RowState) {
        if let Some(rows) = self.lock_rows().as_mut() {
            if let Some(row) = rows.iter_mut().find(|row| row.asset.short_name == short_name) {
                row.state = state;
            }
        }
    }

    /// 移除一行，返回剩余行数
    fn remove_row(&self, short_name: &str) -> usize {
        let mut guard = self.lock_rows();
        match guard.as_mut() {
            Some(rows) => {
                rows.retain(|row| row.asset.short_name != short_name);
                rows.len()
            }
            None => 0,
        }
    }
}

/// 把下载内容保存到目录中，文件名只保留最后一段
pub async fn save_blob(dir: &Path, name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
    let file_name = Path::new(name)
        .file_name()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| FileError::InvalidName {
            name: name.to_string(),
        })?;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;

    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    debug!("已保存 {} ({} 字节)", path.display(), bytes.len());
    Ok(path)
}
