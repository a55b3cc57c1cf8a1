//! 单张图片编辑服务 - 业务能力层
//!
//! 编辑器中的三个操作：下载编辑结果、保存编辑结果、取回原图

use crate::clients::{endpoints, EditorClient};
use crate::error::{AppError, AppResult, ValidationError};
use crate::models::OriginalImage;
use crate::services::asset_browser::save_blob;
use crate::services::notifier::Notifier;
use reqwest::multipart::{Form, Part};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

pub const DOWNLOAD_TOO_LARGE_MESSAGE: &str = "Failed to download. Image size cannot be more than 6 MB";
pub const DOWNLOADED_MESSAGE: &str = "Image has been downloaded";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Error: image cannot be saved";
pub const SAVE_TOO_LARGE_MESSAGE: &str = "Image size should not exceed 6 MB";
pub const SAVED_MESSAGE: &str = "Image has been saved successfully";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save image";
pub const ORIGINAL_LOADED_MESSAGE: &str = "Original image is loaded";
pub const ORIGINAL_FAILED_MESSAGE: &str = "Failed to open the original image";

/// 原图名称所在的响应头
pub const IMAGE_NAME_HEADER: &str = "X-Image-Name";

/// 单张图片编辑服务
pub struct ImageEditor {
    client: EditorClient,
    notifier: Arc<dyn Notifier>,
    download_dir: PathBuf,
    max_file_size: u64,
}

impl ImageEditor {
    pub fn new(
        client: EditorClient,
        notifier: Arc<dyn Notifier>,
        download_dir: impl Into<PathBuf>,
        max_file_size: u64,
    ) -> Self {
        Self {
            client,
            notifier,
            download_dir: download_dir.into(),
            max_file_size,
        }
    }

    fn check_size(&self, name: &str, bytes: &[u8]) -> Result<(), ValidationError> {
        let size = bytes.len() as u64;
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                name: name.to_string(),
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// 把编辑后的图片交给服务端按指定 MIME 类型重新编码，并保存返回的文件
    pub async fn download_edited(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> AppResult<PathBuf> {
        if let Err(e) = self.check_size(file_name, &bytes) {
            self.notifier.notify(DOWNLOAD_TOO_LARGE_MESSAGE, false);
            return Err(e.into());
        }

        info!("⬇️ 正在下载编辑后的图片 {}...", file_name);
        let result = async {
            let part = Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str(mime_type)
                .map_err(|e| AppError::api_request_failed(endpoints::IMAGE_DOWNLOAD, e))?;
            let form = Form::new()
                .part("image_file", part)
                .text("mime_type", mime_type.to_string());

            let response = self
                .client
                .post_multipart(endpoints::IMAGE_DOWNLOAD, form)
                .await?;
            let response = EditorClient::ensure_success(endpoints::IMAGE_DOWNLOAD, response).await?;
            let converted = EditorClient::read_bytes(endpoints::IMAGE_DOWNLOAD, response).await?;
            save_blob(&self.download_dir, file_name, &converted).await
        }
        .await;

        match result {
            Ok(path) => {
                self.notifier.notify(DOWNLOADED_MESSAGE, true);
                Ok(path)
            }
            Err(e) => {
                error!("下载编辑后的图片失败: {}", e);
                self.notifier.notify(DOWNLOAD_FAILED_MESSAGE, false);
                Err(e)
            }
        }
    }

    /// 保存编辑后的图片到服务端
    pub async fn save_edited(&self, bytes: Vec<u8>, file_name: &str) -> AppResult<()> {
        if let Err(e) = self.check_size(file_name, &bytes) {
            self.notifier.notify(SAVE_TOO_LARGE_MESSAGE, false);
            return Err(e.into());
        }

        info!("💾 正在保存编辑后的图片 {}...", file_name);
        let mime_type = crate::models::guess_mime_type(file_name);
        let result = async {
            let part = Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str(mime_type)
                .map_err(|e| AppError::api_request_failed(endpoints::IMAGE_SAVE, e))?;
            let form = Form::new().part("edited_image", part);
            let response = self
                .client
                .post_multipart(endpoints::IMAGE_SAVE, form)
                .await?;
            EditorClient::ensure_success(endpoints::IMAGE_SAVE, response).await?;
            Ok::<(), AppError>(())
        }
        .await;

        match result {
            Ok(()) => {
                self.notifier.notify(SAVED_MESSAGE, true);
                Ok(())
            }
            Err(e) => {
                error!("保存编辑后的图片失败: {}", e);
                self.notifier.notify(SAVE_FAILED_MESSAGE, false);
                Err(e)
            }
        }
    }

    /// 取回原图
    pub async fn get_original(&self) -> AppResult<OriginalImage> {
        info!("🖼️ 正在取回原图...");
        match self.client.get_bytes(endpoints::IMAGE_GET_ORIGINAL).await {
            Ok((headers, bytes)) => {
                let header_str = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string)
                };
                let image = OriginalImage {
                    name: header_str(IMAGE_NAME_HEADER),
                    mime_type: header_str("content-type"),
                    bytes,
                };
                self.notifier.notify(ORIGINAL_LOADED_MESSAGE, true);
                Ok(image)
            }
            Err(e) => {
                error!("取回原图失败: {}", e);
                self.notifier.notify(ORIGINAL_FAILED_MESSAGE, false);
                Err(e)
            }
        }
    }
}
