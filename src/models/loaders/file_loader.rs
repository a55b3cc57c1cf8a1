use crate::error::{AppError, AppResult, FileError};
use crate::models::upload::UploadFile;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从磁盘读取一个待上传文件
pub async fn load_upload_file(path: &Path) -> AppResult<UploadFile> {
    if !path.exists() {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FileError::InvalidName {
            name: path.display().to_string(),
        })?
        .to_string();

    let bytes = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    tracing::debug!("已读取文件 {} ({} 字节)", name, bytes.len());

    Ok(UploadFile::new(name, bytes))
}

/// 按给定顺序读取多个文件；任何一个失败则整体失败
pub async fn load_upload_files(paths: &[PathBuf]) -> AppResult<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        files.push(load_upload_file(path).await?);
    }
    Ok(files)
}
