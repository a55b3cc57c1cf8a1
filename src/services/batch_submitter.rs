//! 批量提交服务 - 业务能力层
//!
//! 只负责"把一批文件发给转换接口并解读响应"，不负责提示和刷新

use crate::clients::{endpoints, EditorClient};
use crate::error::AppError;
use crate::models::{ConversionResult, UploadBatch};
use reqwest::multipart::{Form, Part};
use tracing::{debug, error, info, warn};

/// 转换成功的提示
pub const CONVERTED_MESSAGE: &str = "Image(s) has been converted";
/// 服务端返回 400/500 时的提示
pub const OVERSIZED_RESULT_MESSAGE: &str =
    "Error: After converting image(s), one or more file has size more than 6 MB";
/// 请求未能送达时的提示
pub const TRANSPORT_FAILED_MESSAGE: &str = "Error: conversion request failed";

/// 批量提交服务
///
/// 职责：
/// - 把 UploadBatch 序列化为 multipart 表单
/// - 发送到转换接口，附带防伪令牌
/// - 按状态码得出 ConversionResult
/// - 不重试
pub struct BatchSubmitter {
    client: EditorClient,
}

impl BatchSubmitter {
    pub fn new(client: EditorClient) -> Self {
        Self { client }
    }

    /// 构建 multipart 表单
    ///
    /// 字段：`images_to_convert`（每个文件一个）、`output_format`、可选的 `quality`
    /// 批次按值传入，文件内容直接移交给表单
    pub fn build_form(batch: UploadBatch) -> Result<Form, AppError> {
        let UploadBatch {
            files,
            output_format,
            quality,
        } = batch;

        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes)
                .file_name(file.name)
                .mime_str(&file.mime_type)
                .map_err(|e| AppError::api_request_failed(endpoints::IMAGE_CONVERT, e))?;
            form = form.part("images_to_convert", part);
        }
        form = form.text("output_format", output_format.as_form_value());
        if let Some(quality) = quality {
            form = form.text("quality", quality.to_string());
        }
        Ok(form)
    }

    /// 判断状态码是否表示转换失败
    ///
    /// 只有 2xx 视为成功；400 与 500 是服务端明确的失败码
    pub fn is_failure_status(status: u16) -> bool {
        !(200..300).contains(&status)
    }

    /// 提交一批文件
    pub async fn submit(&self, batch: UploadBatch) -> ConversionResult {
        info!(
            "📤 正在上传 {} 个文件 ({} 字节)，输出格式 {}...",
            batch.len(),
            batch.total_bytes(),
            batch.output_format()
        );

        let form = match Self::build_form(batch) {
            Ok(form) => form,
            Err(e) => {
                error!("构建上传表单失败: {}", e);
                return ConversionResult::error(TRANSPORT_FAILED_MESSAGE);
            }
        };

        let response = match self
            .client
            .post_multipart(endpoints::IMAGE_CONVERT, form)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("转换请求失败: {}", e);
                return ConversionResult::error(TRANSPORT_FAILED_MESSAGE);
            }
        };

        let status = response.status().as_u16();
        if Self::is_failure_status(status) {
            warn!("⚠️ 转换失败: HTTP {}", status);
            let message = if status == 400 || status == 500 {
                OVERSIZED_RESULT_MESSAGE.to_string()
            } else {
                format!("Error: conversion failed with HTTP status {}", status)
            };
            return ConversionResult::error(message);
        }

        // 成功时响应体只当作不透明数据读完
        match EditorClient::read_bytes(endpoints::IMAGE_CONVERT, response).await {
            Ok(body) => {
                debug!("转换响应体 {} 字节", body.len());
                info!("✓ 转换完成");
                ConversionResult::success(CONVERTED_MESSAGE)
            }
            Err(e) => {
                error!("读取转换响应失败: {}", e);
                ConversionResult::error(TRANSPORT_FAILED_MESSAGE)
            }
        }
    }
}
