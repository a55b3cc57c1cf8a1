//! 批量转换流程 - 流程层
//!
//! 核心职责：定义"一次批量转换"的完整处理流程
//!
//! 流程顺序：
//! 1. 校验（数量 / 大小 / 质量）→ 不通过则提示并放弃，不发请求
//! 2. 提交 multipart 请求
//! 3. 按结果提示成功或失败
//! 4. 刷新已转换图片列表

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ValidationError};
use crate::models::{ConversionResult, UploadFile};
use crate::services::{
    BatchSubmitter, ConvertedAssetBrowser, Notifier, UploadLimits, UploadValidator,
};
use crate::workflow::convert_ctx::ConvertCtx;

/// 已有提交在进行时的提示
pub const IN_FLIGHT_MESSAGE: &str = "Error, a conversion is already in progress";

/// 一次转换流程的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// 校验未通过，没有发出请求
    Rejected(ValidationError),
    /// 服务端转换成功
    Converted(ConversionResult),
    /// 请求失败或服务端返回错误
    Failed(ConversionResult),
}

impl FlowOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FlowOutcome::Converted(_))
    }

    /// 展示给用户的消息
    pub fn message(&self) -> String {
        match self {
            FlowOutcome::Rejected(e) => e.user_message(),
            FlowOutcome::Converted(r) | FlowOutcome::Failed(r) => r.message.clone(),
        }
    }
}

/// 批量转换流程
///
/// - 编排 校验 → 提交 → 提示 → 刷新
/// - 同一时间只允许一个提交在进行
/// - 不直接处理 HTTP，只依赖业务能力（services）
pub struct ConvertFlow {
    validator: UploadValidator,
    submitter: BatchSubmitter,
    notifier: Arc<dyn Notifier>,
    browser: Arc<ConvertedAssetBrowser>,
    in_flight: Mutex<()>,
}

impl ConvertFlow {
    pub fn new(
        config: &Config,
        submitter: BatchSubmitter,
        notifier: Arc<dyn Notifier>,
        browser: Arc<ConvertedAssetBrowser>,
    ) -> Self {
        Self {
            validator: UploadValidator::new(UploadLimits::from(config)),
            submitter,
            notifier,
            browser,
            in_flight: Mutex::new(()),
        }
    }

    pub async fn run(&self, ctx: &ConvertCtx, files: Vec<UploadFile>) -> AppResult<FlowOutcome> {
        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("{} ⚠️ 上一次提交尚未完成，忽略本次提交", ctx);
                self.notifier.notify(IN_FLIGHT_MESSAGE, false);
                return Err(AppError::SubmissionInFlight);
            }
        };

        info!("{} 🔍 正在校验 {} 个文件...", ctx, files.len());

        // ========== 步骤 1: 校验 ==========
        let batch = match self.validator.validate(files, ctx.output_format, ctx.quality) {
            Ok(batch) => batch,
            Err(e) => {
                warn!("{} ⚠️ 校验未通过: {}", ctx, e);
                self.notifier.notify(&e.user_message(), false);
                return Ok(FlowOutcome::Rejected(e));
            }
        };

        // ========== 步骤 2: 提交 ==========
        let result = self.submitter.submit(batch).await;

        // ========== 步骤 3: 提示 ==========
        self.notifier.notify(&result.message, result.is_success());

        // ========== 步骤 4: 刷新 ==========
        // 成功时列表有了新图片；失败时同样刷新以重置状态
        match self.browser.refresh().await {
            Ok(count) => info!("{} ✓ 列表已刷新，共 {} 张", ctx, count),
            Err(e) => warn!("{} ⚠️ 刷新列表失败: {}", ctx, e),
        }

        if result.is_success() {
            info!("{} ✓ 转换成功", ctx);
            Ok(FlowOutcome::Converted(result))
        } else {
            warn!("{} ⚠️ 转换失败: {}", ctx, result.message);
            Ok(FlowOutcome::Failed(result))
        }
    }
}
