//! # webpeditor client
//!
//! 图片编辑器后端的批量上传 / 转换 / 下载客户端
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有 HTTP 客户端，只暴露请求能力
//! - `EditorClient` - 地址拼接、防伪令牌请求头、状态码检查
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `UploadValidator` - 数量 / 大小 / 质量校验
//! - `BatchSubmitter` - multipart 提交并解读状态码
//! - `Notifier` - 自动消失的成功 / 失败提示
//! - `ConvertedAssetBrowser` - 已转换图片的列表、下载、删除
//! - `ImageEditor` - 单张图片的下载、保存、取回原图
//!
//! ### ③ 流程层（Workflow）
//! - `ConvertFlow` - 校验 → 提交 → 提示 → 刷新
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 读取一次配置和令牌，构造组件并分派命令

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::EditorClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ConversionResult, ConvertedAsset, OutputFormat, UploadBatch, UploadFile};
pub use orchestrator::App;
pub use services::{
    AssetCommand, BatchSubmitter, ConsoleNotifier, ConvertedAssetBrowser, ImageEditor,
    MemoryNotifier, Notifier, UploadValidator,
};
pub use workflow::{ConvertCtx, ConvertFlow, FlowOutcome};
