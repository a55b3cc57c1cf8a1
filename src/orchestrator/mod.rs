//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是引导层与组件之间的唯一连接点：
//! - 读取一次配置和防伪令牌
//! - 构造 EditorClient、Notifier、各个服务和转换流程
//! - 把用户命令分派给对应组件
//! - 输出运行统计
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (命令分派)
//!     ↓
//! workflow::ConvertFlow (校验 → 提交 → 提示 → 刷新)
//!     ↓
//! services (能力层：validator / submitter / notifier / browser / editor)
//!     ↓
//! clients (基础设施：EditorClient)
//! ```

pub mod app;

pub use app::{App, DownloadStats};
