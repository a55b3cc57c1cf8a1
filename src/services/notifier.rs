//! 结果提示服务 - 业务能力层
//!
//! 只负责"把一条消息展示给用户"，不读取也不修改任何应用状态

use std::io::Write;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// 提示显示时长下限
pub const MIN_TOAST_DURATION: Duration = Duration::from_secs(3);
/// 提示显示时长上限
pub const MAX_TOAST_DURATION: Duration = Duration::from_secs(5);

/// 一条会自动消失的提示
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub success: bool,
    pub duration: Duration,
    pub created_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, success: bool, duration: Duration) -> Self {
        Self {
            message: message.into(),
            success,
            duration: clamp_duration(duration),
            created_at: Instant::now(),
        }
    }

    /// 是否已经超过显示时长
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= self.duration
    }
}

/// 将显示时长限制在 3–5 秒之间
pub fn clamp_duration(duration: Duration) -> Duration {
    duration.clamp(MIN_TOAST_DURATION, MAX_TOAST_DURATION)
}

/// 提示接收端
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, success: bool);
}

/// 终端提示
///
/// 成功为绿色 ✅，失败为红色 ❌，同时写入 tracing 日志
pub struct ConsoleNotifier {
    duration: Duration,
}

impl ConsoleNotifier {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration: clamp_duration(duration),
        }
    }

    /// 按配置中的毫秒数创建
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// 渲染为一行带颜色的文本，末尾附显示时长
    fn render(toast: &Toast) -> String {
        let secs = toast.duration.as_secs_f32();
        if toast.success {
            format!("\x1b[32m✅ {} ({:.0}s)\x1b[0m", toast.message, secs)
        } else {
            format!("\x1b[31m❌ {} ({:.0}s)\x1b[0m", toast.message, secs)
        }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new(MIN_TOAST_DURATION)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, success: bool) {
        let toast = Toast::new(message, success, self.duration);
        if success {
            info!("✓ {}", toast.message);
        } else {
            error!("✗ {}", toast.message);
        }

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{}", Self::render(&toast));
    }
}

/// 内存提示记录
///
/// 保存所有提示，供嵌入方展示或测试检查
#[derive(Default)]
pub struct MemoryNotifier {
    duration: Option<Duration>,
    toasts: Mutex<Vec<Toast>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            duration: Some(duration),
            toasts: Mutex::new(Vec::new()),
        }
    }

    /// 所有提示（包括已过期的）
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// 当前仍在显示时长内的提示
    pub fn visible(&self, now: Instant) -> Vec<Toast> {
        self.toasts()
            .into_iter()
            .filter(|t| !t.is_expired(now))
            .collect()
    }

    /// 所有提示的 (消息, 是否成功)
    pub fn messages(&self) -> Vec<(String, bool)> {
        self.toasts()
            .into_iter()
            .map(|t| (t.message, t.success))
            .collect()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts().pop()
    }

    pub fn success_count(&self) -> usize {
        self.toasts().iter().filter(|t| t.success).count()
    }

    pub fn failure_count(&self) -> usize {
        self.toasts().iter().filter(|t| !t.success).count()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str, success: bool) {
        let toast = Toast::new(message, success, self.duration.unwrap_or(MIN_TOAST_DURATION));
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.push(toast);
        }
    }
}
