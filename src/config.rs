use crate::error::{AppResult, ConfigError, FileError};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "webpeditor.toml";

/// 程序配置
///
/// 启动时由引导层读取一次，之后以引用方式传给各个组件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端服务地址
    pub base_url: String,
    /// 防伪令牌，未配置时从页面中提取
    pub csrf_token: Option<String>,
    /// 用于提取防伪令牌的页面路径
    pub csrf_page_path: String,
    /// 每批最多上传的文件数
    pub max_files: usize,
    /// 单个文件大小上限（字节）
    pub max_file_size: u64,
    /// 提示消息显示时长（毫秒）
    pub toast_duration_ms: u64,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 下载文件保存目录
    pub download_dir: String,
    /// 同时下载的最大数量
    pub max_concurrent_downloads: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            csrf_token: None,
            csrf_page_path: "/image_converter/".to_string(),
            max_files: 15,
            max_file_size: 6_000_000,
            toast_duration_ms: 3000,
            request_timeout_secs: 60,
            download_dir: "downloads".to_string(),
            max_concurrent_downloads: 4,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（如果存在）→ 环境变量
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("WEBPEDITOR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        if Path::new(&path).exists() {
            Self::from_toml_file(&path)?.with_env_overrides()
        } else {
            Self::from_env()
        }
    }

    /// 只从环境变量加载（其余使用默认值）
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，缺失的字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::AppError::file_read_failed(path.display().to_string(), e))?;
        let config: Config = toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env_overrides(self) -> AppResult<Self> {
        let config = Self {
            base_url: std::env::var("WEBPEDITOR_BASE_URL").unwrap_or(self.base_url),
            csrf_token: std::env::var("WEBPEDITOR_CSRF_TOKEN").ok().or(self.csrf_token),
            csrf_page_path: std::env::var("WEBPEDITOR_CSRF_PAGE").unwrap_or(self.csrf_page_path),
            max_files: env_parse("WEBPEDITOR_MAX_FILES", "usize")?.unwrap_or(self.max_files),
            max_file_size: env_parse("WEBPEDITOR_MAX_FILE_SIZE", "u64")?.unwrap_or(self.max_file_size),
            toast_duration_ms: env_parse("WEBPEDITOR_TOAST_DURATION_MS", "u64")?.unwrap_or(self.toast_duration_ms),
            request_timeout_secs: env_parse("WEBPEDITOR_REQUEST_TIMEOUT", "u64")?.unwrap_or(self.request_timeout_secs),
            download_dir: std::env::var("WEBPEDITOR_DOWNLOAD_DIR").unwrap_or(self.download_dir),
            max_concurrent_downloads: env_parse("WEBPEDITOR_MAX_CONCURRENT_DOWNLOADS", "usize")?
                .unwrap_or(self.max_concurrent_downloads),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        };
        config.validate()?;
        Ok(config)
    }

    /// 检查配置是否合法
    pub fn validate(&self) -> AppResult<()> {
        if self.max_files == 0 {
            return Err(invalid("max_files", "必须大于 0"));
        }
        if self.max_file_size == 0 {
            return Err(invalid("max_file_size", "必须大于 0"));
        }
        if self.max_concurrent_downloads == 0 {
            return Err(invalid("max_concurrent_downloads", "必须大于 0"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(invalid("base_url", "必须以 http:// 或 https:// 开头"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::AppError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// 读取并解析环境变量；变量不存在时返回 None，解析失败时报错
fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
