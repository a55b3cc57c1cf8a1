use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 上传前校验失败
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 已转换图片列表错误
    #[error("列表错误: {0}")]
    Browser(#[from] BrowserError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 已有一个转换请求在进行中
    #[error("已有转换请求正在进行，请等待其完成")]
    SubmissionInFlight,
}

/// 上传校验错误
///
/// `Display` 的内容即为展示给用户的提示文本
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 没有选择文件
    #[error("Error, no files selected")]
    NoFiles,
    /// 文件数量超出上限
    #[error("Error, number of files to upload should not exceed {max}")]
    TooManyFiles { count: usize, max: usize },
    /// 单个文件超出大小上限
    #[error("Error, file size should not exceed {} MB", .max / 1_000_000)]
    FileTooLarge { name: String, size: u64, max: u64 },
    /// 质量参数超出范围
    #[error("Error, quality should be between {min} and {max}")]
    QualityOutOfRange { quality: u8, min: u8, max: u8 },
    /// 不支持的输出格式
    #[error("Error, unsupported output format: {0}")]
    UnsupportedFormat(String),
}

impl ValidationError {
    /// 展示给用户的提示文本
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 页面中没有找到防伪令牌
    #[error("未能在页面 {page} 中找到 CSRF 令牌")]
    CsrfTokenNotFound { page: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 文件名不可用
    #[error("无效的文件名: {name}")]
    InvalidName { name: String },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 已转换图片行操作错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowserError {
    /// 列表中没有该图片
    #[error("列表中不存在图片: {short_name}")]
    UnknownAsset { short_name: String },
    /// 该行已有操作在进行或已被删除
    #[error("图片 {short_name} 当前状态为 {state}，无法执行操作")]
    RowBusy { short_name: String, state: String },
    /// 列表尚未加载
    #[error("已转换图片列表尚未加载")]
    NotInitialized,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建API错误响应
    pub fn bad_response(endpoint: impl Into<String>, status: u16, message: Option<String>) -> Self {
        AppError::Api(ApiError::BadResponse {
            endpoint: endpoint.into(),
            status,
            message,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
