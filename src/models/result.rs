//! 转换结果

/// 转换状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStatus {
    Success,
    Error,
}

/// 由 HTTP 响应得出的转换结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub status: ConversionStatus,
    pub message: String,
}

impl ConversionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ConversionStatus::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ConversionStatus::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ConversionStatus::Success
    }
}
