//! 转换请求上下文
//!
//! 封装"这是第几次提交、提交了什么"这一信息，仅用于日志

use crate::models::OutputFormat;
use std::fmt::Display;

/// 转换请求上下文
#[derive(Debug, Clone)]
pub struct ConvertCtx {
    /// 本次运行中的提交序号（从1开始）
    pub run_index: usize,

    /// 输出格式
    pub output_format: OutputFormat,

    /// 质量参数
    pub quality: Option<u8>,
}

impl ConvertCtx {
    pub fn new(run_index: usize, output_format: OutputFormat, quality: Option<u8>) -> Self {
        Self {
            run_index,
            output_format,
            quality,
        }
    }
}

impl Display for ConvertCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.quality {
            Some(q) => write!(
                f,
                "[提交 #{} 格式#{} 质量#{}]",
                self.run_index, self.output_format, q
            ),
            None => write!(f, "[提交 #{} 格式#{}]", self.run_index, self.output_format),
        }
    }
}
