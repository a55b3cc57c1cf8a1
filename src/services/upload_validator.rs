//! 上传校验服务 - 业务能力层
//!
//! 只负责"这批文件能不能上传"的判断，不发送任何请求

use crate::config::Config;
use crate::error::ValidationError;
use crate::models::{OutputFormat, UploadBatch, UploadFile};
use tracing::{debug, warn};

/// 质量参数下限
pub const MIN_QUALITY: u8 = 5;
/// 质量参数上限
pub const MAX_QUALITY: u8 = 100;

/// 上传限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_size: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_files: 15,
            max_file_size: 6_000_000,
        }
    }
}

impl From<&Config> for UploadLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_files: config.max_files,
            max_file_size: config.max_file_size,
        }
    }
}

/// 上传校验服务
///
/// 职责：
/// - 检查文件数量、单个文件大小和质量参数
/// - 任一文件不合格则整批拒绝，不会只提交合格的部分
pub struct UploadValidator {
    limits: UploadLimits,
}

impl UploadValidator {
    pub fn new(limits: UploadLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> UploadLimits {
        self.limits
    }

    /// 校验一批文件
    ///
    /// 数量检查先于大小检查
    pub fn validate(
        &self,
        files: Vec<UploadFile>,
        output_format: OutputFormat,
        quality: Option<u8>,
    ) -> Result<UploadBatch, ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::NoFiles);
        }

        if files.len() > self.limits.max_files {
            warn!(
                "文件数量 {} 超过上限 {}",
                files.len(),
                self.limits.max_files
            );
            return Err(ValidationError::TooManyFiles {
                count: files.len(),
                max: self.limits.max_files,
            });
        }

        if let Some(file) = files.iter().find(|f| f.size() > self.limits.max_file_size) {
            warn!(
                "文件 {} 大小 {} 字节超过上限 {} 字节",
                file.name,
                file.size(),
                self.limits.max_file_size
            );
            return Err(ValidationError::FileTooLarge {
                name: file.name.clone(),
                size: file.size(),
                max: self.limits.max_file_size,
            });
        }

        if let Some(q) = quality {
            if !(MIN_QUALITY..=MAX_QUALITY).contains(&q) {
                return Err(ValidationError::QualityOutOfRange {
                    quality: q,
                    min: MIN_QUALITY,
                    max: MAX_QUALITY,
                });
            }
        }

        debug!("校验通过: {} 个文件, 格式 {}", files.len(), output_format);

        Ok(UploadBatch {
            files,
            output_format,
            quality,
        })
    }
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(UploadLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_of(size: usize) -> UploadFile {
        UploadFile::new(format!("img-{size}.png"), vec![0u8; size])
    }

    #[test]
    fn accepts_batch_within_limits() {
        let validator = UploadValidator::default();
        let files = vec![file_of(10), file_of(6_000_000)];
        let batch = validator
            .validate(files, OutputFormat::Webp, Some(80))
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.quality(), Some(80));
    }

    #[test]
    fn rejects_more_than_fifteen_files() {
        let validator = UploadValidator::default();
        let files: Vec<_> = (0..16).map(|_| file_of(1)).collect();
        let err = validator.validate(files, OutputFormat::Png, None).unwrap_err();
        assert_eq!(err, ValidationError::TooManyFiles { count: 16, max: 15 });
    }

    #[test]
    fn count_is_checked_before_size() {
        let validator = UploadValidator::default();
        let mut files: Vec<_> = (0..15).map(|_| file_of(1)).collect();
        files.push(file_of(7_000_000));
        let err = validator.validate(files, OutputFormat::Png, None).unwrap_err();
        assert!(matches!(err, ValidationError::TooManyFiles { .. }));
    }

    #[test]
    fn one_oversized_file_rejects_the_whole_batch() {
        let validator = UploadValidator::default();
        let files = vec![file_of(1), file_of(6_000_001), file_of(2)];
        let err = validator.validate(files, OutputFormat::Webp, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FileTooLarge {
                name: "img-6000001.png".into(),
                size: 6_000_001,
                max: 6_000_000,
            }
        );
    }

    #[test]
    fn quality_is_optional_but_bounded() {
        let validator = UploadValidator::default();
        assert!(validator
            .validate(vec![file_of(1)], OutputFormat::Jpeg, None)
            .is_ok());
        let err = validator
            .validate(vec![file_of(1)], OutputFormat::Jpeg, Some(2))
            .unwrap_err();
        assert!(matches!(err, ValidationError::QualityOutOfRange { quality: 2, .. }));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = UploadValidator::default()
            .validate(Vec::new(), OutputFormat::Webp, None)
            .unwrap_err();
        assert_eq!(err, ValidationError::NoFiles);
    }
}
