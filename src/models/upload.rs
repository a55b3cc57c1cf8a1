//! 上传批次

use super::format::OutputFormat;
use std::path::Path;

/// 单个待上传文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// 文件名（不含目录）
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// 创建上传文件，MIME 类型根据扩展名推断
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = guess_mime_type(&name).to_string();
        Self {
            name,
            mime_type,
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// 根据扩展名推断 MIME 类型，无法识别时为 `application/octet-stream`
pub fn guess_mime_type(name: &str) -> &'static str {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(OutputFormat::from_extension)
        .map(OutputFormat::mime_type)
        .unwrap_or("application/octet-stream")
}

/// 通过校验的上传批次
///
/// 只能由 `UploadValidator` 构造，因此持有的文件一定满足数量和大小限制
#[derive(Debug, Clone)]
pub struct UploadBatch {
    pub(crate) files: Vec<UploadFile>,
    pub(crate) output_format: OutputFormat,
    pub(crate) quality: Option<u8>,
}

impl UploadBatch {
    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn quality(&self) -> Option<u8> {
        self.quality
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(UploadFile::size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_mime_from_extension() {
        assert_eq!(UploadFile::new("cat.PNG", vec![]).mime_type, "image/png");
        assert_eq!(UploadFile::new("cat.jpg", vec![]).mime_type, "image/jpeg");
        assert_eq!(
            UploadFile::new("notes.txt", vec![]).mime_type,
            "application/octet-stream"
        );
    }
}
