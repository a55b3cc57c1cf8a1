//! 输出格式

use crate::error::ValidationError;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 服务端接受的输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Bmp,
    Tiff,
    Webp,
    Png,
    Gif,
    Ico,
}

/// 名称（小写）到格式的映射，包含常见别名
static FORMATS: phf::Map<&'static str, OutputFormat> = phf_map! {
    "jpeg" => OutputFormat::Jpeg,
    "jpg" => OutputFormat::Jpeg,
    "jfif" => OutputFormat::Jpeg,
    "bmp" => OutputFormat::Bmp,
    "tiff" => OutputFormat::Tiff,
    "tif" => OutputFormat::Tiff,
    "webp" => OutputFormat::Webp,
    "png" => OutputFormat::Png,
    "gif" => OutputFormat::Gif,
    "ico" => OutputFormat::Ico,
};

impl OutputFormat {
    /// 表单中提交的值
    pub fn as_form_value(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Webp => "webp",
            OutputFormat::Png => "png",
            OutputFormat::Gif => "gif",
            OutputFormat::Ico => "ico",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Bmp => "image/bmp",
            OutputFormat::Tiff => "image/tiff",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Png => "image/png",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Ico => "image/x-icon",
        }
    }

    /// 根据文件扩展名识别格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        FORMATS.get(ext.to_ascii_lowercase().as_str()).copied()
    }
}

impl FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim()).ok_or_else(|| ValidationError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_form_value())
    }
}
