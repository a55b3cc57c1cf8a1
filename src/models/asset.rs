//! 已转换图片

use serde::{Deserialize, Serialize};
use std::fmt;

/// 服务端保存的已转换图片
///
/// 接口以位置数组 `[url, name, publicId, shortName]` 返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String, String, String)", into = "(String, String, String, String)")]
pub struct ConvertedAsset {
    pub url: String,
    /// 显示名称，也是下载后保存的文件名
    pub name: String,
    /// 不透明标识，用于删除
    pub public_id: String,
    /// 短名称，用于定位列表中的行
    pub short_name: String,
}

impl From<(String, String, String, String)> for ConvertedAsset {
    fn from((url, name, public_id, short_name): (String, String, String, String)) -> Self {
        Self {
            url,
            name,
            public_id,
            short_name,
        }
    }
}

impl From<ConvertedAsset> for (String, String, String, String) {
    fn from(asset: ConvertedAsset) -> Self {
        (asset.url, asset.name, asset.public_id, asset.short_name)
    }
}

/// `GET /api/image_download_converted/` 的响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertedAssetList {
    #[serde(default)]
    pub converted_images: Vec<ConvertedAsset>,
}

/// `POST /api/image_delete_converted/` 的请求体
#[derive(Debug, Serialize)]
pub struct DeleteRequest<'a> {
    pub public_id: &'a str,
}

/// `POST /api/image_delete_converted/` 的响应
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// `GET /api/download_all_converted/` 的响应
#[derive(Debug, Clone, Deserialize)]
pub struct ZipResponse {
    pub zip_url: String,
}

/// 列表中一行的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Listed,
    Downloading,
    Deleting,
    Removed,
}

impl fmt::Display for RowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RowState::Listed => "listed",
            RowState::Downloading => "downloading",
            RowState::Deleting => "deleting",
            RowState::Removed => "removed",
        };
        f.write_str(s)
    }
}

/// 列表中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRow {
    pub asset: ConvertedAsset,
    pub state: RowState,
}

impl AssetRow {
    pub fn new(asset: ConvertedAsset) -> Self {
        Self {
            asset,
            state: RowState::Listed,
        }
    }
}

/// 单张图片编辑流程中取回的原图
#[derive(Debug, Clone)]
pub struct OriginalImage {
    /// 来自 `X-Image-Name` 响应头
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_positional_asset_list() {
        let json = r#"{
            "converted_images": [
                ["https://cdn.example.com/a.webp", "a.webp", "user/converted/a", "a"],
                ["https://cdn.example.com/b.webp", "b.webp", "user/converted/b", "b"]
            ]
        }"#;
        let list: ConvertedAssetList = serde_json::from_str(json).unwrap();
        assert_eq!(list.converted_images.len(), 2);
        assert_eq!(list.converted_images[1].public_id, "user/converted/b");
        assert_eq!(list.converted_images[0].short_name, "a");
    }

    #[test]
    fn missing_list_is_empty() {
        let list: ConvertedAssetList = serde_json::from_str("{}").unwrap();
        assert!(list.converted_images.is_empty());
    }
}
