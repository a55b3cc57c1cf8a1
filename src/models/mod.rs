pub mod asset;
pub mod format;
pub mod loaders;
pub mod result;
pub mod upload;

pub use asset::{
    AssetRow, ConvertedAsset, ConvertedAssetList, DeleteRequest, DeleteResponse, OriginalImage,
    RowState, ZipResponse,
};
pub use format::OutputFormat;
pub use loaders::{load_upload_file, load_upload_files};
pub use result::{ConversionResult, ConversionStatus};
pub use upload::{guess_mime_type, UploadBatch, UploadFile};
