pub mod asset_browser;
pub mod batch_submitter;
pub mod image_editor;
pub mod notifier;
pub mod upload_validator;

pub use asset_browser::{AssetCommand, CommandOutcome, ConvertedAssetBrowser};
pub use batch_submitter::BatchSubmitter;
pub use image_editor::ImageEditor;
pub use notifier::{ConsoleNotifier, MemoryNotifier, Notifier, Toast};
pub use upload_validator::{UploadLimits, UploadValidator};
