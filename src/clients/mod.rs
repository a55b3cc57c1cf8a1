pub mod csrf;
pub mod editor_client;

pub use csrf::extract_csrf_token;
pub use editor_client::{endpoints, EditorClient, CSRF_HEADER};
