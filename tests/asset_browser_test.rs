mod common;

use common::{asset_list_json, test_browser, test_config};
use mockito::{Matcher, Server};
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};
use webpeditor_client::clients::endpoints;
use webpeditor_client::error::BrowserError;
use webpeditor_client::models::RowState;
use webpeditor_client::services::asset_browser::{
    CommandOutcome, DELETE_FAILED_MESSAGE, DOWNLOADED_MESSAGE, DOWNLOAD_FAILED_MESSAGE,
    LIST_FAILED_MESSAGE, ZIP_DOWNLOADED_MESSAGE, ZIP_FAILED_MESSAGE, ZIP_FILE_NAME,
};
use webpeditor_client::{AppError, AssetCommand, MemoryNotifier};

#[tokio::test]
async fn download_saves_file_under_display_name() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let _list = server
        .mock("GET", endpoints::LIST_CONVERTED)
        .with_status(200)
        .with_body(asset_list_json(&[("a", "/media/a.webp")]))
        .create_async()
        .await;
    let image = server
        .mock("GET", "/media/a.webp")
        .with_status(200)
        .with_body("webp-bytes")
        .expect(1)
        .create_async()
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let browser = test_browser(&config, notifier.clone());
    assert_eq!(assert_ok!(browser.init().await), 1);

    let path = assert_ok!(browser.download("a").await);

    image.assert_async().await;
    assert_eq!(path.file_name().unwrap(), "a.webp");
    assert_eq!(std::fs::read(&path).unwrap(), b"webp-bytes");
    assert_eq!(browser.rows()[0].state, RowState::Listed);
    assert_eq!(
        notifier.messages(),
        vec![(DOWNLOADED_MESSAGE.to_string(), true)]
    );
}

#[tokio::test]
async fn failed_download_keeps_row_and_reports_failure() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let missing = format!("{}/media/gone.webp", server.url());
    let _list = server
        .mock("GET", endpoints::LIST_CONVERTED)
        .with_status(200)
        .with_body(asset_list_json(&[("gone", missing.as_str())]))
        .create_async()
        .await;
    let _image = server
        .mock("GET", "/media/gone.webp")
        .with_status(404)
        .create_async()
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let browser = test_browser(&config, notifier.clone());
    assert_ok!(browser.init().await);

    assert_err!(browser.download("gone").await);

    assert_eq!(browser.rows().len(), 1);
    assert_eq!(browser.rows()[0].state, RowState::Listed);
    assert_eq!(notifier.success_count(), 0);
    assert_eq!(
        notifier.last().map(|t| t.message),
        Some(DOWNLOAD_FAILED_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn deleting_last_asset_refreshes_list() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let first_list = server
        .mock("GET", endpoints::LIST_CONVERTED)
        .with_status(200)
        .with_body(asset_list_json(&[("a", "/media/a.webp")]))
        .expect(1)
        .create_async()
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let browser = test_browser(&config, notifier.clone());
    assert_ok!(browser.init().await);
    first_list.assert_async().await;
    first_list.remove_async().await;

    let delete = server
        .mock("POST", endpoints::DELETE_CONVERTED)
        .match_header("X-CSRFToken", common::TOKEN)
        .match_body(Matcher::Json(
            serde_json::json!({ "public_id": "user/converted/a" }),
        ))
        .with_status(200)
        .with_body(r#"{"message": "Image has been deleted successfully"}"#)
        .expect(1)
        .create_async()
        .await;
    let refreshed = server
        .mock("GET", endpoints::LIST_CONVERTED)
        .with_status(200)
        .with_body(asset_list_json(&[]))
        .expect(1)
        .create_async()
        .await;

    let message = assert_ok!(browser.delete("a").await);

    assert_eq!(message, "Image has been deleted successfully");
    delete.assert_async().await;
    refreshed.assert_async().await;
    assert!(browser.is_empty());
    assert_eq!(
        notifier.messages(),
        vec![("Image has been deleted successfully".to_string(), true)]
    );
}

#[tokio::test]
async fn deleting_with_rows_left_does_not_refresh() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let list = server
        .mock("GET", endpoints::LIST_CONVERTED)
        .with_status(200)
        .with_body(asset_list_json(&[
            ("a", "/media/a.webp"),
            ("b", "/media/b.webp"),
        ]))
        .expect(1)
        .create_async()
        .await;
    let _delete = server
        .mock("POST", endpoints::DELETE_CONVERTED)
        .with_status(200)
        .with_body(r#"{"message": "deleted"}"#)
        .create_async()
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let browser = test_browser(&config, notifier.clone());
    assert_ok!(browser.init().await);

    let outcome = assert_ok!(
        browser
            .execute(&AssetCommand::Delete {
                short_name: "a".to_string()
            })
            .await
    );

    assert_eq!(outcome, CommandOutcome::Deleted("deleted".to_string()));
    list.assert_async().await;
    let remaining = browser.assets();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].short_name, "b");
}

#[tokio::test]
async fn failed_delete_returns_row_to_listed() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let _list = server
        .mock("GET", endpoints::LIST_CONVERTED)
        .with_status(200)
        .with_body(asset_list_json(&[("a", "/media/a.webp")]))
        .create_async()
        .await;
    let _delete = server
        .mock("POST", endpoints::DELETE_CONVERTED)
        .with_status(500)
        .with_body(r#"{"error": "boom"}"#)
        .create_async()
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let browser = test_browser(&config, notifier.clone());
    assert_ok!(browser.init().await);

    assert_err!(browser.delete("a").await);

    assert_eq!(browser.rows()[0].state, RowState::Listed);
    assert_eq!(
        notifier.messages(),
        vec![(DELETE_FAILED_MESSAGE.to_string(), false)]
    );
    // 行已回到空闲状态，可以再次操作
    assert_eq!(browser.commands().len(), 2);
}

#[tokio::test]
async fn operations_before_init_and_on_unknown_rows_fail() {
    let server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let notifier = Arc::new(MemoryNotifier::new());
    let browser = test_browser(&config, notifier.clone());

    let err = assert_err!(browser.download("a").await);
    assert!(matches!(err, AppError::Browser(BrowserError::NotInitialized)));
    assert!(browser.commands().is_empty());
    assert_eq!(notifier.toasts().len(), 0);
}

#[tokio::test]
async fn zip_download_uses_fixed_file_name() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let zip_url = format!("{}/media/archive-123.zip", server.url());
    let _zip_info = server
        .mock("GET", endpoints::DOWNLOAD_ALL_CONVERTED)
        .with_status(200)
        .with_body(serde_json::json!({ "zip_url": zip_url }).to_string())
        .create_async()
        .await;
    let archive = server
        .mock("GET", "/media/archive-123.zip")
        .with_status(200)
        .with_body("PK-zip")
        .expect(1)
        .create_async()
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let browser = test_browser(&config, notifier.clone());

    let path = assert_ok!(browser.download_all_zip().await);

    archive.assert_async().await;
    assert_eq!(path.file_name().unwrap(), ZIP_FILE_NAME);
    assert_eq!(std::fs::read(&path).unwrap(), b"PK-zip");
    assert_eq!(
        notifier.messages(),
        vec![(ZIP_DOWNLOADED_MESSAGE.to_string(), true)]
    );
}

#[tokio::test]
async fn zip_failures_are_reported() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let notifier = Arc::new(MemoryNotifier::new());
    let browser = test_browser(&config, notifier.clone());

    // 获取打包地址失败
    let zip_info = server
        .mock("GET", endpoints::DOWNLOAD_ALL_CONVERTED)
        .with_status(500)
        .with_body(r#"{"error": "zip failed"}"#)
        .create_async()
        .await;
    assert_err!(browser.download_all_zip().await);
    zip_info.remove_async().await;

    // 地址可用但压缩包下载失败
    let _zip_info = server
        .mock("GET", endpoints::DOWNLOAD_ALL_CONVERTED)
        .with_status(200)
        .with_body(r#"{"zip_url": "/media/missing.zip"}"#)
        .create_async()
        .await;
    let archive = server
        .mock("GET", "/media/missing.zip")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;
    assert_err!(browser.download_all_zip().await);

    archive.assert_async().await;
    assert!(!dir.path().join("downloads").join(ZIP_FILE_NAME).exists());
    assert_eq!(
        notifier.messages(),
        vec![
            (ZIP_FAILED_MESSAGE.to_string(), false),
            (ZIP_FAILED_MESSAGE.to_string(), false),
        ]
    );
}

#[tokio::test]
async fn failed_initial_listing_is_reported_once() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let _list = server
        .mock("GET", endpoints::LIST_CONVERTED)
        .with_status(500)
        .create_async()
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let browser = test_browser(&config, notifier.clone());

    assert_err!(browser.init().await);
    // 转换或删除之后的刷新失败不提示
    assert_err!(browser.refresh().await);

    assert_eq!(
        notifier.messages(),
        vec![(LIST_FAILED_MESSAGE.to_string(), false)]
    );
}
