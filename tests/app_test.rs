mod common;

use common::{asset_list_json, test_config};
use mockito::Server;
use std::sync::Arc;
use tokio_test::assert_ok;
use webpeditor_client::clients::{endpoints, CSRF_HEADER};
use webpeditor_client::orchestrator::DownloadStats;
use webpeditor_client::{App, MemoryNotifier, OutputFormat};

#[tokio::test]
async fn initialize_reads_token_from_page() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(server.url(), dir.path());
    config.csrf_token = None;

    let page = server
        .mock("GET", "/image_converter/")
        .with_status(200)
        .with_body(r#"<form><input type="hidden" name="csrfmiddlewaretoken" value="page-token"></form>"#)
        .expect(1)
        .create_async()
        .await;
    let list = server
        .mock("GET", endpoints::LIST_CONVERTED)
        .match_header(CSRF_HEADER, "page-token")
        .with_status(200)
        .with_body(asset_list_json(&[("a", "/media/a.webp")]))
        .expect(1)
        .create_async()
        .await;

    let app = assert_ok!(App::initialize_with(config, Arc::new(MemoryNotifier::new())).await);
    let assets = assert_ok!(app.list().await);

    page.assert_async().await;
    list.assert_async().await;
    assert_eq!(assets.len(), 1);
    // 启动时写入日志文件头
    assert!(dir.path().join("output.txt").exists());
}

#[tokio::test]
async fn convert_reads_files_from_disk() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let input = dir.path().join("cat.png");
    std::fs::write(&input, vec![7u8; 1024]).unwrap();

    let convert = server
        .mock("POST", endpoints::IMAGE_CONVERT)
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let _list = server
        .mock("GET", endpoints::LIST_CONVERTED)
        .with_status(200)
        .with_body(asset_list_json(&[]))
        .create_async()
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let app = assert_ok!(App::initialize_with(config, notifier.clone()).await);

    let outcome = assert_ok!(app.convert(&[input], OutputFormat::Gif, None).await);

    assert!(outcome.is_success());
    convert.assert_async().await;
    assert_eq!(notifier.success_count(), 1);
}

#[tokio::test]
async fn download_all_counts_each_row_independently() {
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(server.url(), dir.path());

    let _list = server
        .mock("GET", endpoints::LIST_CONVERTED)
        .with_status(200)
        .with_body(asset_list_json(&[
            ("a", "/media/a.webp"),
            ("b", "/media/b.webp"),
            ("c", "/media/c.webp"),
        ]))
        .create_async()
        .await;
    // mock 被丢弃时会从服务器上移除，需要保留
    let mut images = Vec::new();
    for name in ["a", "b"] {
        let mock = server
            .mock("GET", format!("/media/{name}.webp").as_str())
            .with_status(200)
            .with_body(name)
            .create_async()
            .await;
        images.push(mock);
    }
    let _missing = server
        .mock("GET", "/media/c.webp")
        .with_status(404)
        .create_async()
        .await;

    let notifier = Arc::new(MemoryNotifier::new());
    let app = assert_ok!(App::initialize_with(config, notifier.clone()).await);

    let stats = assert_ok!(app.download_all().await);

    assert_eq!(
        stats,
        DownloadStats {
            listed: 3,
            downloaded: 2,
            failed: 1
        }
    );
    assert_eq!(notifier.success_count(), 2);
    assert_eq!(notifier.failure_count(), 1);
    assert!(dir.path().join("downloads").join("a.webp").exists());
}
