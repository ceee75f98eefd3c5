mod common;

use common::PETS_JSON;
use sitesearch_core::{
    load, render_search_result, FileSource, HttpSource, IndexOptions, LoadError, SearchContext, StaticSource,
};
use std::fs;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answer one request per canned `(status line, body)` and return the request
/// lines that came in.
async fn serve_http(responses: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let head = String::from_utf8_lossy(&buf);
            requests.push(head.lines().next().unwrap_or_default().to_string());
            let resp = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(resp.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
        requests
    });
    (base, handle)
}

#[tokio::test]
async fn loads_collection_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("search.json");
    fs::write(&path, PETS_JSON).unwrap();

    let loaded = load(&FileSource::new(&path), IndexOptions::default()).await.unwrap();
    assert_eq!(loaded.docs().len(), 2);
    assert_eq!(loaded.doc(1).unwrap().url, "/dogs");
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = load(&FileSource::new(dir.path().join("nope.json")), IndexOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[tokio::test]
async fn ids_are_dense_and_positional() {
    let body: Vec<String> = (0..25)
        .map(|i| format!(r#"{{"title": "Page {i}", "content": "body {i}", "url": "/p/{i}"}}"#))
        .collect();
    let loaded = load(&StaticSource(format!("[{}]", body.join(","))), IndexOptions::default())
        .await
        .unwrap();
    for (pos, doc) in loaded.docs().iter().enumerate() {
        assert_eq!(doc.id as usize, pos);
        assert_eq!(doc.url, format!("/p/{pos}"));
    }
    assert_eq!(loaded.index().num_docs(), 25);
}

#[tokio::test]
async fn empty_collection_loads_and_matches_nothing() {
    let loaded = load(&StaticSource("[]".into()), IndexOptions::default()).await.unwrap();
    let ctx = SearchContext::with_index(loaded, 3);
    assert_eq!(ctx.search("anything").unwrap().len(), 0);
}

#[tokio::test]
async fn cats_example_end_to_end() {
    let loaded = load(&StaticSource(PETS_JSON.into()), IndexOptions::default()).await.unwrap();
    let ctx = SearchContext::with_index(loaded, 3);

    let results = ctx.search("cats").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, "/cats");

    let rendered = render_search_result("cats", results[0]);
    assert_eq!(rendered.url, "/cats");
    assert!(rendered.title.contains("<mark>Cats</mark>"));
    assert!(rendered.content.unwrap().contains("<mark>Cats</mark>"));
}

#[tokio::test]
async fn http_source_fetches_index_path_and_reports_status() {
    let (base, server) = serve_http(vec![("200 OK", PETS_JSON), ("404 Not Found", "missing")]).await;
    let source = HttpSource::new(&base, "/api/search.json").unwrap();

    let loaded = load(&source, IndexOptions::default()).await.unwrap();
    assert_eq!(loaded.docs().len(), 2);
    assert_eq!(loaded.doc(0).unwrap().url, "/cats");

    let err = load(&source, IndexOptions::default()).await.unwrap_err();
    assert!(matches!(err, LoadError::Status(404)));

    let requests = server.await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|line| line.starts_with("GET /api/search.json ")));
}
