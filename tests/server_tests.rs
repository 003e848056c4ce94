//! End-to-end tests over a real listener.

use reqwest::StatusCode;
use serde_json::{json, Value};
use sitemap_router::config::TrailingSlash;
use sitemap_router::{Resource, ServerConfig, Sitemap};

mod common;

use common::{calls, client, publisher_sitemap, spawn_server, CallLog};

#[tokio::test]
async fn test_publisher_index() {
    let log = CallLog::default();
    let (addr, shutdown) = spawn_server(publisher_sitemap(&log), ServerConfig::default()).await;

    let res = client()
        .get(format!("http://{}/publisher/42/", addr))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/html; charset=utf-8");
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), r#"{"name":"Mad Hat"}"#);
    assert_eq!(calls(&log), vec!["publisher(42)"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_author_receives_publisher_value() {
    let log = CallLog::default();
    let (addr, shutdown) = spawn_server(publisher_sitemap(&log), ServerConfig::default()).await;

    let res = client()
        .get(format!("http://{}/publisher/42/author/7/", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"name": "Sonny Jim", "pubname": "Mad Hat"}));
    assert_eq!(
        calls(&log),
        vec!["publisher(42)", r#"author({"name":"Mad Hat"}, 7)"#]
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_book_chain() {
    let log = CallLog::default();
    let (addr, shutdown) = spawn_server(publisher_sitemap(&log), ServerConfig::default()).await;

    let res = client()
        .get(format!("http://{}/publisher/1/author/2/book/intro", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/plain; charset=utf-8");
    assert_eq!(res.text().await.unwrap(), "Sonny Jim - The Book");
    assert_eq!(calls(&log).len(), 3);

    shutdown.trigger();
}

#[tokio::test]
async fn test_not_found_paths() {
    let log = CallLog::default();
    let (addr, shutdown) = spawn_server(publisher_sitemap(&log), ServerConfig::default()).await;
    let client = client();

    for path in [
        "/publisher/42/author/",
        "/publisher/42/author/7/book/1/extra",
        "/publishers/42",
        "/",
    ] {
        let res = client
            .get(format!("http://{}{}", addr, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{path}");
    }
    assert!(calls(&log).is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_bad_parameter_and_handler_error() {
    let log = CallLog::default();
    let (addr, shutdown) = spawn_server(publisher_sitemap(&log), ServerConfig::default()).await;
    let client = client();

    let res = client
        .get(format!("http://{}/publisher/abc", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.text().await.unwrap().contains("publisher_id"));

    let res = client
        .get(format!("http://{}/publisher/404/author/1", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "no such publisher");
    assert_eq!(calls(&log), vec!["publisher(404)"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_prefix_and_strict_trailing_slash() {
    let log = CallLog::default();
    let mut config = ServerConfig::default();
    config.router.prefix = "/api/".to_string();
    config.router.trailing_slash = TrailingSlash::Strict;
    let (addr, shutdown) = spawn_server(publisher_sitemap(&log), config).await;
    let client = client();

    let status = |path: &'static str| {
        let client = client.clone();
        async move {
            client
                .get(format!("http://{}{}", addr, path))
                .send()
                .await
                .unwrap()
                .status()
        }
    };

    assert_eq!(status("/api/publisher/1").await, StatusCode::OK);
    assert_eq!(status("/api/publisher/1/").await, StatusCode::NOT_FOUND);
    assert_eq!(status("/publisher/1").await, StatusCode::NOT_FOUND);

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_requests_do_not_share_context() {
    let log = CallLog::default();
    let (addr, shutdown) = spawn_server(publisher_sitemap(&log), ServerConfig::default()).await;
    let client = client();

    let mut handles = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let res = client
                .get(format!("http://{}/publisher/{}/author/{}", addr, i, i + 100))
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            res.json::<Value>().await.unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(
            handle.await.unwrap(),
            json!({"name": "Sonny Jim", "pubname": "Mad Hat"})
        );
    }

    let calls = calls(&log);
    assert_eq!(calls.len(), 40);
    for i in 0..20 {
        assert!(calls.contains(&format!(r#"author({{"name":"Mad Hat"}}, {})"#, i + 100)));
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_body_and_method_reach_handler() {
    let sitemap = Sitemap::new().route(
        "echo",
        Resource::new(|request, _| {
            Ok(json!({
                "method": request.method.as_str(),
                "body": String::from_utf8_lossy(&request.body),
            }))
        })
        .render(sitemap_router::Render::Json),
    );
    let (addr, shutdown) = spawn_server(sitemap, ServerConfig::default()).await;

    let res = client()
        .put(format!("http://{}/echo", addr))
        .body("payload")
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"method": "PUT", "body": "payload"})
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let sitemap = Sitemap::new().index(Resource::new(|_, _| Ok(Value::Null)));
    let (addr, shutdown) = spawn_server(sitemap, ServerConfig::default()).await;

    let res = client()
        .get(format!("http://{}/", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "null");

    shutdown.trigger();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(client()
        .get(format!("http://{}/", addr))
        .send()
        .await
        .is_err());
}
