//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use sitemap_router::lifecycle::{start, Shutdown};
use sitemap_router::{Coercion, HttpError, Render, Resource, ServerConfig, Sitemap};

/// Handler invocations, in call order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// The publisher / author / book site, recording every handler call.
pub fn publisher_sitemap(log: &CallLog) -> Sitemap {
    let pub_log = Arc::clone(log);
    let author_log = Arc::clone(log);
    let book_log = Arc::clone(log);

    let publisher = Resource::new(move |_, params| {
        let id = params.get_i64("publisher_id").unwrap_or_default();
        pub_log.lock().unwrap().push(format!("publisher({id})"));
        if id == 404 {
            return Err(HttpError::not_found("no such publisher").into());
        }
        Ok(json!({"name": "Mad Hat"}))
    })
    .param("publisher_id", Coercion::Int);

    let author = Resource::new(move |_, params| {
        let publisher = params.get("publisher_id").cloned().unwrap_or_default();
        let author_id = params.get_i64("author_id").unwrap_or_default();
        author_log
            .lock()
            .unwrap()
            .push(format!("author({publisher}, {author_id})"));
        Ok(json!({"name": "Sonny Jim", "pubname": publisher["name"]}))
    })
    .param("author_id", Coercion::Int)
    .render(Render::Json);

    let book = Resource::new(move |_, params| {
        let book_id = params.get_str("book_id").unwrap_or_default().to_string();
        book_log.lock().unwrap().push(format!("book({book_id})"));
        let author = params.get("author_id").cloned().unwrap_or_default();
        Ok(json!(format!("{} - The Book", author["name"].as_str().unwrap_or("?"))))
    })
    .render(Render::Text);

    Sitemap::new().route(
        "publisher",
        Sitemap::new().route(
            "{publisher_id}",
            Sitemap::new().index(publisher).route(
                "author",
                Sitemap::new().route(
                    "{author_id}",
                    Sitemap::new()
                        .index(author)
                        .route("book", Sitemap::new().route("{book_id}", book)),
                ),
            ),
        ),
    )
}

/// Start a server for `sitemap` on an ephemeral local port.
pub async fn spawn_server(sitemap: Sitemap, mut config: ServerConfig) -> (SocketAddr, Shutdown) {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let shutdown = Shutdown::new();
    let running = start(sitemap, config, &shutdown).await.unwrap();
    (running.local_addr, shutdown)
}

/// Client without connection pooling, so every test request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn calls(log: &CallLog) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}
