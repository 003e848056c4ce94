//! Sitemap router demo server.
//!
//! Serves a small publisher / author / book site:
//!
//! ```text
//! /publisher/{publisher_id}                                   → publisher
//! /publisher/{publisher_id}/author/{author_id}                → author (JSON)
//! /publisher/{publisher_id}/author/{author_id}/book/{book_id} → book (JSON)
//! ```
//!
//! Each nested handler receives the value returned by the handler above it
//! in place of the enclosing path parameter.

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use sitemap_router::config::{load_config, ServerConfig};
use sitemap_router::observability::logging::init_logging;
use sitemap_router::{serve, Coercion, HttpError, Render, Resource, Sitemap};

#[derive(Debug, Parser)]
#[command(name = "sitemap-router", version, about = "Serve the demo sitemap")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the configuration.
    #[arg(short, long)]
    bind: Option<String>,
}

fn demo_sitemap() -> Sitemap {
    let publisher = Resource::new(|_, _| Ok(json!({"name": "Mad Hat"})))
        .named("publisher")
        .param("publisher_id", Coercion::Int);

    let author = Resource::new(|_, params| {
        let publisher = params
            .get("publisher_id")
            .ok_or_else(|| HttpError::not_found("unknown publisher"))?;
        Ok(json!({"name": "Sonny Jim", "pubname": publisher["name"]}))
    })
    .named("author")
    .render(Render::Json);

    let book = Resource::new(|_, params| {
        let author_name = params
            .get("author_id")
            .and_then(|author| author["name"].as_str())
            .ok_or_else(|| HttpError::not_found("unknown author"))?;
        Ok(json!({"name": format!("{author_name} - The Book")}))
    })
    .named("book")
    .render(Render::Json);

    let authors = Sitemap::new().route(
        "{author_id}",
        Sitemap::new()
            .index(author)
            .route("book", Sitemap::new().route("{book_id}", book)),
    );

    Sitemap::new().route(
        "publisher",
        Sitemap::new().route(
            "{publisher_id}",
            Sitemap::new().index(publisher).route("author", authors),
        ),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => {
            let mut config = ServerConfig::default();
            config.listener.bind_address = "127.0.0.1:6001".to_string();
            config
        }
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        prefix = %config.router.prefix,
        "sitemap-router starting"
    );

    serve(demo_sitemap(), config).await?;
    Ok(())
}
