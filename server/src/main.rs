use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use server::{build_app, AppConfig};
use sitesearch_core::WidgetConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sitesearch-server")]
#[command(about = "Serve a static site's search collection and render search results", long_about = None)]
struct Args {
    /// Published document collection (JSON array of {title, content, url})
    #[arg(long, default_value = "./public/api/search.json")]
    index_file: PathBuf,
    /// Optional JSON file with widget settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the number of results per query
    #[arg(long)]
    result_limit: Option<usize>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Token required by POST /admin/reload
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,
    /// Comma-separated allowed origins
    #[arg(long, env = "CORS_ALLOW_ORIGIN")]
    cors_allow_origin: Option<String>,
}

fn widget_config(args: &Args) -> Result<WidgetConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => WidgetConfig::default(),
    };
    if let Some(limit) = args.result_limit {
        cfg.result_limit = limit;
    }
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = AppConfig {
        widget: widget_config(&args)?,
        index_file: args.index_file.clone(),
        admin_token: args.admin_token.clone(),
        cors_allow_origin: args.cors_allow_origin.clone(),
    };
    let app: Router = build_app(config).await?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
