//! HTTP server: the admin interface plus static files from the build directory

mod admin;

use anyhow::Result;
use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Site;

/// Build the router. Everything outside `/_admin` is served from the build
/// directory.
pub fn router(site: Arc<Site>) -> Router {
    let static_files = ServeDir::new(&site.build_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/_admin", get(|| async { Redirect::permanent("/_admin/") }))
        .route("/_admin/", get(admin::list))
        .route("/_admin/new", post(admin::create))
        .route("/_admin/edit/:name", get(admin::edit).post(admin::save))
        .route("/_admin/delete/:name", post(admin::delete))
        .route("/_admin/build", post(admin::build))
        .with_state(site)
        .fallback_service(static_files)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Build the site before serving. A failed build is logged and the server
/// starts anyway, so broken posts can be fixed from the admin interface.
pub fn initial_build(site: &Site) -> bool {
    match site.generate() {
        Ok(built) => {
            tracing::info!("Built {} posts", built.len());
            true
        }
        Err(e) => {
            tracing::error!("Initial build failed: {}", e);
            false
        }
    }
}

/// Start the server
pub async fn start(site: Site, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Admin interface at {}/_admin/", url);
    println!("Press Ctrl+C to stop.");

    let app = router(Arc::new(site));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
