//! Preview server
//!
//! Serves the generated site. Post pages that were not pre-rendered at build
//! time are rendered on each request from the content service; a post the
//! service does not know renders the loading state.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cms::ContentSource;
use crate::generator::{is_safe_segment, Generator};
use crate::Blog;

/// Server state
struct ServerState {
    public_dir: PathBuf,
    generator: Generator,
    source: Arc<dyn ContentSource>,
}

/// Start the preview server
pub async fn start(blog: &Blog, source: Arc<dyn ContentSource>, ip: &str, port: u16) -> Result<()> {
    let app = router(blog, source)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(blog: &Blog, source: Arc<dyn ContentSource>) -> Result<Router> {
    let state = Arc::new(ServerState {
        public_dir: blog.public_dir.clone(),
        generator: Generator::new(blog)?,
        source,
    });

    let static_files = ServeDir::new(&blog.public_dir).append_index_html_on_directories(true);

    Ok(Router::new()
        .route("/post/:slug", get(post_handler))
        .route("/post/:slug/", get(post_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Serve a pre-rendered post, or render it from the content service
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    if !is_safe_segment(&slug) {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let prebuilt = state.public_dir.join("post").join(&slug).join("index.html");
    if let Ok(html) = tokio::fs::read_to_string(&prebuilt).await {
        return Html(html).into_response();
    }

    tracing::debug!("Rendering post {:?} on request", slug);
    let rendered = match state
        .generator
        .fetch_post(state.source.as_ref(), &slug)
        .await
    {
        Ok(post) => state.generator.render_post(post.as_ref()),
        Err(e) => Err(e),
    };

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render post {:?}: {}", slug, e);
            (StatusCode::BAD_GATEWAY, "Content service error").into_response()
        }
    }
}
