//! HTTP serving for the Mandelbrot viewer.
//!
//! The library implements routing and the query-string form of a view;
//! the binary starts up a runtime and an axum server to handle requests.
//!
//! `GET /render` answers a PNG of the view described by its query parameters:
//! - iterationDepth: Maximum number of iterations. Defaults to 1000.
//! - scale: Width of the canvas in plane units. Defaults to 4.
//! - theta: Rotation in radians. Defaults to 0.
//! - real, imaginary: Centre of the view. Default to 0.
//! - renderMode: One of `cpu`, `cpu-parallel`, `web-gl`. Defaults to `cpu`.
//! - width, height: Canvas size in pixels. Default to 640x480.

use std::sync::Arc;

use axum::{extract::Query, routing::get, Router};
use mandel_render::RenderServer;

pub mod query;
mod render;

pub use query::ViewQuery;
pub use render::encode_png;

pub fn root_routes(render_server: RenderServer) -> Router {
    let srv = Arc::new(render_server);
    Router::new().route(
        "/render",
        get(|Query(query): Query<ViewQuery>| async move {
            render::render(&srv, query).await
        }),
    )
}
