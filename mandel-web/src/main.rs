use mandel_render::RenderServer;
use mandel_web::root_routes;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("MANDEL_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let render_server = RenderServer::new().expect("could not start render server");

    let web_rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("could not construct Tokio runtime");

    let server = async {
        let app = root_routes(render_server).layer(TraceLayer::new_for_http());
        let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
        tracing::info!("listening on {}", addr);
        axum::serve(listener, app).await
    };
    web_rt.block_on(server).expect("server terminated");
}
