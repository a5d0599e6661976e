use anyhow::Result;
use tower_http::cors::{Any, CorsLayer};

use dayboard_server::routes;
use dayboard_server::state::AppState;
use dayboard_server::store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    dayboard_core::init()?;

    let config = dayboard_core::Config::load_validated()?;

    if let Some(parent) = config.server.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = Store::open(&config.server.database_path)?;
    let state = AppState::new(store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(state).layer(cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("dayboard-server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
