use std::sync::Arc;

use folio::{handlers, logger::Logger, AppState, Config, FileStore, WikiError};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let config = Config::from_env();
    std::fs::create_dir_all(config.data_dir.as_ref())?;

    let store = FileStore::new(config.data_dir.as_ref().clone());
    let state = AppState::new(&config, Arc::new(store));
    let app = handlers::router(state);

    let addr = config.socket_addr();
    log::info!(
        "Wiki listening on http://{} (data: {:?}, static: {:?})",
        addr,
        config.data_dir,
        config.static_dir
    );
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.map_err(WikiError::from)
}
