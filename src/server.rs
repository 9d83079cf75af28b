use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{Error, Res, api, config, types::PkceToken};

/// Serves `/health` and the OAuth `/callback` on `SERVER_ADDRESS` until the
/// process exits.
pub async fn start_api_server(state: Arc<Mutex<Option<PkceToken>>>) -> Res<()> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)));

    let raw_addr = config::server_addr();
    let addr = SocketAddr::from_str(&raw_addr)
        .map_err(|e| Error::config(format!("invalid SERVER_ADDRESS {raw_addr}: {e}")))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
