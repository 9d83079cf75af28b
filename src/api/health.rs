use axum::response::Json;
use serde_json::{Value, json};

use crate::config;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "redirect_uri": config::spotify_redirect_uri(),
    }))
}
