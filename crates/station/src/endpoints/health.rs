//! # GET /health

/// GET /health — 死活監視。
pub async fn handle_health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "healthy",
        "service": "station-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
