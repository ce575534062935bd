//! # ステーションエンドポイント

pub mod health;
pub mod sign_stop;
pub mod station_info;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use crate::config::StationState;

pub use health::handle_health;
pub use sign_stop::handle_sign_stop;
pub use station_info::handle_station_info;

/// axumルーターを構築する。
pub fn router(state: Arc<StationState>) -> axum::Router {
    axum::Router::new()
        .route("/sign-stop", axum::routing::post(handle_sign_stop))
        .route(
            "/.well-known/station-info",
            axum::routing::get(handle_station_info),
        )
        .route("/health", axum::routing::get(handle_health))
        .with_state(state)
}
