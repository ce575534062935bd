//! # GET /.well-known/station-info
//!
//! 署名者アドレスとEIP-712の署名ドメイン・型定義を公開する。
//! 検証側コントラクトの型定義と一致しているかの確認に使用する。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use station_types::StationInfo;

use crate::config::StationState;

/// GET /.well-known/station-info — ステーション情報公開。
pub async fn handle_station_info(State(state): State<Arc<StationState>>) -> Json<StationInfo> {
    Json(StationInfo {
        signer: state.signer.address().to_checksum(None),
        domain_name: station_crypto::DOMAIN_NAME.to_string(),
        domain_version: station_crypto::DOMAIN_VERSION.to_string(),
        primary_type: station_crypto::primary_type().to_string(),
        encoded_type: station_crypto::encoded_type(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_helpers::{test_state, TEST_STATION};

    #[tokio::test]
    async fn test_station_info() {
        let info = handle_station_info(State(test_state())).await.0;

        assert_eq!(info.signer, TEST_STATION);
        assert_eq!(info.domain_name, "EVChargingSessions");
        assert_eq!(info.domain_version, "1");
        assert_eq!(info.primary_type, "SessionStop");
        assert!(info.encoded_type.starts_with("SessionStop(address user,"));
    }
}
