//! /sign-stop ハンドラ実装

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use station_types::{SignStopRequest, SignStopResponse};

use crate::config::StationState;
use crate::error::StationError;

/// /sign-stop エンドポイントハンドラ。
///
/// ボディは生のバイト列で受け取り、パース失敗も `{"error": ...}` 形式で返す。
pub async fn handle_sign_stop(
    State(state): State<Arc<StationState>>,
    body: Bytes,
) -> Result<Json<SignStopResponse>, StationError> {
    let request: SignStopRequest = serde_json::from_slice(&body)
        .map_err(|e| StationError::BadRequest(format!("リクエストのパースに失敗: {e}")))?;

    // Step 1: 主張の検証（署名前に完了させる）
    let claim = state.validator.validate(&request).map_err(|rejection| {
        tracing::warn!(
            station = %request.station,
            reason = %rejection,
            "セッション終了主張を拒否しました"
        );
        StationError::Rejected(rejection)
    })?;

    // Step 2: EIP-712署名
    let attestation = state.signer.sign_stop(&claim).map_err(|e| {
        tracing::error!(
            error = %e,
            session_id = %claim.session_id,
            chain_id = claim.chain_id,
            "セッション終了主張の署名に失敗しました"
        );
        StationError::SigningFailure
    })?;

    tracing::info!(
        session_id = %claim.session_id,
        chain_id = claim.chain_id,
        contract = %claim.contract_addr,
        kwh_milli = %claim.kwh_milli,
        digest = %attestation.digest,
        "セッション終了主張に署名しました"
    );

    Ok(Json(SignStopResponse {
        signature: attestation.signature_hex(),
        signer: attestation.signer.to_checksum(None),
    }))
}
