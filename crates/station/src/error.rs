//! # ステーション エラー型
//!
//! 全エンドポイントで共通のエラー型。
//! 呼び出し元には `{"error": "..."}` 形式で返却し、内部の詳細はログにのみ出力する。

use axum::http::StatusCode;
use axum::Json;
use station_core::Rejection;
use station_types::ErrorResponse;

/// ステーションエラー型。
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// 不正なリクエスト（JSONパース失敗、必須フィールド欠落）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// バリデータによる拒否（アドレス不正、ステーション不一致）
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// 署名処理の失敗（鍵が利用できない、暗号処理エラー）
    #[error("署名処理に失敗しました")]
    SigningFailure,
}

impl axum::response::IntoResponse for StationError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            StationError::BadRequest(_) | StationError::Rejected(_) => StatusCode::BAD_REQUEST,
            StationError::SigningFailure => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
