//! # EV Station Signer サーバー
//!
//! 充電ステーションとして、充電セッション終了の主張にEIP-712署名を付与する。
//! 1プロセスにつき1ステーション（1つの鍵）のみを扱う。
//!
//! ## 起動シーケンス
//! 1. 環境変数から設定を読み込む
//! 2. ステーション鍵を読み込み、署名者アドレスを確定する
//! 3. `/sign-stop` 等のエンドポイントの受付を開始する
//!
//! ## API エンドポイント
//! - `POST /sign-stop` — セッション終了主張への署名
//! - `GET /.well-known/station-info` — 署名者アドレスと署名ドメイン情報
//! - `GET /health` — 死活監視

mod config;
mod endpoints;
mod error;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{StationConfig, StationState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StationConfig::from_env()?;

    // Step 1: ステーション鍵の読み込み
    let signer = config.build_signer()?;
    tracing::info!(
        station = %signer.address(),
        domain = station_crypto::DOMAIN_NAME,
        version = station_crypto::DOMAIN_VERSION,
        "ステーション署名者を読み込みました"
    );

    let state = Arc::new(StationState::new(signer));

    // Step 2: ルーター構築
    let mut app = endpoints::router(state);
    if let Some(cors) = config.cors_layer()? {
        tracing::info!("CORSを有効化しました");
        app = app.layer(cors);
    }

    let addr = config.listen_addr();
    tracing::info!("ステーションサーバーを {} で起動します", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
