//! # ステーション設定・共有状態
//!
//! 環境変数からの設定読み込みとステーションの共有状態の定義。
//!
//! | 環境変数 | 既定値 | 内容 |
//! |---------|-------|------|
//! | `STATION_PRIVATE_KEY` | （ランダム生成） | secp256k1秘密鍵（16進数） |
//! | `BIND_ADDR` | `0.0.0.0` | 待ち受けアドレス |
//! | `PORT` | `3000` | 待ち受けポート |
//! | `CORS_ALLOW_ORIGINS` | （無効） | `*` またはカンマ区切りのオリジン |

use axum::http::{HeaderValue, Method};
use station_core::ClaimValidator;
use station_crypto::TypedDataSigner;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// 既定の待ち受けポート。
pub const DEFAULT_PORT: u16 = 3000;

/// 起動時に一度だけ読み込まれる設定。
///
/// 秘密鍵を含むため `Debug` は実装しない。
pub struct StationConfig {
    /// 待ち受けアドレス
    pub bind_addr: String,
    /// 待ち受けポート
    pub port: u16,
    /// 16進数の秘密鍵（未設定の場合は開発用にランダム生成）
    pub private_key: Option<String>,
    /// CORSで許可するオリジン
    pub cors_allow_origins: Option<String>,
}

impl StationConfig {
    /// 環境変数から読み込む。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から読み込む。
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("PORTが不正です ({v:?}): {e}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            private_key: lookup("STATION_PRIVATE_KEY").filter(|v| !v.trim().is_empty()),
            cors_allow_origins: lookup("CORS_ALLOW_ORIGINS"),
        })
    }

    /// `host:port` 形式の待ち受けアドレス。
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// ステーションの署名器を構築する。
    pub fn build_signer(&self) -> anyhow::Result<TypedDataSigner> {
        match &self.private_key {
            Some(key_hex) => TypedDataSigner::from_private_key(key_hex)
                .map_err(|e| anyhow::anyhow!("STATION_PRIVATE_KEYの読み込みに失敗: {e}")),
            None => {
                // 開発環境用: ランダムキーを生成
                tracing::warn!(
                    "STATION_PRIVATE_KEYが未設定です。ランダムキーを生成します（開発環境用）"
                );
                Ok(TypedDataSigner::new(Box::new(station_crypto::random_signer())))
            }
        }
    }

    /// CORSレイヤーを構築する。未設定の場合は `None`。
    pub fn cors_layer(&self) -> anyhow::Result<Option<CorsLayer>> {
        let origins = match self.cors_allow_origins.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(None),
        };

        let allow_origin = if origins == "*" {
            AllowOrigin::any()
        } else {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<HeaderValue>()
                        .map_err(|e| anyhow::anyhow!("CORSオリジンが不正です {s:?}: {e}"))
                })
                .collect::<anyhow::Result<_>>()?;
            AllowOrigin::list(origins)
        };

        Ok(Some(
            CorsLayer::new()
                .allow_origin(allow_origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        ))
    }
}

/// ステーションの共有状態。
///
/// 起動後は読み取り専用で、リクエスト間で可変状態を共有しない。
#[derive(Debug)]
pub struct StationState {
    /// EIP-712署名器（ステーション鍵を保持）
    pub signer: TypedDataSigner,
    /// 主張バリデータ（署名器と同じアドレスを自ステーションとする）
    pub validator: ClaimValidator,
}

impl StationState {
    /// 署名器を注入して構築する。
    pub fn new(signer: TypedDataSigner) -> Self {
        let validator = ClaimValidator::new(signer.address());
        Self { signer, validator }
    }
}
