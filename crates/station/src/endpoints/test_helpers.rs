//! # エンドポイントテスト用共通ヘルパー

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use station_crypto::{
    parse_private_key, Address, CryptoError, HashSigner, PrivateKeySigner, Signature,
    TypedDataSigner, B256,
};

use crate::config::StationState;

/// テスト用の固定鍵（Hardhat/Anvilの既定アカウント#0）
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// `TEST_KEY` に対応するアドレス
pub const TEST_STATION: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// 署名呼び出し回数を数える署名器。
pub struct CountingSigner {
    inner: PrivateKeySigner,
    pub calls: Arc<AtomicUsize>,
}

impl CountingSigner {
    pub fn new() -> Self {
        Self {
            inner: parse_private_key(TEST_KEY).unwrap(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl HashSigner for CountingSigner {
    fn address(&self) -> Address {
        HashSigner::address(&self.inner)
    }

    fn sign_hash(&self, hash: &B256) -> Result<Signature, CryptoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        HashSigner::sign_hash(&self.inner, hash)
    }
}

/// 常に失敗する署名器（鍵が利用できない状態を模擬）。
pub struct FailingSigner;

impl HashSigner for FailingSigner {
    fn address(&self) -> Address {
        TEST_STATION.parse().unwrap()
    }

    fn sign_hash(&self, _hash: &B256) -> Result<Signature, CryptoError> {
        Err(CryptoError::SigningFailed("HSMセッションが切断されました".into()))
    }
}

/// `TEST_KEY` で署名するステーション状態。
pub fn test_state() -> Arc<StationState> {
    Arc::new(StationState::new(
        TypedDataSigner::from_private_key(TEST_KEY).unwrap(),
    ))
}

/// 任意の署名器でステーション状態を構築する。
pub fn state_with(backend: Box<dyn HashSigner>) -> Arc<StationState> {
    Arc::new(StationState::new(TypedDataSigner::new(backend)))
}

/// 正常なリクエストボディ。
pub fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "user": "0x1111111111111111111111111111111111111111",
        "station": TEST_STATION,
        "sessionId": "0x0000000000000000000000000000000000000000000000000000000000000001",
        "kWhMilli": "12345",
        "chainId": 1337,
        "contractAddr": "0x3333333333333333333333333333333333333333",
    })
}

/// ルーター全体をループバックで起動し、ポート番号を返す。
pub async fn start_station(state: Arc<StationState>) -> u16 {
    let app = crate::endpoints::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    port
}
