//! # EV Station Signer 共有型定義
//!
//! HTTP APIでやり取りされるJSON構造をRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - アドレス: `0x`付き20バイト16進数（EIP-55チェックサム表記を推奨）
//! - バイナリ（sessionId、署名）: `0x`付き16進数
//! - フィールド名: camelCase（コントラクト側のEIP-712型定義と同一）

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /sign-stop (セッション終了署名)
// ---------------------------------------------------------------------------

/// /sign-stop リクエスト。充電セッション終了の主張（未検証）。
///
/// アドレス系フィールドは欠落時・`null` 時に空文字列となり、バリデータで
/// `InvalidAddress` として拒否される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignStopRequest {
    /// 車両所有者のアドレス
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user: String,
    /// 充電ステーションのアドレス（署名者自身と一致する必要がある）
    #[serde(default, deserialize_with = "null_as_empty")]
    pub station: String,
    /// 32バイトのセッション識別子（16進数）
    pub session_id: String,
    /// 供給電力量（ミリkWh単位の非負整数）
    #[serde(rename = "kWhMilli")]
    pub kwh_milli: EnergyAmount,
    /// 署名が有効なチェーンID
    pub chain_id: u64,
    /// 検証を行うコントラクトのアドレス
    #[serde(default, deserialize_with = "null_as_empty")]
    pub contract_addr: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// ミリkWh単位の電力量。
///
/// uint256の範囲を扱うため文字列表記を正とし、
/// 小さな値についてはJSON数値も受け付ける。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnergyAmount {
    /// JSON数値
    Number(u64),
    /// 10進数（または`0x`付き16進数）の文字列
    Text(String),
}

impl EnergyAmount {
    /// 文字列表記を返す。
    pub fn as_text(&self) -> std::borrow::Cow<'_, str> {
        match self {
            EnergyAmount::Number(n) => std::borrow::Cow::Owned(n.to_string()),
            EnergyAmount::Text(s) => std::borrow::Cow::Borrowed(s.as_str()),
        }
    }
}

/// /sign-stop レスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignStopResponse {
    /// `0x`付き65バイト署名（r ‖ s ‖ v、vは27または28）
    pub signature: String,
    /// 署名者（ステーション）のEIP-55アドレス
    pub signer: String,
}

// ---------------------------------------------------------------------------
// エラーレスポンス
// ---------------------------------------------------------------------------

/// 全エンドポイント共通のエラーレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 呼び出し元に返すメッセージ（内部状態・鍵情報は含まない）
    pub error: String,
}

// ---------------------------------------------------------------------------
// ステーション情報
// ---------------------------------------------------------------------------

/// /.well-known/station-info レスポンス。
///
/// クライアントやコントラクトのデプロイ担当者が、
/// 署名ドメインと型定義が一致しているかを確認するために使用する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationInfo {
    /// ステーションの署名用アドレス
    pub signer: String,
    /// EIP-712ドメイン名
    pub domain_name: String,
    /// EIP-712ドメインバージョン
    pub domain_version: String,
    /// 署名対象のプライマリ型名
    pub primary_type: String,
    /// EIP-712 encodeType文字列
    pub encoded_type: String,
}
