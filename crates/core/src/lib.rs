//! # EV Station Signer Core
//!
//! 外部から届いたセッション終了主張を検証し、署名可能な型付きの主張へ変換する。
//!
//! ## 検証順序（最初の違反で即座に拒否）
//! 1. `user` がアドレスとして正しい
//! 2. `station` がアドレスとして正しい
//! 3. `contractAddr` がアドレスとして正しい
//! 4. `station` が自ステーションの署名者アドレスと一致する（大文字小文字を区別しない）
//!
//! 上記を通過した後に `sessionId` と `kWhMilli` を型付きの値へデコードする。
//! `sessionId` の重複・鮮度、`kWhMilli` の範囲、署名の有効期限は検証しない。
//! これらはリプレイ対策も含めて検証側コントラクトの責務とする。

use std::fmt;

use station_crypto::{parse_address, parse_bytes32, Address, SessionStopClaim, U256};
use station_types::SignStopRequest;

/// 主張のフィールド識別子（エラー報告用）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimField {
    /// 車両所有者
    User,
    /// 充電ステーション
    Station,
    /// 検証コントラクト
    ContractAddr,
    /// セッション識別子
    SessionId,
    /// 供給電力量
    KwhMilli,
}

impl ClaimField {
    /// JSON上のフィールド名。
    pub fn wire_name(self) -> &'static str {
        match self {
            ClaimField::User => "user",
            ClaimField::Station => "station",
            ClaimField::ContractAddr => "contractAddr",
            ClaimField::SessionId => "sessionId",
            ClaimField::KwhMilli => "kWhMilli",
        }
    }
}

impl fmt::Display for ClaimField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// 主張の拒否理由。いずれもクライアント起因で、修正して再送できる。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// アドレス形式が不正
    #[error("{0}のアドレス形式が不正です")]
    InvalidAddress(ClaimField),
    /// 別のステーション宛ての主張
    #[error("stationがこのステーションの署名者と一致しません")]
    StationMismatch,
    /// アドレス以外のフィールドがデコードできない
    #[error("{field}の値が不正です: {reason}")]
    Malformed {
        /// 対象フィールド
        field: ClaimField,
        /// 詳細
        reason: String,
    },
}

/// セッション終了主張のバリデータ。
///
/// 自ステーションのアドレスのみを保持する純粋な検証器で、副作用を持たない。
#[derive(Debug, Clone, Copy)]
pub struct ClaimValidator {
    station: Address,
}

impl ClaimValidator {
    /// 自ステーションのアドレスを指定して構築する。
    pub fn new(station: Address) -> Self {
        Self { station }
    }

    /// 自ステーションのアドレス。
    pub fn station(&self) -> Address {
        self.station
    }

    /// リクエストを検証し、型付きの主張を返す。
    pub fn validate(&self, request: &SignStopRequest) -> Result<SessionStopClaim, Rejection> {
        let user = address_field(&request.user, ClaimField::User)?;
        let station = address_field(&request.station, ClaimField::Station)?;
        let contract_addr = address_field(&request.contract_addr, ClaimField::ContractAddr)?;

        // Addressの比較はバイト列で行うため、表記の大文字小文字は影響しない
        if station != self.station {
            return Err(Rejection::StationMismatch);
        }

        let session_id = parse_bytes32(&request.session_id).map_err(|e| Rejection::Malformed {
            field: ClaimField::SessionId,
            reason: e.to_string(),
        })?;

        let kwh_milli = parse_energy(&request.kwh_milli.as_text()).map_err(|reason| {
            Rejection::Malformed {
                field: ClaimField::KwhMilli,
                reason,
            }
        })?;

        Ok(SessionStopClaim {
            user,
            station,
            session_id,
            kwh_milli,
            chain_id: request.chain_id,
            contract_addr,
        })
    }
}

fn address_field(value: &str, field: ClaimField) -> Result<Address, Rejection> {
    parse_address(value).map_err(|_| Rejection::InvalidAddress(field))
}

/// 非負整数（10進数、または `0x` 付き16進数）をuint256としてパースする。
fn parse_energy(text: &str) -> Result<U256, String> {
    let (digits, radix) = match text.strip_prefix("0x") {
        Some(hex_digits) => (hex_digits, 16),
        None => (text, 10),
    };
    if digits.is_empty() {
        return Err("数字がありません".to_string());
    }
    // from_str_radixは `_` 区切りを読み飛ばすため、事前に文字種を限定する
    let valid = match radix {
        16 => digits.bytes().all(|b| b.is_ascii_hexdigit()),
        _ => digits.bytes().all(|b| b.is_ascii_digit()),
    };
    if !valid {
        return Err(format!("{radix}進数の数字以外を含んでいます"));
    }
    let parsed = U256::from_str_radix(digits, radix);
    parsed.map_err(|e| format!("uint256として解釈できません: {e}"))
}
