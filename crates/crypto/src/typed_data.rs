//! # EIP-712 型付きデータ
//!
//! セッション終了主張の署名ドメインと型定義。
//!
//! `SessionStop` の型定義（フィールド名・順序・型）は検証側コントラクトと
//! バイト単位で一致していなければならない。変更する場合は
//! [`DOMAIN_VERSION`] を必ず上げること。

use std::borrow::Cow;

use alloy::primitives::{Address, B256, U256};
use alloy::sol;
use alloy::sol_types::{Eip712Domain, SolStruct};

/// EIP-712ドメイン名。
pub const DOMAIN_NAME: &str = "EVChargingSessions";

/// EIP-712ドメインバージョン。
pub const DOMAIN_VERSION: &str = "1";

sol! {
    /// 署名対象の構造体。検証側コントラクトの型定義と同一。
    struct SessionStop {
        address user;
        address station;
        bytes32 sessionId;
        uint256 kWhMilli;
        uint256 chainId;
        address contractAddr;
    }
}

/// 検証済みのセッション終了主張。
///
/// バリデータを通過した値のみがこの型で表現される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStopClaim {
    /// 車両所有者
    pub user: Address,
    /// 充電ステーション（署名者）
    pub station: Address,
    /// セッション識別子
    pub session_id: B256,
    /// 供給電力量（ミリkWh）
    pub kwh_milli: U256,
    /// 対象チェーンID
    pub chain_id: u64,
    /// 検証コントラクト
    pub contract_addr: Address,
}

impl SessionStopClaim {
    /// 署名ドメインを構築する。chainIdとコントラクトアドレスはドメインにも埋め込まれる。
    pub fn domain(&self) -> Eip712Domain {
        signing_domain(self.chain_id, self.contract_addr)
    }

    /// EIP-712構造体へ変換する。
    pub fn to_typed(&self) -> SessionStop {
        SessionStop {
            user: self.user,
            station: self.station,
            sessionId: self.session_id,
            kWhMilli: self.kwh_milli,
            chainId: U256::from(self.chain_id),
            contractAddr: self.contract_addr,
        }
    }

    /// 署名対象ダイジェスト `keccak256(0x1901 ‖ domainSeparator ‖ hashStruct(message))`。
    pub fn signing_hash(&self) -> B256 {
        self.signing_hash_in(&self.domain())
    }

    /// 任意のドメインでダイジェストを計算する（ドメイン分離の検証用）。
    pub fn signing_hash_in(&self, domain: &Eip712Domain) -> B256 {
        self.to_typed().eip712_signing_hash(domain)
    }
}

/// 指定チェーン・コントラクト用の署名ドメインを構築する。
pub fn signing_domain(chain_id: u64, verifying_contract: Address) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed(DOMAIN_NAME)),
        Some(Cow::Borrowed(DOMAIN_VERSION)),
        Some(U256::from(chain_id)),
        Some(verifying_contract),
        None,
    )
}

/// プライマリ型名（`SessionStop`）。
pub fn primary_type() -> &'static str {
    <SessionStop as SolStruct>::NAME
}

/// EIP-712 encodeType文字列。
pub fn encoded_type() -> String {
    <SessionStop as SolStruct>::eip712_encode_type().into_owned()
}
