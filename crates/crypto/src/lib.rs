//! # EV Station Signer 暗号処理
//!
//! セッション終了主張に対するEIP-712署名の生成と検証を実装する。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | 構造化データハッシュ | EIP-712 (Keccak-256) |
//! | 署名 | secp256k1 ECDSA（リカバリ可能, RFC 6979） |
//! | アドレス | Keccak-256(公開鍵)の下位20バイト, EIP-55表記 |
//!
//! 署名は `r ‖ s ‖ v`（65バイト, v = 27/28）の16進数で表現する。

pub mod address;
pub mod typed_data;

use alloy::signers::SignerSync;

pub use alloy::primitives::{Address, Signature, B256, U256};
pub use alloy::signers::local::PrivateKeySigner;
pub use address::{parse_address, parse_bytes32};
pub use typed_data::{
    encoded_type, primary_type, signing_domain, SessionStop, SessionStopClaim, DOMAIN_NAME,
    DOMAIN_VERSION,
};

/// 暗号処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// アドレス形式が不正
    #[error("アドレス形式が不正です: {0}")]
    InvalidAddress(String),
    /// 16進数値が不正
    #[error("16進数値が不正です: {0}")]
    InvalidHex(String),
    /// 秘密鍵の形式が不正
    #[error("秘密鍵の形式が不正です: {0}")]
    InvalidKey(String),
    /// 署名処理に失敗
    #[error("署名に失敗しました: {0}")]
    SigningFailed(String),
    /// 署名の形式が不正、またはリカバリに失敗
    #[error("署名が不正です: {0}")]
    InvalidSignature(String),
    /// リカバリした署名者が期待値と異なる
    #[error("署名者が一致しません: expected {expected}, recovered {recovered}")]
    SignerMismatch {
        /// 期待した署名者
        expected: Address,
        /// 署名からリカバリした署名者
        recovered: Address,
    },
}

// ---------------------------------------------------------------------------
// 鍵保持の抽象化
// ---------------------------------------------------------------------------

/// 32バイトのダイジェストに署名する鍵保持者。
///
/// ソフトウェア鍵の他、HSMやリモート署名器を実装として差し替えられる。
pub trait HashSigner: Send + Sync {
    /// 署名者のアドレス。
    fn address(&self) -> Address;

    /// ダイジェストに署名し、リカバリ可能な署名を返す。
    fn sign_hash(&self, hash: &B256) -> Result<Signature, CryptoError>;
}

impl HashSigner for PrivateKeySigner {
    fn address(&self) -> Address {
        PrivateKeySigner::address(self)
    }

    fn sign_hash(&self, hash: &B256) -> Result<Signature, CryptoError> {
        self.sign_hash_sync(hash)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))
    }
}

/// 16進数の秘密鍵（`0x` 任意）からソフトウェア署名器を構築する。
pub fn parse_private_key(key_hex: &str) -> Result<PrivateKeySigner, CryptoError> {
    key_hex
        .trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))
}

/// 開発用のランダムな署名器を生成する。
pub fn random_signer() -> PrivateKeySigner {
    PrivateKeySigner::random()
}

/// 秘密鍵を `0x` 付き16進数で返す（CLIの鍵生成用）。
pub fn private_key_hex(signer: &PrivateKeySigner) -> String {
    format!("0x{}", hex::encode(signer.to_bytes()))
}

// ---------------------------------------------------------------------------
// 署名
// ---------------------------------------------------------------------------

/// セッション終了主張への署名結果。
#[derive(Debug, Clone)]
pub struct StopAttestation {
    /// リカバリ可能な署名
    pub signature: Signature,
    /// 署名者（ステーション）のアドレス
    pub signer: Address,
    /// 署名したEIP-712ダイジェスト
    pub digest: B256,
}

impl StopAttestation {
    /// `0x` 付き65バイト署名（r ‖ s ‖ v）。
    pub fn signature_hex(&self) -> String {
        encode_signature(&self.signature)
    }
}

/// EIP-712型付きデータ署名器。
///
/// ステーションの鍵は構築時に注入され、以後変更されない。
pub struct TypedDataSigner {
    backend: Box<dyn HashSigner>,
}

impl TypedDataSigner {
    /// 鍵保持者を注入して構築する。
    pub fn new(backend: Box<dyn HashSigner>) -> Self {
        Self { backend }
    }

    /// 16進数の秘密鍵から構築する。
    pub fn from_private_key(key_hex: &str) -> Result<Self, CryptoError> {
        Ok(Self::new(Box::new(parse_private_key(key_hex)?)))
    }

    /// 署名者（ステーション）のアドレス。
    pub fn address(&self) -> Address {
        self.backend.address()
    }

    /// 主張のドメイン・型定義・値からダイジェストを計算し、署名する。
    pub fn sign_stop(&self, claim: &SessionStopClaim) -> Result<StopAttestation, CryptoError> {
        let digest = claim.signing_hash();
        let signature = self.backend.sign_hash(&digest)?;
        Ok(StopAttestation {
            signature,
            signer: self.backend.address(),
            digest,
        })
    }
}

impl std::fmt::Debug for TypedDataSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedDataSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// 検証
// ---------------------------------------------------------------------------

/// 署名を `0x` 付き16進数にエンコードする。
pub fn encode_signature(signature: &Signature) -> String {
    format!("0x{}", hex::encode(signature.as_bytes()))
}

/// `0x` 付き（任意）16進数の65バイト署名をパースする。
pub fn parse_signature(input: &str) -> Result<Signature, CryptoError> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(digits).map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
    if bytes.len() != 65 {
        return Err(CryptoError::InvalidSignature(format!(
            "65バイトである必要があります（{}バイト）",
            bytes.len()
        )));
    }
    Signature::from_raw(&bytes).map_err(|e| CryptoError::InvalidSignature(e.to_string()))
}

/// 主張と署名から署名者アドレスをリカバリする。
pub fn recover_signer(
    claim: &SessionStopClaim,
    signature: &Signature,
) -> Result<Address, CryptoError> {
    signature
        .recover_address_from_prehash(&claim.signing_hash())
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
}

/// 署名が `expected` によって主張に対して作成されたことを検証する。
pub fn verify_stop(
    claim: &SessionStopClaim,
    signature: &Signature,
    expected: Address,
) -> Result<(), CryptoError> {
    let recovered = recover_signer(claim, signature)?;
    if recovered != expected {
        return Err(CryptoError::SignerMismatch { expected, recovered });
    }
    Ok(())
}
