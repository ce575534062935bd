//! # アドレス・16進数のパース
//!
//! 外部入力（JSON文字列）から固定長の値を取り出す。
//!
//! アドレスの受理規則:
//! - `0x` プレフィックス + 40桁の16進数
//! - 英字が全て小文字、または全て大文字ならチェックサムを問わない
//! - 大文字小文字が混在する場合はEIP-55チェックサムが正しいこと

use std::str::FromStr;

use alloy::primitives::{Address, B256};

use crate::CryptoError;

/// 20バイトアドレスをパースする。
pub fn parse_address(input: &str) -> Result<Address, CryptoError> {
    let digits = input
        .strip_prefix("0x")
        .ok_or_else(|| CryptoError::InvalidAddress("0xプレフィックスがありません".into()))?;

    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(CryptoError::InvalidAddress(format!(
            "40桁の16進数である必要があります（{}文字）",
            digits.len()
        )));
    }

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(input, None)
            .map_err(|e| CryptoError::InvalidAddress(format!("EIP-55チェックサムが不正です: {e}")));
    }

    Address::from_str(input).map_err(|e| CryptoError::InvalidAddress(e.to_string()))
}

/// 32バイト値（bytes32）をパースする。`0x` プレフィックスは任意、長さは厳密に32バイト。
pub fn parse_bytes32(input: &str) -> Result<B256, CryptoError> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(digits).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
        CryptoError::InvalidHex(format!("32バイトである必要があります（{}バイト）", v.len()))
    })?;
    Ok(B256::from(arr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_lowercase_and_uppercase() {
        let lower = parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let upper = parse_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap();
        assert_eq!(lower, upper);
    }

    /// EIP-55の公式テストベクタ
    #[test]
    fn test_parse_address_valid_checksum() {
        let addr = parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        assert_eq!(addr.to_checksum(None), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn test_parse_address_bad_checksum() {
        // 最後の1文字だけ大文字小文字を反転
        let err = parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidAddress(_)));
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        for input in [
            "",
            "0x",
            "1111111111111111111111111111111111111111",
            "0x111111111111111111111111111111111111111",
            "0x11111111111111111111111111111111111111111",
            "0x111111111111111111111111111111111111111g",
        ] {
            assert!(
                matches!(parse_address(input), Err(CryptoError::InvalidAddress(_))),
                "受理されてしまった: {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_bytes32() {
        let full = "0x0000000000000000000000000000000000000000000000000000000000000001";
        let value = parse_bytes32(full).unwrap();
        assert_eq!(value.as_slice()[31], 1);
        assert_eq!(parse_bytes32(&full[2..]).unwrap(), value);

        assert!(parse_bytes32("0x01").is_err());
        assert!(parse_bytes32("0xzz").is_err());
    }
}
