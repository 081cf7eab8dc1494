use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::constants::{ADDRESS_LENGTH, DEFAULT_ADDRESS_PREFIX};

/// 목적지 주소 형식 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("Invalid address length: expected {expected} characters, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("Invalid prefix, expected {expected}")]
    WrongPrefix { expected: String },

    #[error("Invalid character '{found}' at position {position}")]
    InvalidCharacter { position: usize, found: char },

    #[error("Address has no payload after prefix {prefix}")]
    EmptyPayload { prefix: String },
}

/// 형식 검사를 통과한 SCRT 목적지 주소
///
/// bech32 체크섬은 검증하지 않는다. 길이, prefix, 구분자 위치의 문자 클래스만 본다.
/// 구분자 뒤 데이터 부분은 bech32 문자(k, t, q ...)를 포함하므로 hex 검사 대상이 아니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SecretAddress {
    raw: String,
    #[serde(skip)]
    prefix_len: usize,
}

impl SecretAddress {
    /// 후보 문자열을 주어진 prefix 기준으로 파싱
    pub fn parse(candidate: &str, prefix: &str) -> Result<Self, AddressError> {
        let actual = candidate.chars().count();
        if actual != ADDRESS_LENGTH {
            return Err(AddressError::WrongLength {
                expected: ADDRESS_LENGTH,
                actual,
            });
        }

        // 대소문자 무시: 비교 전에 양쪽 모두 소문자로 맞춘다
        let prefix = prefix.to_lowercase();
        let prefix_len = prefix.chars().count();
        let head: String = candidate.chars().take(prefix_len).collect::<String>().to_lowercase();
        if head != prefix {
            return Err(AddressError::WrongPrefix { expected: prefix });
        }

        match candidate.chars().nth(prefix_len) {
            Some(c) if c.is_ascii_hexdigit() => {}
            Some(found) => {
                return Err(AddressError::InvalidCharacter {
                    position: prefix_len,
                    found,
                })
            }
            None => return Err(AddressError::EmptyPayload { prefix }),
        }

        Ok(Self {
            raw: candidate.to_string(),
            prefix_len,
        })
    }

    /// 기본 prefix("secret")로 파싱
    pub fn parse_default(candidate: &str) -> Result<Self, AddressError> {
        Self::parse(candidate, DEFAULT_ADDRESS_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn prefix(&self) -> &str {
        let end = self.byte_offset(self.prefix_len);
        &self.raw[..end]
    }

    pub fn payload(&self) -> &str {
        let start = self.byte_offset(self.prefix_len);
        &self.raw[start..]
    }

    /// 소문자 정규화된 주소 (burn 호출 시 사용)
    pub fn normalized(&self) -> String {
        self.raw.to_lowercase()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.raw
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.raw.len())
    }
}

impl fmt::Display for SecretAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Validate SCRT destination address format
pub fn is_valid_address(candidate: &str, prefix: &str) -> bool {
    SecretAddress::parse(candidate, prefix).is_ok()
}

/// 임의의 JSON 값 검사 - 문자열이 아니면 항상 false
pub fn is_valid_address_value(value: &Value, prefix: &str) -> bool {
    value
        .as_str()
        .map(|s| is_valid_address(s, prefix))
        .unwrap_or(false)
}

/// 입력이 prefix로 시작하는지 확인 (대소문자 무시)
pub fn has_address_prefix(candidate: &str, prefix: &str) -> bool {
    let prefix = prefix.to_lowercase();
    let head: String = candidate
        .chars()
        .take(prefix.chars().count())
        .collect::<String>()
        .to_lowercase();
    !candidate.is_empty() && head == prefix
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PREFIX: &str = "secret";

    const CASES: &[(&str, bool)] = &[
        ("function", false),
        ("secret1ktfq8n50hu78uvfylwxveag3zpwtnmcs40q4p4", true),
        ("c6d9d2cd449a754c494264e1809c50e34d64562b", false),
        ("1ktfq8n50hu78uvfylwxveag3zpwtnmcs40q4p4", false),
        ("0xc6d9d2cd449a754c494264e1809c50e34d64562b", false),
        ("0xE247A45C287191D435A8A5D72A7C8DC030451E9F", false),
        ("secret1sjllsnramtg3ewxqwwrwjxfgc4n4ef9u0tvx7u", true),
        ("secret1ktfq8n50hu78uvfylwxveag3zpwtnmcs40q4p4sd", false),
        ("SECRET1KTFQ8N50HU78UVFYLWXVEAG3ZPWTNMCS40Q4P4", true),
        ("", false),
    ];

    #[test]
    fn test_address_vectors() {
        for (candidate, expected) in CASES {
            assert_eq!(
                is_valid_address(candidate, PREFIX),
                *expected,
                "candidate {:?}",
                candidate
            );
        }
    }

    #[test]
    fn test_length_boundaries() {
        let valid = "secret1ktfq8n50hu78uvfylwxveag3zpwtnmcs40q4p4";
        assert_eq!(valid.len(), 45);
        assert!(!is_valid_address(&valid[..44], PREFIX));
        assert!(!is_valid_address(&format!("{}a", valid), PREFIX));

        assert_eq!(
            SecretAddress::parse(&valid[..44], PREFIX),
            Err(AddressError::WrongLength { expected: 45, actual: 44 })
        );
    }

    #[test]
    fn test_wrong_prefix_with_correct_length() {
        let candidate = "cosmos1ktfq8n50hu78uvfylwxveag3zpwtnmcs40q4p4";
        assert_eq!(candidate.len(), 45);
        assert!(!is_valid_address(candidate, PREFIX));
        assert!(matches!(
            SecretAddress::parse(candidate, PREFIX),
            Err(AddressError::WrongPrefix { .. })
        ));
    }

    #[test]
    fn test_non_hex_separator_rejected() {
        let candidate = format!("secret{}", "g".repeat(39));
        assert!(!is_valid_address(&candidate, PREFIX));
        assert_eq!(
            SecretAddress::parse(&candidate, PREFIX),
            Err(AddressError::InvalidCharacter { position: 6, found: 'g' })
        );
    }

    #[test]
    fn test_hex_payload_any_case() {
        let lower = format!("secret{}", "0123456789abcdef0123456789abcdef0123456");
        let upper = lower.to_uppercase();
        let mixed = format!("SeCrEt{}", "0123456789ABCdef0123456789abcDEF0123456");
        assert!(is_valid_address(&lower, PREFIX));
        assert!(is_valid_address(&upper, PREFIX));
        assert!(is_valid_address(&mixed, PREFIX));
    }

    #[test]
    fn test_non_string_values() {
        assert!(!is_valid_address_value(&json!({}), PREFIX));
        assert!(!is_valid_address_value(&json!(null), PREFIX));
        assert!(!is_valid_address_value(&json!(45), PREFIX));
        assert!(!is_valid_address_value(&json!(["secret"]), PREFIX));
        assert!(is_valid_address_value(
            &json!("secret1ktfq8n50hu78uvfylwxveag3zpwtnmcs40q4p4"),
            PREFIX
        ));
    }

    #[test]
    fn test_address_parts() {
        let address = SecretAddress::parse_default("SECRET1KTFQ8N50HU78UVFYLWXVEAG3ZPWTNMCS40Q4P4").unwrap();
        assert_eq!(address.prefix(), "SECRET");
        assert_eq!(address.payload().len(), 39);
        assert_eq!(address.normalized(), "secret1ktfq8n50hu78uvfylwxveag3zpwtnmcs40q4p4");
    }

    #[test]
    fn test_multibyte_input_does_not_panic() {
        let candidate = "시크릿".repeat(15);
        assert_eq!(candidate.chars().count(), 45);
        assert!(!is_valid_address(&candidate, PREFIX));
    }

    #[test]
    fn test_custom_prefix() {
        let candidate = "enigma1ktfq8n50hu78uvfylwxveag3zpwtnmcs40q4p4";
        assert!(is_valid_address(candidate, "enigma"));
        assert!(!is_valid_address(candidate, PREFIX));
    }

    #[test]
    fn test_has_address_prefix() {
        assert!(has_address_prefix("SECRET1abc", PREFIX));
        assert!(has_address_prefix("secret", PREFIX));
        assert!(!has_address_prefix("", PREFIX));
        assert!(!has_address_prefix("0xabc", PREFIX));
    }
}
