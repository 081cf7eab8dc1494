use std::fmt;
use std::str::FromStr;

use ethers::types::U256;
use num_bigint::BigUint;
use num_traits::{pow, ToPrimitive, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// rust_decimal이 표현 가능한 최대 scale
const MAX_DECIMAL_SCALE: u32 = 28;

/// 금액 파싱/변환 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("Negative amount not allowed: {0}")]
    Negative(String),

    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

struct DecimalParts<'a> {
    integer: &'a str,
    fraction: &'a str,
}

fn split_decimal(amount: &str) -> Result<DecimalParts<'_>, AmountError> {
    if amount.is_empty() {
        return Err(AmountError::Empty);
    }

    if let Some(rest) = amount.strip_prefix('-') {
        split_decimal(rest).map_err(|_| AmountError::InvalidFormat(amount.to_string()))?;
        return Err(AmountError::Negative(amount.to_string()));
    }

    let (integer, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    if !digits_only(integer) || !digits_only(fraction) || (integer.is_empty() && fraction.is_empty()) {
        return Err(AmountError::InvalidFormat(amount.to_string()));
    }

    Ok(DecimalParts { integer, fraction })
}

/// 10^scale
pub fn grains_factor(scale: u32) -> BigUint {
    pow(BigUint::from(10u32), scale as usize)
}

/// 소수부를 scale 자리까지 잘라낸다 (반올림 없음)
///
/// 입력 검증은 하지 않는다. 화면에 보이는 텍스트를 자를 때 사용.
pub fn truncate_fraction(amount: &str, scale: u32) -> String {
    match amount.split_once('.') {
        Some((integer, fraction)) if fraction.chars().count() > scale as usize => {
            let kept: String = fraction.chars().take(scale as usize).collect();
            format!("{}.{}", integer, kept)
        }
        _ => amount.to_string(),
    }
}

/// 십진 문자열 → grains (BigUint)
pub fn parse_grains(amount: &str, scale: u32) -> Result<BigUint, AmountError> {
    let parts = split_decimal(amount)?;
    let scale = scale as usize;
    // split_decimal이 ASCII 숫자만 허용하므로 바이트 슬라이스가 안전하다
    let kept = &parts.fraction[..parts.fraction.len().min(scale)];

    let mut digits = String::with_capacity(parts.integer.len() + scale);
    digits.push_str(parts.integer);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(scale - kept.len()));

    if digits.is_empty() {
        return Ok(BigUint::zero());
    }

    BigUint::from_str(&digits).map_err(|_| AmountError::InvalidFormat(amount.to_string()))
}

/// grains → 가장 짧은 정확한 십진 문자열
pub fn format_grains(grains: &BigUint, scale: u32) -> String {
    let factor = grains_factor(scale);
    let whole = grains / &factor;
    let fraction = grains % &factor;

    if fraction.is_zero() {
        return whole.to_string();
    }

    let padded = format!("{:0>width$}", fraction.to_string(), width = scale as usize);
    format!("{}.{}", whole, padded.trim_end_matches('0'))
}

/// Convert a decimal token amount to its integer base-unit string
pub fn to_base_units(amount: &str, scale: u32) -> Result<String, AmountError> {
    Ok(parse_grains(amount, scale)?.to_string())
}

/// Convert an integer base-unit string to a decimal token amount
pub fn from_base_units(amount: &str, scale: u32) -> Result<String, AmountError> {
    if amount.is_empty() {
        return Err(AmountError::Empty);
    }
    if amount.starts_with('-') {
        return Err(AmountError::Negative(amount.to_string()));
    }
    if !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidFormat(amount.to_string()));
    }

    let grains = BigUint::from_str(amount).map_err(|_| AmountError::InvalidFormat(amount.to_string()))?;
    Ok(format_grains(&grains, scale))
}

pub fn u256_to_biguint(value: U256) -> BigUint {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    BigUint::from_bytes_be(&bytes)
}

pub fn biguint_to_u256(value: &BigUint) -> Result<U256, AmountError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(AmountError::OutOfRange(value.to_string()));
    }
    Ok(U256::from_big_endian(&bytes))
}

/// 사용자 입력 토큰 수량
///
/// 값은 항상 `decimals` scale로 잘린 상태로 보관된다. grains 변환은 정확하다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenAmount {
    value: Decimal,
    decimals: u32,
}

impl TokenAmount {
    /// 텍스트 파싱 - 초과 소수부는 잘라낸다
    pub fn parse(text: &str, decimals: u32) -> Result<Self, AmountError> {
        let grains = parse_grains(text, decimals)?;
        Self::from_grains(&grains, decimals)
    }

    pub fn from_grains(grains: &BigUint, decimals: u32) -> Result<Self, AmountError> {
        if decimals > MAX_DECIMAL_SCALE {
            return Err(AmountError::OutOfRange(format!("scale {}", decimals)));
        }

        let mantissa = grains
            .to_i128()
            .ok_or_else(|| AmountError::OutOfRange(grains.to_string()))?;
        let value = Decimal::try_from_i128_with_scale(mantissa, decimals)
            .map_err(|_| AmountError::OutOfRange(grains.to_string()))?;

        Ok(Self { value, decimals })
    }

    /// 정수 토큰 수량 (예: 최소 스왑 1 ENG)
    pub fn whole(tokens: u64, decimals: u32) -> Result<Self, AmountError> {
        Self::from_grains(&(BigUint::from(tokens) * grains_factor(decimals)), decimals)
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn to_grains(&self) -> BigUint {
        let mut scaled = self.value;
        scaled.rescale(self.decimals);
        BigUint::from(scaled.mantissa().unsigned_abs())
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.normalize())
    }
}
