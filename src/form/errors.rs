use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::math::AmountError;
use crate::common::validation::AddressError;

/// 폼 입력 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    SwapAmount,
    RecipientAddress,
    TermsAccepted,
}

impl FormField {
    pub const ALL: [FormField; 3] = [
        FormField::SwapAmount,
        FormField::RecipientAddress,
        FormField::TermsAccepted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::SwapAmount => "swapAmount",
            FormField::RecipientAddress => "recipientAddress",
            FormField::TermsAccepted => "termsAccepted",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 필드 단위 검증 실패 (사용자 메시지는 Display)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0}")]
    InvalidAddressFormat(AddressError),

    #[error("Invalid swap amount")]
    InvalidAmountFormat(AmountError),

    #[error("Minimum {minimum} ENG")]
    AmountBelowMinimum { minimum: String },

    #[error("Insufficient balance")]
    AmountExceedsBalance { requested: String, available: String },

    #[error("You must agree to the terms and conditions")]
    TermsNotAccepted,
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::InvalidAddressFormat(_) => FormField::RecipientAddress,
            ValidationError::InvalidAmountFormat(_)
            | ValidationError::AmountBelowMinimum { .. }
            | ValidationError::AmountExceedsBalance { .. } => FormField::SwapAmount,
            ValidationError::TermsNotAccepted => FormField::TermsAccepted,
        }
    }
}

/// 필드명 → 에러 메시지 (빈 문자열 = 에러 없음)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrors {
    pub swap_amount: String,
    pub recipient_address: String,
    pub terms_accepted: String,
}

impl ValidationErrors {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::SwapAmount => &self.swap_amount,
            FormField::RecipientAddress => &self.recipient_address,
            FormField::TermsAccepted => &self.terms_accepted,
        }
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::SwapAmount => &mut self.swap_amount,
            FormField::RecipientAddress => &mut self.recipient_address,
            FormField::TermsAccepted => &mut self.terms_accepted,
        }
    }

    /// 검증 결과를 해당 필드에 기록 (Ok면 메시지 제거)
    pub fn record<T>(&mut self, field: FormField, result: &Result<T, ValidationError>) {
        let message = match result {
            Ok(_) => String::new(),
            Err(e) => e.to_string(),
        };
        *self.slot(field) = message;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_clean(&self) -> bool {
        FormField::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    /// 메시지가 있는 필드만
    pub fn messages(&self) -> impl Iterator<Item = (FormField, &str)> + '_ {
        FormField::ALL
            .iter()
            .map(move |field| (*field, self.get(*field)))
            .filter(|(_, message)| !message.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::AmountBelowMinimum { minimum: "1".to_string() }.to_string(),
            "Minimum 1 ENG"
        );
        assert_eq!(
            ValidationError::InvalidAmountFormat(AmountError::Empty).to_string(),
            "Invalid swap amount"
        );
        assert_eq!(
            ValidationError::InvalidAddressFormat(AddressError::WrongPrefix {
                expected: "secret".to_string()
            })
            .to_string(),
            "Invalid prefix, expected secret"
        );
    }

    #[test]
    fn test_record_and_clean() {
        let mut errors = ValidationErrors::default();
        assert!(errors.is_clean());

        let failed: Result<(), ValidationError> = Err(ValidationError::TermsNotAccepted);
        errors.record(FormField::TermsAccepted, &failed);
        assert!(!errors.is_clean());
        assert_eq!(errors.messages().count(), 1);

        errors.record(FormField::TermsAccepted, &Ok(()));
        assert!(errors.is_clean());
    }

    #[test]
    fn test_serialized_field_names() {
        let errors = ValidationErrors {
            swap_amount: "Insufficient balance".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["swapAmount"], "Insufficient balance");
        assert_eq!(json["recipientAddress"], "");
        assert_eq!(json["termsAccepted"], "");
    }
}
