use anyhow::Result;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::Serialize;

use super::errors::{FormField, ValidationError, ValidationErrors};
use crate::common::math::{format_grains, parse_grains, truncate_fraction, AmountError};
use crate::common::validation::{has_address_prefix, AddressError, SecretAddress};
use crate::config::Config;
use crate::constants::{DEFAULT_ADDRESS_PREFIX, TOKEN_DECIMALS};

/// 폼 검증 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSettings {
    pub address_prefix: String,
    pub token_decimals: u32,
    pub min_swap_grains: BigUint,
}

impl FormSettings {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            address_prefix: config.swap.address_prefix.clone(),
            token_decimals: config.swap.token_decimals,
            min_swap_grains: config.min_swap_grains()?,
        })
    }
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            address_prefix: DEFAULT_ADDRESS_PREFIX.to_string(),
            token_decimals: TOKEN_DECIMALS,
            min_swap_grains: BigUint::from(10u32).pow(TOKEN_DECIMALS),
        }
    }
}

/// 폼 입력 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    SwapAmountChanged(String),
    RecipientChanged(String),
    TermsToggled(bool),
    /// 잔고 조회 완료 (grains)
    BalanceLoaded(BigUint),
    /// 전체 잔고로 채우기
    MaxAmountRequested,
    /// 계정 변경 - 에러 초기화
    AccountsChanged,
    SubmissionStarted,
    SubmissionFinished,
    Reset,
}

/// 스왑 폼의 불변 상태값
///
/// 상태 변경은 [`reduce`]로만 이루어지며 항상 새 값을 반환한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    settings: FormSettings,
    swap_amount: Option<String>,
    recipient_address: Option<String>,
    accepted: bool,
    errors: ValidationErrors,
    loading: bool,
    token_balance: Option<BigUint>,
}

impl FormState {
    pub fn new(settings: FormSettings) -> Self {
        Self {
            settings,
            swap_amount: None,
            recipient_address: None,
            accepted: false,
            errors: ValidationErrors::default(),
            loading: false,
            token_balance: None,
        }
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn swap_amount(&self) -> Option<&str> {
        self.swap_amount.as_deref()
    }

    pub fn recipient_address(&self) -> Option<&str> {
        self.recipient_address.as_deref()
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn token_balance(&self) -> Option<&BigUint> {
        self.token_balance.as_ref()
    }

    /// 잔고가 알려져 있고 0보다 큰지
    pub fn has_balance(&self) -> bool {
        self.token_balance.as_ref().map_or(false, |b| !b.is_zero())
    }

    /// 입력 금액의 grains 값 (파싱 가능할 때만)
    pub fn swap_amount_grains(&self) -> Option<BigUint> {
        self.swap_amount
            .as_deref()
            .and_then(|text| parse_grains(text, self.settings.token_decimals).ok())
    }

    /// 제출 가능 여부
    pub fn can_submit(&self) -> bool {
        !self.loading
            && self.accepted
            && self.swap_amount_grains().map_or(false, |g| !g.is_zero())
            && self.recipient_address.as_deref().map_or(false, |r| !r.is_empty())
            && self.errors.is_clean()
    }

    /// 현재 입력 전체를 다시 검증한 결과
    pub fn validation_failures(&self) -> Vec<ValidationError> {
        let mut failures = Vec::new();

        if let Err(e) = check_amount(self.swap_amount.as_deref().unwrap_or(""), &self.settings, self.token_balance.as_ref()) {
            failures.push(e);
        }
        if let Err(e) = check_recipient(self.recipient_address.as_deref().unwrap_or(""), &self.settings.address_prefix) {
            failures.push(e);
        }
        if let Err(e) = check_terms(self.accepted) {
            failures.push(e);
        }

        failures
    }

    /// 검증을 통과한 목적지 주소
    pub fn validated_recipient(&self) -> Option<SecretAddress> {
        self.recipient_address
            .as_deref()
            .and_then(|r| SecretAddress::parse(r, &self.settings.address_prefix).ok())
    }

    fn with_amount(mut self, text: String) -> Self {
        let text = truncate_fraction(&text, self.settings.token_decimals);
        let result = check_amount(&text, &self.settings, self.token_balance.as_ref());
        self.errors.record(FormField::SwapAmount, &result);
        self.swap_amount = Some(text);
        self
    }
}

fn check_amount(text: &str, settings: &FormSettings, balance: Option<&BigUint>) -> Result<BigUint, ValidationError> {
    let minimum = || ValidationError::AmountBelowMinimum {
        minimum: format_grains(&settings.min_swap_grains, settings.token_decimals),
    };

    let grains = match parse_grains(text, settings.token_decimals) {
        Ok(grains) => grains,
        // 음수는 숫자로는 유효하므로 최소 수량 위반으로 본다
        Err(AmountError::Negative(_)) => return Err(minimum()),
        Err(e) => return Err(ValidationError::InvalidAmountFormat(e)),
    };

    if grains < settings.min_swap_grains {
        return Err(minimum());
    }

    let zero = BigUint::zero();
    let available = balance.unwrap_or(&zero);
    if &grains > available {
        return Err(ValidationError::AmountExceedsBalance {
            requested: grains.to_string(),
            available: available.to_string(),
        });
    }

    Ok(grains)
}

fn check_recipient(text: &str, prefix: &str) -> Result<SecretAddress, ValidationError> {
    if !has_address_prefix(text, prefix) {
        return Err(ValidationError::InvalidAddressFormat(AddressError::WrongPrefix {
            expected: prefix.to_lowercase(),
        }));
    }
    SecretAddress::parse(text, prefix).map_err(ValidationError::InvalidAddressFormat)
}

fn check_terms(accepted: bool) -> Result<(), ValidationError> {
    if accepted {
        Ok(())
    } else {
        Err(ValidationError::TermsNotAccepted)
    }
}

/// 폼 상태 전이 함수 (순수 함수)
pub fn reduce(state: &FormState, event: FormEvent) -> FormState {
    let mut next = state.clone();

    match event {
        FormEvent::SwapAmountChanged(text) => {
            next = next.with_amount(text);
        }
        FormEvent::RecipientChanged(text) => {
            let result = check_recipient(&text, &next.settings.address_prefix);
            next.errors.record(FormField::RecipientAddress, &result);
            next.recipient_address = Some(text);
        }
        FormEvent::TermsToggled(checked) => {
            next.errors.record(FormField::TermsAccepted, &check_terms(checked));
            next.accepted = checked;
        }
        FormEvent::BalanceLoaded(balance) => {
            next.token_balance = Some(balance);
            if let Some(text) = next.swap_amount.take() {
                next = next.with_amount(text);
            }
        }
        FormEvent::MaxAmountRequested => {
            let decimals = next.settings.token_decimals;
            let full = next
                .token_balance
                .as_ref()
                .filter(|b| !b.is_zero())
                .map(|b| format_grains(b, decimals));
            if let Some(text) = full {
                next = next.with_amount(text);
            }
        }
        FormEvent::AccountsChanged => {
            next.errors.clear();
        }
        FormEvent::SubmissionStarted => {
            next.loading = true;
        }
        FormEvent::SubmissionFinished => {
            next.loading = false;
        }
        FormEvent::Reset => {
            next.swap_amount = None;
            next.recipient_address = None;
            next.accepted = false;
        }
    }

    next
}
