use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use ethers::types::H256;
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, info, warn};

use super::errors::SwapError;
use crate::blockchain::{GatewayError, SwapGateway, TransactionHandle};
use crate::common::formatting::{explorer_tx_url, format_eng};
use crate::common::math::{biguint_to_u256, u256_to_biguint, AmountError};
use crate::common::validation::SecretAddress;
use crate::form::{FormState, ValidationError};
use crate::notification::Notifier;
use crate::types::{SwapReceipt, TxEvent, TxKind};

/// 제출 가능한 폼에서 만든 스왑 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub recipient: SecretAddress,
    pub amount_grains: BigUint,
}

impl SwapRequest {
    pub fn from_form(state: &FormState) -> Result<Self, SwapError> {
        if state.loading() {
            return Err(SwapError::AlreadyInFlight);
        }
        if !state.can_submit() {
            return Err(SwapError::Invalid(state.validation_failures()));
        }

        match (state.validated_recipient(), state.swap_amount_grains()) {
            (Some(recipient), Some(amount_grains)) => Ok(Self { recipient, amount_grains }),
            _ => Err(SwapError::Invalid(state.validation_failures())),
        }
    }
}

/// future가 도중에 drop되어도 in-flight 플래그를 해제
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// approve → burn 파이프라인
///
/// 한 번에 하나의 스왑만 진행한다. 브로드캐스트된 트랜잭션은 취소할 수 없다.
pub struct SwapExecutor {
    gateway: Arc<dyn SwapGateway>,
    notifier: Arc<dyn Notifier>,
    explorer_base_url: String,
    token_decimals: u32,
    in_flight: AtomicBool,
}

impl SwapExecutor {
    pub fn new(
        gateway: Arc<dyn SwapGateway>,
        notifier: Arc<dyn Notifier>,
        explorer_base_url: impl Into<String>,
        token_decimals: u32,
    ) -> Self {
        Self {
            gateway,
            notifier,
            explorer_base_url: explorer_base_url.into(),
            token_decimals,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn explorer_url(&self, hash: H256) -> String {
        explorer_tx_url(&self.explorer_base_url, hash)
    }

    /// 서명 계정의 ENG 잔고 (grains)
    pub async fn load_balance(&self) -> Result<BigUint, SwapError> {
        let account = self.gateway.account().ok_or(GatewayError::NoAccount)?;
        let balance = u256_to_biguint(self.gateway.balance_of(account).await?);
        info!("💰 ENG 잔고: {}", format_eng(&balance, self.token_decimals));
        Ok(balance)
    }

    /// 스왑 실행 - 실패 시 분류된 메시지를 알림으로 표시
    pub async fn execute(&self, request: &SwapRequest) -> Result<SwapReceipt, SwapError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            warn!("⚠️ 이미 진행 중인 스왑이 있습니다");
            return Err(SwapError::AlreadyInFlight);
        }

        let result = {
            let _guard = InFlightGuard(&self.in_flight);
            self.run(request).await
        };

        if let Err(e) = &result {
            self.notifier.error(&e.user_message());
        }
        result
    }

    async fn run(&self, request: &SwapRequest) -> Result<SwapReceipt, SwapError> {
        if request.amount_grains.is_zero() {
            return Err(AmountError::Empty.into());
        }

        let account = self.gateway.account().ok_or(GatewayError::NoAccount)?;
        let spender = self.gateway.swap_contract();
        let amount = biguint_to_u256(&request.amount_grains)?;
        let recipient = request.recipient.normalized();

        info!(
            "🔄 스왑 시작: {} → {}",
            format_eng(&request.amount_grains, self.token_decimals),
            recipient
        );

        let (balance, allowance) = futures::try_join!(
            self.gateway.balance_of(account),
            self.gateway.allowance(account, spender)
        )?;

        if balance < amount {
            return Err(SwapError::Invalid(vec![ValidationError::AmountExceedsBalance {
                requested: request.amount_grains.to_string(),
                available: balance.to_string(),
            }]));
        }

        let approve_tx = if allowance < amount {
            self.notifier.info("Open your wallet and sign the 'Approve' transaction");
            let handle = self.gateway.approve(spender, amount).await?;
            Some(self.follow(handle).await?)
        } else {
            debug!("allowance {} 충분 - approve 생략", allowance);
            None
        };

        let handle = self.gateway.burn(&recipient, amount).await?;
        let burn_tx = self.follow(handle).await?;

        let explorer_url = self.explorer_url(burn_tx);
        info!("🔗 {}", explorer_url);

        // 잔고 갱신 실패는 스왑 결과에 영향을 주지 않는다
        let balance_after = match self.load_balance().await {
            Ok(balance) => Some(balance.to_string()),
            Err(e) => {
                warn!("⚠️ 잔고 갱신 실패: {}", e);
                None
            }
        };

        Ok(SwapReceipt {
            approve_tx,
            burn_tx,
            amount_grains: request.amount_grains.to_string(),
            recipient,
            explorer_url,
            balance_after,
            completed_at: Utc::now(),
        })
    }

    /// 종료 이벤트까지 따라가며 진행 상황을 알린다
    async fn follow(&self, mut handle: TransactionHandle) -> Result<H256, SwapError> {
        let kind = handle.kind();

        while let Some(event) = handle.next_event().await {
            match event {
                TxEvent::Submitted(hash) => {
                    debug!("📤 {} 제출됨: {:?}", kind, hash);
                    match kind {
                        TxKind::Approve => self.notifier.info("Broadcasting 'Approve ENG transfer'"),
                        TxKind::Burn => self.notifier.info("Broadcasting 'Burn' transaction"),
                    }
                }
                TxEvent::Confirmed { hash, success: true } => {
                    match kind {
                        TxKind::Approve => self.notifier.info("Approved. Sign the 'Burn' transaction"),
                        TxKind::Burn => self.notifier.success("ENG Burn confirmed"),
                    }
                    return Ok(hash);
                }
                TxEvent::Confirmed { hash, success: false } => {
                    return Err(SwapError::Reverted { kind, hash });
                }
                TxEvent::Failed(message) => {
                    return Err(SwapError::Rejected { kind, message });
                }
            }
        }

        Err(SwapError::Rejected {
            kind,
            message: format!("{} transaction channel closed", kind),
        })
    }
}
