use std::sync::Arc;

use ethers::types::{Address, U256};
use num_bigint::BigUint;

use eng_swap::form::{reduce, FormEvent, FormSettings, FormState};
use eng_swap::mocks::{MockBehavior, MockSwapGateway, RecordingNotifier};
use eng_swap::swap::{SwapError, SwapExecutor, SwapRequest};
use eng_swap::{Config, Severity};

const RECIPIENT: &str = "SECRET1KTFQ8N50HU78UVFYLWXVEAG3ZPWTNMCS40Q4P4";

fn account() -> Address {
    Address::from_low_u64_be(0x1234)
}

fn setup(gateway: MockSwapGateway) -> (Arc<MockSwapGateway>, Arc<RecordingNotifier>, SwapExecutor) {
    let config = Config::default();
    let gateway = Arc::new(gateway);
    let notifier = Arc::new(RecordingNotifier::new());
    let executor = SwapExecutor::new(
        gateway.clone(),
        notifier.clone(),
        config.explorer_url_for(4),
        config.swap.token_decimals,
    );
    (gateway, notifier, executor)
}

async fn submittable_form(executor: &SwapExecutor, amount: &str) -> FormState {
    let settings = FormSettings::from_config(&Config::default()).unwrap();
    let balance = executor.load_balance().await.unwrap();

    let mut state = FormState::new(settings);
    for event in [
        FormEvent::BalanceLoaded(balance),
        FormEvent::SwapAmountChanged(amount.to_string()),
        FormEvent::RecipientChanged(RECIPIENT.to_string()),
        FormEvent::TermsToggled(true),
    ] {
        state = reduce(&state, event);
    }
    state
}

#[tokio::test]
async fn test_full_swap_from_form() {
    let balance = U256::from(25u64) * U256::exp10(8);
    let (gateway, notifier, executor) = setup(MockSwapGateway::new(account()).with_balance(account(), balance));

    let state = submittable_form(&executor, "12.345678919").await;
    assert!(state.can_submit());
    assert_eq!(state.swap_amount(), Some("12.34567891"));

    let request = SwapRequest::from_form(&state).unwrap();
    let state = reduce(&state, FormEvent::SubmissionStarted);
    assert!(!state.can_submit());

    let receipt = executor.execute(&request).await.unwrap();
    let state = reduce(&state, FormEvent::SubmissionFinished);
    assert!(!state.loading());

    assert_eq!(receipt.amount_grains, "1234567891");
    assert_eq!(receipt.recipient, RECIPIENT.to_lowercase());
    assert!(receipt.explorer_url.starts_with("http://rinkeby.etherscan.io/tx/0x"));

    let burns = gateway.burns().await;
    assert_eq!(burns.len(), 1);
    assert_eq!(burns[0].1, U256::from(1_234_567_891u64));

    let remaining = BigUint::from(2_500_000_000u64 - 1_234_567_891u64);
    assert_eq!(receipt.balance_after, Some(remaining.to_string()));

    let state = reduce(&state, FormEvent::BalanceLoaded(remaining.clone()));
    assert_eq!(state.token_balance(), Some(&remaining));
    assert_eq!(state.errors().swap_amount, "");
    assert_eq!(notifier.last().unwrap().severity, Severity::Success);
}

#[tokio::test]
async fn test_second_swap_reuses_remaining_allowance() {
    let balance = U256::from(10u64) * U256::exp10(8);
    let gateway = MockSwapGateway::new(account())
        .with_balance(account(), balance)
        .with_allowance(account(), balance);
    let (gateway, _notifier, executor) = setup(gateway);

    for _ in 0..2 {
        let state = submittable_form(&executor, "2").await;
        let request = SwapRequest::from_form(&state).unwrap();
        let receipt = executor.execute(&request).await.unwrap();
        assert!(receipt.approve_tx.is_none());
    }

    assert_eq!(gateway.approval_count().await, 0);
    assert_eq!(gateway.burns().await.len(), 2);
}

#[tokio::test]
async fn test_reverted_approve_stops_burn() {
    let balance = U256::from(10u64) * U256::exp10(8);
    let gateway = MockSwapGateway::new(account())
        .with_balance(account(), balance)
        .with_approve_behavior(MockBehavior::Revert);
    let (gateway, notifier, executor) = setup(gateway);

    let state = submittable_form(&executor, "5").await;
    let request = SwapRequest::from_form(&state).unwrap();
    let err = executor.execute(&request).await.unwrap_err();

    assert!(matches!(err, SwapError::Reverted { .. }));
    assert_eq!(notifier.last().unwrap().message, "Failed to approve ENG burn");
    assert!(gateway.burns().await.is_empty());
}

#[tokio::test]
async fn test_invalid_form_is_not_submitted() {
    let balance = U256::from(3u64) * U256::exp10(8);
    let (_gateway, _notifier, executor) = setup(MockSwapGateway::new(account()).with_balance(account(), balance));

    let state = submittable_form(&executor, "4").await;
    assert_eq!(state.errors().swap_amount, "Insufficient balance");

    match SwapRequest::from_form(&state) {
        Err(SwapError::Invalid(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("unexpected result: {:?}", other),
    }
}
