use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command};
use num_bigint::BigUint;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eng_swap::blockchain::EthersSwapGateway;
use eng_swap::common::formatting::format_eng;
use eng_swap::common::math::{from_base_units, to_base_units};
use eng_swap::common::validation::{is_valid_address_value, SecretAddress};
use eng_swap::form::{reduce, FormEvent, FormSettings, FormState};
use eng_swap::mocks::{get_mock_config, is_mock_mode, MockSwapGateway};
use eng_swap::notification::TracingNotifier;
use eng_swap::swap::{SwapExecutor, SwapRequest};
use eng_swap::{Config, SwapGateway, SwapReceipt};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let _ = dotenvy::dotenv();

    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config/default.toml");
    let (config, from_file) = load_config(config_path).await?;

    // 로그 레벨: --log-level 우선, 없으면 설정 파일의 monitoring.log_level
    let cli_level = matches.get_one::<String>("log-level").map(String::as_str);
    let log_filter = resolve_log_level(cli_level, &config);

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if from_file {
        info!("📋 설정 파일 로드 완료: {}", config_path);
    } else {
        warn!("⚠️ 설정 파일 없음 ({}), 기본값 사용", config_path);
    }

    match matches.subcommand() {
        Some(("check-address", sub)) => cmd_check_address(&config, sub),
        Some(("to-grains", sub)) => cmd_to_grains(&config, sub),
        Some(("from-grains", sub)) => cmd_from_grains(&config, sub),
        Some(("check-batch", sub)) => cmd_check_batch(&config, sub).await,
        Some(("balance", _)) => cmd_balance(&config).await,
        Some(("swap", sub)) => cmd_swap(&config, sub).await,
        _ => Err(anyhow!("Unknown command")),
    }
}

fn build_cli() -> Command {
    Command::new("engswap")
        .version("0.1.0")
        .about("🔥 ENG → SCRT 소각 스왑 도구")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("설정 파일 경로")
                .default_value("config/default.toml")
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("로그 레벨 (trace, debug, info, warn, error), 기본: 설정값")
                .global(true),
        )
        .subcommand(
            Command::new("check-address")
                .about("목적지 주소 형식 검사")
                .arg(Arg::new("address").required(true))
                .arg(
                    Arg::new("prefix")
                        .short('p')
                        .long("prefix")
                        .value_name("HRP")
                        .help("주소 prefix (기본: 설정값)"),
                ),
        )
        .subcommand(
            Command::new("to-grains")
                .about("ENG 수량 → grains")
                .arg(Arg::new("amount").required(true).allow_hyphen_values(true)),
        )
        .subcommand(
            Command::new("from-grains")
                .about("grains → ENG 수량")
                .arg(Arg::new("grains").required(true)),
        )
        .subcommand(
            Command::new("check-batch")
                .about("JSON 배열 파일의 주소들을 일괄 검사")
                .arg(Arg::new("file").required(true).value_name("FILE")),
        )
        .subcommand(Command::new("balance").about("서명 계정의 ENG 잔고 조회"))
        .subcommand(
            Command::new("swap")
                .about("ENG 소각 스왑 실행 (approve → burnFunds)")
                .arg(
                    Arg::new("amount")
                        .short('a')
                        .long("amount")
                        .value_name("ENG")
                        .allow_hyphen_values(true)
                        .help("스왑할 ENG 수량"),
                )
                .arg(
                    Arg::new("max")
                        .long("max")
                        .help("전체 잔고 스왑")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("amount"),
                )
                .arg(
                    Arg::new("to")
                        .short('t')
                        .long("to")
                        .value_name("ADDRESS")
                        .required(true)
                        .help("SCRT 수령 주소"),
                )
                .arg(
                    Arg::new("accept-terms")
                        .long("accept-terms")
                        .help("이용 약관 동의")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}

/// 설정 로드 (파일이 없으면 기본값) - 두 번째 값은 파일에서 읽었는지 여부
async fn load_config(path: &str) -> Result<(Config, bool)> {
    let from_file = Path::new(path).exists();
    let mut config = if from_file {
        Config::load(path).await?
    } else {
        Config::default()
    };

    // 환경 변수에서 민감한 정보 로드
    config.apply_env_overrides();

    config.validate().context("설정 검증 실패")?;
    Ok((config, from_file))
}

fn resolve_log_level(cli_level: Option<&str>, config: &Config) -> &'static str {
    match cli_level.unwrap_or(config.monitoring.log_level.as_str()) {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing argument: {}", name))
}

fn cmd_check_address(config: &Config, matches: &ArgMatches) -> Result<()> {
    let address = required(matches, "address")?;
    let prefix = matches
        .get_one::<String>("prefix")
        .map(String::as_str)
        .unwrap_or(&config.swap.address_prefix);

    match SecretAddress::parse(address, prefix) {
        Ok(parsed) => {
            println!("true");
            info!("✅ 유효한 주소: {} (prefix {})", parsed.normalized(), parsed.prefix());
        }
        Err(e) => {
            println!("false");
            info!("❌ {}", e);
        }
    }
    Ok(())
}

fn cmd_to_grains(config: &Config, matches: &ArgMatches) -> Result<()> {
    let amount = required(matches, "amount")?;
    let grains = to_base_units(amount, config.swap.token_decimals)?;
    println!("{}", grains);
    Ok(())
}

fn cmd_from_grains(config: &Config, matches: &ArgMatches) -> Result<()> {
    let grains = required(matches, "grains")?;
    let amount = from_base_units(grains, config.swap.token_decimals)?;
    println!("{}", amount);
    Ok(())
}

/// JSON 배열의 각 항목에 대한 검사 결과
fn check_batch(content: &str, prefix: &str) -> Result<Vec<(serde_json::Value, bool)>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(content).context("입력은 JSON 배열이어야 합니다")?;
    Ok(values
        .into_iter()
        .map(|value| {
            let valid = is_valid_address_value(&value, prefix);
            (value, valid)
        })
        .collect())
}

async fn cmd_check_batch(config: &Config, matches: &ArgMatches) -> Result<()> {
    let path = required(matches, "file")?;
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("파일을 읽을 수 없습니다: {}", path))?;

    let results = check_batch(&content, &config.swap.address_prefix)?;
    let valid = results.iter().filter(|(_, ok)| *ok).count();
    for (value, ok) in &results {
        println!("{}\t{}", ok, value);
    }
    info!("📊 {}개 중 {}개 유효", results.len(), valid);
    Ok(())
}

async fn connect_gateway(config: &Config) -> Result<Arc<dyn SwapGateway>> {
    if is_mock_mode() {
        warn!("🎭 Mock 모드 - 실제 트랜잭션을 전송하지 않습니다");
        let mut gateway = MockSwapGateway::from_mock_config(&get_mock_config());
        if let Some(deployment) = config.deployment_for(gateway.chain_id()) {
            gateway = gateway.with_swap_contract(deployment.swap_contract);
        }
        return Ok(Arc::new(gateway));
    }

    info!("🔌 RPC 연결 중: {}", config.network.rpc_url);
    let gateway: Arc<dyn SwapGateway> = if config.network.private_key.is_some() {
        Arc::new(EthersSwapGateway::connect_with_signer(config).await?)
    } else {
        warn!("🔒 PRIVATE_KEY 없음 - 읽기 전용 모드");
        Arc::new(EthersSwapGateway::connect_read_only(config).await?)
    };
    Ok(gateway)
}

fn build_executor(config: &Config, gateway: Arc<dyn SwapGateway>) -> SwapExecutor {
    let explorer = config.explorer_url_for(gateway.chain_id()).to_string();
    SwapExecutor::new(
        gateway,
        Arc::new(TracingNotifier),
        explorer,
        config.swap.token_decimals,
    )
}

async fn cmd_balance(config: &Config) -> Result<()> {
    let gateway = connect_gateway(config).await?;
    let executor = build_executor(config, gateway);

    let balance = executor.load_balance().await?;
    println!("{}", format_eng(&balance, config.swap.token_decimals));
    Ok(())
}

/// 입력값을 폼 이벤트로 재생
fn fill_form(
    settings: FormSettings,
    balance: BigUint,
    amount: Option<&str>,
    recipient: &str,
    accepted: bool,
) -> FormState {
    let mut state = reduce(&FormState::new(settings), FormEvent::BalanceLoaded(balance));

    let amount_event = match amount {
        Some(text) => FormEvent::SwapAmountChanged(text.to_string()),
        None => FormEvent::MaxAmountRequested,
    };

    for event in [
        amount_event,
        FormEvent::RecipientChanged(recipient.to_string()),
        FormEvent::TermsToggled(accepted),
    ] {
        state = reduce(&state, event);
    }
    state
}

async fn cmd_swap(config: &Config, matches: &ArgMatches) -> Result<()> {
    let amount = matches.get_one::<String>("amount").map(String::as_str);
    if amount.is_none() && !matches.get_flag("max") {
        return Err(anyhow!("Either --amount or --max is required"));
    }
    let recipient = required(matches, "to")?;

    let gateway = connect_gateway(config).await?;
    let executor = build_executor(config, gateway);

    let balance = executor.load_balance().await?;
    let settings = FormSettings::from_config(config)?;
    let state = fill_form(settings, balance, amount, recipient, matches.get_flag("accept-terms"));

    if !state.can_submit() {
        for (field, message) in state.errors().messages() {
            error!("❌ {}: {}", field, message);
        }
        return Err(anyhow!("Swap form is not valid"));
    }

    let request = SwapRequest::from_form(&state)?;
    let state = reduce(&state, FormEvent::SubmissionStarted);

    let result = executor.execute(&request).await;
    let state = finish_submission(&state, result.as_ref().ok());

    let receipt = result?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    info!("🎉 스왑 완료: {}", receipt.explorer_url);
    if let Some(balance) = state.token_balance() {
        info!("💰 남은 잔고: {}", format_eng(balance, config.swap.token_decimals));
    }
    Ok(())
}

/// 제출 종료 처리 - burn 이후 잔고로 폼을 다시 검증
fn finish_submission(state: &FormState, receipt: Option<&SwapReceipt>) -> FormState {
    let next = reduce(state, FormEvent::SubmissionFinished);

    let refreshed = receipt
        .and_then(|r| r.balance_after.as_deref())
        .and_then(|b| b.parse::<BigUint>().ok());
    match refreshed {
        Some(balance) => reduce(&next, FormEvent::BalanceLoaded(balance)),
        None => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPIENT: &str = "secret1sjllsnramtg3ewxqwwrwjxfgc4n4ef9u0tvx7u";

    fn grains(tokens: u64) -> BigUint {
        BigUint::from(tokens) * BigUint::from(100_000_000u64)
    }

    #[test]
    fn test_cli_parses_swap() {
        let matches = build_cli()
            .try_get_matches_from(["engswap", "swap", "--amount", "2.5", "--to", RECIPIENT, "--accept-terms"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "swap");
        assert_eq!(sub.get_one::<String>("amount").unwrap(), "2.5");
        assert!(sub.get_flag("accept-terms"));
        assert_eq!(matches.get_one::<String>("config").unwrap(), "config/default.toml");
    }

    #[test]
    fn test_cli_rejects_amount_with_max() {
        let result = build_cli().try_get_matches_from([
            "engswap", "swap", "--amount", "1", "--max", "--to", RECIPIENT,
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_batch() {
        let content = format!(r#"["{}", 42, null, "0xc6d9d2cd449a754c494264e1809c50e34d64562b", ""]"#, RECIPIENT);
        let results = check_batch(&content, "secret").unwrap();
        let flags: Vec<bool> = results.iter().map(|(_, ok)| *ok).collect();
        assert_eq!(flags, vec![true, false, false, false, false]);

        assert!(check_batch("{\"not\": \"array\"}", "secret").is_err());
    }

    #[test]
    fn test_fill_form() {
        let state = fill_form(FormSettings::default(), grains(10), Some("3"), RECIPIENT, true);
        assert!(state.can_submit());

        let state = fill_form(FormSettings::default(), grains(10), None, RECIPIENT, true);
        assert_eq!(state.swap_amount_grains(), Some(grains(10)));

        let state = fill_form(FormSettings::default(), grains(10), Some("3"), RECIPIENT, false);
        assert!(!state.can_submit());
        assert_eq!(state.errors().terms_accepted, "You must agree to the terms and conditions");
    }

    #[test]
    fn test_load_missing_config_uses_default() {
        let (config, from_file) = tokio_test::block_on(load_config("does/not/exist.toml")).unwrap();
        assert!(!from_file);
        assert_eq!(config.swap.token_decimals, 8);
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let mut config = Config::default();
        config.monitoring.log_level = "debug".to_string();

        assert_eq!(resolve_log_level(None, &config), "debug");
        assert_eq!(resolve_log_level(Some("warn"), &config), "warn");
        assert_eq!(resolve_log_level(Some("loud"), &config), "info");

        let matches = build_cli().try_get_matches_from(["engswap", "balance"]).unwrap();
        assert!(matches.get_one::<String>("log-level").is_none());
    }

    #[test]
    fn test_finish_submission_reloads_balance() {
        let state = fill_form(FormSettings::default(), grains(10), Some("3"), RECIPIENT, true);
        let state = reduce(&state, FormEvent::SubmissionStarted);
        assert!(state.loading());

        let receipt = SwapReceipt {
            approve_tx: None,
            burn_tx: ethers::types::H256::zero(),
            amount_grains: grains(3).to_string(),
            recipient: RECIPIENT.to_string(),
            explorer_url: String::new(),
            balance_after: Some(grains(2).to_string()),
            completed_at: chrono::Utc::now(),
        };

        let finished = finish_submission(&state, Some(&receipt));
        assert!(!finished.loading());
        assert_eq!(finished.token_balance(), Some(&grains(2)));
        assert_eq!(finished.errors().swap_amount, "Insufficient balance");

        let failed = finish_submission(&state, None);
        assert!(!failed.loading());
        assert_eq!(failed.token_balance(), Some(&grains(10)));
    }
}
