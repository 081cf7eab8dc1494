use std::collections::HashSet;

use anyhow::{anyhow, Context, Result};
use ethers::types::H160;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::math::TokenAmount;
use crate::constants::{
    APPROVE_GAS_LIMIT, BURN_GAS_LIMIT, DEFAULT_ADDRESS_PREFIX, ETHERSCAN_MAINNET, ETHERSCAN_RINKEBY,
    MAINNET_CHAIN_ID, MIN_SWAP_AMOUNT, TOKEN_DECIMALS,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    /// 서명용 private key (없으면 읽기 전용)
    #[serde(default)]
    pub private_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// 목적지 주소 prefix (bech32 HRP)
    pub address_prefix: String,
    pub token_decimals: u32,
    /// 최소 스왑 수량 (ENG, 십진 문자열)
    pub min_swap_amount: String,
    pub approve_gas_limit: u64,
    pub burn_gas_limit: u64,
}

/// 체인별 EngSwap 컨트랙트 배포 정보
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentConfig {
    pub chain_id: u64,
    pub swap_contract: H160,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    pub mainnet_tx_url: String,
    pub testnet_tx_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub swap: SwapConfig,
    #[serde(default)]
    pub deployments: Vec<DeploymentConfig>,
    pub explorer: ExplorerConfig,
    pub monitoring: MonitoringConfig,
}

impl Config {
    pub async fn load(path: &str) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("설정 파일을 읽을 수 없습니다: {}", path))?;
        let config: Config = toml::from_str(&content).context("설정 파일 파싱 실패")?;
        Ok(config)
    }

    pub async fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    pub fn default() -> Self {
        Self {
            network: NetworkConfig {
                rpc_url: "http://127.0.0.1:8545".to_string(),
                private_key: None,
            },
            swap: SwapConfig {
                address_prefix: DEFAULT_ADDRESS_PREFIX.to_string(),
                token_decimals: TOKEN_DECIMALS,
                min_swap_amount: MIN_SWAP_AMOUNT.to_string(),
                approve_gas_limit: APPROVE_GAS_LIMIT,
                burn_gas_limit: BURN_GAS_LIMIT,
            },
            deployments: vec![],
            explorer: ExplorerConfig {
                mainnet_tx_url: ETHERSCAN_MAINNET.to_string(),
                testnet_tx_url: ETHERSCAN_RINKEBY.to_string(),
            },
            monitoring: MonitoringConfig {
                log_level: "info".to_string(),
            },
        }
    }

    /// 환경 변수에서 설정 덮어쓰기 (.env는 main에서 dotenvy로 먼저 로드)
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup("BECH32_PREFIX") {
            info!("🏷️ Address prefix loaded from environment: {}", prefix);
            self.swap.address_prefix = prefix;
        }

        if let Some(rpc_url) = lookup("RPC_URL") {
            info!("🌐 RPC URL loaded from environment");
            self.network.rpc_url = rpc_url;
        }

        if let Some(private_key) = lookup("PRIVATE_KEY") {
            info!("🔑 Private key loaded from environment");
            self.network.private_key = Some(private_key);
        }
    }

    pub fn deployment_for(&self, chain_id: u64) -> Option<&DeploymentConfig> {
        self.deployments.iter().find(|d| d.chain_id == chain_id)
    }

    pub fn explorer_url_for(&self, chain_id: u64) -> &str {
        if chain_id == MAINNET_CHAIN_ID {
            &self.explorer.mainnet_tx_url
        } else {
            &self.explorer.testnet_tx_url
        }
    }

    /// 최소 스왑 수량 (grains)
    pub fn min_swap_grains(&self) -> Result<BigUint> {
        let amount = TokenAmount::parse(&self.swap.min_swap_amount, self.swap.token_decimals)
            .map_err(|e| anyhow!("Invalid minimum swap amount: {}", e))?;
        Ok(amount.to_grains())
    }

    pub fn validate(&self) -> Result<()> {
        if self.network.rpc_url.is_empty() {
            return Err(anyhow!("Network RPC URL cannot be empty"));
        }

        let prefix = &self.swap.address_prefix;
        if prefix.is_empty() {
            return Err(anyhow!("Address prefix cannot be empty"));
        }
        if !prefix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(anyhow!("Address prefix must be lowercase alphanumeric: {}", prefix));
        }

        if self.swap.token_decimals > 28 {
            return Err(anyhow!("Token decimals must be at most 28"));
        }

        self.min_swap_grains()?;

        if self.swap.approve_gas_limit == 0 || self.swap.burn_gas_limit == 0 {
            return Err(anyhow!("Gas limits must be greater than 0"));
        }

        let mut seen = HashSet::new();
        for deployment in &self.deployments {
            if !seen.insert(deployment.chain_id) {
                return Err(anyhow!("Duplicate deployment for chain {}", deployment.chain_id));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.swap.address_prefix, "secret");
        assert_eq!(config.swap.token_decimals, 8);
        assert_eq!(config.swap.approve_gas_limit, 50_000);
        assert_eq!(config.swap.burn_gas_limit, 100_000);
        assert!(config.deployments.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.network.rpc_url = "".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.swap.address_prefix = "Secret".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.swap.min_swap_amount = "one".to_string();
        assert!(config.validate().is_err());

        config = Config::default();
        config.swap.burn_gas_limit = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        let deployment = DeploymentConfig {
            chain_id: 4,
            swap_contract: H160::from_low_u64_be(1),
        };
        config.deployments = vec![deployment.clone(), deployment];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_swap_grains() {
        let config = Config::default();
        assert_eq!(config.min_swap_grains().unwrap(), BigUint::from(100_000_000u64));
    }

    #[test]
    fn test_env_overrides() {
        let mut env = HashMap::new();
        env.insert("BECH32_PREFIX", "enigma".to_string());
        env.insert("PRIVATE_KEY", "0xabc".to_string());

        let mut config = Config::default();
        config.apply_overrides_from(|key| env.get(key).cloned());

        assert_eq!(config.swap.address_prefix, "enigma");
        assert_eq!(config.network.private_key.as_deref(), Some("0xabc"));
        assert_eq!(config.network.rpc_url, "http://127.0.0.1:8545");
    }

    #[test]
    fn test_deployment_lookup_and_explorer() {
        let mut config = Config::default();
        config.deployments.push(DeploymentConfig {
            chain_id: 4,
            swap_contract: H160::from_low_u64_be(42),
        });

        assert!(config.deployment_for(4).is_some());
        assert!(config.deployment_for(1).is_none());
        assert_eq!(config.explorer_url_for(1), "http://etherscan.io/tx/");
        assert_eq!(config.explorer_url_for(4), "http://rinkeby.etherscan.io/tx/");
    }

    #[tokio::test]
    async fn test_config_file_round_trip() {
        let mut config = Config::default();
        config.deployments.push(DeploymentConfig {
            chain_id: 1,
            swap_contract: H160::from_low_u64_be(7),
        });

        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        config.save(&path).await.unwrap();

        let loaded = Config::load(&path).await.unwrap();
        assert_eq!(loaded.deployments, config.deployments);
        assert_eq!(loaded.swap.address_prefix, config.swap.address_prefix);
    }
}
