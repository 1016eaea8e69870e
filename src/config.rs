use crate::error::{MintError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ipfs_api_url: String,
    pub ipfs_gateway_url: String,
    pub ipfs_project_id: Option<String>,
    pub ipfs_project_secret: Option<String>,
    pub rpc_url: String,
    pub blueprint_address: Option<String>,
    pub token_pack_address: Option<String>,
    pub account: Option<String>,
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ipfs_api_url: "https://ipfs.infura.io:5001".into(),
            ipfs_gateway_url: "https://ipfs.io".into(),
            ipfs_project_id: None,
            ipfs_project_secret: None,
            rpc_url: "http://127.0.0.1:1248".into(), // ローカルウォレットのJSON-RPC
            blueprint_address: None,
            token_pack_address: None,
            account: None,
            poll_interval_ms: 2000,
        }
    }
}

impl Config {
    /// 設定ファイルを読み込み、環境変数で上書き
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MintError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("blueprint-mint").join("config.json"))
    }

    fn apply_env(&mut self) {
        // 環境変数を優先
        if let Ok(url) = std::env::var("BLUEPRINT_RPC_URL") {
            self.rpc_url = url;
        }
        if let Ok(url) = std::env::var("BLUEPRINT_IPFS_API_URL") {
            self.ipfs_api_url = url;
        }
        if let Ok(secret) = std::env::var("BLUEPRINT_IPFS_PROJECT_SECRET") {
            self.ipfs_project_secret = Some(secret);
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }

    pub fn blueprint_address(&self) -> Result<String> {
        let address = self
            .blueprint_address
            .as_deref()
            .ok_or(MintError::MissingContract("blueprint"))?;
        validate_address(address)
    }

    pub fn token_pack_address(&self) -> Result<String> {
        let address = self
            .token_pack_address
            .as_deref()
            .ok_or(MintError::MissingContract("token-pack"))?;
        validate_address(address)
    }

    pub fn set_blueprint_address(&mut self, address: &str) -> Result<()> {
        self.blueprint_address = Some(validate_address(address)?);
        Ok(())
    }

    pub fn set_token_pack_address(&mut self, address: &str) -> Result<()> {
        self.token_pack_address = Some(validate_address(address)?);
        Ok(())
    }

    pub fn set_account(&mut self, address: &str) -> Result<()> {
        self.account = Some(validate_address(address)?);
        Ok(())
    }
}

/// `0x` + 40桁の16進数
pub fn validate_address(address: &str) -> Result<String> {
    lazy_static::lazy_static! {
        static ref ADDRESS_RE: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
    }

    let address = address.trim();
    if ADDRESS_RE.is_match(address) {
        Ok(address.to_string())
    } else {
        Err(MintError::InvalidAddress(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address() {
        let address = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
        assert_eq!(validate_address(address).unwrap(), address);
        assert_eq!(validate_address(&format!("  {}\n", address)).unwrap(), address);
        assert!(matches!(
            validate_address("0x1234"),
            Err(MintError::InvalidAddress(_))
        ));
        assert!(validate_address("5FbDB2315678afecb367f032d93F642f64180aa3").is_err());
    }

    #[test]
    fn test_missing_contract() {
        let config = Config::default();
        assert!(matches!(
            config.blueprint_address(),
            Err(MintError::MissingContract("blueprint"))
        ));
        assert!(matches!(
            config.token_pack_address(),
            Err(MintError::MissingContract("token-pack"))
        ));
    }

    #[test]
    fn test_poll_interval_floor() {
        let config = Config {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }
}
