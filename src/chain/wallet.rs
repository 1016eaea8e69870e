//! ウォレット（アカウント）連携

use super::rpc::JsonRpcClient;
use crate::error::{MintError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

#[async_trait]
pub trait Wallet: Send + Sync {
    /// 現在有効なアカウント（なければ None）
    async fn active_account(&self) -> Option<String>;

    /// ウォレットに接続を要求する
    async fn request_activation(&self) -> Result<String>;
}

/// JSON-RPC経由のウォレット（eth_accounts / eth_requestAccounts）
pub struct RpcWallet {
    rpc: Arc<JsonRpcClient>,
    preferred: Option<String>,
}

impl RpcWallet {
    pub fn new(rpc: Arc<JsonRpcClient>, preferred: Option<String>) -> Self {
        Self { rpc, preferred }
    }

    fn pick(&self, accounts: Vec<String>) -> Option<String> {
        if let Some(preferred) = &self.preferred {
            if let Some(found) = accounts.iter().find(|a| a.eq_ignore_ascii_case(preferred)) {
                return Some(found.clone());
            }
        }
        accounts.into_iter().next()
    }
}

#[async_trait]
impl Wallet for RpcWallet {
    async fn active_account(&self) -> Option<String> {
        match self.rpc.request::<Vec<String>>("eth_accounts", json!([])).await {
            Ok(accounts) => self.pick(accounts),
            Err(e) => {
                warn!(error = %e, "eth_accounts の取得に失敗");
                None
            }
        }
    }

    async fn request_activation(&self) -> Result<String> {
        let accounts = self
            .rpc
            .request::<Vec<String>>("eth_requestAccounts", json!([]))
            .await
            .map_err(|e| match e {
                MintError::Rpc { message, .. } => MintError::WalletConnection(message),
                other => MintError::WalletConnection(other.to_string()),
            })?;

        let account = self
            .pick(accounts)
            .ok_or_else(|| MintError::WalletConnection("利用可能なアカウントがありません".into()))?;
        debug!(%account, "ウォレット接続");
        Ok(account)
    }
}
