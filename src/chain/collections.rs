//! TokenPackコントラクトの読み取り（コレクション一覧・パックの中身）

use super::rpc::JsonRpcClient;
use crate::error::{MintError, Result};
use alloy_primitives::{B256, U256};
use blueprint_mint_common::contracts::{
    decode_purchase_order_tokens, decode_total_collections, from_hex_data, purchase_order_tokens_calldata,
    to_hex_data, token_collection_calldata, total_collections_calldata,
};
pub use blueprint_mint_common::contracts::TokenCollection;
use serde_json::json;
use std::str::FromStr;

/// `0x` + 64桁の購入リクエストID
pub fn parse_request_id(request_id: &str) -> Result<B256> {
    B256::from_str(request_id.trim())
        .map_err(|_| MintError::InvalidInput(format!("不正なリクエストID: {}", request_id)))
}

pub struct TokenPack<'a> {
    rpc: &'a JsonRpcClient,
    address: String,
}

impl<'a> TokenPack<'a> {
    pub fn new(rpc: &'a JsonRpcClient, address: impl Into<String>) -> Self {
        Self {
            rpc,
            address: address.into(),
        }
    }

    async fn call(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let params = json!([{ "to": self.address, "data": to_hex_data(&data) }, "latest"]);
        let result: String = self.rpc.request("eth_call", params).await?;
        Ok(from_hex_data(&result)?)
    }

    pub async fn total_collections(&self) -> Result<u64> {
        let data = self.call(total_collections_calldata()).await?;
        Ok(decode_total_collections(&data)?)
    }

    pub async fn token_collection(&self, id: u64) -> Result<TokenCollection> {
        let data = self.call(token_collection_calldata(id)).await?;
        Ok(TokenCollection::decode(id, &data)?)
    }

    /// 新しい順に全コレクションを取得
    pub async fn list(&self) -> Result<Vec<TokenCollection>> {
        let total = self.total_collections().await?;
        let mut collections = Vec::new();
        for id in (0..total).rev() {
            collections.push(self.token_collection(id).await?);
        }
        Ok(collections)
    }

    /// 購入リクエストで発行されたトークンID
    pub async fn purchase_order_tokens(&self, request_id: B256) -> Result<Vec<U256>> {
        let data = self.call(purchase_order_tokens_calldata(request_id)).await?;
        Ok(decode_purchase_order_tokens(&data)?)
    }
}
