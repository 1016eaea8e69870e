//! Blueprint / TokenPack コントラクトの呼び出しデータ
//!
//! 関数定義は `sol!` で宣言し、エンコード/デコードは alloy に任せる。

use alloy_primitives::utils::format_ether;
use alloy_primitives::{B256, U256};
use alloy_sol_types::{sol, SolCall};

use crate::error::{Error, Result};

sol! {
    function createBlueprint(string ipfsPath) external;

    function totalCollections() external view returns (uint256);

    function tokenCollection(uint256 id)
        external
        view
        returns (string ipfsPath, uint256 capacity, uint256 price);

    function purchaseOrderTokens(bytes32 requestId) external view returns (uint256[]);
}

/// `createBlueprint(string)` の呼び出しデータ
pub fn create_blueprint_calldata(ipfs_path: &str) -> Vec<u8> {
    createBlueprintCall {
        ipfsPath: ipfs_path.to_string(),
    }
    .abi_encode()
}

pub fn total_collections_calldata() -> Vec<u8> {
    totalCollectionsCall {}.abi_encode()
}

pub fn token_collection_calldata(id: u64) -> Vec<u8> {
    tokenCollectionCall { id: U256::from(id) }.abi_encode()
}

pub fn purchase_order_tokens_calldata(request_id: B256) -> Vec<u8> {
    purchaseOrderTokensCall { requestId: request_id }.abi_encode()
}

/// コレクション数（u64に収まらない値はエラー）
pub fn decode_total_collections(data: &[u8]) -> Result<u64> {
    let total = totalCollectionsCall::abi_decode_returns(data)?;
    u64::try_from(total).map_err(|_| Error::OutOfRange(format!("コレクション数: {}", total)))
}

pub fn decode_purchase_order_tokens(data: &[u8]) -> Result<Vec<U256>> {
    Ok(purchaseOrderTokensCall::abi_decode_returns(data)?)
}

/// パックとして販売されるコレクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCollection {
    pub id: u64,
    pub ipfs_path: String,
    pub capacity: U256,
    pub price: U256,
}

impl TokenCollection {
    pub fn decode(id: u64, data: &[u8]) -> Result<Self> {
        let ret = tokenCollectionCall::abi_decode_returns(data)?;
        Ok(Self {
            id,
            ipfs_path: ret.ipfsPath,
            capacity: ret.capacity,
            price: ret.price,
        })
    }

    /// wei → ether 表記
    pub fn price_ether(&self) -> String {
        format_ether(self.price)
    }
}

/// `0x` 付きの16進文字列
pub fn to_hex_data(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub fn from_hex_data(data: &str) -> Result<Vec<u8>> {
    let data = data.trim();
    Ok(hex::decode(data.strip_prefix("0x").unwrap_or(data))?)
}
