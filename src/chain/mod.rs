//! Ethereum側の外部連携（JSON-RPC）

pub mod collections;
pub mod rpc;
#[cfg(test)]
mod stub;
pub mod transaction;
pub mod wallet;

pub use collections::{parse_request_id, TokenCollection, TokenPack};
pub use rpc::JsonRpcClient;
pub use transaction::{ContractFunction, TransactionSender, TransactionTracker, CREATE_BLUEPRINT};
pub use wallet::{RpcWallet, Wallet};
