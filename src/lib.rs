//! Blueprint NFT作成クライアント
//!
//! 画像とメタデータをIPFSへアップロードし、メタデータのCIDでコントラクトを呼び出す。

pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod ipfs;
pub mod logging;
pub mod mint;
pub mod render;
pub mod submission;
