//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("ABI error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Manifest error: {0}")]
    Manifest(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
