//! ミント処理の型定義
//!
//! CLIと将来のフロントエンドで共有される型:
//! - FormInput: 1回の送信試行ぶんのフォーム入力
//! - ContentAddress: アップロード結果のCID
//! - TransactionStatus / TxState: 外部トランザクション層が所有する状態

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::manifest::IPFS_SCHEME;

/// コンテンツアドレス（IPFS CID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentAddress(String);

impl ContentAddress {
    pub fn new(cid: impl Into<String>) -> Self {
        Self(cid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ipfs://<cid>` 形式のURI
    pub fn to_uri(&self) -> String {
        format!("{}{}", IPFS_SCHEME, self.0)
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// アップロード対象の画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// フォーム入力
///
/// 送信1回ごとに値で渡され、ハンドオフ後は破棄される
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub title: String,
    pub description: String,
    pub file: Option<ImageFile>,
}

/// 外部トランザクション層のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[default]
    None,
    Connecting,
    Mining,
    Success,
    Exception,
    Fail,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::None => "None",
            TransactionStatus::Connecting => "Connecting",
            TransactionStatus::Mining => "Mining",
            TransactionStatus::Success => "Success",
            TransactionStatus::Exception => "Exception",
            TransactionStatus::Fail => "Fail",
        }
    }

    /// Exception / Fail
    pub fn is_failure(&self) -> bool {
        matches!(self, TransactionStatus::Exception | TransactionStatus::Fail)
    }

    /// その送信についてこれ以上遷移しない
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Success) || self.is_failure()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// トランザクション状態のスナップショット
///
/// `submission` は送信ごとに外部層が採番する通し番号（0は未送信）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxState {
    pub status: TransactionStatus,
    pub error_message: Option<String>,
    pub tx_hash: Option<String>,
    pub submission: u64,
}

impl TxState {
    pub fn new(status: TransactionStatus, submission: u64) -> Self {
        Self {
            status,
            submission,
            ..Default::default()
        }
    }

    pub fn failed(status: TransactionStatus, submission: u64, message: impl Into<String>) -> Self {
        Self {
            status,
            error_message: Some(message.into()),
            tx_hash: None,
            submission,
        }
    }

    pub fn with_hash(mut self, tx_hash: impl Into<String>) -> Self {
        self.tx_hash = Some(tx_hash.into());
        self
    }
}
