use thiserror::Error;

#[derive(Error, Debug)]
pub enum MintError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("{0}コントラクトのアドレスが設定されていません。`blueprint config --set-{0} 0x...` で設定してください")]
    MissingContract(&'static str),

    #[error("不正なアドレス: {0}")]
    InvalidAddress(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("入力エラー: {0}")]
    InvalidInput(String),

    #[error("ウォレット接続エラー: {0}")]
    WalletConnection(String),

    #[error("IPFSアップロードエラー: {0}")]
    Upload(String),

    #[error("IPFS取得エラー: {0}")]
    Fetch(String),

    #[error("JSON-RPCエラー ({code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("JSON-RPCプロトコルエラー: {0}")]
    RpcProtocol(String),

    #[error("トランザクション失敗: {0}")]
    Transaction(String),

    #[error("ABIエラー: {0}")]
    Abi(#[from] blueprint_mint_common::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("対話入力エラー: {0}")]
    Prompt(String),
}

impl From<dialoguer::Error> for MintError {
    fn from(e: dialoguer::Error) -> Self {
        MintError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MintError>;
