//! Blueprint Mint Common Library
//!
//! CLIとフロントエンドで共有される型・検証・状態遷移（I/Oなし）

pub mod contracts;
pub mod error;
pub mod manifest;
pub mod projector;
pub mod types;
pub mod validator;

pub use error::{Error, Result};
pub use manifest::{content_path, ipfs_path_to_url, BlueprintMetadata, UploadManifest, IPFS_SCHEME};
pub use projector::{reduce, Phase, PresentationState, Projector};
pub use types::{ContentAddress, FormInput, ImageFile, TransactionStatus, TxState};
pub use validator::{validate, ValidationResult};
