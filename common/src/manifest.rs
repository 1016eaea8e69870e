//! ブループリントのメタデータ（マニフェスト）
//!
//! 書き込み側の `UploadManifest` と読み込み側の `BlueprintMetadata` を分けている。
//! `UploadManifest` の画像参照は完了済みアップロードのCIDからしか作れない。

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ContentAddress;

pub const IPFS_SCHEME: &str = "ipfs://";

/// アップロードするメタデータJSON
///
/// `{ "name": ..., "description": ..., "image": "ipfs://<cid>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadManifest {
    name: String,
    description: String,
    image: String,
}

impl UploadManifest {
    pub fn new(name: impl Into<String>, description: impl Into<String>, image_ref: &ContentAddress) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: image_ref.to_uri(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// `ipfs://` 付きの画像参照
    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// IPFSから読み込んだメタデータ（欠けている項目は表示しない）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlueprintMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl BlueprintMetadata {
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::Manifest(format!("オブジェクトではありません: {}", value)));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// `Qm...` / `ipfs://Qm...` / `/ipfs/Qm...` からCID以降のパスを取り出す
pub fn content_path(path: &str) -> &str {
    let path = path.trim();
    let path = path.strip_prefix(IPFS_SCHEME).unwrap_or(path);
    let path = path.trim_start_matches('/');
    path.strip_prefix("ipfs/").unwrap_or(path)
}

/// ゲートウェイ経由の表示用URLに変換
pub fn ipfs_path_to_url(gateway: &str, path: &str) -> String {
    format!("{}/ipfs/{}", gateway.trim_end_matches('/'), content_path(path))
}
