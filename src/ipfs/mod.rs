//! コンテンツアドレス型ストレージ（IPFS）
//!
//! 送信パイプラインは `ContentStore` だけに依存する。

mod http;

pub use http::IpfsHttpClient;

use crate::error::Result;
use async_trait::async_trait;
use blueprint_mint_common::{ContentAddress, ImageFile};

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// バイナリをアップロードしてCIDを返す（1回だけ試行）
    async fn upload_binary(&self, file: &ImageFile) -> Result<ContentAddress>;

    /// JSONドキュメントをアップロードしてCIDを返す
    async fn upload_json(&self, document: &serde_json::Value) -> Result<ContentAddress>;

    /// CID / `ipfs://` パスからJSONを取得
    async fn fetch_json(&self, path: &str) -> Result<serde_json::Value>;

    /// 表示用URL
    fn to_url(&self, path: &str) -> String;
}

/// 画像形式からMIMEタイプを判定
pub fn detect_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}
