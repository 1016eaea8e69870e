//! IPFS HTTP API クライアント
//!
//! - 書き込み: `POST {api}/api/v0/add`（multipart）
//! - 読み込み: `GET {gateway}/ipfs/<cid>`

use super::{detect_mime, ContentStore};
use crate::config::Config;
use crate::error::{MintError, Result};
use async_trait::async_trait;
use blueprint_mint_common::{content_path, ipfs_path_to_url, ContentAddress, ImageFile};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

/// `/api/v0/add` のレスポンス
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

pub struct IpfsHttpClient {
    http: reqwest::Client,
    api_url: String,
    gateway_url: String,
    auth: Option<(String, String)>,
}

impl IpfsHttpClient {
    pub fn new(api_url: impl Into<String>, gateway_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
            auth: None,
        }
    }

    /// プロジェクトID/シークレットによるBasic認証
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((user.into(), password.into()));
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let client = Self::new(&config.ipfs_api_url, &config.ipfs_gateway_url);
        match (&config.ipfs_project_id, &config.ipfs_project_secret) {
            (Some(id), Some(secret)) => client.with_basic_auth(id, secret),
            _ => client,
        }
    }

    fn add_url(&self) -> String {
        format!("{}/api/v0/add?pin=true", self.api_url)
    }

    async fn add(&self, part: Part) -> Result<ContentAddress> {
        let mut request = self
            .http
            .post(self.add_url())
            .multipart(Form::new().part("file", part));
        if let Some((user, password)) = &self.auth {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MintError::Upload(format!("{}: {}", status, body)));
        }

        let added: AddResponse = response.json().await?;
        debug!(cid = %added.hash, "IPFSへ追加");
        Ok(ContentAddress::new(added.hash))
    }
}

#[async_trait]
impl ContentStore for IpfsHttpClient {
    async fn upload_binary(&self, file: &ImageFile) -> Result<ContentAddress> {
        let mime = detect_mime(&file.bytes);
        debug!(file = %file.file_name, mime, size = file.bytes.len(), "画像をアップロード");
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(mime)?;
        self.add(part).await
    }

    async fn upload_json(&self, document: &serde_json::Value) -> Result<ContentAddress> {
        let body = serde_json::to_vec(document)?;
        debug!(size = body.len(), "メタデータをアップロード");
        let part = Part::bytes(body)
            .file_name("metadata.json")
            .mime_str("application/json")?;
        self.add(part).await
    }

    async fn fetch_json(&self, path: &str) -> Result<serde_json::Value> {
        if content_path(path).is_empty() {
            return Err(MintError::Fetch(format!("CIDが空です: {:?}", path)));
        }

        let url = self.to_url(path);
        debug!(%url, "メタデータを取得");
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MintError::Fetch(format!("{}: {}", status, url)));
        }
        Ok(response.json().await?)
    }

    fn to_url(&self, path: &str) -> String {
        ipfs_path_to_url(&self.gateway_url, path)
    }
}
