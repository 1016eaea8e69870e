//! 画像 → メタデータの順次アップロード
//!
//! メタデータの `image` は画像のCIDを参照するため、並列化できない。

use crate::error::Result;
use crate::ipfs::ContentStore;
use blueprint_mint_common::{ContentAddress, ImageFile, UploadManifest};
use tracing::debug;

/// アップロードが完了したらメタデータのCIDを返す
pub async fn upload_sequence(
    store: &dyn ContentStore,
    title: &str,
    description: &str,
    file: &ImageFile,
) -> Result<ContentAddress> {
    let image_ref = store.upload_binary(file).await?;
    debug!(cid = %image_ref, "画像アップロード完了");

    let manifest = UploadManifest::new(title, description, &image_ref);
    let metadata = store.upload_json(&manifest.to_json()?).await?;
    debug!(cid = %metadata, "メタデータアップロード完了");

    Ok(metadata)
}
