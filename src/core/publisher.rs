use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use url::Url;

pub const S3_DOMAIN: &str = "s3.amazonaws.com";

/// `YYYY-MM-DD HH:MM:SS.xlsx`
pub fn object_key(now: DateTime<Utc>) -> String {
    format!("{}.xlsx", now.format("%Y-%m-%d %H:%M:%S"))
}

/// `https://{bucket}.{domain}/{key}` with the key encoded as one path segment.
pub fn public_object_url(bucket: &str, domain: &str, key: &str) -> Result<String> {
    let mut url = Url::parse(&format!("https://{}.{}", bucket, domain))?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .clear()
        .push(key);
    Ok(url.to_string())
}

pub struct Publisher<S: Storage> {
    storage: S,
}

impl<S: Storage> Publisher<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Writes the report under `key` and returns its public link.
    pub async fn upload(&self, key: &str, data: &[u8]) -> Result<String> {
        tracing::info!("☁️ Putting generated packaging list started. Object name: {}", key);
        // 先算出連結，失敗時不留下已上傳的檔案
        let url = self.storage.public_url(key)?;
        self.storage.write_file(key, data).await?;
        tracing::info!("☁️ Putting generated packaging list finished: {}", url);
        Ok(url)
    }

    /// Removes an uploaded report whose link could not be recorded.
    pub async fn discard(&self, key: &str) {
        match self.storage.remove_file(key).await {
            Ok(()) => tracing::info!("🗑️ Removed orphaned packaging list {}", key),
            Err(e) => tracing::warn!("⚠️ Could not remove orphaned packaging list {}: {}", key, e),
        }
    }
}
