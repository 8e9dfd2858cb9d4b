use chrono::Utc;
use reqwest::Client;
use sha2::{Digest, Sha256};

use crate::config::{self, StorageConfig};

/// Errors from the object-storage gateway. Callers treat all of these as a
/// generic storage failure; the variants exist for logging.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage secret not configured")]
    MissingSecret,

    #[error("cannot upload object '{key}': {source}")]
    Upload {
        key: String,
        source: reqwest::Error,
    },

    #[error("storage rejected object '{key}': HTTP {status}")]
    UploadRejected {
        key: String,
        status: reqwest::StatusCode,
    },
}

/// Client for the HTTP object-storage gateway holding candidate documents.
///
/// The gateway contract is narrow: objects are PUT under
/// `{endpoint}/{bucket}/{key}`, and reads go through time-limited URLs
/// signed with a shared secret. Download URLs are computed locally; no
/// round-trip to the gateway is needed to hand one out.
pub struct Storage {
    http: Client,
    config: StorageConfig,
}

impl Storage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn from_config() -> &'static Storage {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<Storage> = OnceLock::new();
        INSTANCE.get_or_init(|| Storage::new(config::config().storage.clone()))
    }

    /// Upload a document under the given key.
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let token = self.sign(key, 0)?;
        let url = format!(
            "{}/{}/{}?token={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket,
            key,
            token
        );

        let response = self
            .http
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|source| StorageError::Upload {
                key: key.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(StorageError::UploadRejected {
                key: key.to_string(),
                status: response.status(),
            });
        }

        Ok(())
    }

    /// Produce a time-limited signed URL for downloading the given object.
    pub fn download_url(&self, key: &str) -> Result<String, StorageError> {
        let expires = Utc::now().timestamp() + self.config.url_ttl_secs as i64;
        let token = self.sign(key, expires)?;

        Ok(format!(
            "{}/{}/{}?expires={}&token={}",
            self.config.public_url.trim_end_matches('/'),
            self.config.bucket,
            key,
            expires,
            token
        ))
    }

    /// Signature over (secret, key, expiry); `expires = 0` marks a
    /// non-expiring upload credential.
    fn sign(&self, key: &str, expires: i64) -> Result<String, StorageError> {
        if self.config.secret.is_empty() {
            return Err(StorageError::MissingSecret);
        }

        let mut hasher = Sha256::new();
        hasher.update(self.config.secret.as_bytes());
        hasher.update(b"\n");
        hasher.update(key.as_bytes());
        hasher.update(b"\n");
        hasher.update(expires.to_string().as_bytes());

        let digest = hasher.finalize();
        Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }
}
