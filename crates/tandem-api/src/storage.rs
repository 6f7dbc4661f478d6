use anyhow::{Result, bail};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Buckets a client may upload into. Anything else is rejected.
pub const BUCKETS: [&str; 3] = ["chat-media", "memories", "avatars"];

/// Manages on-disk media storage.
///
/// Each upload lands at `{data_dir}/{bucket}/{hash8}-{name}` where `hash8`
/// is the first 8 hex chars of the content's SHA-256. Same bytes and name
/// always map to the same path, so re-uploads overwrite harmlessly.
pub struct Storage {
    dir: PathBuf,
    public_base: String,
}

impl Storage {
    pub async fn new(dir: PathBuf, public_base: String) -> Result<Self> {
        for bucket in BUCKETS {
            fs::create_dir_all(dir.join(bucket)).await?;
        }
        info!("Media storage directory: {}", dir.display());
        Ok(Self {
            dir,
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_valid_bucket(bucket: &str) -> bool {
        BUCKETS.contains(&bucket)
    }

    /// Store an upload and return its public URL.
    pub async fn store(&self, bucket: &str, name: &str, data: &[u8]) -> Result<String> {
        if !Self::is_valid_bucket(bucket) {
            bail!("unknown bucket: {}", bucket);
        }

        let mut hasher = Sha256::new();
        hasher.update(data);
        let hash = hex::encode(hasher.finalize());
        let stored_name = format!("{}-{}", &hash[..8], sanitize_name(name));

        let path = self.dir.join(bucket).join(&stored_name);
        let mut file = fs::File::create(&path).await?;
        file.write_all(data).await?;
        file.flush().await?;

        info!("Stored {} byte upload at {}", data.len(), path.display());
        Ok(format!("{}/media/{}/{}", self.public_base, bucket, stored_name))
    }

    /// Delete a stored file by bucket and stored name. Missing files are
    /// fine, the record pointing at them is already gone.
    pub async fn delete(&self, bucket: &str, stored_name: &str) -> Result<()> {
        if !Self::is_valid_bucket(bucket) {
            bail!("unknown bucket: {}", bucket);
        }
        let sanitized = sanitize_name(stored_name);
        let path = self.dir.join(bucket).join(&sanitized);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("File {} already gone", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Root of the media tree, for serving over HTTP.
    pub fn root(&self) -> &PathBuf {
        &self.dir
    }
}

/// Keep file names filesystem-safe: alphanumerics, dot, dash, underscore.
/// Everything else becomes an underscore, and an empty result gets a stub.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
