// src/services/storage.rs
//! Blob store for submitted documents.
//!
//! Two backends behind one `put -> durable URL` surface: the local
//! filesystem (served back by the files route) and S3 (optionally
//! fronted by CloudFront). Backend choice and credentials come from the
//! environment at startup.

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage not configured: {0}")]
    InvalidConfig(String),

    #[error("local write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 operation failed: {0}")]
    S3(String),
}

enum Backend {
    Local {
        dir: PathBuf,
        public_base_url: String,
    },
    S3 {
        client: S3Client,
        bucket: String,
        region: String,
        cloudfront_domain: Option<String>,
    },
}

pub struct StorageService {
    backend: Backend,
}

impl StorageService {
    /// Build the backend selected by `STORAGE_TYPE` (`local` default, `s3`).
    pub async fn from_env(local_dir: PathBuf) -> Result<StorageService, StorageError> {
        let storage_type = env::var("STORAGE_TYPE").unwrap_or_else(|_| "local".to_string());

        let backend = if storage_type.starts_with("s3") {
            let bucket = env::var("AWS_S3_BUCKET_NAME")
                .map_err(|_| StorageError::InvalidConfig("AWS_S3_BUCKET_NAME not set".into()))?;
            let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
            let cloudfront_domain = env::var("AWS_CLOUDFRONT_DOMAIN").ok().filter(|d| !d.is_empty());

            let aws_config = aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.clone()))
                .load()
                .await;
            let client = S3Client::new(&aws_config);

            info!(bucket = %bucket, region = %region, "Using S3 blob storage");
            Backend::S3 {
                client,
                bucket,
                region,
                cloudfront_domain,
            }
        } else {
            let public_base_url = env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string());
            info!(dir = %local_dir.display(), "Using local blob storage");
            Backend::Local {
                dir: local_dir,
                public_base_url,
            }
        };

        Ok(StorageService { backend })
    }

    /// Store a blob under `key` and return a durable retrieval URL.
    /// The URL is only returned once the bytes are on disk / in S3, so
    /// callers can safely record it afterwards.
    pub async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        match &self.backend {
            Backend::Local {
                dir,
                public_base_url,
            } => {
                let path = dir.join(key);
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&path, &data).await?;

                info!(key = %key, path = %path.display(), "Blob stored locally");
                Ok(format!(
                    "{}/api/files/{}",
                    public_base_url.trim_end_matches('/'),
                    encode_key(key)
                ))
            }
            Backend::S3 {
                client,
                bucket,
                region,
                cloudfront_domain,
            } => {
                let body = ByteStream::from(Bytes::from(data));

                client
                    .put_object()
                    .bucket(bucket)
                    .key(key)
                    .body(body)
                    .content_type(content_type)
                    .send()
                    .await
                    .map_err(|e| {
                        error!(error = %e, key = %key, "Failed to upload blob to S3");
                        StorageError::S3(format!("upload failed: {}", e))
                    })?;

                info!(key = %key, bucket = %bucket, "Blob uploaded to S3");

                let url = match cloudfront_domain {
                    Some(domain) => format!("https://{}/{}", domain, encode_key(key)),
                    None => format!(
                        "https://{}.s3.{}.amazonaws.com/{}",
                        bucket,
                        region,
                        encode_key(key)
                    ),
                };
                Ok(url)
            }
        }
    }
}

/// Percent-encode each path segment, keeping the separators.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_key_preserves_separators() {
        assert_eq!(
            encode_key("submissions/G_K7NP3X/draft one.pdf"),
            "submissions/G_K7NP3X/draft%20one.pdf"
        );
    }

    #[tokio::test]
    async fn test_local_put_writes_and_builds_url() {
        let dir = std::env::temp_dir().join(format!(
            "writerhub-storage-test-{}",
            crate::common::generate_raw_id(8)
        ));
        let service = StorageService {
            backend: Backend::Local {
                dir: dir.clone(),
                public_base_url: "http://localhost:8080/".to_string(),
            },
        };

        let url = service
            .put("submissions/G_TEST01/doc.pdf", b"%PDF-1.4".to_vec(), "application/pdf")
            .await
            .expect("local put");

        assert_eq!(
            url,
            "http://localhost:8080/api/files/submissions/G_TEST01/doc.pdf"
        );
        let stored = std::fs::read(dir.join("submissions/G_TEST01/doc.pdf")).expect("file exists");
        assert_eq!(stored, b"%PDF-1.4");

        std::fs::remove_dir_all(&dir).ok();
    }
}
