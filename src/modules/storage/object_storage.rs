//! S3-compatible object storage backend (Supabase Storage, MinIO, AWS)
//!
//! Uses rust-s3 for object operations. Bucket setup is best-effort: access
//! policies on hosted storage frequently forbid bucket creation or policy
//! changes with upload-only keys, and uploads may still succeed.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::modules::storage::backend::{
    timestamped_name, Durability, StorageBackend, StorageError, StoredFile, UploadFile,
};

type HmacSha256 = Hmac<Sha256>;

const TAG: &str = "object-storage";

pub struct ObjectStorageBackend {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_url: String,
    access_key: String,
    secret_key: Option<String>,
    region_name: String,
    http_client: Client,
}

impl ObjectStorageBackend {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::new(TAG, format!("Invalid storage credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| StorageError::new(TAG, format!("Invalid bucket '{}': {}", config.bucket, e)))?;

        // Path-style URLs (http://endpoint/bucket) work for MinIO and Supabase alike
        bucket.set_path_style();

        let http_client = Client::builder()
            .build()
            .map_err(|e| StorageError::new(TAG, format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint.clone(),
            public_url: config.public_url.clone(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            region_name: config.region.clone(),
            http_client,
        })
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    /// Best-effort bucket creation and public-read policy. Never fails.
    pub async fn prepare(&self) {
        self.ensure_bucket_exists().await;
        self.ensure_public_read_policy().await;
    }

    async fn ensure_bucket_exists(&self) {
        let name = self.bucket.name();
        let result = Bucket::create_with_path_style(
            &name,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(response) if response.success() => {
                info!("Bucket '{}' created successfully", name);
            }
            Ok(response) if is_already_exists(&response.response_text) => {
                debug!("Bucket '{}' already exists", name);
            }
            Ok(response) => {
                warn!(
                    "Could not create bucket '{}' (status {}). Continuing; uploads will fall back if it is unusable.",
                    name, response.response_code
                );
            }
            Err(e) if is_already_exists(&e.to_string()) => {
                debug!("Bucket '{}' already exists", name);
            }
            Err(e) => {
                warn!(
                    "Could not create bucket '{}': {}. Continuing; uploads will fall back if it is unusable.",
                    name, e
                );
            }
        }
    }

    async fn ensure_public_read_policy(&self) {
        let name = self.bucket.name();
        let Some(secret_key) = self.secret_key.as_deref() else {
            debug!("No storage secret key configured; skipping bucket policy for '{}'", name);
            return;
        };

        let policy = json!({
            "Version": "2012-10-17",
            "Statement": [
                {
                    "Effect": "Allow",
                    "Principal": {"AWS": "*"},
                    "Action": ["s3:GetObject"],
                    "Resource": [format!("arn:aws:s3:::{name}/*")]
                }
            ]
        })
        .to_string();

        match self.put_bucket_policy(&name, &policy, secret_key).await {
            Ok(()) => info!("Set public read policy for bucket '{}'", name),
            Err(e) => warn!(
                "Failed to set public read policy for bucket '{}': {}. Configure it manually if photos are not viewable.",
                name, e
            ),
        }
    }

    /// PUT ?policy signed with AWS Signature v4
    async fn put_bucket_policy(
        &self,
        bucket_name: &str,
        policy: &str,
        secret_key: &str,
    ) -> Result<(), StorageError> {
        let endpoint_url = Url::parse(&self.endpoint)
            .map_err(|e| StorageError::new(TAG, format!("Invalid endpoint URL: {}", e)))?;
        let host = endpoint_url
            .host_str()
            .ok_or_else(|| StorageError::new(TAG, "Endpoint URL has no host"))?;
        let host_header = match endpoint_url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let base_path = endpoint_url.path().trim_end_matches('/');
        let canonical_uri = format!("{}/{}", base_path, bucket_name);

        let now = Utc::now();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let payload_hash = hex::encode(Sha256::digest(policy.as_bytes()));

        let signer = SigV4 {
            access_key: &self.access_key,
            secret_key,
            region: &self.region_name,
            date_stamp: now.format("%Y%m%d").to_string(),
            amz_date: amz_date.clone(),
        };
        let authorization =
            signer.authorization("PUT", &canonical_uri, "policy=", &host_header, &payload_hash)?;

        let response = self
            .http_client
            .put(format!("{}/{}?policy", self.endpoint, bucket_name))
            .header("Host", &host_header)
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header("Authorization", authorization)
            .header("Content-Type", "application/json")
            .body(policy.to_string())
            .send()
            .await
            .map_err(|e| StorageError::new(TAG, format!("Policy request failed: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(StorageError::new(TAG, format!("{} - {}", status, body)))
        }
    }

    /// Public URL of an object key
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_url, self.bucket.name(), key)
    }
}

fn is_already_exists(text: &str) -> bool {
    text.contains("BucketAlreadyOwnedByYou")
        || text.contains("BucketAlreadyExists")
        || text.contains("already own it")
        || text.contains("already exists")
}

/// Short random suffix so parallel uploads in the same millisecond differ
fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

/// Minimal AWS Signature v4 signer for the single policy request
struct SigV4<'a> {
    access_key: &'a str,
    secret_key: &'a str,
    region: &'a str,
    date_stamp: String,
    amz_date: String,
}

impl SigV4<'_> {
    fn authorization(
        &self,
        method: &str,
        canonical_uri: &str,
        canonical_query: &str,
        host: &str,
        payload_hash: &str,
    ) -> Result<String, StorageError> {
        let signed_headers = "host;x-amz-content-sha256;x-amz-date";
        let canonical_headers = format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            host, payload_hash, self.amz_date
        );
        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method, canonical_uri, canonical_query, canonical_headers, signed_headers, payload_hash
        );

        let scope = format!("{}/{}/s3/aws4_request", self.date_stamp, self.region);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            self.amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let k_date = hmac_sha256(
            format!("AWS4{}", self.secret_key).as_bytes(),
            self.date_stamp.as_bytes(),
        )?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, b"s3")?;
        let k_signing = hmac_sha256(&k_service, b"aws4_request")?;
        let signature = hex::encode(hmac_sha256(&k_signing, string_to_sign.as_bytes())?);

        Ok(format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key, scope, signed_headers, signature
        ))
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, StorageError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| StorageError::new(TAG, format!("HMAC key error: {}", e)))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[async_trait]
impl StorageBackend for ObjectStorageBackend {
    fn backend_tag(&self) -> &'static str {
        TAG
    }

    async fn store(&self, file: &UploadFile) -> Result<StoredFile, StorageError> {
        let extension = file.extension().ok_or_else(|| {
            StorageError::new(TAG, format!("Unsupported content type '{}'", file.content_type))
        })?;
        let key = timestamped_name(Some(&random_suffix()), extension);

        let response = self
            .bucket
            .put_object_with_content_type(&key, &file.data, &file.content_type)
            .await
            .map_err(|e| StorageError::new(TAG, format!("Failed to upload '{}': {}", key, e)))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            let body = String::from_utf8_lossy(response.as_slice()).into_owned();
            return Err(StorageError::new(
                TAG,
                format!("Upload of '{}' rejected with status {}: {}", key, status, body),
            ));
        }

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket.name());
        Ok(StoredFile {
            url: self.object_url(&key),
            path: key,
            backend: TAG,
            durability: Durability::Durable,
        })
    }

    async fn is_reachable(&self) -> bool {
        match self.bucket.exists().await {
            Ok(exists) => exists,
            Err(e) => {
                debug!("Bucket '{}' unreachable: {}", self.bucket.name(), e);
                false
            }
        }
    }
}
