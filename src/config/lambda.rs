use crate::adapters::airtable::DEFAULT_API_URL;
use crate::core::ConfigProvider;
use crate::utils::error::{PackingListError, Result};
use std::env;

#[cfg(feature = "lambda")]
use crate::core::publisher::{public_object_url, S3_DOMAIN};
#[cfg(feature = "lambda")]
use crate::core::writer::XLSX_CONTENT_TYPE;
#[cfg(feature = "lambda")]
use crate::core::Storage;
#[cfg(feature = "lambda")]
use aws_sdk_s3::error::DisplayErrorContext;
#[cfg(feature = "lambda")]
use aws_sdk_s3::primitives::ByteStream;
#[cfg(feature = "lambda")]
use aws_sdk_s3::types::ObjectCannedAcl;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;

#[derive(Clone)]
pub struct LambdaConfig {
    pub airtable_api_url: String,
    pub airtable_app_id: String,
    pub airtable_secret_key: String,
    pub bucket_name: String,
    /// 未設定時沿用 AWS 預設區域
    pub s3_region: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| PackingListError::MissingConfigError {
                    field: key.to_string(),
                })
        };

        Ok(Self {
            airtable_api_url: lookup("AIRTABLE_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            airtable_app_id: required("AIRTABLE_APP_ID")?,
            airtable_secret_key: required("AIRTABLE_SECRET_KEY")?,
            bucket_name: required("BUCKET_NAME")?,
            s3_region: lookup("S3_REGION").filter(|region| !region.is_empty()),
        })
    }
}

impl ConfigProvider for LambdaConfig {
    fn airtable_api_url(&self) -> &str {
        &self.airtable_api_url
    }

    fn airtable_app_id(&self) -> &str {
        &self.airtable_app_id
    }

    fn airtable_secret_key(&self) -> &str {
        &self.airtable_secret_key
    }
}

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("AIRTABLE_API_URL", &self.airtable_api_url)?;
        validate_non_empty_string("AIRTABLE_APP_ID", &self.airtable_app_id)?;
        validate_secret("AIRTABLE_SECRET_KEY", &self.airtable_secret_key)?;
        validate_s3_bucket_name("BUCKET_NAME", &self.bucket_name)?;
        if let Some(region) = &self.s3_region {
            validate_aws_region("S3_REGION", region)?;
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

/// Publicly readable objects in one S3 bucket.
#[cfg(feature = "lambda")]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

#[cfg(feature = "lambda")]
impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[cfg(feature = "lambda")]
impl Storage for S3Storage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        tracing::debug!("PUT s3://{}/{}", self.bucket, path);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(ByteStream::from(data.to_vec()))
            .content_type(XLSX_CONTENT_TYPE)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| PackingListError::PublishError {
                message: DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        tracing::debug!("DELETE s3://{}/{}", self.bucket, path);
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| PackingListError::PublishError {
                message: DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }

    fn public_url(&self, path: &str) -> Result<String> {
        public_object_url(&self.bucket, S3_DOMAIN, path)
    }
}
