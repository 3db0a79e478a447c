use crate::core::{ConfigProvider, Record, RecordStore};
use crate::utils::error::{PackingListError, Result};
use reqwest::{Client, Response};
use serde_json::{json, Map, Value};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Airtable REST client for single-record reads and updates.
#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    base_url: Url,
    app_id: String,
    secret_key: String,
}

impl AirtableClient {
    pub fn new(api_url: &str, app_id: &str, secret_key: &str) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: Url::parse(api_url)?,
            app_id: app_id.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.airtable_api_url(),
            config.airtable_app_id(),
            config.airtable_secret_key(),
        )
    }

    /// `{api}/{app}/{table}/{record}`; table names may contain spaces.
    pub fn record_url(&self, table: &str, record_id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PackingListError::ConfigError {
                message: format!("Airtable API URL cannot be a base: {}", self.base_url),
            })?
            .pop_if_empty()
            .push(&self.app_id)
            .push(table)
            .push(record_id);
        Ok(url)
    }

    async fn parse_record(response: Response) -> Result<Record> {
        let status = response.status();
        tracing::debug!("Airtable response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PackingListError::StoreError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json::<Record>().await?)
    }
}

impl RecordStore for AirtableClient {
    async fn get_record(&self, table: &str, record_id: &str) -> Result<Record> {
        let url = self.record_url(table, record_id)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::parse_record(response).await
    }

    async fn update_record(
        &self,
        table: &str,
        record_id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record> {
        let url = self.record_url(table, record_id)?;
        tracing::debug!("PATCH {}", url);

        let response = self
            .client
            .patch(url)
            .bearer_auth(&self.secret_key)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;
        Self::parse_record(response).await
    }
}
