use crate::domain::model::{DomesticShipment, PackingList, Record};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// 報表輸出位置（本地目錄或 S3）
pub trait Storage: Send + Sync {
    fn write_file(&self, path: &str, data: &[u8])
        -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Link under which a written file can be downloaded.
    fn public_url(&self, path: &str) -> Result<String>;
}

/// 表格式資料來源（Airtable）
pub trait RecordStore: Send + Sync {
    fn get_record(
        &self,
        table: &str,
        record_id: &str,
    ) -> impl std::future::Future<Output = Result<Record>> + Send;
    fn update_record(
        &self,
        table: &str,
        record_id: &str,
        fields: Map<String, Value>,
    ) -> impl std::future::Future<Output = Result<Record>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn airtable_api_url(&self) -> &str;
    fn airtable_app_id(&self) -> &str;
    fn airtable_secret_key(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, record_id: &str) -> Result<Vec<DomesticShipment>>;
    async fn transform(&self, shipments: Vec<DomesticShipment>) -> Result<PackingList>;
    async fn load(&self, record_id: &str, packing_list: PackingList) -> Result<String>;
}
