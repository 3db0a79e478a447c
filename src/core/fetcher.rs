use crate::domain::model::{tables, DomesticShipment, LineItem, Record, ShipmentGroup};
use crate::domain::ports::RecordStore;
use crate::utils::error::{PackingListError, Result};
use serde_json::{json, Map, Value};

/// Resolves a shipment group into its nested shipment tree and records
/// generated reports back on the group.
pub struct RecordFetcher<R: RecordStore> {
    store: R,
}

impl<R: RecordStore> RecordFetcher<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    pub async fn fetch_domestic_shipments(&self, group_id: &str) -> Result<Vec<DomesticShipment>> {
        tracing::info!("📥 Getting data from Airtable started");
        match self.resolve_group(group_id).await {
            Ok(shipments) => {
                tracing::info!(
                    "📥 Getting data from Airtable finished: {} shipments",
                    shipments.len()
                );
                Ok(shipments)
            }
            Err(e) => {
                tracing::error!("❌ Error getting domestic shipments from Airtable: {}", e);
                Err(match e {
                    PackingListError::FetchError { .. } => e,
                    other => PackingListError::FetchError {
                        message: other.to_string(),
                    },
                })
            }
        }
    }

    async fn resolve_group(&self, group_id: &str) -> Result<Vec<DomesticShipment>> {
        let group = ShipmentGroup::from(
            self.store
                .get_record(tables::SHIPMENT_GROUP, group_id)
                .await?,
        );
        let consignee = group.consignee();

        let mut shipments = Vec::new();
        for shipment_id in group.shipment_ids()? {
            let record = self
                .store
                .get_record(tables::DOMESTIC_SHIPMENTS, &shipment_id)
                .await?;
            let facility = self.resolve_link(&record, "FCID", tables::FC_LIST).await?;

            let mut line_items = Vec::new();
            for line_item_id in record.required_links("LineItems")? {
                let item = self
                    .store
                    .get_record(tables::LINE_ITEMS, &line_item_id)
                    .await?;
                let sku = self.resolve_link(&item, "SKU", tables::SKUS).await?;
                let packaging_profile = self
                    .resolve_link(&item, "PackagingProfile", tables::PACKAGING_PROFILE)
                    .await?;
                line_items.push(LineItem {
                    record: item,
                    sku,
                    packaging_profile,
                });
            }

            tracing::debug!(
                "Resolved shipment {} with {} line items",
                record.id,
                line_items.len()
            );
            shipments.push(DomesticShipment {
                record,
                consignee: consignee.clone(),
                facility,
                line_items,
            });
        }

        Ok(shipments)
    }

    // 連結欄位只取第一筆
    async fn resolve_link(&self, record: &Record, field: &str, table: &str) -> Result<Option<Record>> {
        match record.first_link(field) {
            Some(id) => Ok(Some(self.store.get_record(table, id).await?)),
            None => {
                tracing::debug!("Record {} has no '{}' link", record.id, field);
                Ok(None)
            }
        }
    }

    /// Appends `{url}` to the group's generated packing lists.
    ///
    /// This is a read-modify-write of the whole list; two requests for the
    /// same group at once can drop one entry.
    pub async fn attach_report(&self, group_id: &str, url: &str) -> Result<()> {
        tracing::info!("📎 Uploading packaging list to Airtable started");
        let result = async {
            let group = ShipmentGroup::from(
                self.store
                    .get_record(tables::SHIPMENT_GROUP, group_id)
                    .await?,
            );
            let mut reports = group.generated_reports();
            reports.push(json!({ "url": url }));

            let mut fields = Map::new();
            fields.insert(
                ShipmentGroup::REPORTS_FIELD.to_string(),
                Value::Array(reports),
            );
            self.store
                .update_record(tables::SHIPMENT_GROUP, &group.record.id, fields)
                .await
        }
        .await;

        match result {
            Ok(_) => {
                tracing::info!("📎 Uploading packaging list to Airtable finished");
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Error uploading packaging list to Airtable: {}", e);
                Err(PackingListError::PublishError {
                    message: format!("Airtable update failed: {}", e),
                })
            }
        }
    }
}
