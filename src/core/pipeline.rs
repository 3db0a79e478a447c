use crate::core::fetcher::RecordFetcher;
use crate::core::layout::PackingListLayout;
use crate::core::publisher::{object_key, Publisher};
use crate::core::writer::ReportWriter;
use crate::core::{DomesticShipment, PackingList, Pipeline, RecordStore, Storage};
use crate::utils::error::Result;
use chrono::Utc;

/// Airtable -> xlsx -> storage, with the download link written back to the
/// shipment group.
pub struct PackingListPipeline<R: RecordStore, S: Storage> {
    fetcher: RecordFetcher<R>,
    publisher: Publisher<S>,
    writer: ReportWriter,
    attach_reports: bool,
}

impl<R: RecordStore, S: Storage> PackingListPipeline<R, S> {
    pub fn new(store: R, storage: S) -> Self {
        Self {
            fetcher: RecordFetcher::new(store),
            publisher: Publisher::new(storage),
            writer: ReportWriter::new(),
            attach_reports: true,
        }
    }

    /// Skip writing the link back to the shipment group.
    pub fn without_attachment(mut self) -> Self {
        self.attach_reports = false;
        self
    }
}

#[async_trait::async_trait]
impl<R: RecordStore, S: Storage> Pipeline for PackingListPipeline<R, S> {
    async fn extract(&self, record_id: &str) -> Result<Vec<DomesticShipment>> {
        self.fetcher.fetch_domestic_shipments(record_id).await
    }

    async fn transform(&self, shipments: Vec<DomesticShipment>) -> Result<PackingList> {
        tracing::info!("📝 Generating packaging list started");
        let layout = PackingListLayout::build(&shipments)?;
        let data = self.writer.write(&layout.grid)?;

        let packing_list = PackingList {
            data,
            shipment_count: shipments.len(),
            line_item_count: shipments.iter().map(|s| s.line_items.len()).sum(),
            sku_count: layout.skus.len(),
        };
        tracing::info!(
            "📝 Generating packaging list finished: {} shipments, {} line items, {} SKUs",
            packing_list.shipment_count,
            packing_list.line_item_count,
            packing_list.sku_count
        );
        Ok(packing_list)
    }

    async fn load(&self, record_id: &str, packing_list: PackingList) -> Result<String> {
        let key = object_key(Utc::now());
        let url = self.publisher.upload(&key, &packing_list.data).await?;

        if !self.attach_reports {
            return Ok(url);
        }

        // 回寫失敗時移除已上傳的檔案
        if let Err(e) = self.fetcher.attach_report(record_id, &url).await {
            self.publisher.discard(&key).await;
            return Err(e);
        }

        Ok(url)
    }
}
