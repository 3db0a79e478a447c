use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct PackingListEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> PackingListEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Generates and publishes the packing list for one shipment group and
    /// returns its download link.
    pub async fn run(&self, record_id: &str) -> Result<String> {
        tracing::info!("🚀 Generating packing list for shipment group {}", record_id);

        let shipments = self.pipeline.extract(record_id).await?;
        tracing::info!("Extracted {} domestic shipments", shipments.len());

        let packing_list = self.pipeline.transform(shipments).await?;
        tracing::info!("Packing list is {} bytes", packing_list.data.len());

        let download = self.pipeline.load(record_id, packing_list).await?;
        tracing::info!("✅ Packing list available at {}", download);

        Ok(download)
    }
}
