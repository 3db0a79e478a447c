use clap::Parser;
use packing_list::utils::error::ErrorCategory;
use packing_list::utils::{logger, validation::Validate};
use packing_list::{AirtableClient, CliConfig, LocalStorage, PackingListEngine, PackingListPipeline};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting packing-list CLI");

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let store = match AirtableClient::from_config(&config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    let storage = LocalStorage::new(config.output_path.clone());

    let mut pipeline = PackingListPipeline::new(store, storage);
    if !config.attach {
        pipeline = pipeline.without_attachment();
    }
    let engine = PackingListEngine::new(pipeline);

    match engine.run(&config.record_id).await {
        Ok(location) => {
            println!("✅ Packing list generated");
            println!("📁 Output saved to: {}", location);
        }
        Err(e) => {
            tracing::error!("❌ Packing list failed ({:?}): {}", e.category(), e);
            eprintln!("❌ {}", e);

            // 依錯誤階段決定退出碼
            let exit_code = match e.category() {
                ErrorCategory::Config => 1,
                ErrorCategory::Request => 2,
                ErrorCategory::Fetch => 3,
                ErrorCategory::Report => 4,
                ErrorCategory::Publish => 5,
            };
            std::process::exit(exit_code);
        }
    }
}
