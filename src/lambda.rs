use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use packing_list::app::handler::{handle_request, ApiGatewayRequest, ApiGatewayResponse};
use packing_list::utils::{logger, validation::Validate};
use packing_list::{AirtableClient, LambdaConfig, PackingListEngine, PackingListPipeline, S3Storage};

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時即檢查必要設定
    let config = LambdaConfig::from_env()?;
    config.validate()?;

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let mut s3_config = aws_sdk_s3::config::Builder::from(&aws_config);
    if let Some(region) = &config.s3_region {
        s3_config = s3_config.region(Region::new(region.clone()));
    }
    let s3_client = S3Client::from_conf(s3_config.build());

    let storage = S3Storage::new(s3_client, config.bucket_name.clone());
    let store = AirtableClient::from_config(&config)?;
    let engine = PackingListEngine::new(PackingListPipeline::new(store, storage));
    let engine = &engine;

    run(service_fn(move |event: LambdaEvent<ApiGatewayRequest>| async move {
        tracing::info!("Received request {}", event.context.request_id);
        Ok::<ApiGatewayResponse, Error>(handle_request(engine, event.payload.body.as_deref()).await)
    }))
    .await
}
