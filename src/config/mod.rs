#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;

#[cfg(feature = "cli")]
use crate::adapters::airtable::DEFAULT_API_URL;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Clone, Parser)]
#[command(name = "packing-list")]
#[command(about = "Generate a packing list spreadsheet for an Airtable shipment group")]
pub struct CliConfig {
    #[arg(long, help = "ShipmentGroup record id")]
    pub record_id: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, env = "AIRTABLE_API_URL", default_value = DEFAULT_API_URL)]
    pub airtable_api_url: String,

    #[arg(long, env = "AIRTABLE_APP_ID")]
    pub airtable_app_id: String,

    #[arg(long, env = "AIRTABLE_SECRET_KEY", hide_env_values = true)]
    pub airtable_secret_key: String,

    #[arg(long, help = "Write the file location back to the shipment group")]
    pub attach: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
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

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        use crate::utils::validation::*;

        validate_non_empty_string("record_id", &self.record_id)?;
        validate_path("output_path", &self.output_path)?;
        validate_url("airtable_api_url", &self.airtable_api_url)?;
        validate_non_empty_string("airtable_app_id", &self.airtable_app_id)?;
        validate_secret("airtable_secret_key", &self.airtable_secret_key)?;

        tracing::debug!("✅ CLI configuration validation passed");
        Ok(())
    }
}
