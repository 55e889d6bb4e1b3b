use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/caparra.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Currency code for the plan (TRY, EUR, USD or GBP).
    pub currency: String,
    pub title: String,
    pub intro_text: String,
    /// Where the exported proposal JSON is written.
    pub export_path: String,
    /// Append tracing output to this file when set.
    pub log_file: Option<String>,
    pub pricing: PricingConfig,
    /// Opportunity context used to resolve due dates. Optional: without it
    /// the schedule still edits, entries just stay unresolved.
    pub opportunity: Option<engine::OpportunityDates>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            currency: "TRY".to_string(),
            title: "Payment Plan".to_string(),
            intro_text: "Payment terms for your stand construction.".to_string(),
            export_path: "exports/plan.json".to_string(),
            log_file: None,
            pricing: PricingConfig::default(),
            opportunity: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Net subtotal in major units, e.g. "150000" or "150000.50".
    pub subtotal: String,
    /// VAT percentage applied on top of the subtotal.
    pub tax_rate: u8,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            subtotal: "0".to_string(),
            tax_rate: 20,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "caparra_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override currency code.
    #[arg(long)]
    currency: Option<String>,
    /// Override plan title.
    #[arg(long)]
    title: Option<String>,
    /// Override export file path.
    #[arg(long)]
    export_path: Option<String>,
    /// Override log file path.
    #[arg(long)]
    log_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("CAPARRA"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(currency) = args.currency {
        settings.currency = currency;
    }
    if let Some(title) = args.title {
        settings.title = title;
    }
    if let Some(export_path) = args.export_path {
        settings.export_path = export_path;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = Some(log_file);
    }

    Ok(settings)
}
