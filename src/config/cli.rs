use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "pricing-matrix")]
#[command(about = "Edit and serve a subscription pricing matrix")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Run the pricing API server
    Serve(ServeArgs),
    /// Edit the pricing matrix interactively against a running server
    Edit(EditArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub bind: Option<String>,

    #[arg(long)]
    pub pricing_file: Option<String>,

    #[arg(long)]
    pub default_pricing_file: Option<String>,

    #[arg(long, help = "Write logs as JSON")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub api_base: Option<String>,
}

impl ServeArgs {
    /// 載入配置檔並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;

        if let Some(bind) = &self.bind {
            config.server.bind = Some(bind.clone());
        }
        if let Some(pricing_file) = &self.pricing_file {
            config.server.pricing_file = Some(pricing_file.clone());
        }
        if let Some(default_file) = &self.default_pricing_file {
            config.server.default_pricing_file = Some(default_file.clone());
        }
        if self.log_json {
            config.server.log_format = Some("json".to_string());
        }

        Ok(config)
    }
}

impl EditArgs {
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;

        if let Some(api_base) = &self.api_base {
            config.client.api_base = Some(api_base.clone());
        }

        Ok(config)
    }
}
