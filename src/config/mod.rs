pub mod cli;
pub mod toml_config;

use std::time::Duration;

use crate::domain::model::TemplateType;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_url, Validate,
};
#[cfg(feature = "cli")]
use toml_config::FileConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "grid2pptx")]
#[command(about = "Converts a grid into a PPTX slide deck")]
pub struct CliConfig {
    /// Grid URL (e.g. https://app.modelml.com/grid/<id>) or bare grid id
    pub grid: String,

    /// Path to the TOML configuration file
    #[arg(long, default_value = "grid2pptx.toml")]
    pub config: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Tab label for the generated deck
    #[arg(long)]
    pub tab: Option<String>,

    /// Slide template (currently only TWO_COLUMN)
    #[arg(long)]
    pub template_type: Option<String>,

    /// Request timeout; omit for no timeout
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Effective configuration for one conversion: file values overlaid with CLI
/// flags, flags winning.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub grid_base_url: String,
    pub grid_api_key: String,
    pub pptx_base_url: String,
    pub pptx_api_key: String,
    pub tab: String,
    pub template_type: TemplateType,
    pub output_path: String,
    pub request_timeout: Option<Duration>,
}

impl ResolvedConfig {
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &CliConfig, file: &FileConfig) -> Result<Self> {
        let template_type = match cli.template_type.as_deref() {
            Some(value) => value.parse()?,
            None => file.template_type()?,
        };

        let request_timeout = cli
            .timeout_seconds
            .or_else(|| file.request_timeout_seconds())
            .map(Duration::from_secs);

        Ok(Self {
            grid_base_url: file.grid_base_url().to_string(),
            grid_api_key: file.credentials.grid_api_key.clone(),
            pptx_base_url: file.pptx_base_url().to_string(),
            pptx_api_key: file.credentials.pptx_api_key.clone(),
            tab: cli.tab.clone().unwrap_or_else(|| file.tab().to_string()),
            template_type,
            output_path: cli.output_path.clone(),
            request_timeout,
        })
    }
}

impl ConfigProvider for ResolvedConfig {
    fn grid_base_url(&self) -> &str {
        &self.grid_base_url
    }

    fn grid_api_key(&self) -> &str {
        &self.grid_api_key
    }

    fn pptx_base_url(&self) -> &str {
        &self.pptx_base_url
    }

    fn pptx_api_key(&self) -> &str {
        &self.pptx_api_key
    }

    fn tab(&self) -> &str {
        &self.tab
    }

    fn template_type(&self) -> TemplateType {
        self.template_type
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

impl Validate for ResolvedConfig {
    fn validate(&self) -> Result<()> {
        validate_url("grid_base_url", &self.grid_base_url)?;
        validate_url("pptx_base_url", &self.pptx_base_url)?;
        validate_non_empty_string("grid_api_key", &self.grid_api_key)?;
        validate_non_empty_string("pptx_api_key", &self.pptx_api_key)?;
        validate_path("output_path", &self.output_path)?;
        validate_non_empty_string("tab", &self.tab)?;
        Ok(())
    }
}
