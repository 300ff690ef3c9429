use crate::domain::model::{TemplateType, DEFAULT_TAB};
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_GRID_BASE_URL: &str = "https://api.modelml.com";
pub const DEFAULT_PPTX_BASE_URL: &str = "https://alai-standalone-backend-proto.getalai.com";

/// Configuration file carrying the API credentials and optional overrides.
///
/// ```toml
/// [credentials]
/// grid_api_key = "${GRID_API_KEY}"
/// pptx_api_key = "${PPTX_API_KEY}"
///
/// [endpoints]
/// grid_base_url = "https://api.modelml.com"
///
/// [generation]
/// tab = "Tab 1"
/// template_type = "TWO_COLUMN"
///
/// [performance]
/// request_timeout_seconds = 120
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub credentials: CredentialsConfig,
    pub endpoints: Option<EndpointsConfig>,
    pub generation: Option<GenerationConfig>,
    pub performance: Option<PerformanceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub grid_api_key: String,
    pub pptx_api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    pub grid_base_url: Option<String>,
    pub pptx_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub tab: Option<String>,
    pub template_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Absent means no request timeout at all; a stalled server then blocks
    /// the conversion until the connection dies on its own.
    pub request_timeout_seconds: Option<u64>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConvertError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ConvertError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` values with the environment variable of that
    /// name; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn grid_base_url(&self) -> &str {
        self.endpoints
            .as_ref()
            .and_then(|e| e.grid_base_url.as_deref())
            .unwrap_or(DEFAULT_GRID_BASE_URL)
    }

    pub fn pptx_base_url(&self) -> &str {
        self.endpoints
            .as_ref()
            .and_then(|e| e.pptx_base_url.as_deref())
            .unwrap_or(DEFAULT_PPTX_BASE_URL)
    }

    pub fn tab(&self) -> &str {
        self.generation
            .as_ref()
            .and_then(|g| g.tab.as_deref())
            .unwrap_or(DEFAULT_TAB)
    }

    pub fn template_type(&self) -> Result<TemplateType> {
        match self
            .generation
            .as_ref()
            .and_then(|g| g.template_type.as_deref())
        {
            Some(value) => value.parse(),
            None => Ok(TemplateType::default()),
        }
    }

    pub fn request_timeout_seconds(&self) -> Option<u64> {
        self.performance
            .as_ref()
            .and_then(|p| p.request_timeout_seconds)
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("credentials.grid_api_key", &self.credentials.grid_api_key)?;
        validate_non_empty_string("credentials.pptx_api_key", &self.credentials.pptx_api_key)?;
        validate_url("endpoints.grid_base_url", self.grid_base_url())?;
        validate_url("endpoints.pptx_base_url", self.pptx_base_url())?;
        self.template_type()?;
        Ok(())
    }
}
