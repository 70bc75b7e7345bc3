use crate::utils::error::{PricingError, Result};
use crate::utils::validation::{
    validate_one_of, validate_path, validate_socket_addr, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_PRICING_FILE: &str = "public/pricing.json";
pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub pricing_file: Option<String>,
    pub default_pricing_file: Option<String>,
    pub log_format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base: Option<String>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PricingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PricingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::debug!("Loading configuration from: {}", path);
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// 替換環境變數 (例如 ${PRICING_FILE})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PricingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind(&self) -> &str {
        self.server.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        validate_socket_addr("server.bind", self.bind())
    }

    pub fn pricing_file(&self) -> &str {
        self.server
            .pricing_file
            .as_deref()
            .unwrap_or(DEFAULT_PRICING_FILE)
    }

    pub fn default_pricing_file(&self) -> Option<&str> {
        self.server.default_pricing_file.as_deref()
    }

    pub fn json_logs(&self) -> bool {
        self.server.log_format.as_deref() == Some("json")
    }

    pub fn api_base(&self) -> &str {
        self.client.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.bind", self.bind())?;
        validate_path("server.pricing_file", self.pricing_file())?;

        if let Some(default_file) = self.default_pricing_file() {
            validate_path("server.default_pricing_file", default_file)?;
        }

        if let Some(format) = &self.server.log_format {
            validate_one_of("server.log_format", format, &LOG_FORMATS)?;
        }

        validate_url("client.api_base", self.api_base())?;
        Ok(())
    }
}
