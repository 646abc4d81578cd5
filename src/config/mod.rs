#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::environment;
use crate::core::signature::DEFAULT_TOLERANCE_SECS;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_secret, validate_range, validate_required_field, validate_url, Validate,
};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_SITE_URL: &str = "http://localhost:8888";

/// 所有函式呼叫共用的配置
#[derive(Clone)]
pub struct FunctionsConfig {
    pub production: bool,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub webhook_secret: Option<String>,
    pub webhook_tolerance_secs: u64,
    pub admin_password: Option<String>,
    pub site_url: String,
    pub enforce_server_quote: bool,
}

impl std::fmt::Debug for FunctionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionsConfig")
            .field("production", &self.production)
            .field("stripe_api_base", &self.stripe_api_base)
            .field("has_webhook_secret", &self.webhook_secret.is_some())
            .field("webhook_tolerance_secs", &self.webhook_tolerance_secs)
            .field("has_admin_password", &self.admin_password.is_some())
            .field("site_url", &self.site_url)
            .field("enforce_server_quote", &self.enforce_server_quote)
            .finish_non_exhaustive()
    }
}

impl FunctionsConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 從任意變數來源建立，`from_env` 傳入的是行程環境變數
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let production = environment::is_production(&lookup);
        let stripe_secret_key = environment::select_secret_key(production, &lookup)?;
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            production,
            stripe_secret_key,
            stripe_api_base: non_empty("STRIPE_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            webhook_secret: non_empty("STRIPE_WEBHOOK_SECRET"),
            webhook_tolerance_secs: non_empty("WEBHOOK_TOLERANCE_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOLERANCE_SECS),
            admin_password: non_empty("ADMIN_PASSWORD"),
            site_url: non_empty("URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            enforce_server_quote: non_empty("ENFORCE_SERVER_QUOTE")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        tracing::debug!("Resolved config: {:?}", config);
        Ok(config)
    }

    pub fn require_webhook_secret(&self) -> Result<&str> {
        validate_required_field("STRIPE_WEBHOOK_SECRET", &self.webhook_secret).map(String::as_str)
    }

    pub fn require_admin_password(&self) -> Result<&str> {
        validate_required_field("ADMIN_PASSWORD", &self.admin_password).map(String::as_str)
    }

    /// 去掉結尾斜線的網站 URL，方便串接路徑
    pub fn site_root(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

impl Validate for FunctionsConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_secret("stripe.secret_key", &self.stripe_secret_key)?;
        validate_url("stripe.api_base", &self.stripe_api_base)?;
        validate_url("site.url", &self.site_url)?;
        validate_range("webhook.tolerance_seconds", self.webhook_tolerance_secs, 0, 86_400)?;

        if self.webhook_secret.is_none() {
            tracing::warn!("STRIPE_WEBHOOK_SECRET not set; webhook-handler will reject events");
        }
        if self.admin_password.is_none() {
            tracing::warn!("ADMIN_PASSWORD not set; get-customers will reject requests");
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
