use crate::config::{FunctionsConfig, DEFAULT_API_BASE, DEFAULT_SITE_URL};
use crate::core::environment;
use crate::core::signature::DEFAULT_TOLERANCE_SECS;
use crate::utils::error::{Result, YpsError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// [`FunctionsConfig`] 的檔案形式，供本機 CLI 使用
///
/// ```toml
/// [site]
/// url = "http://localhost:8888"
///
/// [stripe]
/// secret_key = "${STRIPE_SECRET_KEY}"
///
/// [webhook]
/// secret = "${STRIPE_WEBHOOK_SECRET}"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionsToml {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub stripe: StripeSection,
    #[serde(default)]
    pub webhook: WebhookSection,
    #[serde(default)]
    pub admin: AdminSection,
    #[serde(default)]
    pub pricing: PricingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteSection {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StripeSection {
    pub secret_key: Option<String>,
    pub api_base: Option<String>,
    pub production: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookSection {
    pub secret: Option<String>,
    pub tolerance_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminSection {
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingSection {
    pub enforce_server_quote: Option<bool>,
}

impl FunctionsToml {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(YpsError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| YpsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STRIPE_SECRET_KEY})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| YpsError::config(e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 轉成執行期配置，檔案沒寫或仍是未解析 `${VAR}` 的值改用環境變數規則
    pub fn into_config(self) -> Result<FunctionsConfig> {
        let resolved = |value: Option<String>| value.filter(|v| !v.is_empty() && !v.contains("${"));
        let env = |key: &str| std::env::var(key).ok();

        let production = self
            .stripe
            .production
            .unwrap_or_else(|| environment::is_production(env));
        let stripe_secret_key = match resolved(self.stripe.secret_key) {
            Some(key) => key,
            None => environment::select_secret_key(production, env)?,
        };

        Ok(FunctionsConfig {
            production,
            stripe_secret_key,
            stripe_api_base: resolved(self.stripe.api_base)
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            webhook_secret: resolved(self.webhook.secret),
            webhook_tolerance_secs: self
                .webhook
                .tolerance_seconds
                .unwrap_or(DEFAULT_TOLERANCE_SECS),
            admin_password: resolved(self.admin.password),
            site_url: resolved(self.site.url).unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            enforce_server_quote: self.pricing.enforce_server_quote.unwrap_or(false),
        })
    }
}
