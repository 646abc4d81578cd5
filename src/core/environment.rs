//! 部署環境判斷與金流金鑰選擇

use crate::utils::error::{Result, YpsError};
use crate::utils::logger::redact;

pub const PROD_KEY_VAR: &str = "PROD_STRIPE_SECRET_KEY";
pub const TEST_KEY_VAR: &str = "STRIPE_SECRET_KEY";

const PRODUCTION_HOSTS: [&str; 2] = ["netlify.app", "yardpoopservice.com"];

/// 任一部署指標指向正式環境即為 true
pub fn is_production<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let equals = |var: &str, expected: &str| lookup(var).as_deref() == Some(expected);
    let on_production_host = |var: &str| {
        lookup(var)
            .map(|url| PRODUCTION_HOSTS.iter().any(|host| url.contains(host)))
            .unwrap_or(false)
    };

    let indicators = [
        ("CONTEXT", equals("CONTEXT", "production")),
        ("DEPLOY_CONTEXT", equals("DEPLOY_CONTEXT", "production")),
        ("NETLIFY_ENV", equals("NETLIFY_ENV", "production")),
        ("NODE_ENV", equals("NODE_ENV", "production")),
        ("BRANCH", equals("BRANCH", "main") || equals("BRANCH", "master")),
        ("URL", on_production_host("URL")),
        ("DEPLOY_URL", on_production_host("DEPLOY_URL")),
    ];

    tracing::debug!("Production indicators: {:?}", indicators);
    indicators.iter().any(|(_, hit)| *hit)
}

/// 取得對應環境的 secret key
pub fn select_secret_key<F>(production: bool, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let var = if production { PROD_KEY_VAR } else { TEST_KEY_VAR };
    let key = lookup(var)
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            tracing::error!(
                "No payment secret key available for {} environment",
                if production { "production" } else { "development" }
            );
            YpsError::MissingConfigError {
                field: var.to_string(),
            }
        })?;

    tracing::info!(
        "Using {} payment key {}",
        if production { "PRODUCTION" } else { "TEST" },
        redact(&key)
    );
    Ok(key)
}
