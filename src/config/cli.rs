use crate::config::toml_config::FunctionsToml;
use crate::config::FunctionsConfig;
use crate::utils::error::{Result, YpsError};
use clap::{Parser, Subcommand};
use std::collections::HashMap;

#[derive(Debug, Clone, Parser)]
#[command(name = "yps")]
#[command(about = "Quotes, service-date estimates and local function runs for YPS")]
pub struct Cli {
    /// Path to a TOML config file; the environment is used when omitted
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Price a plan
    Quote {
        #[arg(long, default_value = "1")]
        dogs: String,

        #[arg(long, default_value = "1w")]
        frequency: String,
    },

    /// Estimate the next visit for a frequency
    NextDate {
        #[arg(long, default_value = "1w")]
        frequency: String,

        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        today: Option<String>,
    },

    /// Run a function handler locally against the configured provider
    Invoke {
        /// create-checkout-session, create-portal-session, webhook-handler or get-customers
        function: String,

        #[arg(long, default_value = "POST")]
        method: String,

        /// Raw request body
        #[arg(long)]
        body: Option<String>,

        /// Request header as `name:value`; repeatable
        #[arg(long = "header", value_name = "NAME:VALUE")]
        headers: Vec<String>,
    },
}

impl Cli {
    pub fn load_config(&self) -> Result<FunctionsConfig> {
        match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path);
                FunctionsToml::from_file(path)?.into_config()
            }
            None => FunctionsConfig::from_env(),
        }
    }
}

/// 解析 `name:value`，header 名稱轉成小寫
pub fn parse_headers(raw: &[String]) -> Result<HashMap<String, String>> {
    raw.iter()
        .map(|header| {
            header
                .split_once(':')
                .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
                .ok_or_else(|| YpsError::InvalidConfigValueError {
                    field: "header".to_string(),
                    value: header.clone(),
                    reason: "expected NAME:VALUE".to_string(),
                })
        })
        .collect()
}
