#![allow(dead_code)]

use httpmock::MockServer;
use yps_functions::{FixedClock, Functions, FunctionsConfig, StripeClient};

pub const SECRET_KEY: &str = "sk_test_yps";
pub const WEBHOOK_SECRET: &str = "whsec_test_yps";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const SITE_URL: &str = "https://yps.example.com";

/// 2024-03-15T12:00:00Z，週五
pub const NOW: i64 = 1_710_504_000;

pub fn test_config(server: &MockServer) -> FunctionsConfig {
    FunctionsConfig {
        production: false,
        stripe_secret_key: SECRET_KEY.to_string(),
        stripe_api_base: server.base_url(),
        webhook_secret: Some(WEBHOOK_SECRET.to_string()),
        webhook_tolerance_secs: 300,
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        site_url: SITE_URL.to_string(),
        enforce_server_quote: false,
    }
}

pub fn fixed_clock() -> FixedClock {
    FixedClock::at_unix(NOW).unwrap()
}

pub fn functions_with(config: FunctionsConfig) -> Functions<StripeClient> {
    let provider = StripeClient::new(&config.stripe_api_base, &config.stripe_secret_key);
    Functions::new(config, provider).with_clock(fixed_clock())
}

pub fn functions(server: &MockServer) -> Functions<StripeClient> {
    functions_with(test_config(server))
}
