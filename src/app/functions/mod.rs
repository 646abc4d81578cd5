//! Serverless 函式，以部署名稱定址

mod checkout;
mod customers;
mod portal;
mod webhook;

pub use checkout::CheckoutRequest;

use crate::app::http::{FunctionRequest, FunctionResponse};
use crate::config::FunctionsConfig;
use crate::domain::ports::{Clock, PaymentProvider, SystemClock};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::Instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionName {
    CreateCheckoutSession,
    CreatePortalSession,
    WebhookHandler,
    GetCustomers,
}

impl FunctionName {
    pub const ALL: [FunctionName; 4] = [
        Self::CreateCheckoutSession,
        Self::CreatePortalSession,
        Self::WebhookHandler,
        Self::GetCustomers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateCheckoutSession => "create-checkout-session",
            Self::CreatePortalSession => "create-portal-session",
            Self::WebhookHandler => "webhook-handler",
            Self::GetCustomers => "get-customers",
        }
    }

    /// 從請求路徑 (例如 `/.netlify/functions/get-customers`) 取得函式
    pub fn from_path(path: &str) -> Option<Self> {
        path.trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
    }
}

impl FromStr for FunctionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown function: {}", s))
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 共用配置、金流服務與時鐘的 handler 集合
pub struct Functions<P: PaymentProvider> {
    config: FunctionsConfig,
    provider: P,
    clock: Arc<dyn Clock>,
}

impl<P: PaymentProvider> Functions<P> {
    pub fn new(config: FunctionsConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub async fn invoke(&self, name: FunctionName, request: FunctionRequest) -> FunctionResponse {
        let span = tracing::info_span!("function", name = %name, method = %request.http_method);
        async {
            let request = match request.decoded() {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!("Rejected request body: {}", e);
                    return FunctionResponse::error(e.status_code(), e.to_string());
                }
            };
            let response = match name {
                FunctionName::CreateCheckoutSession => {
                    self.create_checkout_session(&request).await
                }
                FunctionName::CreatePortalSession => self.create_portal_session(&request).await,
                FunctionName::WebhookHandler => self.handle_webhook(&request).await,
                FunctionName::GetCustomers => self.get_customers(&request).await,
            };
            tracing::info!("Responded {}", response.status_code);
            response
        }
        .instrument(span)
        .await
    }

    /// 依路徑路由，未知路徑回 404
    pub async fn invoke_path(&self, request: FunctionRequest) -> FunctionResponse {
        match FunctionName::from_path(&request.path) {
            Some(name) => self.invoke(name, request).await,
            None => {
                tracing::warn!("No function at path {:?}", request.path);
                FunctionResponse::error(404, "Function not found")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names_round_trip() {
        for name in FunctionName::ALL {
            assert_eq!(name.as_str().parse::<FunctionName>().unwrap(), name);
        }
        assert!("send-email".parse::<FunctionName>().is_err());
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            FunctionName::from_path("/.netlify/functions/webhook-handler"),
            Some(FunctionName::WebhookHandler)
        );
        assert_eq!(
            FunctionName::from_path("/api/get-customers/"),
            Some(FunctionName::GetCustomers)
        );
        assert_eq!(FunctionName::from_path("/"), None);
        assert_eq!(FunctionName::from_path(""), None);
    }
}
