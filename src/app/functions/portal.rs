use super::Functions;
use crate::app::http::{FunctionRequest, FunctionResponse};
use crate::domain::ports::PaymentProvider;
use crate::utils::error::{Result, YpsError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PortalRequest {
    #[serde(default)]
    session_id: Option<String>,
}

impl<P: PaymentProvider> Functions<P> {
    /// 為已完成結帳的客戶建立帳單入口連結
    pub async fn create_portal_session(&self, request: &FunctionRequest) -> FunctionResponse {
        if !request.is_method("POST") {
            return FunctionResponse::method_not_allowed();
        }

        match self.try_create_portal_session(request).await {
            Ok(url) => FunctionResponse::json(200, &serde_json::json!({ "url": url })),
            Err(e) => {
                tracing::error!("Error creating portal session: {}", e);
                FunctionResponse::error(e.status_code(), e.to_string())
            }
        }
    }

    async fn try_create_portal_session(&self, request: &FunctionRequest) -> Result<String> {
        let data: PortalRequest = serde_json::from_str(request.body_str())
            .map_err(|e| YpsError::validation(format!("Invalid JSON body: {}", e)))?;
        let session_id = data
            .session_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| YpsError::validation("Checkout Session ID is required."))?;

        let checkout_session = self.provider.retrieve_checkout_session(&session_id).await?;
        let customer_id = checkout_session.customer.ok_or_else(|| YpsError::NotFound {
            message: "Could not find customer ID for the session.".to_string(),
        })?;

        let portal_session = self
            .provider
            .create_billing_portal_session(&customer_id, &self.config.site_url)
            .await?;
        tracing::info!("Portal session {} created for {}", portal_session.id, customer_id);

        Ok(portal_session.url)
    }
}
