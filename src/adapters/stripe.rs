use crate::domain::billing::{
    BillingPortalSession, CheckoutSession, CheckoutSessionParams, Customer, List, Subscription,
};
use crate::domain::ports::PaymentProvider;
use crate::utils::error::{Result, YpsError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// 驗證物件 ID (例如 cs_test_123)，只接受英數字與底線
fn object_id<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(id)
    } else {
        tracing::warn!("Rejected malformed {} id {:?}", kind, id);
        Err(YpsError::validation(format!("Invalid {} ID", kind)))
    }
}

/// 金流服務的 REST client
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    api_base: String,
    secret_key: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl StripeClient {
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    /// 每個片段各自編碼成一段路徑
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base).map_err(|e| YpsError::InvalidConfigValueError {
            field: "stripe_api_base".to_string(),
            value: self.api_base.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| YpsError::config(format!("API base cannot be a base: {}", self.api_base)))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    fn get(&self, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.client.get(self.url(segments)?).bearer_auth(&self.secret_key))
    }

    fn post(&self, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.client.post(self.url(segments)?).bearer_auth(&self.secret_key))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Payment provider responded with {}", status);

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => match (envelope.error.kind, envelope.error.message) {
                (Some(kind), Some(message)) => format!("{}: {}", kind, message),
                (None, Some(message)) => message,
                (Some(kind), None) => kind,
                (None, None) => status.to_string(),
            },
            Err(_) if text.is_empty() => status.to_string(),
            Err(_) => text,
        };

        Err(YpsError::ProviderError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession> {
        tracing::debug!(
            "Creating checkout session for {} cents/month",
            params.unit_amount_cents
        );
        self.send(self.post(&["checkout", "sessions"])?.form(&params.to_form()))
            .await
    }

    async fn retrieve_checkout_session(&self, id: &str) -> Result<CheckoutSession> {
        let id = object_id("checkout session", id)?;
        self.send(self.get(&["checkout", "sessions", id])?).await
    }

    async fn list_checkout_sessions(
        &self,
        customer_id: &str,
        limit: u32,
    ) -> Result<List<CheckoutSession>> {
        let query = [("customer", customer_id.to_string()), ("limit", limit.to_string())];
        self.send(self.get(&["checkout", "sessions"])?.query(&query)).await
    }

    async fn create_billing_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<BillingPortalSession> {
        let form = [("customer", customer_id), ("return_url", return_url)];
        self.send(self.post(&["billing_portal", "sessions"])?.form(&form))
            .await
    }

    async fn retrieve_subscription(&self, id: &str) -> Result<Subscription> {
        let id = object_id("subscription", id)?;
        self.send(self.get(&["subscriptions", id])?).await
    }

    async fn retrieve_customer(&self, id: &str) -> Result<Customer> {
        let id = object_id("customer", id)?;
        self.send(self.get(&["customers", id])?).await
    }

    async fn list_customers(&self, limit: u32, expand: &[&str]) -> Result<List<Customer>> {
        let mut query = vec![("limit".to_string(), limit.to_string())];
        query.extend(
            expand
                .iter()
                .map(|field| ("expand[]".to_string(), field.to_string())),
        );
        self.send(self.get(&["customers"])?.query(&query)).await
    }
}
