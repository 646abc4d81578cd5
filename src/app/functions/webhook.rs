use super::Functions;
use crate::adapters::memory_store::InMemoryCustomerStore;
use crate::app::http::{FunctionRequest, FunctionResponse};
use crate::core::schedule::{format_iso, next_service_date};
use crate::core::signature::{WebhookVerifier, SIGNATURE_HEADER};
use crate::domain::billing::{CheckoutSession, Event};
use crate::domain::model::CustomerRecord;
use crate::domain::ports::{CustomerStore, PaymentProvider};
use crate::utils::error::{Result, YpsError};
use chrono::{DateTime, SecondsFormat, Utc};

pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";
pub const INVOICE_PAID: &str = "invoice.paid";

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl<P: PaymentProvider> Functions<P> {
    /// 金流事件入口，建立的客戶記錄只存在於這次呼叫
    pub async fn handle_webhook(&self, request: &FunctionRequest) -> FunctionResponse {
        let store = InMemoryCustomerStore::new();
        self.handle_webhook_with_store(request, &store).await
    }

    pub async fn handle_webhook_with_store(
        &self,
        request: &FunctionRequest,
        store: &dyn CustomerStore,
    ) -> FunctionResponse {
        if !request.is_method("POST") {
            return FunctionResponse::method_not_allowed();
        }

        let secret = match self.config.require_webhook_secret() {
            Ok(secret) => secret,
            Err(e) => {
                tracing::error!("Webhook secret not configured: {}", e);
                return FunctionResponse::error(500, "Webhook secret not configured");
            }
        };

        let signature = request.header(SIGNATURE_HEADER);
        tracing::info!(
            "Webhook received. Signature: {}",
            if signature.is_some() { "Present" } else { "Missing" }
        );

        let verifier = WebhookVerifier::new(secret, self.config.webhook_tolerance_secs);
        let now = self.clock.now().timestamp();
        let event = match verifier.construct_event(signature, request.body_str(), now) {
            Ok(event) => event,
            Err(e) => {
                tracing::error!("Webhook verification failed: {}", e);
                tracing::debug!(
                    "Body preview: {}",
                    request.body_str().chars().take(100).collect::<String>()
                );
                return FunctionResponse::text(400, format!("Webhook Error: {}", e));
            }
        };

        tracing::info!("Webhook verified: {} ({})", event.id, event.event_type);
        self.dispatch_event(&event, store).await;

        FunctionResponse::json(200, &serde_json::json!({ "received": true }))
    }

    /// 處理失敗只記錄 log，不回報給呼叫端
    async fn dispatch_event(&self, event: &Event, store: &dyn CustomerStore) {
        match event.event_type.as_str() {
            CHECKOUT_COMPLETED => {
                if let Err(e) = self.record_completed_checkout(event, store).await {
                    tracing::error!("Error processing checkout session: {}", e);
                }
            }
            INVOICE_PAID => {
                let invoice_id = event.data.object.get("id").and_then(|v| v.as_str());
                tracing::info!("Invoice paid: {}", invoice_id.unwrap_or("<unknown>"));
            }
            other => tracing::info!("Received event: {}", other),
        }
    }

    async fn record_completed_checkout(
        &self,
        event: &Event,
        store: &dyn CustomerStore,
    ) -> Result<()> {
        let session: CheckoutSession = serde_json::from_value(event.data.object.clone())?;
        tracing::info!("Checkout completed: {}", session.id);

        let record = self.customer_record(&session).await?;
        tracing::debug!("New customer data: {:?}", record);
        store.save_customer(record)
    }

    async fn customer_record(&self, session: &CheckoutSession) -> Result<CustomerRecord> {
        let subscription_id = session.subscription.as_deref().ok_or_else(|| YpsError::NotFound {
            message: format!("checkout session {} has no subscription", session.id),
        })?;
        let customer_id = session.customer.as_deref().ok_or_else(|| YpsError::NotFound {
            message: format!("checkout session {} has no customer", session.id),
        })?;

        let (subscription, customer) = futures::try_join!(
            self.provider.retrieve_subscription(subscription_id),
            self.provider.retrieve_customer(customer_id),
        )?;

        let frequency = session.metadata_value("frequency");
        let today = self.clock.today();

        Ok(CustomerRecord {
            id: customer.id,
            email: customer.email,
            name: customer.name,
            phone: customer.phone,
            plan: subscription.plan_id().map(str::to_string),
            subscription_id: subscription.id,
            status: subscription.status,
            service_frequency: frequency.unwrap_or("weekly").to_string(),
            dog_count: session.metadata_value("dogs").unwrap_or("1").to_string(),
            service_address: session
                .shipping
                .as_ref()
                .and_then(|s| s.address.clone())
                .unwrap_or_default(),
            next_service_date: format_iso(next_service_date(frequency.unwrap_or(""), today)),
            current_period_end: subscription
                .current_period_end
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(iso_timestamp),
            created: iso_timestamp(self.clock.now()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_timestamp_matches_browser_format() {
        let at = DateTime::from_timestamp(1_710_504_000, 0).unwrap();
        assert_eq!(iso_timestamp(at), "2024-03-15T12:00:00.000Z");
    }
}
