use super::Functions;
use crate::app::http::{FunctionRequest, FunctionResponse};
use crate::core::quote::quote_for_input;
use crate::domain::billing::CheckoutSessionParams;
use crate::domain::model::ServiceFrequency;
use crate::domain::ports::PaymentProvider;
use crate::utils::error::{Result, YpsError};
use serde::Deserialize;
use serde_json::Value;

const PRODUCT_NAME: &str = "YPS - Yard Cleaning Service";
const SHIPPING_ADDRESS_MESSAGE: &str = "NOTE: This is the address where we will provide our yard cleaning service. This is not a shipping address - it's where our team will come to clean your yard.";
const SUBMIT_MESSAGE: &str = "Your subscription will begin with our next available service date. We'll contact you to confirm the details.";

/// 報價表單送出的 body，數字與字串都可能出現，所以欄位保持寬鬆型別
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub dogs: Option<Value>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub monthly_price: Option<Value>,
    #[serde(default)]
    pub email: Option<String>,
}

/// 驗證過的結帳資料
#[derive(Debug, Clone, PartialEq)]
struct Checkout {
    dogs: String,
    frequency: String,
    price_cents: i64,
    email: String,
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl CheckoutRequest {
    /// 依表單預期的錯誤順序檢查欄位
    fn validate(self, server_monthly: impl Fn(&str, &str) -> Option<f64>) -> Result<Checkout> {
        let dogs = self
            .dogs
            .filter(is_truthy)
            .map(|v| value_label(&v))
            .ok_or_else(|| YpsError::validation("Missing dogs count parameter"))?;
        let frequency = self
            .frequency
            .filter(|f| !f.is_empty())
            .ok_or_else(|| YpsError::validation("Missing frequency parameter"))?;
        let client_price = self
            .monthly_price
            .filter(is_truthy)
            .ok_or_else(|| YpsError::validation("Missing monthlyPrice parameter"))?;
        let email = self
            .email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| YpsError::validation("Missing email parameter"))?;

        let monthly = match server_monthly(&dogs, &frequency) {
            Some(server) => server,
            None => value_as_f64(&client_price).unwrap_or(f64::NAN),
        };
        let price_cents = (monthly * 100.0).round();
        if !price_cents.is_finite() || price_cents <= 0.0 {
            return Err(YpsError::validation("Invalid price calculation"));
        }

        if email.trim().is_empty() {
            return Err(YpsError::validation("Email is required"));
        }

        Ok(Checkout {
            dogs,
            frequency,
            price_cents: price_cents as i64,
            email,
        })
    }
}

impl<P: PaymentProvider> Functions<P> {
    pub async fn create_checkout_session(&self, request: &FunctionRequest) -> FunctionResponse {
        if !request.is_method("POST") {
            return FunctionResponse::method_not_allowed();
        }

        match self.try_create_checkout_session(request).await {
            Ok(url) => FunctionResponse::json(200, &serde_json::json!({ "url": url })),
            Err(e) => {
                tracing::error!("Error creating checkout session: {}", e);
                FunctionResponse::error(e.status_code(), e.to_string())
            }
        }
    }

    async fn try_create_checkout_session(&self, request: &FunctionRequest) -> Result<String> {
        tracing::debug!("Request body: {}", request.body_str());
        let data: CheckoutRequest = serde_json::from_str(request.body_str())
            .map_err(|e| YpsError::validation(format!("Invalid JSON body: {}", e)))?;

        let client_price = data.monthly_price.as_ref().and_then(value_as_f64);
        let enforce = self.config.enforce_server_quote;
        let checkout = data.validate(|dogs, frequency| {
            let quote = quote_for_input(dogs, frequency);
            if let Some(client) = client_price {
                if (quote.monthly - client).abs() > 0.005 {
                    tracing::warn!(
                        "Client price {} differs from quote {} for {} dog(s), {}",
                        client,
                        quote.monthly,
                        dogs,
                        frequency
                    );
                }
            }
            enforce.then_some(quote.monthly)
        })?;

        tracing::info!(
            "Creating checkout session: dogs={}, frequency={}, price_cents={}",
            checkout.dogs,
            checkout.frequency,
            checkout.price_cents
        );

        let params = self.checkout_params(checkout);
        let session = self.provider.create_checkout_session(&params).await?;
        tracing::info!("Session created successfully: {}", session.id);

        session.url.ok_or_else(|| YpsError::ProviderError {
            status: 200,
            message: format!("checkout session {} has no URL", session.id),
        })
    }

    fn checkout_params(&self, checkout: Checkout) -> CheckoutSessionParams {
        let site = self.config.site_root();
        let label = ServiceFrequency::from_code(&checkout.frequency).description_label();

        CheckoutSessionParams {
            product_description: format!(
                "{} dog(s), {} yard cleaning service. We'll visit the service address you provide below.",
                checkout.dogs, label
            ),
            customer_email: checkout.email,
            product_name: PRODUCT_NAME.to_string(),
            unit_amount_cents: checkout.price_cents,
            currency: "usd".to_string(),
            allowed_countries: vec!["US".to_string()],
            success_url: format!("{}/?success=true&session_id={{CHECKOUT_SESSION_ID}}", site),
            cancel_url: format!("{}/?canceled=true", site),
            metadata: vec![
                ("dogs".to_string(), checkout.dogs),
                ("frequency".to_string(), checkout.frequency),
            ],
            shipping_address_message: SHIPPING_ADDRESS_MESSAGE.to_string(),
            submit_message: SUBMIT_MESSAGE.to_string(),
        }
    }
}
