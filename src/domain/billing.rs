//! 金流服務物件模型中函式會用到的部分
//!
//! 只宣告 handler 會讀的欄位，其餘欄位反序列化時忽略

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            has_more: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default, alias = "shipping_details")]
    pub shipping: Option<ShippingDetails>,
}

impl CheckoutSession {
    /// 取得 metadata，空字串視為不存在
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingPortalSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItem {
    pub price: Price,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub items: List<SubscriptionItem>,
}

impl Subscription {
    pub fn plan_id(&self) -> Option<&str> {
        self.items.data.first().map(|item| item.price.id.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub shipping: Option<ShippingDetails>,
    /// 只有列表帶 `expand[]=data.subscriptions` 時才會有
    #[serde(default)]
    pub subscriptions: Option<List<Subscription>>,
}

impl Customer {
    pub fn first_subscription(&self) -> Option<&Subscription> {
        self.subscriptions.as_ref().and_then(|s| s.data.first())
    }

    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping.as_ref().and_then(|s| s.address.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

/// 建立單一方案訂閱結帳所需的參數
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionParams {
    pub customer_email: String,
    pub product_name: String,
    pub product_description: String,
    pub unit_amount_cents: i64,
    pub currency: String,
    pub allowed_countries: Vec<String>,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(String, String)>,
    pub shipping_address_message: String,
    pub submit_message: String,
}

impl CheckoutSessionParams {
    /// 轉成 REST API 接受的中括號表單欄位
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "subscription".to_string()),
            ("billing_address_collection".to_string(), "auto".to_string()),
        ];
        for (i, country) in self.allowed_countries.iter().enumerate() {
            form.push((
                format!("shipping_address_collection[allowed_countries][{}]", i),
                country.clone(),
            ));
        }

        let item = "line_items[0]";
        form.extend([
            (format!("{item}[price_data][currency]"), self.currency.clone()),
            (
                format!("{item}[price_data][product_data][name]"),
                self.product_name.clone(),
            ),
            (
                format!("{item}[price_data][product_data][description]"),
                self.product_description.clone(),
            ),
            (
                format!("{item}[price_data][unit_amount]"),
                self.unit_amount_cents.to_string(),
            ),
            (
                format!("{item}[price_data][recurring][interval]"),
                "month".to_string(),
            ),
            (format!("{item}[quantity]"), "1".to_string()),
        ]);

        form.extend([
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
            ("allow_promotion_codes".to_string(), "true".to_string()),
            ("customer_email".to_string(), self.customer_email.clone()),
            (
                "phone_number_collection[enabled]".to_string(),
                "true".to_string(),
            ),
            (
                "custom_text[shipping_address][message]".to_string(),
                self.shipping_address_message.clone(),
            ),
            (
                "custom_text[submit][message]".to_string(),
                self.submit_message.clone(),
            ),
        ]);

        for (key, value) in &self.metadata {
            form.push((format!("metadata[{}]", key), value.clone()));
        }

        form
    }
}
