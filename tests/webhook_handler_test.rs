mod common;

use common::*;
use httpmock::prelude::*;
use serde_json::json;
use yps_functions::core::signature::signature_header;
use yps_functions::domain::ports::CustomerStore;
use yps_functions::{FunctionName, FunctionRequest, InMemoryCustomerStore};

fn signed(body: &str, timestamp: i64) -> FunctionRequest {
    FunctionRequest::new("POST")
        .with_header("Stripe-Signature", signature_header(WEBHOOK_SECRET, timestamp, body))
        .with_body(body)
}

fn checkout_completed(metadata: serde_json::Value) -> String {
    json!({
        "id": "evt_checkout",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "customer": "cus_1",
                "subscription": "sub_1",
                "metadata": metadata,
                "shipping_details": {
                    "name": "Pat Owner",
                    "address": {
                        "line1": "12 Bark Ave",
                        "city": "Austin",
                        "state": "TX",
                        "postal_code": "78701",
                        "country": "US"
                    }
                }
            }
        }
    })
    .to_string()
}

fn mock_subscription_and_customer(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/v1/subscriptions/sub_1");
        then.status(200).json_body(json!({
            "id": "sub_1",
            "status": "active",
            "current_period_end": NOW + 30 * 86_400,
            "items": {"data": [{"price": {"id": "price_monthly"}}]}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/customers/cus_1");
        then.status(200).json_body(json!({
            "id": "cus_1",
            "email": "pat@example.com",
            "name": "Pat Owner",
            "phone": "+15125550100"
        }));
    });
}

#[tokio::test]
async fn test_checkout_completed_builds_customer_record() {
    let server = MockServer::start();
    mock_subscription_and_customer(&server);

    let body = checkout_completed(json!({"dogs": "3", "frequency": "2w"}));
    let store = InMemoryCustomerStore::new();
    let response = functions(&server)
        .handle_webhook_with_store(&signed(&body, NOW), &store)
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.json_body().unwrap(), json!({"received": true}));

    let customers = store.customers();
    assert_eq!(customers.len(), 1);
    let record = &customers[0];
    assert_eq!(record.id, "cus_1");
    assert_eq!(record.email.as_deref(), Some("pat@example.com"));
    assert_eq!(record.subscription_id, "sub_1");
    assert_eq!(record.plan.as_deref(), Some("price_monthly"));
    assert_eq!(record.status, "active");
    assert_eq!(record.service_frequency, "2w");
    assert_eq!(record.dog_count, "3");
    assert_eq!(record.service_address.city.as_deref(), Some("Austin"));
    // 2024-03-15 週五，每週兩次 -> 週一
    assert_eq!(record.next_service_date, "2024-03-18");
    assert_eq!(record.current_period_end.as_deref(), Some("2024-04-14T12:00:00.000Z"));
    assert_eq!(record.created, "2024-03-15T12:00:00.000Z");
}

#[tokio::test]
async fn test_checkout_without_metadata_uses_defaults() {
    let server = MockServer::start();
    mock_subscription_and_customer(&server);

    let body = checkout_completed(json!({}));
    let store = InMemoryCustomerStore::new();
    functions(&server)
        .handle_webhook_with_store(&signed(&body, NOW), &store)
        .await;

    let record = &store.customers()[0];
    assert_eq!(record.service_frequency, "weekly");
    assert_eq!(record.dog_count, "1");
    assert_eq!(record.next_service_date, "2024-03-18");
}

#[tokio::test]
async fn test_provider_failure_is_acknowledged() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/subscriptions/sub_1");
        then.status(500).body("upstream down");
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/customers/cus_1");
        then.status(200).json_body(json!({"id": "cus_1"}));
    });

    let body = checkout_completed(json!({"dogs": "1", "frequency": "1w"}));
    let store = InMemoryCustomerStore::new();
    let response = functions(&server)
        .handle_webhook_with_store(&signed(&body, NOW), &store)
        .await;

    assert_eq!(response.status_code, 200);
    assert!(store.customers().is_empty());
}

#[tokio::test]
async fn test_invalid_signature_rejected() {
    let server = MockServer::start();
    let body = checkout_completed(json!({}));
    let functions = functions(&server);

    let tampered = FunctionRequest::new("POST")
        .with_header(
            "stripe-signature",
            signature_header("whsec_someone_else", NOW, &body),
        )
        .with_body(body.clone());
    let response = functions.handle_webhook(&tampered).await;
    assert_eq!(response.status_code, 400);
    assert!(response.body.starts_with("Webhook Error:"));

    let unsigned = FunctionRequest::new("POST").with_body(body.clone());
    let response = functions.handle_webhook(&unsigned).await;
    assert_eq!(response.status_code, 400);
}

#[tokio::test]
async fn test_stale_event_rejected() {
    let server = MockServer::start();
    let body = json!({"id": "evt_1", "type": "invoice.paid", "data": {"object": {"id": "in_1"}}})
        .to_string();

    let response = functions(&server)
        .handle_webhook(&signed(&body, NOW - 3_600))
        .await;

    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("tolerance"));
}

#[tokio::test]
async fn test_other_events_acknowledged() {
    let server = MockServer::start();
    let functions = functions(&server);

    for event_type in ["invoice.paid", "customer.subscription.deleted"] {
        let body = json!({"id": "evt_x", "type": event_type, "data": {"object": {"id": "obj_1"}}})
            .to_string();
        let store = InMemoryCustomerStore::new();
        let response = functions
            .handle_webhook_with_store(&signed(&body, NOW), &store)
            .await;
        assert_eq!(response.status_code, 200, "{}", event_type);
        assert!(store.customers().is_empty());
    }
}

#[tokio::test]
async fn test_missing_webhook_secret() {
    let server = MockServer::start();
    let mut config = test_config(&server);
    config.webhook_secret = None;

    let body = checkout_completed(json!({}));
    let response = functions_with(config)
        .handle_webhook(&signed(&body, NOW))
        .await;
    assert_eq!(response.status_code, 500);

    let response = functions(&server)
        .handle_webhook(&FunctionRequest::new("GET"))
        .await;
    assert_eq!(response.status_code, 405);
}

#[tokio::test]
async fn test_base64_encoded_event_verifies_against_raw_body() {
    use base64::{engine::general_purpose, Engine as _};

    let server = MockServer::start();
    let body = json!({"id": "evt_b64", "type": "invoice.paid", "data": {"object": {"id": "in_1"}}})
        .to_string();
    let mut request = signed(&body, NOW);
    request.body = Some(general_purpose::STANDARD.encode(&body));
    request.is_base64_encoded = true;

    let response = functions(&server)
        .invoke(FunctionName::WebhookHandler, request)
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.json_body().unwrap(), json!({"received": true}));
}
