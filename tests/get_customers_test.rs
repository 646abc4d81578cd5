mod common;

use common::*;
use httpmock::prelude::*;
use serde_json::json;
use yps_functions::{FunctionName, FunctionRequest};

fn admin_request(authorization: Option<&str>) -> FunctionRequest {
    let request = FunctionRequest::new("GET");
    match authorization {
        Some(value) => request.with_header("Authorization", value),
        None => request,
    }
}

fn authorized() -> FunctionRequest {
    admin_request(Some(&format!("Bearer {}", ADMIN_PASSWORD)))
}

#[tokio::test]
async fn test_requires_bearer_credentials() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/customers");
        then.status(200).json_body(json!({"data": []}));
    });
    let functions = functions(&server);

    let response = functions.get_customers(&admin_request(None)).await;
    assert_eq!(response.status_code, 401);
    assert_eq!(
        response.json_body().unwrap()["error"],
        "Unauthorized - Authentication required"
    );

    let response = functions
        .get_customers(&admin_request(Some("Basic YWRtaW4=")))
        .await;
    assert_eq!(response.status_code, 401);

    let response = functions
        .get_customers(&admin_request(Some("Bearer wrong-password")))
        .await;
    assert_eq!(response.status_code, 403);
    assert_eq!(
        response.json_body().unwrap()["error"],
        "Forbidden - Invalid credentials"
    );

    let response = functions
        .get_customers(&FunctionRequest::new("POST"))
        .await;
    assert_eq!(response.status_code, 405);

    list_mock.assert_hits(0);
}

#[tokio::test]
async fn test_lists_customers_with_service_details() {
    let server = MockServer::start();
    let list_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/customers")
            .query_param("limit", "100")
            .header("authorization", format!("Bearer {}", SECRET_KEY));
        then.status(200).json_body(json!({
            "object": "list",
            "has_more": false,
            "data": [
                {
                    "id": "cus_sub",
                    "name": "Sam Subscriber",
                    "email": "sam@example.com",
                    "phone": "+15125550111",
                    "shipping": {"address": {"line1": "5 Fetch Ln", "city": "Austin"}},
                    "subscriptions": {"data": [{"id": "sub_9", "status": "active"}]}
                },
                {
                    "id": "cus_lead",
                    "name": "Lee Lead",
                    "email": "lee@example.com",
                    "subscriptions": {"data": []}
                }
            ]
        }));
    });
    let sessions_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/checkout/sessions")
            .query_param("customer", "cus_sub")
            .query_param("limit", "1");
        then.status(200).json_body(json!({
            "data": [{"id": "cs_9", "metadata": {"dogs": "2", "frequency": "mo"}}]
        }));
    });

    let response = functions(&server)
        .invoke(FunctionName::GetCustomers, authorized())
        .await;

    list_mock.assert();
    sessions_mock.assert_hits(1);
    assert_eq!(response.status_code, 200);

    let body = response.json_body().unwrap();
    let customers = body.as_array().unwrap();
    assert_eq!(customers.len(), 2);

    let subscriber = &customers[0];
    assert_eq!(subscriber["id"], "cus_sub");
    assert_eq!(subscriber["frequency"], "mo");
    assert_eq!(subscriber["dogs"], "2");
    assert_eq!(subscriber["status"], "active");
    assert_eq!(subscriber["nextServiceDate"], "2024-04-01");
    assert_eq!(subscriber["serviceAddress"]["line1"], "5 Fetch Ln");

    let lead = &customers[1];
    assert_eq!(lead["id"], "cus_lead");
    assert_eq!(lead["frequency"], "weekly");
    assert_eq!(lead["dogs"], "1");
    assert_eq!(lead["status"], "pending");
    assert_eq!(lead["nextServiceDate"], "2024-03-15");
}

#[tokio::test]
async fn test_subscriber_without_checkout_session_stays_pending() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/customers");
        then.status(200).json_body(json!({
            "data": [{
                "id": "cus_manual",
                "subscriptions": {"data": [{"id": "sub_1", "status": "past_due"}]}
            }]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/v1/checkout/sessions");
        then.status(200).json_body(json!({"data": []}));
    });

    let response = functions(&server).get_customers(&authorized()).await;

    assert_eq!(response.status_code, 200);
    let body = response.json_body().unwrap();
    assert_eq!(body[0]["status"], "pending");
    assert_eq!(body[0]["frequency"], "weekly");
}

#[tokio::test]
async fn test_provider_failure_is_500() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/customers");
        then.status(401).json_body(json!({
            "error": {"type": "authentication_error", "message": "Invalid API Key provided"}
        }));
    });

    let response = functions(&server).get_customers(&authorized()).await;

    assert_eq!(response.status_code, 500);
    assert!(response.json_body().unwrap()["error"]
        .as_str()
        .unwrap()
        .contains("Invalid API Key"));
}

#[tokio::test]
async fn test_unconfigured_admin_password() {
    let server = MockServer::start();
    let mut config = test_config(&server);
    config.admin_password = None;

    let response = functions_with(config).get_customers(&authorized()).await;
    assert_eq!(response.status_code, 500);
}

#[tokio::test]
async fn test_routes_by_netlify_path() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/customers");
        then.status(200).json_body(json!({"data": []}));
    });
    let functions = functions(&server);

    let mut request = authorized();
    request.path = "/.netlify/functions/get-customers".to_string();
    let response = functions.invoke_path(request).await;
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, "[]");

    let mut request = authorized();
    request.path = "/.netlify/functions/unknown".to_string();
    let response = functions.invoke_path(request).await;
    assert_eq!(response.status_code, 404);
}
