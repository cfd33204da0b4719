use crewdog::{
    models::billing::CheckoutRequest,
    services::{AccountApiClient, UserIdentity},
    ApiError,
};
use mockito::Matcher;
use serde_json::json;

use super::test_config;

fn client_for(base_url: &str) -> AccountApiClient {
    AccountApiClient::new(&test_config(base_url).api).unwrap()
}

fn signed_in() -> UserIdentity {
    UserIdentity {
        user_id: "user-123".to_string(),
        access_token: "token-abc".to_string(),
    }
}

#[tokio::test]
async fn test_checkout_forwards_user_and_price() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/billing/checkout")
        .match_header("authorization", "Bearer token-abc")
        .match_body(Matcher::PartialJson(json!({
            "userId": "user-123",
            "priceId": "price_platinum_monthly",
            "successUrl": "https://crewdog.ai/account?upgraded=1",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"url":"https://checkout.stripe.com/c/pay/cs_test_123"}"#)
        .create_async()
        .await;

    let request = CheckoutRequest {
        price_id: "price_platinum_monthly".to_string(),
        success_url: Some("https://crewdog.ai/account?upgraded=1".to_string()),
        cancel_url: None,
    };

    let session = client_for(&server.url())
        .create_checkout_session(&signed_in(), &request)
        .await
        .unwrap();

    assert_eq!(session.url, "https://checkout.stripe.com/c/pay/cs_test_123");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_checkout_upstream_failure_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/billing/checkout")
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let request = CheckoutRequest {
        price_id: "price_gold".to_string(),
        success_url: None,
        cancel_url: None,
    };

    let result = client_for(&server.url())
        .create_checkout_session(&signed_in(), &request)
        .await;

    assert!(matches!(result, Err(ApiError::Upstream(_))));
}

#[tokio::test]
async fn test_portal_without_customer_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/billing/portal")
        .with_status(404)
        .create_async()
        .await;

    let result = client_for(&server.url())
        .create_portal_session(&signed_in(), None)
        .await;

    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_cancel_reports_period_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/billing/cancel")
        .match_body(Matcher::Json(json!({ "userId": "user-123" })))
        .with_status(200)
        .with_body(r#"{"cancelAtPeriodEnd":true,"renewalDate":"2026-11-19"}"#)
        .create_async()
        .await;

    let cancelled = client_for(&server.url())
        .cancel_subscription(&signed_in())
        .await
        .unwrap();

    assert!(cancelled.cancel_at_period_end);
    assert_eq!(cancelled.renewal_date.as_deref(), Some("2026-11-19"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_history_passes_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/account/history/user-123")
        .match_query(Matcher::UrlEncoded("limit".to_string(), "10".to_string()))
        .with_status(200)
        .with_body(
            r#"{"items":[{"id":"s1","jobUrl":"https://www.linkedin.com/jobs/view/1","company":"Acme Ltd","searchedAt":"2026-10-18T09:00:00Z"}]}"#,
        )
        .create_async()
        .await;

    let history = client_for(&server.url())
        .search_history(&signed_in(), 10)
        .await
        .unwrap();

    assert_eq!(history.items.len(), 1);
    assert_eq!(history.items[0].company.as_deref(), Some("Acme Ltd"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/billing/portal")
        .with_status(200)
        .with_body(r#"{"url":"https://billing.stripe.com/p/session/test"}"#)
        .create_async()
        .await;

    let session = client_for(&format!("{}/", server.url()))
        .create_portal_session(&signed_in(), Some("https://crewdog.ai/account"))
        .await
        .unwrap();

    assert!(session.url.starts_with("https://billing.stripe.com"));
    mock.assert_async().await;
}
