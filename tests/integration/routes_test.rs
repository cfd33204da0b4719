use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use crewdog::{routes::create_router, services::jwt_service::Claims, AppState};
use jsonwebtoken::{encode, EncodingKey, Header};
use mockito::Matcher;
use serde_json::Value;
use tower::ServiceExt;

use super::{test_config, TEST_JWT_SECRET};

fn app_for(base_url: &str) -> Router {
    create_router(AppState::new(test_config(base_url)).unwrap())
}

fn access_token(sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: time::OffsetDateTime::now_utc().unix_timestamp() + 3600,
        email: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app_for("http://127.0.0.1:9")
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_summary_without_token_is_free_default() {
    let response = app_for("http://127.0.0.1:9")
        .oneshot(
            Request::get("/api/v1/account/summary")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["remaining"], 3);
    assert_eq!(body["unlimited"], false);
    assert_eq!(body["planLabel"], "Free");
}

#[tokio::test]
async fn test_summary_with_bad_token_is_not_rejected() {
    let response = app_for("http://127.0.0.1:9")
        .oneshot(
            Request::get("/api/v1/account/summary")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["cap"], 3);
}

#[tokio::test]
async fn test_summary_for_signed_in_user() {
    let mut server = mockito::Server::new_async().await;
    let token = access_token("user-42");
    let mock = server
        .mock("GET", "/account/summary/user-42")
        .match_query(Matcher::Any)
        .match_header("authorization", format!("Bearer {}", token).as_str())
        .with_status(200)
        .with_body(r#"{"isAdmin":true,"status":"active"}"#)
        .create_async()
        .await;

    let response = app_for(&server.url())
        .oneshot(
            Request::get("/api/v1/account/summary")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["isAdmin"], true);
    assert_eq!(body["unlimited"], true);
    assert_eq!(body["remaining"], Value::Null);
    assert_eq!(body["cap"], 25);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_checkout_requires_token() {
    let response = app_for("http://127.0.0.1:9")
        .oneshot(
            Request::post("/api/v1/billing/checkout")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"priceId":"price_gold"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_checkout_validates_request() {
    let response = app_for("http://127.0.0.1:9")
        .oneshot(
            Request::post("/api/v1/billing/checkout")
                .header(header::AUTHORIZATION, format!("Bearer {}", access_token("user-42")))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"priceId":"price_gold","successUrl":"nope"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_returns_session_url() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/billing/checkout")
        .with_status(200)
        .with_body(r#"{"url":"https://checkout.stripe.com/c/pay/cs_test_9"}"#)
        .create_async()
        .await;

    let response = app_for(&server.url())
        .oneshot(
            Request::post("/api/v1/billing/checkout")
                .header(header::AUTHORIZATION, format!("Bearer {}", access_token("user-42")))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"priceId":"price_gold"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["url"],
        "https://checkout.stripe.com/c/pay/cs_test_9"
    );
}

#[tokio::test]
async fn test_billing_outage_maps_to_bad_gateway() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/billing/cancel")
        .with_status(503)
        .create_async()
        .await;

    let response = app_for(&server.url())
        .oneshot(
            Request::post("/api/v1/billing/cancel")
                .header(header::AUTHORIZATION, format!("Bearer {}", access_token("user-42")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn test_history_limit_is_clamped() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/account/history/user-42")
        .match_query(Matcher::UrlEncoded("limit".to_string(), "100".to_string()))
        .with_status(200)
        .with_body(r#"{"items":[]}"#)
        .create_async()
        .await;

    let response = app_for(&server.url())
        .oneshot(
            Request::get("/api/v1/account/history?limit=5000")
                .header(header::AUTHORIZATION, format!("Bearer {}", access_token("user-42")))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    mock.assert_async().await;
}
