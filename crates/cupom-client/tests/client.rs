//! Integration tests for `CouponClient` using wiremock HTTP mocks.

use cupom_client::{CouponApiError, CouponClient};
use cupom_core::CouponKind;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> CouponClient {
    CouponClient::new(base_url, 10).expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_coupons_parses_the_collection_in_order() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "code": "TESTE10",
            "type": "percentage",
            "value": 10,
            "expire_at": "2025-06-30T23:59:59.000Z",
            "is_active": true,
            "max_use": 100,
            "used": 3,
            "max_apply_date": null
        },
        {
            "code": "FRETE20",
            "type": "fixed",
            "value": 20,
            "expire_at": "2025-07-15T23:59:59.000Z",
            "is_active": false,
            "max_use": 50,
            "used": 50,
            "max_apply_date": "2025-07-01T00:00:00.000Z"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coupons = client.fetch_coupons().await.expect("should parse coupons");

    assert_eq!(coupons.len(), 2);
    assert_eq!(coupons[0].code, "TESTE10");
    assert_eq!(coupons[0].kind(), CouponKind::Percentage);
    assert!(coupons[0].is_active);
    assert_eq!(coupons[1].code, "FRETE20");
    assert_eq!(coupons[1].kind(), CouponKind::Fixed);
    assert!(coupons[1].max_apply_date.is_some());
    assert_eq!(coupons[1].used, 50);
}

#[tokio::test]
async fn fetch_coupons_accepts_an_empty_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let coupons = client.fetch_coupons().await.expect("empty array is valid");
    assert!(coupons.is_empty());
}

#[tokio::test]
async fn fetch_coupons_surfaces_server_errors_as_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_coupons().await.unwrap_err();
    match err {
        CouponApiError::Http(e) => {
            assert_eq!(e.status().map(|s| s.as_u16()), Some(500));
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_coupons_rejects_a_non_array_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"coupons": []})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_coupons().await.unwrap_err();
    assert!(matches!(err, CouponApiError::Deserialize { .. }));
}

#[tokio::test]
async fn fetch_coupons_rejects_a_malformed_expire_at() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "code": "BAD",
            "type": "fixed",
            "value": 5,
            "expire_at": "30/06/2025",
            "is_active": true,
            "max_use": 1,
            "used": 0,
            "max_apply_date": null
        }
    ]);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_coupons().await.unwrap_err();
    assert!(matches!(err, CouponApiError::Deserialize { .. }));
}
