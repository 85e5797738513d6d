//! HTTP API tests against the full router, without binding a socket.
//!
//! Run with: cargo test -p vitrina-storefront --test http_api

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use vitrina_storefront::cart::MemoryStorage;
use vitrina_storefront::catalog::CatalogStore;
use vitrina_storefront::config::StorefrontConfig;
use vitrina_storefront::middleware::REQUEST_ID_HEADER;
use vitrina_storefront::state::AppState;

const CATALOG: &str = r#"[
    {"id": "p1", "handle": "chompa-alpaca", "title": "Chompa de Alpaca", "vendor": "Puna",
     "collections": ["Invierno"],
     "variants": [{"id": "v1", "price": {"amount": "120.00", "currencyCode": "S/"}}]},
    {"id": "p2", "handle": "chullo", "title": "Chullo", "vendor": "Puna",
     "collections": ["Invierno", "Accesorios"],
     "variants": [{"id": "v2", "price": {"amount": "35.00", "currencyCode": "PEN"}}]},
    {"id": "p3", "handle": "poncho", "title": "Poncho", "vendor": "Altiplano",
     "variants": [{"id": "v3", "price": {"amount": "89.50", "currencyCode": "PEN"}}]}
]"#;

fn app() -> Router {
    let catalog = Arc::new(CatalogStore::from_json_str(CATALOG).unwrap());
    let state = AppState::new(
        StorefrontConfig::default(),
        catalog,
        Arc::new(MemoryStorage::new()),
    );
    vitrina_storefront::app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_and_request_id() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn product_listing_and_detail() {
    let app = app();

    let (status, page) = send(&app, Method::GET, "/api/products?sort=PRICE&reverse=true", None).await;
    assert_eq!(status, StatusCode::OK);
    let handles: Vec<&str> = page["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["handle"].as_str().unwrap())
        .collect();
    assert_eq!(handles, ["chompa-alpaca", "poncho", "chullo"]);
    assert_eq!(page["pageInfo"]["hasNextPage"], json!(false));

    let (status, product) = send(&app, Method::GET, "/api/products/chullo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["priceRange"]["minVariantPrice"]["amount"], "35.00");
    assert_eq!(product["featuredImage"]["url"], "/images/product-placeholder.jpg");

    let (status, _) = send(&app, Method::GET, "/api/products/nada", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_aggregates() {
    let app = app();

    let (_, recs) = send(&app, Method::GET, "/api/products/chullo/recommendations", None).await;
    assert_eq!(recs.as_array().unwrap().len(), 2);

    let (_, collections) = send(&app, Method::GET, "/api/collections", None).await;
    assert_eq!(collections[0]["path"], "/products/invierno");

    let (_, page) = send(&app, Method::GET, "/api/collections/invierno/products", None).await;
    assert_eq!(page["products"].as_array().unwrap().len(), 2);

    let (_, vendors) = send(&app, Method::GET, "/api/vendors", None).await;
    assert_eq!(vendors[0], json!({"vendor": "Puna", "productCount": 2}));

    let (_, highest) = send(&app, Method::GET, "/api/price/highest", None).await;
    assert_eq!(highest, json!({"amount": "120.00", "currencyCode": "PEN"}));
}

#[tokio::test]
async fn cart_lifecycle() {
    let app = app();

    let (status, cart) = send(&app, Method::POST, "/api/cart", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = cart["id"].as_str().unwrap().to_owned();
    let lines_uri = format!("/api/cart/{id}/lines");

    let (status, cart) = send(
        &app,
        Method::POST,
        &lines_uri,
        Some(json!([{"merchandiseId": "v2", "quantity": 2}, {"merchandiseId": "v3", "quantity": 1}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["totalQuantity"], 3);
    assert_eq!(cart["cost"]["totalAmount"]["amount"], "159.50");

    let (_, cart) = send(
        &app,
        Method::PATCH,
        &lines_uri,
        Some(json!([{"id": "line_v2", "merchandiseId": "v2", "quantity": 1}])),
    )
    .await;
    assert_eq!(cart["cost"]["subtotalAmount"]["amount"], "124.50");

    let (_, cart) = send(
        &app,
        Method::DELETE,
        &lines_uri,
        Some(json!({"lineIds": ["line_v3"]})),
    )
    .await;
    assert_eq!(cart["lines"].as_array().unwrap().len(), 1);

    let (status, fetched) = send(&app, Method::GET, &format!("/api/cart/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, cart);
}

#[tokio::test]
async fn cart_errors() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/cart/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("unknown"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/cart/any/lines",
        Some(json!([{"merchandiseId": "v1", "quantity": -1}])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
