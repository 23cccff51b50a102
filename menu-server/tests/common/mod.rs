//! Helpers shared by the integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use menu_server::auth::hash_password;
use menu_server::{Config, ServerState, build_app};
use serde_json::Value;
use tower::ServiceExt;

pub const STAFF_EMAIL: &str = "cocina@maitreya.test";
pub const STAFF_PASSWORD: &str = "milanesa-napolitana";

pub fn test_config(work_dir: &str) -> Config {
    let mut config = Config::with_overrides(work_dir, 0);
    config.staff_email = STAFF_EMAIL.to_string();
    config.staff_password_hash = Some(hash_password(STAFF_PASSWORD).unwrap());
    config.jwt_secret = Some("k".repeat(48));
    config.jwt_expiration_minutes = 60;
    config.timezone = chrono_tz::America::Argentina::Buenos_Aires;
    config
}

pub fn test_app() -> (ServerState, Router) {
    let state = ServerState::in_memory(test_config("/tmp/menu-server-tests")).unwrap();
    let app = build_app(state.clone());
    (state, app)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    send_with_headers(app, method, uri, token, body, &[]).await
}

pub async fn send_with_headers(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn login(app: &Router) -> String {
    let res = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": STAFF_EMAIL, "password": STAFF_PASSWORD })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.text());
    res.json()["token"].as_str().unwrap().to_string()
}

pub fn decimal(value: &Value) -> rust_decimal::Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("not a decimal: {other}"),
    }
}
