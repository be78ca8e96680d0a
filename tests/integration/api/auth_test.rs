//! Account flow over HTTP: signup, OTP, login, logout, auth guard

use axum::http::{header, Method, StatusCode};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use talks::backend::store::Store;
use talks::backend::mail::template::OTP_SUBJECT;
use tower::ServiceExt;

use crate::common::*;

fn signup_body(email: &str) -> serde_json::Value {
    json!({
        "firstname": "Ada",
        "lastname": "Lovelace",
        "email": email,
        "password": TEST_PASSWORD,
    })
}

#[tokio::test]
async fn test_signup_verify_and_login() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(json_request(Method::POST, "/api/v1/auth/signup", signup_body("Ada@Example.com"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["status"], "success");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, OTP_SUBJECT);
    assert_eq!(sent[0].to, "ada@example.com");

    let wrong = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/verify-otp",
            json!({"email": "ada@example.com", "otp": "0000"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(wrong).await["message"], "Incorrect OTP!");

    let otp = app.mailer.last_otp_for("ada@example.com").unwrap();
    let verified = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/verify-otp",
            json!({"email": "ada@example.com", "otp": otp}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(verified.status(), StatusCode::CREATED);
    let cookie = verified
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));
    let body = json_body(verified).await;
    assert_eq!(body["user"]["verified"], true);
    assert!(body["token"].as_str().is_some());

    let login = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            json!({"email": "ada@example.com", "password": TEST_PASSWORD}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    assert!(login.headers().get(header::SET_COOKIE).is_some());
}

#[tokio::test]
async fn test_signup_rejects_verified_account() {
    let app = TestApp::new();
    app.verified_user("Ada", "ada@example.com").await;

    let response = app
        .router()
        .oneshot(json_request(Method::POST, "/api/v1/auth/signup", signup_body("ada@example.com"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"],
        "Account already exists! Login Instead."
    );
}

#[tokio::test]
async fn test_signup_replaces_unverified_account() {
    let app = TestApp::new();
    let stale = app.unverified_user("Ada", "ada@example.com").await;

    let response = app
        .router()
        .oneshot(json_request(Method::POST, "/api/v1/auth/signup", signup_body("ada@example.com"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let current = app.store.user_by_email("ada@example.com").await.unwrap().unwrap();
    assert_ne!(current.id, stale.id);
    assert!(app.store.user_by_id(stale.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_signup_validation() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/signup",
            json!({"firstname": "Ada", "email": "not-an-email", "password": TEST_PASSWORD}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["status"], "fail");

    let response = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/signup",
            json!({"firstname": "Ada", "email": "ada@example.com", "password": "123"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_expired_otp() {
    let app = TestApp::new();
    let mut user = app.unverified_user("Ada", "ada@example.com").await;
    user.otp_expires_at = Some(Utc::now() - Duration::seconds(1));
    app.store.save_user(&user).await.unwrap();

    let response = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/verify-otp",
            json!({"email": "ada@example.com", "otp": "1234"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["message"], "The OTP has expired!");
}

#[tokio::test]
async fn test_resend_otp_replaces_code() {
    let app = TestApp::new();
    app.unverified_user("Ada", "ada@example.com").await;

    let response = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/resend-otp",
            json!({"email": "ada@example.com"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let otp = app.mailer.last_otp_for("ada@example.com").unwrap();
    let response = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/verify-otp",
            json!({"email": "ada@example.com", "otp": otp}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let unknown = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/resend-otp",
            json!({"email": "nobody@example.com"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new();
    app.verified_user("Ada", "ada@example.com").await;
    app.unverified_user("Bob", "bob@example.com").await;

    let wrong_password = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            json!({"email": "ada@example.com", "password": "nope-nope"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(wrong_password).await["message"], "Incorrect Password!");

    let unverified = app
        .router()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/login",
            json!({"email": "bob@example.com", "password": TEST_PASSWORD}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(unverified.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(unverified).await["message"], "User not found! Signup Instead.");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new();
    let response = app
        .router()
        .oneshot(json_request(Method::POST, "/api/v1/auth/logout", json!({}), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("jwt=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_guard_accepts_cookie_and_bearer() {
    let app = TestApp::new();
    let (_, token) = app.verified_user("Ada", "ada@example.com").await;

    let bearer = app
        .router()
        .oneshot(get_request("/api/v1/user/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(bearer.status(), StatusCode::OK);

    let request = axum::http::Request::builder()
        .uri("/api/v1/user/me")
        .header(header::COOKIE, format!("theme=dark; jwt={}", token))
        .body(axum::body::Body::empty())
        .unwrap();
    let cookie = app.router().oneshot(request).await.unwrap();
    assert_eq!(cookie.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_guard_rejections() {
    let app = TestApp::new();
    let (user, token) = app.verified_user("Ada", "ada@example.com").await;

    let missing = app.router().oneshot(get_request("/api/v1/user/me", None)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = app
        .router()
        .oneshot(get_request("/api/v1/user/me", Some("not.a.token")))
        .await
        .unwrap();
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);

    let mut changed = user.clone();
    changed.password_changed_at = Some(Utc::now() + Duration::seconds(30));
    app.store.save_user(&changed).await.unwrap();
    let stale = app
        .router()
        .oneshot(get_request("/api/v1/user/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

    app.store.delete_user(user.id).await.unwrap();
    let deleted = app
        .router()
        .oneshot(get_request("/api/v1/user/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_socket_handshake_requires_credential() {
    let app = TestApp::new();

    let anonymous = app.router().oneshot(get_request("/ws", None)).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(anonymous).await["status"], "fail");

    let bad = app
        .router()
        .oneshot(get_request("/ws?token=garbage", None))
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

    // valid credential, but a plain GET is not an upgrade
    let (_, token) = app.verified_user("Ada", "ada@example.com").await;
    let plain = app
        .router()
        .oneshot(get_request(&format!("/ws?token={}", token), None))
        .await
        .unwrap();
    assert_ne!(plain.status(), StatusCode::UNAUTHORIZED);
    assert!(plain.status().is_client_error());
}
