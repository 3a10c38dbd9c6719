mod common;

use actix_web::{http::StatusCode, test};
use serde_json::json;

use common::{send, TestApp};

#[actix_rt::test]
async fn test_session_requires_token() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/auth/session").to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[actix_rt::test]
async fn test_session_rejects_forged_token() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/session")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid token");
}

#[actix_rt::test]
async fn test_signup_rejects_invalid_email() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({
            "email": "not-an-email",
            "password": "testpassword123"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid email address");
}

#[actix_rt::test]
async fn test_signup_rejects_short_password() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({
            "email": "test@example.com",
            "password": "short"
        }))
        .to_request();
    let (status, _) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_signin_with_malformed_body() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"email\": ")
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}
