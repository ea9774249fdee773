use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_parts;
use lingua_auth::AppState;
use serde_json::{json, Value};

use crate::support::auth::{bearer, login, seed_user, token};
use crate::support::create_test_app;

const NEW_PASSWORD: &str = "battery-staple-77";

fn change_password(access: &str, old: &str, new: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/change-password")
        .insert_header(bearer(access))
        .set_json(json!({ "old_password": old, "new_password": new }))
}

#[actix_web::test]
async fn change_password_replaces_the_credential() {
    let state = AppState::for_tests();
    let user = seed_user(&state, "frank").await;
    let app = create_test_app(state).build().await;

    let body = login(&app, &user.record.username, &user.password).await;
    let access = token(&body, "access_token");

    let resp = test::call_service(
        &app,
        change_password(&access, &user.password, NEW_PASSWORD).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Old password no longer works
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "account": user.record.username, "password": user.password }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let headers = resp.headers().clone();
    let raw = test::read_body(resp).await;
    assert_error_parts(
        status,
        &headers,
        &raw,
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
    );

    let body = login(&app, &user.record.username, NEW_PASSWORD).await;
    assert_eq!(body["user"]["id"], user.record.id.as_str());
}

#[actix_web::test]
async fn wrong_current_password_keeps_the_old_one() {
    let state = AppState::for_tests();
    let user = seed_user(&state, "grace").await;
    let app = create_test_app(state).build().await;

    let body = login(&app, &user.record.username, &user.password).await;
    let access = token(&body, "access_token");

    let resp = test::call_service(
        &app,
        change_password(&access, "not-the-password", NEW_PASSWORD).to_request(),
    )
    .await;
    let status = resp.status();
    let headers = resp.headers().clone();
    let raw = test::read_body(resp).await;
    assert_error_parts(
        status,
        &headers,
        &raw,
        StatusCode::BAD_REQUEST,
        "INCORRECT_PASSWORD",
    );

    login(&app, &user.record.username, &user.password).await;
}

#[actix_web::test]
async fn change_password_validates_and_requires_a_token() {
    let state = AppState::for_tests();
    let user = seed_user(&state, "heidi").await;
    let app = create_test_app(state).build().await;

    let body = login(&app, &user.record.username, &user.password).await;
    let access = token(&body, "access_token");
    let refresh = token(&body, "refresh_token");

    let cases = [
        (
            change_password(&access, &user.password, "short"),
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
        ),
        (
            change_password(&refresh, &user.password, NEW_PASSWORD),
            StatusCode::UNAUTHORIZED,
            "WRONG_TOKEN_TYPE",
        ),
        (
            test::TestRequest::post()
                .uri("/api/auth/change-password")
                .set_json(json!({ "old_password": user.password, "new_password": NEW_PASSWORD })),
            StatusCode::UNAUTHORIZED,
            "MISSING_CREDENTIAL",
        ),
    ];

    for (req, expected_status, expected_error) in cases {
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let headers = resp.headers().clone();
        let raw = test::read_body(resp).await;
        assert_error_parts(status, &headers, &raw, expected_status, expected_error);
    }

    // Nothing above changed the stored password
    login(&app, &user.record.username, &user.password).await;
}

#[actix_web::test]
async fn validate_echoes_the_admitted_identity() {
    let state = AppState::for_tests();
    let user = seed_user(&state, "ivan").await;
    let app = create_test_app(state).build().await;

    let body = login(&app, &user.record.username, &user.password).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/validate")
        .insert_header(bearer(&token(&body, "access_token")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: Value = test::read_body_json(resp).await;
    assert_eq!(echoed["valid"], true);
    assert_eq!(echoed["user_id"], user.record.id.as_str());
    assert_eq!(echoed["username"], user.record.username.as_str());
    assert_eq!(echoed["email"], user.record.email.as_str());

    let req = test::TestRequest::get()
        .uri("/api/auth/validate")
        .insert_header(bearer(&token(&body, "refresh_token")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let headers = resp.headers().clone();
    let raw = test::read_body(resp).await;
    assert_error_parts(
        status,
        &headers,
        &raw,
        StatusCode::UNAUTHORIZED,
        "WRONG_TOKEN_TYPE",
    );
}
