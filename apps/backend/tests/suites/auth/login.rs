use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_parts;
use lingua_auth::auth::claims::TokenClass;
use lingua_auth::users::AccountStatus;
use lingua_auth::AppState;
use serde_json::json;
use time::OffsetDateTime;

use crate::support::auth::{login, seed_user, token};
use crate::support::create_test_app;

#[actix_web::test]
async fn login_by_username_and_email() {
    let state = AppState::for_tests();
    let user = seed_user(&state, "alice").await;
    let builder = create_test_app(state);
    let data = builder.state();
    let app = builder.build().await;

    for account in [user.record.username.clone(), user.record.email.to_uppercase()] {
        let body = login(&app, &account, &user.password).await;
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 3600);
        assert_eq!(body["refresh_expires_in"], 604_800);
        assert_eq!(body["user"]["id"], user.record.id.as_str());

        let claims = data
            .issuer
            .verify(&token(&body, "access_token"), TokenClass::Access, OffsetDateTime::now_utc())
            .unwrap();
        assert_eq!(claims.subject_id, user.record.id);
        assert_eq!(claims.username, user.record.username);
    }
}

async fn assert_login_fails(
    state: AppState,
    account: &str,
    password: &str,
    expected_status: StatusCode,
    expected_error: &str,
) {
    let app = create_test_app(state).build().await;
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "account": account, "password": password }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    assert_error_parts(status, &headers, &body, expected_status, expected_error);
}

#[actix_web::test]
async fn wrong_password_and_unknown_account_look_the_same() {
    let state = AppState::for_tests();
    let user = seed_user(&state, "bob").await;

    assert_login_fails(
        state.clone(),
        &user.record.username,
        "not-the-password",
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
    )
    .await;
    assert_login_fails(
        state,
        "nobody_here",
        "whatever-password",
        StatusCode::UNAUTHORIZED,
        "INVALID_CREDENTIALS",
    )
    .await;
}

#[actix_web::test]
async fn disabled_account_is_forbidden() {
    let state = AppState::for_tests();
    let user = seed_user(&state, "carol").await;
    state
        .users
        .set_status(&user.record.id, AccountStatus::Disabled)
        .await
        .unwrap();

    assert_login_fails(
        state,
        &user.record.username,
        &user.password,
        StatusCode::FORBIDDEN,
        "ACCOUNT_DISABLED",
    )
    .await;
}

#[actix_web::test]
async fn blank_fields_are_validation_errors() {
    assert_login_fails(
        AppState::for_tests(),
        "  ",
        "pw",
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
    )
    .await;
}

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let app = create_test_app(AppState::for_tests()).build().await;
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    assert_error_parts(status, &headers, &body, StatusCode::BAD_REQUEST, "BAD_REQUEST");
}
