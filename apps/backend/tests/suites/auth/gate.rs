use actix_web::http::{header, StatusCode};
use actix_web::{test, web, HttpResponse};
use backend_test_support::error_body::assert_error_parts;
use lingua_auth::auth::claims::AuthenticatedUser;
use lingua_auth::middleware::TokenGate;
use lingua_auth::{AppState, CurrentUser, SecurityConfig, TokenIssuer};
use serde_json::Value;
use time::{Duration, OffsetDateTime};

use crate::support::auth::bearer;
use crate::support::create_test_app;

fn alice() -> AuthenticatedUser {
    AuthenticatedUser::new("7d1c5e0a-2f53-4b8e-9a59-4f1d2f3c8b10", "alice", "alice@example.com")
}

async fn assert_rejected(req: test::TestRequest, state: AppState, expected_error: &str) -> Value {
    let app = create_test_app(state).build().await;
    let resp = test::call_service(&app, req.to_request()).await;

    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    let parsed = assert_error_parts(
        status,
        &headers,
        &body,
        StatusCode::UNAUTHORIZED,
        expected_error,
    );

    // The error trace id is the request id assigned by RequestTrace
    assert_eq!(
        headers.get("x-request-id").and_then(|v| v.to_str().ok()),
        Some(parsed.trace_id.as_str())
    );
    serde_json::from_slice(&body).unwrap()
}

#[actix_web::test]
async fn admits_valid_access_token() {
    let state = AppState::for_tests();
    let pair = state.issuer.issue(&alice(), OffsetDateTime::now_utc()).unwrap();
    let app = create_test_app(state).build().await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(bearer(&pair.access_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], alice().subject_id);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
}

#[actix_web::test]
async fn missing_header_is_401() {
    let body = assert_rejected(
        test::TestRequest::get().uri("/api/me"),
        AppState::for_tests(),
        "MISSING_CREDENTIAL",
    )
    .await;
    assert_eq!(body["message"], "Authorization header required");
}

#[actix_web::test]
async fn malformed_headers_are_401() {
    for value in ["Bearer", "Bearer ", "bearer abc", "Basic dXNlcjpwYXNz", "Token abc"] {
        assert_rejected(
            test::TestRequest::get()
                .uri("/api/me")
                .insert_header((header::AUTHORIZATION, value)),
            AppState::for_tests(),
            "MALFORMED_CREDENTIAL",
        )
        .await;
    }
}

#[actix_web::test]
async fn foreign_secret_is_invalid() {
    let foreign = TokenIssuer::new(SecurityConfig::for_tests());
    let pair = foreign.issue(&alice(), OffsetDateTime::now_utc()).unwrap();

    assert_rejected(
        test::TestRequest::get()
            .uri("/api/me")
            .insert_header(bearer(&pair.access_token)),
        AppState::for_tests(),
        "INVALID_TOKEN",
    )
    .await;
}

#[actix_web::test]
async fn tampered_signature_is_invalid() {
    let state = AppState::for_tests();
    let token = state
        .issuer
        .issue(&alice(), OffsetDateTime::now_utc())
        .unwrap()
        .access_token;
    let (head, sig) = token.rsplit_once('.').unwrap();
    let flipped = if sig.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{head}.{flipped}{}", &sig[1..]);

    assert_rejected(
        test::TestRequest::get()
            .uri("/api/me")
            .insert_header(bearer(&tampered)),
        state,
        "INVALID_TOKEN",
    )
    .await;
}

#[actix_web::test]
async fn expired_token_is_distinct() {
    let state = AppState::for_tests();
    let issued = OffsetDateTime::now_utc() - Duration::hours(2);
    let pair = state.issuer.issue(&alice(), issued).unwrap();

    let body = assert_rejected(
        test::TestRequest::get()
            .uri("/api/me")
            .insert_header(bearer(&pair.access_token)),
        state,
        "EXPIRED_TOKEN",
    )
    .await;
    assert_eq!(body["message"], "Token expired");
}

#[actix_web::test]
async fn refresh_token_at_gate_is_wrong_type() {
    let state = AppState::for_tests();
    let pair = state.issuer.issue(&alice(), OffsetDateTime::now_utc()).unwrap();

    assert_rejected(
        test::TestRequest::get()
            .uri("/api/me")
            .insert_header(bearer(&pair.refresh_token)),
        state,
        "WRONG_TOKEN_TYPE",
    )
    .await;
}

#[actix_web::test]
async fn optional_gate_personalises_or_falls_back() {
    let state = AppState::for_tests();
    let pair = state.issuer.issue(&alice(), OffsetDateTime::now_utc()).unwrap();
    let app = create_test_app(state).build().await;

    let anonymous = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/greeting").to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::OK);
    let body: Value = test::read_body_json(anonymous).await;
    assert_eq!(body["authenticated"], false);

    // A bad token on an optional route is not an error
    let garbage = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/greeting")
            .insert_header(bearer("not.a.token"))
            .to_request(),
    )
    .await;
    assert_eq!(garbage.status(), StatusCode::OK);
    let body: Value = test::read_body_json(garbage).await;
    assert_eq!(body["authenticated"], false);

    let known = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/greeting")
            .insert_header(bearer(&pair.access_token))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(known).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["message"], "Hello, alice!");
}

async fn whoami(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().body(user.username.clone())
}

#[actix_web::test]
async fn injected_clock_controls_expiry() {
    let state = AppState::in_memory(SecurityConfig::for_tests().with_access_ttl(60));
    let issued = OffsetDateTime::now_utc();
    let pair = state.issuer.issue(&alice(), issued).unwrap();
    let token = pair.access_token;

    let app = create_test_app(state)
        .with_routes(move |cfg| {
            for (path, offset) in [("/before", 59), ("/at", 60), ("/after", 61)] {
                cfg.service(
                    web::resource(path)
                        .wrap(
                            TokenGate::required()
                                .with_clock(move || issued + Duration::seconds(offset)),
                        )
                        .route(web::get().to(whoami)),
                );
            }
        })
        .build()
        .await;

    // Valid through the `exp` second itself, expired one second later
    for (path, expected) in [
        ("/before", StatusCode::OK),
        ("/at", StatusCode::OK),
        ("/after", StatusCode::UNAUTHORIZED),
    ] {
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(path)
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), expected, "path {path}");
        if expected == StatusCode::OK {
            assert_eq!(test::read_body(resp).await, "alice");
        } else {
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "EXPIRED_TOKEN");
        }
    }
}

#[actix_web::test]
async fn extractor_without_gate_is_missing_credential() {
    let app = create_test_app(AppState::for_tests())
        .with_routes(|cfg| {
            cfg.route("/ungated", web::get().to(whoami));
        })
        .build()
        .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/ungated").to_request()).await;
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    assert_error_parts(
        status,
        &headers,
        &body,
        StatusCode::UNAUTHORIZED,
        "MISSING_CREDENTIAL",
    );
}
