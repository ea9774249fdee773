use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test;
use backend_test_support::unique_helpers::{unique_email, unique_username};
use lingua_auth::users::{NewUser, UserRecord};
use lingua_auth::AppState;
use serde_json::{json, Value};

pub const TEST_PASSWORD: &str = "correct-horse-42";

/// A user stored directly in the directory, bypassing the HTTP layer.
pub struct SeededUser {
    pub record: UserRecord,
    pub password: String,
}

pub async fn seed_user(state: &AppState, prefix: &str) -> SeededUser {
    let password_hash = state.hasher.hash(TEST_PASSWORD).unwrap();
    let record = state
        .users
        .create(NewUser {
            username: unique_username(prefix),
            email: unique_email(prefix),
            password_hash,
        })
        .await
        .unwrap();

    SeededUser {
        record,
        password: TEST_PASSWORD.to_string(),
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Log in over HTTP and return the JSON body, asserting 200.
pub async fn login<S>(app: &S, account: &str, password: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "account": account, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200, "login failed");
    test::read_body_json(resp).await
}

pub fn token(body: &Value, field: &str) -> String {
    body[field]
        .as_str()
        .unwrap_or_else(|| panic!("{field} missing from {body}"))
        .to_string()
}
