use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::extractors::{CurrentUser, MaybeUser};
use crate::middleware::TokenGate;

#[derive(Debug, Serialize)]
struct GreetingResponse {
    message: String,
    authenticated: bool,
}

/// Context the gate attached to this request.
async fn me(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(user))
}

async fn greeting(user: MaybeUser) -> Result<HttpResponse, AppError> {
    let response = match user.into_inner() {
        Some(user) => GreetingResponse {
            message: format!("Hello, {}!", user.username),
            authenticated: true,
        },
        None => GreetingResponse {
            message: "Hello, guest!".to_string(),
            authenticated: false,
        },
    };
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/me")
            .wrap(TokenGate::required())
            .route(web::get().to(me)),
    )
    .service(
        web::resource("/greeting")
            .wrap(TokenGate::optional())
            .route(web::get().to(greeting)),
    );
}
