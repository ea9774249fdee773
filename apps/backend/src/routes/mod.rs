use actix_web::web;

use crate::error::AppError;

pub mod auth;
pub mod health;
pub mod me;

/// Register every route. Gates are attached per resource inside the
/// submodules, so tests and `main.rs` share one wiring.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed JSON bodies use the common error shape
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(format!("invalid request body: {err}")).into()
    }));

    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));
    cfg.service(web::scope("/api").configure(me::configure_routes));
}
