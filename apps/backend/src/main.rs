use actix_web::{web, App, HttpServer};
use lingua_auth::config::ServerConfig;
use lingua_auth::middleware::{cors_middleware, RequestTrace};
use lingua_auth::routes;
use lingua_auth::state::{AppState, SecurityConfig};
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    let server = match ServerConfig::from_env() {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };

    let security = match SecurityConfig::from_env() {
        Ok(security) => security,
        Err(e) => {
            error!(error = %e, "invalid security configuration");
            std::process::exit(1);
        }
    };

    info!(
        host = %server.host,
        port = server.port,
        issuer = %security.issuer,
        access_ttl = security.access_ttl,
        refresh_ttl = security.refresh_ttl,
        "starting server"
    );

    let data = web::Data::new(AppState::in_memory(security));

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(server.bind_addr())?
    .run()
    .await
}
