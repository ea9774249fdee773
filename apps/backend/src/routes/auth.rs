use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::auth::claims::{AuthenticatedUser, TokenClass};
use crate::auth::error::AuthError;
use crate::auth::jwt::TokenPair;
use crate::auth::password::PasswordHasher;
use crate::error::AppError;
use crate::errors::DomainError;
use crate::extractors::CurrentUser;
use crate::logging::security;
use crate::middleware::TokenGate;
use crate::state::app_state::AppState;
use crate::users::{
    normalize_email, validate_email, validate_password, validate_username, AccountStatus,
    NewUser, UserRecord,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or e-mail
    pub account: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer",
            expires_in: pair.expires_in,
            refresh_expires_in: pair.refresh_expires_in,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub status: AccountStatus,
}

impl From<&UserRecord> for UserView {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            status: user.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserView,
    #[serde(flatten)]
    pub tokens: TokenResponse,
}

/// Identity the gate admitted, echoed back to the client.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    #[serde(flatten)]
    pub user: AuthenticatedUser,
    pub valid: bool,
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_password(hasher: PasswordHasher, password: String) -> Result<String, AppError> {
    web::block(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::internal(format!("password hashing task failed: {e}")))?
        .map_err(AppError::from)
}

async fn verify_password(
    hasher: PasswordHasher,
    password: String,
    digest: Option<String>,
) -> Result<bool, AppError> {
    web::block(move || match digest {
        Some(digest) => hasher.verify(&password, &digest),
        None => hasher.verify_dummy(&password),
    })
    .await
    .map_err(|e| AppError::internal(format!("password verification task failed: {e}")))
}

async fn register(
    body: web::Json<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let RegisterRequest {
        username,
        email,
        password,
    } = body.into_inner();

    let username = username.trim().to_string();
    let email = normalize_email(&email);
    validate_username(&username)?;
    validate_email(&email)?;
    validate_password(&password)?;

    let password_hash = hash_password(app_state.hasher.clone(), password).await?;
    let user = app_state
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    let tokens = app_state
        .issuer
        .issue(&user.identity(), OffsetDateTime::now_utc())?;
    info!(user_id = %user.id, "user registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        user: UserView::from(&user),
        tokens: tokens.into(),
    }))
}

/// Unknown account and wrong password are indistinguishable to the caller,
/// in both the response and the time it takes. A disabled account is only
/// reported once the password has been verified.
async fn login(
    body: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { account, password } = body.into_inner();
    let account = account.trim().to_string();
    if account.is_empty() || password.is_empty() {
        return Err(AppError::invalid("account and password are required"));
    }

    let user = app_state.users.find_by_login(&account).await?;
    let digest = user.as_ref().map(|u| u.password_hash.clone());
    let password_ok = verify_password(app_state.hasher.clone(), password, digest).await?;

    let user = match user {
        Some(user) if password_ok => user,
        Some(_) => {
            security::login_failed("bad_password", &account);
            return Err(DomainError::InvalidCredentials.into());
        }
        None => {
            security::login_failed("unknown_account", &account);
            return Err(DomainError::InvalidCredentials.into());
        }
    };

    if !user.is_active() {
        security::login_failed("account_disabled", &account);
        return Err(DomainError::AccountDisabled.into());
    }

    let tokens = app_state
        .issuer
        .issue(&user.identity(), OffsetDateTime::now_utc())?;
    info!(user_id = %user.id, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: UserView::from(&user),
        tokens: tokens.into(),
    }))
}

/// Rotating refresh: the presented token is exchanged for a brand-new pair
/// minted from the current user record.
async fn refresh(
    body: web::Json<RefreshRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let now = OffsetDateTime::now_utc();
    let claims = app_state
        .issuer
        .verify(body.refresh_token.trim(), TokenClass::Refresh, now)
        .inspect_err(|err| {
            if let AuthError::WrongTokenClass { expected, actual } = err {
                security::token_class_misuse(*expected, *actual);
            }
        })?;

    let user = match app_state.users.find_by_id(&claims.subject_id).await? {
        Some(user) if user.is_active() => user,
        Some(_) => {
            security::refresh_for_inactive_subject(&claims.subject_id);
            return Err(DomainError::AccountDisabled.into());
        }
        None => {
            security::refresh_for_inactive_subject(&claims.subject_id);
            return Err(AuthError::InvalidSignature.into());
        }
    };

    let tokens = app_state.issuer.issue(&user.identity(), now)?;
    info!(user_id = %user.id, "tokens refreshed");

    Ok(HttpResponse::Ok().json(TokenResponse::from(tokens)))
}

/// Replace the caller's password after checking the current one.
///
/// Outstanding tokens stay valid until they expire; there is no revocation.
async fn change_password(
    user: CurrentUser,
    body: web::Json<ChangePasswordRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ChangePasswordRequest {
        old_password,
        new_password,
    } = body.into_inner();
    if old_password.is_empty() {
        return Err(AppError::invalid("old_password is required"));
    }
    validate_password(&new_password)?;

    let record = match app_state.users.find_by_id(&user.subject_id).await? {
        Some(record) if record.is_active() => record,
        Some(_) => return Err(DomainError::AccountDisabled.into()),
        None => return Err(AuthError::InvalidSignature.into()),
    };

    let current_ok = verify_password(
        app_state.hasher.clone(),
        old_password,
        Some(record.password_hash.clone()),
    )
    .await?;
    if !current_ok {
        security::password_change_rejected(&record.id);
        return Err(DomainError::IncorrectPassword.into());
    }

    let password_hash = hash_password(app_state.hasher.clone(), new_password).await?;
    app_state
        .users
        .update_password(&record.id, password_hash)
        .await?;
    info!(user_id = %record.id, "password changed");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "password changed" })))
}

/// The gate has already verified the token; report what it admitted.
async fn validate(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(ValidateResponse {
        user: user.0,
        valid: true,
    })
}

/// Tokens are stateless; the client discards its pair.
async fn logout(user: CurrentUser) -> Result<HttpResponse, AppError> {
    info!(user_id = %user.subject_id, "user logged out");
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "logged out" })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/refresh").route(web::post().to(refresh)))
        .service(
            web::resource("/logout")
                .wrap(TokenGate::required())
                .route(web::post().to(logout)),
        )
        .service(
            web::resource("/change-password")
                .wrap(TokenGate::required())
                .route(web::post().to(change_password)),
        )
        .service(
            web::resource("/validate")
                .wrap(TokenGate::required())
                .route(web::get().to(validate)),
        );
}
