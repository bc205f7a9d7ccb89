//! Account API handlers.
//!
//! ```text
//! POST /api/v1/users/register
//! POST /api/v1/users/login
//! POST /api/v1/users/social-login
//! POST /api/v1/users/verify-email
//! ```

use actix_web::{post, web, HttpRequest, HttpResponse};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{AuthenticatedAccount, RegisterRequest, SocialLoginRequest};
use crate::domain::User;
use crate::inbound::http::rate_limit::enforce;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_email, parse_username};
use crate::inbound::http::ApiResult;

/// Request body for `POST /api/v1/users/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request body for `POST /api/v1/users/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /api/v1/users/social-login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLoginBody {
    pub provider: Option<String>,
    pub access_token: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Request body for `POST /api/v1/users/verify-email`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailBody {
    pub token: Option<String>,
}

/// Response payload for endpoints that establish a session.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub user: User,
    /// Opaque signed bearer token.
    pub token: String,
    pub token_expires_at: String,
}

impl From<AuthenticatedAccount> for AccountResponse {
    fn from(value: AuthenticatedAccount) -> Self {
        Self {
            user: value.user,
            token: value.token,
            token_expires_at: value.token_expires_at.to_rfc3339(),
        }
    }
}

fn parse_register_body(body: RegisterBody) -> Result<RegisterRequest, crate::domain::Error> {
    let email = parse_email(body.email.ok_or_else(|| missing_field_error("email"))?)?;
    let username =
        parse_username(body.username.ok_or_else(|| missing_field_error("username"))?)?;
    let password = body
        .password
        .ok_or_else(|| missing_field_error("password"))?;

    Ok(RegisterRequest {
        email,
        username,
        password: SecretString::from(password),
        first_name: body.first_name,
        last_name: body.last_name,
    })
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email or username already taken"),
        (status = 429, description = "Rate limit exceeded")
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users/register")]
pub async fn register(
    state: web::Data<HttpState>,
    request: HttpRequest,
    payload: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    enforce(&state.rate_limits.register, &request)?;
    let parsed = parse_register_body(payload.into_inner())?;
    let account = state.accounts.register(parsed).await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// Authenticate with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = AccountResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Rate limit exceeded")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    request: HttpRequest,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    enforce(&state.rate_limits.login, &request)?;
    let body = payload.into_inner();
    let email = parse_email(body.email.ok_or_else(|| missing_field_error("email"))?)?;
    let password = body
        .password
        .ok_or_else(|| missing_field_error("password"))?;

    let account = state
        .accounts
        .login(email, SecretString::from(password))
        .await?;
    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

/// Sign in through a social provider, provisioning on first sight.
#[utoipa::path(
    post,
    path = "/api/v1/users/social-login",
    request_body = SocialLoginBody,
    responses(
        (status = 200, description = "Login success", body = AccountResponse),
        (status = 400, description = "Invalid request")
    ),
    tags = ["users"],
    operation_id = "socialLogin",
    security([])
)]
#[post("/users/social-login")]
pub async fn social_login(
    state: web::Data<HttpState>,
    payload: web::Json<SocialLoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let email = parse_email(body.email.ok_or_else(|| missing_field_error("email"))?)?;
    let provider = body
        .provider
        .ok_or_else(|| missing_field_error("provider"))?;
    let access_token = body
        .access_token
        .ok_or_else(|| missing_field_error("accessToken"))?;

    let account = state
        .accounts
        .social_login(SocialLoginRequest {
            provider,
            access_token: SecretString::from(access_token),
            email,
            first_name: body.first_name,
            last_name: body.last_name,
        })
        .await?;
    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

/// Redeem an email verification token.
#[utoipa::path(
    post,
    path = "/api/v1/users/verify-email",
    request_body = VerifyEmailBody,
    responses(
        (status = 200, description = "Email verified"),
        (status = 400, description = "Unknown or expired token")
    ),
    tags = ["users"],
    operation_id = "verifyEmail",
    security([])
)]
#[post("/users/verify-email")]
pub async fn verify_email(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyEmailBody>,
) -> ApiResult<HttpResponse> {
    let token = payload
        .into_inner()
        .token
        .ok_or_else(|| missing_field_error("token"))?;
    state.accounts.verify_email(&token).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
