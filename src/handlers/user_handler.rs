use actix_web::{get, post, web, HttpResponse};

use crate::message::{AppError, AppSuccess};
use crate::models::user::{ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest};
use crate::models::{
    AuthResponse, ForgotPasswordResponse, MessageResponse, ValidateTokenResponse,
};
use crate::services::AuthService;

#[post("/signup")]
pub async fn signup(
    auth: web::Data<AuthService>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = auth.signup(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        token: outcome.token,
        user: outcome.user,
        message: AppSuccess::AccountCreated.message(),
    }))
}

#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = auth.login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        token: outcome.token,
        user: outcome.user,
        message: AppSuccess::LoggedIn.message(),
    }))
}

#[post("/forgot-password")]
pub async fn forgot_password(
    auth: web::Data<AuthService>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let debug_link = auth.forgot_password(&payload.email).await?;

    Ok(HttpResponse::Ok().json(ForgotPasswordResponse {
        success: true,
        message: AppSuccess::ResetLinkSent.message(),
        debug_link,
    }))
}

#[get("/validate-reset-token/{token}")]
pub async fn validate_reset_token(
    auth: web::Data<AuthService>,
    path: web::Path<String>,
) -> HttpResponse {
    let token = path.into_inner();

    match auth.validate_reset_token(&token).await {
        Ok(valid) => HttpResponse::Ok().json(ValidateTokenResponse {
            success: true,
            valid,
        }),
        Err(e) => {
            tracing::error!(error = %e, "reset token lookup failed");
            HttpResponse::Ok().json(ValidateTokenResponse {
                success: false,
                valid: false,
            })
        }
    }
}

#[post("/reset-password")]
pub async fn reset_password(
    auth: web::Data<AuthService>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    auth.reset_password(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: AppSuccess::PasswordReset.message(),
    }))
}
