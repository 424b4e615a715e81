use actix_web::{dev::ServiceRequest, web, Error, HttpMessage, HttpRequest, HttpResponse};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::models::{Claims, PublicUser, SessionResponse};
use crate::services::AuthService;

/// Bearer-token guard for session-scoped routes. Valid claims are stored in
/// the request extensions.
pub async fn validate_jwt(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let Some(auth) = req.app_data::<web::Data<AuthService>>().cloned() else {
        return Err((
            actix_web::error::ErrorInternalServerError("Auth service not configured"),
            req,
        ));
    };

    match auth.decode_session(credentials.token()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(req)
        }
        Err(_) => Err((actix_web::error::ErrorUnauthorized("Invalid token"), req)),
    }
}

pub async fn session(req: HttpRequest) -> HttpResponse {
    let extensions = req.extensions();

    let claims = match extensions.get::<Claims>() {
        Some(claims) => claims,
        None => return HttpResponse::Unauthorized().body("Missing session"),
    };

    HttpResponse::Ok().json(SessionResponse {
        success: true,
        user: PublicUser::from(claims),
    })
}
