use actix_web::{error::InternalError, web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::handlers::auth_handler::{session, validate_jwt};
use crate::handlers::health_handler::test_endpoint;
use crate::handlers::user_handler::{
    forgot_password, login, reset_password, signup, validate_reset_token,
};
use crate::models::MessageResponse;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .service(test_endpoint)
            .service(
                web::scope("/auth")
                    .service(signup)
                    .service(login)
                    .service(forgot_password)
                    .service(validate_reset_token)
                    .service(reset_password)
                    .service(
                        web::resource("/session")
                            .wrap(HttpAuthentication::bearer(validate_jwt))
                            .route(web::get().to(session)),
                    ),
            ),
    );
}

/// Malformed bodies get the same `success:false` envelope as other failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "rejected request body");
        let response = HttpResponse::Ok().json(MessageResponse {
            success: false,
            message: "Invalid request body".to_string(),
        });
        InternalError::from_response(err, response).into()
    })
}
