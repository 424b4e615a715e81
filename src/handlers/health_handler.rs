use actix_web::{get, HttpResponse, Responder};

use crate::models::StatusResponse;

#[get("/test")]
pub async fn test_endpoint() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        message: "Server is working!".to_string(),
    })
}
