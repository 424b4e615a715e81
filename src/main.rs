use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use spend_savvy::config::AppConfig;
use spend_savvy::repository::PgUserStore;
use spend_savvy::routes;
use spend_savvy::services::{AuthService, LogMailer, Mailer, SmtpMailer};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        io::Error::other(e)
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to connect to database");
            io::Error::other(e)
        })?;
    tracing::info!("connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(io::Error::other)?;

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpMailer::new(smtp).map_err(io::Error::other)?),
        None => {
            tracing::warn!("EMAIL_USER/EMAIL_PASS not set, reset links will only be logged");
            Arc::new(LogMailer)
        }
    };

    let bind = (config.host.clone(), config.port);
    let origins = config.allowed_origins.clone();
    tracing::info!(host = %bind.0, port = bind.1, frontend = %config.frontend_url, "starting server");

    let auth = web::Data::new(AuthService::new(
        Arc::new(PgUserStore::new(pool)),
        mailer,
        config,
    ));

    HttpServer::new(move || {
        let cors = origins.iter().fold(
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
                .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
                .max_age(3600),
            |cors, origin| cors.allowed_origin(origin),
        );

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(auth.clone())
            .configure(routes::config)
    })
    .bind(bind)?
    .run()
    .await
}
