//! Server construction and middleware wiring.

mod config;

pub use config::{ConfigError, ServerConfig};

use std::io;
use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::Validator;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{create_user, delete_user, get_user, list_users, update_user};
use crate::middleware::Trace;
use crate::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};

/// Assemble the application: trace middleware, JSON error handling, the
/// user CRUD routes, health probes, and (debug builds) Swagger UI.
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(http_state)
        .app_data(health_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Apply migrations, build the pool and handler state, and serve until
/// shutdown.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    run_pending_migrations(&config.database_url).map_err(io::Error::other)?;

    let pool_config =
        PoolConfig::new(config.database_url.as_str()).with_max_size(config.pool_max_size);
    let pool = DbPool::new(pool_config).await.map_err(io::Error::other)?;

    let repository = Arc::new(DieselUserRepository::new(pool));
    let http_state = web::Data::new(HttpState::new(
        repository,
        Validator::users(),
        config.page_limits,
    ));
    let health_state = web::Data::new(HealthState::new());

    // Clone for the server factory so the readiness flag stays shared.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(http_state.clone(), server_health_state.clone())
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
