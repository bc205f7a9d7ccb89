//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use serde_json::json;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::Error;
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::pantry;
use crate::inbound::http::profile;
use crate::inbound::http::recipes;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users;
use crate::middleware::trace::Trace;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Map body deserialization failures into the standard error envelope.
fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    Error::validation(format!("invalid JSON payload: {err}"))
        .with_details(json!({ "code": "invalid_json" }))
        .into()
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Literal pantry segments are registered before `{id}` so `/pantry/stats`
    // and friends never match the parameterised route.
    let api = web::scope("/api/v1")
        .service(users::register)
        .service(users::login)
        .service(users::social_login)
        .service(users::verify_email)
        .service(profile::get_profile)
        .service(profile::update_profile)
        .service(profile::update_section)
        .service(profile::get_history)
        .service(recipes::browse_catalog)
        .service(recipes::list_saved)
        .service(recipes::create_custom)
        .service(recipes::update_custom)
        .service(recipes::delete_saved)
        .service(recipes::favorite)
        .service(recipes::unfavorite)
        .service(recipes::list_categories)
        .service(recipes::create_category)
        .service(recipes::delete_category)
        .service(recipes::assign_category)
        .service(recipes::unassign_category)
        .service(pantry::add_item)
        .service(pantry::list_items)
        .service(pantry::stats)
        .service(pantry::expiring)
        .service(pantry::cleanup)
        .service(pantry::get_item)
        .service(pantry::update_item)
        .service(pantry::delete_item);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct the HTTP server from the given health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let bind_addr = config.bind_addr();
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use secrecy::SecretString;

    fn fixture_config() -> ServerConfig {
        ServerConfig::new(
            "127.0.0.1:0".parse().expect("socket addr"),
            SecretString::from("wiring-test-secret".to_owned()),
        )
    }

    #[actix_web::test]
    async fn wired_app_serves_health_and_api_routes() {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let http_state = web::Data::new(build_http_state(&fixture_config()));
        let app = test::init_service(build_app(health_state, http_state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/healthz/ready").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);

        // Unauthenticated profile access surfaces the standard envelope.
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/users/profile")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_json_bodies_use_the_error_envelope() {
        let health_state = web::Data::new(HealthState::new());
        let http_state = web::Data::new(build_http_state(&fixture_config()));
        let app = test::init_service(build_app(health_state, http_state)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users/login")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value =
            serde_json::from_slice(&test::read_body(res).await).expect("error envelope");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "ValidationError");
    }
}
