use std::time::Duration;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use blot_server::{routes, AppState, ServerConfig};

/// State with instant bots and the given reconnect grace.
pub fn test_state(reconnect_grace: Duration) -> AppState {
    AppState::new(ServerConfig {
        bot_delay: Duration::ZERO,
        reconnect_grace,
        ..ServerConfig::default()
    })
}

/// The full route table over `state`, as `main.rs` wires it.
pub async fn create_test_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(App::new().app_data(state).configure(routes::configure)).await
}
