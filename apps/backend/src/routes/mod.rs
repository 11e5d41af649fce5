use actix_web::web;

pub mod health;
pub mod realtime;
pub mod rooms;

/// Register every HTTP route. Shared by `main.rs` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Room listing: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(rooms::configure_routes));

    // Realtime routes: /api/ws
    cfg.service(web::scope("/api/ws").configure(realtime::configure_routes));
}
