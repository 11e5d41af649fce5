use std::time::{Duration, Instant};

use actix_web::{web, App, HttpServer};
use blot_server::{cors_middleware, routes, AppState, ServerConfig, StructuredLogger};
use tracing::info;

mod telemetry;

const IDENTITY_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or sourced manually for local dev).
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let bind = (config.host.clone(), config.port);
    let origins = config.cors_origins.clone();
    info!(
        host = %bind.0,
        port = bind.1,
        reconnect_grace_secs = config.reconnect_grace.as_secs(),
        bot_delay_ms = config.bot_delay.as_millis() as u64,
        "Starting Blot server"
    );

    let identity_ttl = config.identity_ttl;
    let data = web::Data::new(AppState::new(config));

    let identities = data.identities.clone();
    actix_web::rt::spawn(async move {
        let mut tick = tokio::time::interval(IDENTITY_SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            identities.sweep(Instant::now(), identity_ttl);
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .run()
    .await
}
