use actix_cors::Cors;
use actix_web::http::header;

const LOCAL_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// CORS for the lobby and health endpoints. The websocket upgrade is a GET
/// too, so nothing else needs to be allowed.
///
/// `origins` comes from `CORS_ALLOWED_ORIGINS`, already filtered to http(s)
/// entries; when it is empty only localhost dev servers are allowed.
pub fn cors_middleware(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.is_empty() {
        for origin in LOCAL_ORIGINS {
            cors = cors.allowed_origin(origin);
        }
    } else {
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}
