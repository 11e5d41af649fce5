use actix_web::{web, Error, HttpRequest, HttpResponse};

use crate::state::app_state::AppState;
use crate::ws::session;

async fn connect(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    session::upgrade(req, stream, app_state).await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(connect));
}
