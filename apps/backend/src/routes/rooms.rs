use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::state::app_state::AppState;
use crate::utils::join_code::normalize_room_code;

/// Public rooms, newest first.
async fn list_rooms(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let rooms = app_state
        .rooms
        .list_public(app_state.config.max_public_rooms_listed);
    Ok(HttpResponse::Ok().json(rooms))
}

/// Summary of one room by code. Private rooms are reachable only this way.
async fn get_room(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = normalize_room_code(&path.into_inner());
    let summary = app_state
        .rooms
        .summary(&code)
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, "Room not found"))?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list_rooms))
        .route("/{code}", web::get().to(get_room));
}
