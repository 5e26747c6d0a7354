//! Auth route (`/auth`)

use actix_web::{get, web, HttpResponse, Responder};

use super::{error_response, DevLists};
use crate::client::ListsApi;

/// GET /auth
#[get("")]
pub async fn auth_user(lists: DevLists) -> impl Responder {
    match lists.auth_user().await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => error_response(&e),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth_user);
}
