//! List routes (`/list`)

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;

use super::{error_response, DevLists};
use crate::client::ListsApi;

#[derive(Debug, Deserialize)]
pub struct ListNameBody {
    #[serde(default)]
    pub name: String,
}

/// GET /list
#[get("")]
pub async fn get_all_lists(lists: DevLists) -> impl Responder {
    match lists.get_all_lists().await {
        Ok(all) => HttpResponse::Ok().json(all),
        Err(e) => error_response(&e),
    }
}

/// POST /list
#[post("")]
pub async fn create_list(lists: DevLists, body: web::Json<ListNameBody>) -> impl Responder {
    match lists.add_list(&body.name).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&e),
    }
}

/// GET /list/{slug}
#[get("/{slug}")]
pub async fn get_list(lists: DevLists, path: web::Path<String>) -> impl Responder {
    match lists.get_list(&path).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&e),
    }
}

/// POST /list/{slug}
#[post("/{slug}")]
pub async fn update_list(
    lists: DevLists,
    path: web::Path<String>,
    body: web::Json<ListNameBody>,
) -> impl Responder {
    match lists.update_list(&path, &body.name).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&e),
    }
}

/// POST /list/delete/{slug}
#[post("/delete/{slug}")]
pub async fn delete_list(lists: DevLists, path: web::Path<String>) -> impl Responder {
    match lists.delete_list(&path).await {
        Ok(list) => HttpResponse::Ok().json(list),
        Err(e) => error_response(&e),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all_lists)
        .service(create_list)
        .service(delete_list)
        .service(get_list)
        .service(update_list);
}
