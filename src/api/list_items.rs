//! List item routes (`/list-item`)

use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;

use super::{error_response, DevLists};
use crate::client::ListsApi;
use crate::models::NewListItem;

/// GET /list-item/{slug}/{item_id}
#[get("/{slug}/{item_id}")]
pub async fn get_list_item(lists: DevLists, path: web::Path<(String, String)>) -> impl Responder {
    let (slug, item_id) = path.into_inner();
    match lists.get_list_item(&slug, &item_id).await {
        Ok(item) => HttpResponse::Ok().json(item),
        Err(e) => error_response(&e),
    }
}

/// POST /list-item/{slug}
#[post("/{slug}")]
pub async fn add_list_item(
    lists: DevLists,
    path: web::Path<String>,
    body: web::Json<NewListItem>,
) -> impl Responder {
    match lists.add_list_item(&path, &body).await {
        Ok(item) => HttpResponse::Ok().json(item),
        Err(e) => error_response(&e),
    }
}

/// POST /list-item/{slug}/delete/{item_id}
#[post("/{slug}/delete/{item_id}")]
pub async fn delete_list_item(
    lists: DevLists,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (slug, item_id) = path.into_inner();
    match lists.delete_list_item(&slug, &item_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(e) => error_response(&e),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_list_item)
        .service(add_list_item)
        .service(delete_list_item);
}
