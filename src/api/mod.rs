//! Development API server
//!
//! Serves an in-memory [`MemoryLists`] over the same paths and JSON shapes as
//! the remote lists API, so the CLI and [`HttpClient`](crate::client::HttpClient)
//! can be exercised without the real backend.

pub mod auth;
pub mod list_items;
pub mod lists;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

use crate::client::{ApiError, MemoryLists};

/// Shared list service as seen by the route handlers
pub type DevLists = web::Data<MemoryLists>;

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Auth routes
        .service(web::scope("/auth").configure(auth::configure))
        // List item routes, ahead of the shorter /list prefix
        .service(web::scope("/list-item").configure(list_items::configure))
        // List routes
        .service(web::scope("/list").configure(lists::configure));
}

/// `{ "message": ... }` with the error's status, 500 for transport failures
pub fn error_response(err: &ApiError) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(json!({ "message": err.to_string() }))
}

/// Serve `lists` on `host:port` until the process is stopped
pub async fn serve(lists: Arc<MemoryLists>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let data = web::Data::from(lists);

    info!("Dev API server listening on http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run()
    .await
    .context("Dev API server stopped with an error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    use crate::client::{HttpClient, ListsApi};
    use crate::models::{AuthUser, MediaItem, MediaType, NewListItem};
    use crate::session::Session;
    use crate::workflow::{ModalSettings, Submission, SubmitOutcome};

    #[actix_web::test]
    async fn test_error_body_shape() {
        let data = web::Data::new(MemoryLists::new(AuthUser::SignedOut));
        let app = test::init_service(App::new().app_data(data).configure(configure)).await;

        let req = test::TestRequest::get().uri("/auth").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "auth": false }));

        let req = test::TestRequest::get().uri("/list").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "You must be signed in" }));
    }

    #[actix_web::test]
    async fn test_list_routes() {
        let data = web::Data::new(MemoryLists::signed_in());
        let app = test::init_service(App::new().app_data(data).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/list")
            .set_json(json!({ "name": "Watch later" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["slug"], "watch-later");

        let req = test::TestRequest::post()
            .uri("/list-item/watch-later")
            .set_json(json!({ "mediaType": "movie", "tmdbId": 42, "title": "Dune" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], "1");
        assert_eq!(body["mediaType"], "MOVIE");

        let req = test::TestRequest::post()
            .uri("/list")
            .set_json(json!({ "name": "watch later" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/list-item/watch-later/delete/1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::get().uri("/list/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_http_client_against_dev_server() {
        let lists = web::Data::new(MemoryLists::signed_in());
        let data = lists.clone();
        let server = HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let client = HttpClient::new(&format!("http://{}", addr), Some("session=abc")).unwrap();

        let list = client.add_list("Faves").await.unwrap();
        assert_eq!(list.slug, "faves");
        let dune = NewListItem::from(&MediaItem::new(MediaType::Movie, 42, "Dune"));
        let item = client.add_list_item("faves", &dune).await.unwrap();
        assert_eq!(client.get_list_item("faves", &item.id).await.unwrap(), item);

        let err = client.add_list("faves").await.unwrap_err();
        assert_eq!(err, ApiError::remote(400, "List name already exists"));

        client.delete_list_item("faves", &item.id).await.unwrap();
        assert!(client.get_list("faves").await.unwrap().items.is_empty());
        assert_eq!(client.delete_list("faves").await.unwrap().slug, "faves");

        // full dialog flow over HTTP
        let session = Session::bootstrap(Arc::new(client)).await.unwrap();
        let modal = session.list_modal(ModalSettings::default());
        modal.show_add_modal(MediaItem::new(MediaType::Tv, 7, "Dark"));
        let outcome = modal
            .submit(Submission::CreateList {
                name: "Watch later".into(),
            })
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
        assert_eq!(lists.get_ref().lists()[0].items.len(), 1);

        handle.stop(true).await;
    }
}
