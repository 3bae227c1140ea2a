pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::AuthMiddleware;

/// Registers every route. Authentication is applied declaratively, per
/// scope: register and login are the only pre-authentication endpoints.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(
                    web::resource("/logout")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(auth::logout)),
                ),
        )
        .service(
            web::scope("/me")
                .wrap(AuthMiddleware)
                .service(auth::current_user),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::create_task)
                .service(tasks::list_tasks)
                .service(tasks::get_task)
                .service(tasks::update_task_status)
                .service(tasks::delete_task),
        );
}

/// Fallback for unknown routes; keeps every error body JSON-shaped.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "Endpoint not found"
    }))
}
