use actix_web::{web, HttpResponse};

use crate::handlers::{home::home, system};

mod projects;
mod contact;
mod json_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(json_error::config_routes);

    cfg.service(web::resource("/").route(web::get().to(home)));

    cfg.service(
        web::scope("/api")
            .service(web::resource("/health").route(web::get().to(system::health_check)))
            .configure(projects::config_routes)
            .configure(contact::config_routes)
    );

    cfg.default_service(web::to(route_not_found));
}

async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Route not found" }))
}
