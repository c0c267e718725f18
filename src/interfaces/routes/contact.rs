use actix_web::web;

use crate::handlers::contact;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contact")
            .service(
                web::resource("")
                    .route(web::get().to(contact::list_contacts))
            )
            .service(
                web::resource("/submit")
                    .route(web::post().to(contact::submit_contact))
            )
            .service(
                web::resource("/stats/overview")
                    .route(web::get().to(contact::contact_stats))
            )
            .service(
                web::resource("/{contact_id}")
                    .route(web::get().to(contact::get_contact))
                    .route(web::delete().to(contact::delete_contact))
            )
            .service(
                web::resource("/{contact_id}/status")
                    .route(web::put().to(contact::update_contact_status))
            )
            .service(
                web::resource("/{contact_id}/reply")
                    .route(web::post().to(contact::reply_to_contact))
            )
    );
}
