use actix_web::web;

use crate::handlers::{create_handler, info_handler, redirect_handler};

// Configure shortlink routes. `/info` must be registered ahead of the
// catch-all identifier pattern, which would otherwise match it.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/shorten", web::post().to(create_handler))
            .route("/info", web::get().to(info_handler))
            .route(
                "/{shortlink:[a-zA-Z0-9]{1,11}}",
                web::get().to(redirect_handler),
            ),
    );
}
