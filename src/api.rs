pub mod subscription_api;

use actix_web::{get, web, Responder};

#[get("/ping")]
async fn ping() -> impl Responder {
    // just to test that the server is running
    "pong!"
}

/// Route table, shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ping).service(
        web::resource("/subscription-info")
            .route(web::get().to(subscription_api::subscription_info))
            // only a read-style method is accepted on this resource
            .default_service(web::route().to(subscription_api::method_not_allowed)),
    );
}
