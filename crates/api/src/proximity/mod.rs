mod find_nearby;

use actix_web::web;
use find_nearby::find_nearby_controller;

pub use find_nearby::FindNearbyUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/collaborators/nearby",
        web::get().to(find_nearby_controller),
    );
}
