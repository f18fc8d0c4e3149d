mod redeem;

use actix_web::web;
use redeem::redeem_controller;

pub use redeem::RedeemUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/promotions/{promotion_id}/redemptions",
        web::post().to(redeem_controller),
    );
}
