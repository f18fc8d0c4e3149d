mod cancel_booking;
mod create_booking;
mod get_booking;

use actix_web::web;
use cancel_booking::cancel_booking_controller;
use create_booking::create_booking_controller;
use get_booking::get_booking_controller;

pub use cancel_booking::CancelBookingUseCase;
pub use create_booking::CreateBookingUseCase;
pub use get_booking::GetBookingUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/bookings", web::post().to(create_booking_controller));
    cfg.route("/bookings/{booking_id}", web::get().to(get_booking_controller));
    cfg.route(
        "/bookings/{booking_id}/cancel",
        web::post().to(cancel_booking_controller),
    );
}
