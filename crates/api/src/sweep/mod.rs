mod run_expiry_sweep;

use actix_web::web;
use run_expiry_sweep::run_expiry_sweep_controller;

pub use run_expiry_sweep::{RunExpirySweepUseCase, SweepTrigger};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/sweeps/expiry", web::post().to(run_expiry_sweep_controller));
}
