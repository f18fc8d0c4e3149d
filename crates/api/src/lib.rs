mod booking;
mod error;
mod job_schedulers;
mod proximity;
mod redemption;
mod shared;
mod status;
mod sweep;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use coupon_ledger_infra::CouponContext;
use job_schedulers::start_expiry_sweep_job;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub use booking::{CancelBookingUseCase, CreateBookingUseCase, GetBookingUseCase};
pub use error::CouponError;
pub use proximity::FindNearbyUseCase;
pub use redemption::RedeemUseCase;
pub use shared::usecase::{execute, UseCase};
pub use sweep::{RunExpirySweepUseCase, SweepTrigger};

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    booking::configure_routes(cfg);
    proximity::configure_routes(cfg);
    redemption::configure_routes(cfg);
    status::configure_routes(cfg);
    sweep::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: CouponContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: CouponContext) {
        start_expiry_sweep_job(context);
    }

    async fn configure_server(context: CouponContext) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
