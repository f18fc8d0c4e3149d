mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{
    IBookingRepo, ICollaboratorRepo, INotificationRepo, IPromotionRepo, IRedemptionRepo,
    IUserRepo, Repos, Scan,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::warn;

#[derive(Clone)]
pub struct CouponContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifications: Arc<dyn INotificationSink>,
}

struct ContextParams {
    pub postgres_connection_string: Option<String>,
}

impl CouponContext {
    async fn create(params: ContextParams) -> anyhow::Result<Self> {
        let repos = match params.postgres_connection_string {
            Some(connection_string) => Repos::create_postgres(&connection_string).await?,
            None => {
                warn!("Did not find DATABASE_URL environment variable. Falling back to inmemory repositories, state will be lost on restart.");
                Repos::create_inmemory()
            }
        };
        let config = Config::new();
        let notifications = notification_sink(&config);

        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            notifications,
        })
    }

    /// Context that is fully inmemory and delivers no alerts, used in tests
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            notifications: Arc::new(LogNotificationSink),
        }
    }
}

fn notification_sink(config: &Config) -> Arc<dyn INotificationSink> {
    match &config.notification_webhook_url {
        Some(url) => Arc::new(WebhookNotificationSink::new(url.clone())),
        None => Arc::new(LogNotificationSink),
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<CouponContext> {
    CouponContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .ok()
        .filter(|s| !s.trim().is_empty())
}
