mod booking;
mod collaborator;
mod notification;
mod promotion;
mod redemption;
mod shared;
mod user;

pub use booking::IBookingRepo;
use booking::{InMemoryBookingRepo, PostgresBookingRepo};
pub use collaborator::ICollaboratorRepo;
use collaborator::{InMemoryCollaboratorRepo, PostgresCollaboratorRepo};
pub use notification::INotificationRepo;
use notification::{InMemoryNotificationRepo, PostgresNotificationRepo};
pub use promotion::IPromotionRepo;
use promotion::{InMemoryPromotionRepo, PostgresPromotionRepo};
pub use redemption::IRedemptionRepo;
use redemption::{InMemoryRedemptionRepo, PostgresRedemptionRepo};
pub use shared::scan::Scan;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
pub use user::IUserRepo;
use user::{InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub user_repo: Arc<dyn IUserRepo>,
    pub collaborator_repo: Arc<dyn ICollaboratorRepo>,
    pub promotion_repo: Arc<dyn IPromotionRepo>,
    pub booking_repo: Arc<dyn IBookingRepo>,
    pub redemption_repo: Arc<dyn IRedemptionRepo>,
    pub notification_repo: Arc<dyn INotificationRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CONNECTING ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CONNECTING ... [done]");

        info!("DB MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB MIGRATIONS ... [done]");

        Ok(Self {
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            collaborator_repo: Arc::new(PostgresCollaboratorRepo::new(pool.clone())),
            promotion_repo: Arc::new(PostgresPromotionRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            redemption_repo: Arc::new(PostgresRedemptionRepo::new(pool.clone())),
            notification_repo: Arc::new(PostgresNotificationRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        let promotion_repo = Arc::new(InMemoryPromotionRepo::new());
        Self {
            user_repo: Arc::new(InMemoryUserRepo::new()),
            collaborator_repo: Arc::new(InMemoryCollaboratorRepo::new()),
            promotion_repo: promotion_repo.clone(),
            booking_repo: Arc::new(InMemoryBookingRepo::new()),
            redemption_repo: Arc::new(InMemoryRedemptionRepo::new(promotion_repo)),
            notification_repo: Arc::new(InMemoryNotificationRepo::new()),
        }
    }
}
