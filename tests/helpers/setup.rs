use coupon_ledger_api::Application;
use coupon_ledger_domain::{Branch, Collaborator, Coordinates, Promotion, User};
use coupon_ledger_infra::{CouponContext, StaticTimeSys};
use coupon_ledger_sdk::CouponLedgerSDK;
use std::sync::Arc;

pub const NOW: i64 = 1613862000000;
pub const HOUR: i64 = 1000 * 60 * 60;

pub struct TestApp {
    pub ctx: CouponContext,
    pub sys: Arc<StaticTimeSys>,
}

impl TestApp {
    pub async fn insert_user(&self) -> User {
        let user = User::new();
        self.ctx
            .repos
            .user_repo
            .insert(&user)
            .await
            .expect("To insert user");
        user
    }

    pub async fn insert_collaborator(
        &self,
        name: &str,
        location: Option<Coordinates>,
    ) -> (Collaborator, Branch) {
        let collaborator = Collaborator::new(name);
        self.ctx
            .repos
            .collaborator_repo
            .insert(&collaborator)
            .await
            .expect("To insert collaborator");
        let branch = Branch::new(collaborator.id.clone(), format!("{} centro", name), location);
        self.ctx
            .repos
            .collaborator_repo
            .insert_branch(&branch)
            .await
            .expect("To insert branch");
        (collaborator, branch)
    }

    pub async fn insert_promotion(&self, promotion: Promotion) -> Promotion {
        self.ctx
            .repos
            .promotion_repo
            .insert(&promotion)
            .await
            .expect("To insert promotion");
        promotion
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, CouponLedgerSDK, String) {
    let mut ctx = CouponContext::create_inmemory();
    ctx.config.port = 0; // Random port
    let sys = Arc::new(StaticTimeSys::new(NOW));
    ctx.sys = sys.clone();

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { ctx, sys };
    let sdk = CouponLedgerSDK::new(address.clone());
    (app, sdk, address)
}
