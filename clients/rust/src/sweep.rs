use crate::base::{APIResponse, BaseClient};
use coupon_ledger_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct SweepClient {
    base: Arc<BaseClient>,
}

impl SweepClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn run_expiry_sweep(&self) -> APIResponse<run_expiry_sweep::APIResponse> {
        self.base
            .post((), "sweeps/expiry".into(), &[StatusCode::OK])
            .await
    }
}
