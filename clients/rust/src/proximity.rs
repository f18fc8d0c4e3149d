use crate::base::{APIResponse, BaseClient};
use coupon_ledger_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ProximityClient {
    base: Arc<BaseClient>,
}

pub struct FindNearbyInput {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: Option<f64>,
}

impl FindNearbyInput {
    pub(crate) fn to_query_string(&self) -> String {
        let mut query = format!("lat={}&lon={}", self.lat, self.lon);
        if let Some(radius) = self.radius_km {
            query.push_str(&format!("&radius={}", radius));
        }
        query
    }
}

impl ProximityClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn find_nearby(
        &self,
        input: FindNearbyInput,
    ) -> APIResponse<find_nearby::APIResponse> {
        self.base
            .get(
                format!("collaborators/nearby?{}", input.to_query_string()),
                &[StatusCode::OK],
            )
            .await
    }
}
