use crate::dtos::NearbyCollaboratorDTO;
use coupon_ledger_domain::RankedCollaborator;
use serde::{Deserialize, Serialize};

pub mod find_nearby {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct QueryParams {
        pub lat: f64,
        pub lon: f64,
        /// Search radius in km
        pub radius: Option<f64>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub collaborators: Vec<NearbyCollaboratorDTO>,
    }

    impl APIResponse {
        pub fn new(ranked: Vec<RankedCollaborator>) -> Self {
            Self {
                collaborators: ranked.into_iter().map(NearbyCollaboratorDTO::new).collect(),
            }
        }
    }
}
