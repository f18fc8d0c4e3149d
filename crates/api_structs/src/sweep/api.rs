use serde::{Deserialize, Serialize};

pub mod run_expiry_sweep {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Amount of alerts created by this run
        pub processed: usize,
        pub expired_bookings: usize,
        pub failed: usize,
    }
}
