mod booking;
mod proximity;
mod redemption;
mod status;
mod sweep;

pub mod dtos {
    pub use crate::booking::dtos::*;
    pub use crate::proximity::dtos::*;
    pub use crate::redemption::dtos::*;
}

pub use crate::booking::api::*;
pub use crate::proximity::api::*;
pub use crate::redemption::api::*;
pub use crate::status::api::*;
pub use crate::sweep::api::*;
