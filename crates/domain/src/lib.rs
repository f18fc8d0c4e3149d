mod booking;
mod collaborator;
pub mod date;
pub mod expiry;
pub mod geo;
mod notification;
mod promotion;
pub mod proximity;
mod redemption;
mod shared;
mod user;

pub use booking::{
    Booking, BookingStatus, BookingTimeouts, BookingTransitionError, CooldownActive, Reservation,
};
pub use collaborator::{Branch, Collaborator, CollaboratorWithBranches};
pub use geo::Coordinates;
pub use notification::{
    Alert, NotificationStatus, NotificationType, RecipientType, SegmentCriteria,
    BOOKING_EXPIRING, PROMOTION_EXPIRING,
};
pub use promotion::{Promotion, PromotionState};
pub use proximity::{ProximityQuery, ProximityQueryError, RankedCollaborator};
pub use redemption::{
    RedeemedCoupon, RedemptionAttempt, RedemptionHistory, RedemptionOutcome, RedemptionRejection,
    Unavailability,
};
pub use shared::entity::{Entity, ID};
pub use user::User;

pub use chrono_tz::Tz;
