use thiserror::Error;

use crate::catalog::CouponId;

/// Why a placement left the board untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("coupon {0} is not in the pool")]
    UnknownCoupon(CouponId),
    #[error("coupon {0} is being dragged")]
    InFlight(CouponId),
    #[error("board is frozen until reset")]
    Frozen,
    #[error("no empty slot under the pointer")]
    NoTargetSlot,
    #[error("slot {0} is already occupied")]
    SlotOccupied(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoveError {
    #[error("board is frozen until reset")]
    Frozen,
    #[error("slot {0} is empty")]
    EmptySlot(usize),
    #[error("slot {0} does not exist")]
    OutOfRange(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    #[error("coupon {0} is not in the pool")]
    UnknownCoupon(CouponId),
    #[error("board is frozen until reset")]
    Frozen,
    #[error("coupon {0} is already being dragged")]
    GestureActive(CouponId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    #[error("board does not meet the completion rule")]
    NotQualified,
    #[error("a reward has already been issued")]
    AlreadyIssued,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("{key} is {value}, above the limit of {max}")]
    TooLarge {
        key: &'static str,
        value: usize,
        max: usize,
    },
    #[error("{slots} slots cannot be filled from {coupons} coupons")]
    MoreSlotsThanCoupons { slots: usize, coupons: usize },
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
