//! Toolkit-independent state for the coupon board widget.
//!
//! The board is a fixed row of slots filled by dragging coupons out of a
//! pool. Every mutation produces a fresh [`BoardSnapshot`]; the
//! [`BoardStore`] swaps snapshots whole and notifies subscribers, so a
//! renderer never observes a half-applied update.

pub mod board;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geometry;
pub mod reward;
pub mod store;

pub use board::{BoardSnapshot, DragState, PartnerFilter};
pub use catalog::{Catalog, Coupon, CouponId, parse_points, partner_color};
pub use config::{BarcodeStyle, BoardConfig, Variant};
pub use error::{ConfigError, DragError, PlaceError, RemoveError, RewardError};
pub use geometry::{Pointer, SlotGeometry, SlotRect, pointer, slot_rect};
pub use reward::{Reward, RewardCode, RewardKind, claim_label};
pub use store::{BoardStore, Subscription};
