use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Coupon, CouponId};
use crate::config::Variant;
use crate::error::{DragError, PlaceError, RemoveError, RewardError};
use crate::geometry::{Pointer, SlotGeometry, locate_slot};
use crate::reward::{Reward, RewardCode, RewardKind};

/// Partner filter chosen in the pool's filter bar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartnerFilter {
    #[default]
    All,
    Partner(String),
}

impl PartnerFilter {
    pub fn matches(&self, coupon: &Coupon) -> bool {
        match self {
            PartnerFilter::All => true,
            PartnerFilter::Partner(p) => coupon.partner == *p,
        }
    }
}

/// An in-progress drag gesture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub coupon_id: CouponId,
    /// Last pointer position (x, y).
    pub pointer: (f64, f64),
    /// Empty slot currently under the pointer.
    pub hover_slot: Option<usize>,
}

/// One immutable state of the board. Transitions return a new snapshot and
/// leave `self` untouched.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardSnapshot {
    variant: Variant,
    slots: Vec<Option<Coupon>>,
    pool: Vec<Coupon>,
    filter: PartnerFilter,
    drag: Option<DragState>,
    reward: Option<Reward>,
}

impl BoardSnapshot {
    /// Empty board with the whole catalog in the pool, in generation order.
    pub fn initial(catalog: &Catalog, slot_count: usize, variant: Variant) -> Self {
        BoardSnapshot {
            variant,
            slots: vec![None; slot_count],
            pool: catalog.coupons().to_vec(),
            filter: PartnerFilter::All,
            drag: None,
            reward: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn slots(&self) -> &[Option<Coupon>] {
        &self.slots
    }

    pub fn pool(&self) -> &[Coupon] {
        &self.pool
    }

    pub fn filter(&self) -> &PartnerFilter {
        &self.filter
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn reward(&self) -> Option<&Reward> {
        self.reward.as_ref()
    }

    pub fn in_flight(&self) -> Option<CouponId> {
        self.drag.as_ref().map(|d| d.coupon_id)
    }

    pub fn hover_slot(&self) -> Option<usize> {
        self.drag.as_ref().and_then(|d| d.hover_slot)
    }

    pub fn is_board_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn any_placed(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Full board where every coupon has the same partner.
    pub fn is_uniform(&self) -> bool {
        self.is_board_full() && self.placed_partners().len() == 1
    }

    pub fn point_sum(&self) -> u32 {
        self.slots
            .iter()
            .flatten()
            .fold(0u32, |sum, c| sum.saturating_add(c.points()))
    }

    pub fn placed_partners(&self) -> BTreeSet<&str> {
        self.slots
            .iter()
            .flatten()
            .map(|c| c.partner.as_str())
            .collect()
    }

    /// Completion rule of the active variant.
    pub fn qualifies(&self) -> bool {
        match self.variant {
            Variant::PartnerUniform => self.is_uniform(),
            Variant::FullBoard => self.is_board_full(),
        }
    }

    /// Mutation is locked once a freezing reward has been issued.
    pub fn is_frozen(&self) -> bool {
        self.reward.is_some() && self.variant.freezes_on_reward()
    }

    /// Filter buttons are disabled once anything is on the board.
    pub fn filter_locked(&self) -> bool {
        self.any_placed()
    }

    /// The reward button is offered while the board qualifies and nothing
    /// has been issued yet.
    pub fn can_issue_reward(&self) -> bool {
        self.reward.is_none() && self.qualifies()
    }

    pub fn locate_slot<G>(&self, geometry: &G, p: Pointer) -> Option<usize>
    where
        G: SlotGeometry + ?Sized,
    {
        locate_slot(&self.slots, geometry, p)
    }

    /// Pool coupons to display: the selected filter, narrowed to partners
    /// already on the board once anything is placed. In-flight coupons are
    /// hidden until their gesture resolves.
    pub fn visible_pool(&self, filter: &PartnerFilter) -> Vec<&Coupon> {
        let in_flight = self.in_flight();
        let narrow = self.variant.filters_by_partner();
        let placed = self.placed_partners();
        self.pool
            .iter()
            .filter(|c| Some(c.id) != in_flight)
            .filter(|c| !narrow || filter.matches(c))
            .filter(|c| !narrow || placed.is_empty() || placed.contains(c.partner.as_str()))
            .collect()
    }

    /// Ids in board-then-pool order; used to check the catalog invariant.
    pub fn accounted_ids(&self) -> Vec<CouponId> {
        self.slots
            .iter()
            .flatten()
            .chain(self.pool.iter())
            .map(|c| c.id)
            .collect()
    }

    pub fn try_place<G>(
        &self,
        coupon_id: CouponId,
        geometry: &G,
        p: Pointer,
    ) -> Result<(Self, usize), PlaceError>
    where
        G: SlotGeometry + ?Sized,
    {
        if self.in_flight() == Some(coupon_id) {
            return Err(PlaceError::InFlight(coupon_id));
        }
        self.place_unchecked_flight(coupon_id, geometry, p)
    }

    fn place_unchecked_flight<G>(
        &self,
        coupon_id: CouponId,
        geometry: &G,
        p: Pointer,
    ) -> Result<(Self, usize), PlaceError>
    where
        G: SlotGeometry + ?Sized,
    {
        if self.is_frozen() {
            return Err(PlaceError::Frozen);
        }
        let pos = self
            .pool
            .iter()
            .position(|c| c.id == coupon_id)
            .ok_or(PlaceError::UnknownCoupon(coupon_id))?;
        let slot = self.locate_slot(geometry, p).ok_or(PlaceError::NoTargetSlot)?;
        self.place_in_slot(pos, slot).map(|next| (next, slot))
    }

    fn place_in_slot(&self, pool_pos: usize, slot: usize) -> Result<Self, PlaceError> {
        match self.slots.get(slot) {
            Some(None) => {}
            _ => return Err(PlaceError::SlotOccupied(slot)),
        }
        let mut next = self.clone();
        let coupon = next.pool.remove(pool_pos);
        next.slots[slot] = Some(coupon);
        next.settle_reward();
        Ok(next)
    }

    pub fn try_remove(&self, slot: usize) -> Result<Self, RemoveError> {
        if self.is_frozen() {
            return Err(RemoveError::Frozen);
        }
        let mut next = self.clone();
        let coupon = next
            .slots
            .get_mut(slot)
            .ok_or(RemoveError::OutOfRange(slot))?
            .take()
            .ok_or(RemoveError::EmptySlot(slot))?;
        next.pool.push(coupon);
        next.settle_reward();
        Ok(next)
    }

    /// Change the partner filter. `None` when the filter is locked, the
    /// variant has no filtering, or nothing would change.
    pub fn with_filter(&self, filter: PartnerFilter) -> Option<Self> {
        if !self.variant.filters_by_partner() || self.filter_locked() || self.filter == filter {
            return None;
        }
        let mut next = self.clone();
        next.filter = filter;
        Some(next)
    }

    pub fn begin_drag(&self, coupon_id: CouponId, p: Pointer) -> Result<Self, DragError> {
        if self.is_frozen() {
            return Err(DragError::Frozen);
        }
        if let Some(active) = self.in_flight() {
            return Err(DragError::GestureActive(active));
        }
        if !self.pool.iter().any(|c| c.id == coupon_id) {
            return Err(DragError::UnknownCoupon(coupon_id));
        }
        let mut next = self.clone();
        next.drag = Some(DragState {
            coupon_id,
            pointer: (p.x, p.y),
            hover_slot: None,
        });
        Ok(next)
    }

    /// Track the pointer of the active gesture. `None` without a gesture.
    pub fn update_drag<G>(&self, geometry: &G, p: Pointer) -> Option<Self>
    where
        G: SlotGeometry + ?Sized,
    {
        let drag = self.drag.as_ref()?;
        let hover_slot = self.locate_slot(geometry, p);
        let mut next = self.clone();
        next.drag = Some(DragState {
            coupon_id: drag.coupon_id,
            pointer: (p.x, p.y),
            hover_slot,
        });
        Some(next)
    }

    /// Resolve the active gesture at the release point. The returned snapshot
    /// never has a gesture; the result says whether the coupon landed.
    /// `None` without a gesture.
    pub fn end_drag<G>(&self, geometry: &G, p: Pointer) -> Option<(Self, Result<usize, PlaceError>)>
    where
        G: SlotGeometry + ?Sized,
    {
        let coupon_id = self.in_flight()?;
        let mut released = self.clone();
        released.drag = None;
        match released.place_unchecked_flight(coupon_id, geometry, p) {
            Ok((placed, slot)) => Some((placed, Ok(slot))),
            Err(err) => Some((released, Err(err))),
        }
    }

    pub fn cancel_drag(&self) -> Option<Self> {
        self.drag.as_ref()?;
        let mut next = self.clone();
        next.drag = None;
        Some(next)
    }

    pub fn issue_reward(
        &self,
        code_length: usize,
        next_unit: impl FnMut() -> f64,
    ) -> Result<(Self, Reward), RewardError> {
        if self.reward.is_some() {
            return Err(RewardError::AlreadyIssued);
        }
        if !self.qualifies() {
            return Err(RewardError::NotQualified);
        }
        let reward = Reward {
            code: RewardCode::generate(code_length, next_unit),
            points: self.point_sum(),
            kind: RewardKind::for_variant(self.variant),
        };
        let mut next = self.clone();
        next.reward = Some(reward.clone());
        // A freezing reward also ends any gesture in progress.
        if next.is_frozen() {
            next.drag = None;
        }
        Ok((next, reward))
    }

    // A non-freezing reward is withdrawn once the board stops qualifying.
    fn settle_reward(&mut self) {
        if self.reward.is_some() && !self.variant.freezes_on_reward() && !self.qualifies() {
            self.reward = None;
        }
    }
}
