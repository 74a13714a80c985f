use std::cell::RefCell;
use std::rc::Rc;

use crate::board::{BoardSnapshot, PartnerFilter};
use crate::catalog::{Catalog, Coupon, CouponId};
use crate::config::BoardConfig;
use crate::error::{PlaceError, RewardError};
use crate::geometry::{Pointer, SlotGeometry};
use crate::reward::Reward;

type Subscriber = Rc<dyn Fn(&BoardSnapshot)>;

/// Owns the current board snapshot. Mutations build a new snapshot from the
/// current one, swap it in whole and then notify subscribers. Rejected
/// mutations change nothing and notify nobody.
pub struct BoardStore {
    catalog: Catalog,
    config: BoardConfig,
    current: RefCell<Rc<BoardSnapshot>>,
    subscribers: Rc<RefCell<Vec<Subscriber>>>,
}

/// Keeps a subscriber registered; dropping it unsubscribes.
pub struct Subscription {
    subscriber: Subscriber,
    subscribers: Rc<RefCell<Vec<Subscriber>>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}

impl BoardStore {
    pub fn new(catalog: Catalog, config: BoardConfig) -> Self {
        let initial = BoardSnapshot::initial(&catalog, config.slot_count, config.variant);
        BoardStore {
            catalog,
            config,
            current: RefCell::new(Rc::new(initial)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Rc<BoardSnapshot> {
        Rc::clone(&self.current.borrow())
    }

    pub fn subscribe(&self, subscriber: impl Fn(&BoardSnapshot) + 'static) -> Subscription {
        let subscriber: Subscriber = Rc::new(subscriber);
        self.subscribers.borrow_mut().push(Rc::clone(&subscriber));
        Subscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    fn commit(&self, next: BoardSnapshot) {
        let next = Rc::new(next);
        self.current.replace(Rc::clone(&next));
        // Subscribers may call back into the store, so iterate over a copy.
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)(&next);
        }
    }

    pub fn locate_slot<G>(&self, geometry: &G, p: Pointer) -> Option<usize>
    where
        G: SlotGeometry + ?Sized,
    {
        self.snapshot().locate_slot(geometry, p)
    }

    pub fn try_place<G>(&self, coupon_id: CouponId, geometry: &G, p: Pointer) -> Result<usize, PlaceError>
    where
        G: SlotGeometry + ?Sized,
    {
        let (next, slot) = self.snapshot().try_place(coupon_id, geometry, p)?;
        self.commit(next);
        Ok(slot)
    }

    /// Drop `coupon_id` into the empty slot under `p`. Returns whether the
    /// board changed.
    pub fn place<G>(&self, coupon_id: CouponId, geometry: &G, p: Pointer) -> bool
    where
        G: SlotGeometry + ?Sized,
    {
        match self.try_place(coupon_id, geometry, p) {
            Ok(slot) => {
                tracing::debug!(coupon_id, slot, "placed coupon");
                true
            }
            Err(err) => {
                tracing::debug!(coupon_id, "placement ignored: {err}");
                false
            }
        }
    }

    /// Send the coupon in `slot` back to the end of the pool.
    pub fn remove(&self, slot: usize) -> bool {
        match self.snapshot().try_remove(slot) {
            Ok(next) => {
                self.commit(next);
                tracing::debug!(slot, "removed coupon");
                true
            }
            Err(err) => {
                tracing::debug!(slot, "removal ignored: {err}");
                false
            }
        }
    }

    pub fn set_filter(&self, filter: PartnerFilter) -> bool {
        match self.snapshot().with_filter(filter) {
            Some(next) => {
                self.commit(next);
                true
            }
            None => false,
        }
    }

    /// Pool coupons to show under the current filter.
    pub fn visible_pool(&self) -> Vec<Coupon> {
        let snapshot = self.snapshot();
        snapshot
            .visible_pool(snapshot.filter())
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn begin_drag(&self, coupon_id: CouponId, p: Pointer) -> bool {
        match self.snapshot().begin_drag(coupon_id, p) {
            Ok(next) => {
                self.commit(next);
                true
            }
            Err(err) => {
                tracing::debug!(coupon_id, "drag not started: {err}");
                false
            }
        }
    }

    /// Track the pointer; notifies only when the hovered slot changes.
    pub fn update_drag<G>(&self, geometry: &G, p: Pointer)
    where
        G: SlotGeometry + ?Sized,
    {
        let current = self.snapshot();
        if let Some(next) = current.update_drag(geometry, p) {
            if next.hover_slot() == current.hover_slot() {
                self.current.replace(Rc::new(next));
            } else {
                self.commit(next);
            }
        }
    }

    /// Finish the active gesture at `p`. Returns whether the coupon landed.
    pub fn end_drag<G>(&self, geometry: &G, p: Pointer) -> bool
    where
        G: SlotGeometry + ?Sized,
    {
        let Some((next, result)) = self.snapshot().end_drag(geometry, p) else {
            return false;
        };
        self.commit(next);
        match result {
            Ok(slot) => {
                tracing::debug!(slot, "drag placed coupon");
                true
            }
            Err(err) => {
                tracing::debug!("drag reverted: {err}");
                false
            }
        }
    }

    pub fn cancel_drag(&self) {
        if let Some(next) = self.snapshot().cancel_drag() {
            self.commit(next);
        }
    }

    pub fn issue_reward(&self, next_unit: impl FnMut() -> f64) -> Result<Reward, RewardError> {
        let (next, reward) = self
            .snapshot()
            .issue_reward(self.config.code_length, next_unit)?;
        self.commit(next);
        tracing::info!(code = %reward.code, points = reward.points, "reward issued");
        Ok(reward)
    }

    /// Back to an empty board with the catalog in generation order.
    pub fn reset(&self) {
        let initial =
            BoardSnapshot::initial(&self.catalog, self.config.slot_count, self.config.variant);
        if *self.snapshot() == initial {
            return;
        }
        self.commit(initial);
        tracing::info!("board reset");
    }
}
