use geo::Intersects;
use geo_types::{Coord, Rect, coord};

use crate::catalog::Coupon;

/// Screen-space rectangle of a rendered slot.
pub type SlotRect = Rect<f64>;

/// Pointer position in the same screen space as [`SlotRect`].
pub type Pointer = Coord<f64>;

pub fn pointer(x: f64, y: f64) -> Pointer {
    coord! { x: x, y: y }
}

/// Rectangle from DOMRect-style edges.
pub fn slot_rect(left: f64, top: f64, right: f64, bottom: f64) -> SlotRect {
    Rect::new(coord! { x: left, y: top }, coord! { x: right, y: bottom })
}

/// Supplies the current on-screen rectangle of each slot. Implementations
/// are queried on every hit test, so they must reflect the latest layout.
pub trait SlotGeometry {
    fn slot_rect(&self, index: usize) -> Option<SlotRect>;
}

impl SlotGeometry for [SlotRect] {
    fn slot_rect(&self, index: usize) -> Option<SlotRect> {
        self.get(index).copied()
    }
}

impl SlotGeometry for Vec<SlotRect> {
    fn slot_rect(&self, index: usize) -> Option<SlotRect> {
        self.as_slice().slot_rect(index)
    }
}

/// First empty slot, in index order, whose rectangle contains `p`. Edges
/// count as inside.
pub fn locate_slot<G>(slots: &[Option<Coupon>], geometry: &G, p: Pointer) -> Option<usize>
where
    G: SlotGeometry + ?Sized,
{
    slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.is_none())
        .find_map(|(i, _)| {
            geometry
                .slot_rect(i)
                .filter(|rect| rect.intersects(&p))
                .map(|_| i)
        })
}

#[cfg(test)]
pub(crate) fn row_of_slots(count: usize) -> Vec<SlotRect> {
    // 80x100 slots, 20px apart, starting at (10, 10)
    (0..count)
        .map(|i| {
            let left = 10.0 + i as f64 * 100.0;
            slot_rect(left, 10.0, left + 80.0, 110.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Coupon};

    #[test]
    fn finds_slot_under_pointer() {
        let rects = row_of_slots(5);
        let slots: Vec<Option<Coupon>> = vec![None; 5];
        assert_eq!(locate_slot(&slots, &rects, pointer(250.0, 50.0)), Some(2));
        assert_eq!(locate_slot(&slots, &rects, pointer(95.0, 50.0)), None);
        assert_eq!(locate_slot(&slots, &rects, pointer(50.0, 200.0)), None);
    }

    #[test]
    fn edges_are_inclusive() {
        let rects = row_of_slots(5);
        let slots: Vec<Option<Coupon>> = vec![None; 5];
        assert_eq!(locate_slot(&slots, &rects, pointer(110.0, 10.0)), Some(1));
        assert_eq!(locate_slot(&slots, &rects, pointer(190.0, 110.0)), Some(1));
        assert_eq!(locate_slot(&slots, &rects, pointer(190.01, 110.0)), None);
    }

    #[test]
    fn skips_filled_slots() {
        let catalog = Catalog::generate(3);
        let rects = row_of_slots(2);
        let mut slots: Vec<Option<Coupon>> = vec![None; 2];
        slots[0] = Some(catalog.coupons()[0].clone());
        assert_eq!(locate_slot(&slots, &rects, pointer(50.0, 50.0)), None);
        slots[1] = Some(catalog.coupons()[1].clone());
        assert_eq!(locate_slot(&slots, &rects, pointer(150.0, 50.0)), None);
    }

    #[test]
    fn overlapping_rects_resolve_to_lowest_index() {
        let rects = vec![
            slot_rect(0.0, 0.0, 100.0, 100.0),
            slot_rect(50.0, 50.0, 150.0, 150.0),
        ];
        let slots: Vec<Option<Coupon>> = vec![None; 2];
        assert_eq!(locate_slot(&slots, &rects, pointer(75.0, 75.0)), Some(0));
    }

    #[test]
    fn missing_geometry_is_skipped() {
        let rects = vec![slot_rect(0.0, 0.0, 10.0, 10.0)];
        let slots: Vec<Option<Coupon>> = vec![None; 3];
        assert_eq!(locate_slot(&slots, &rects, pointer(5.0, 5.0)), Some(0));
        assert_eq!(locate_slot(&slots, &rects, pointer(500.0, 5.0)), None);
    }

    #[test]
    fn nan_pointer_hits_nothing() {
        let rects = row_of_slots(1);
        let slots: Vec<Option<Coupon>> = vec![None; 1];
        assert_eq!(locate_slot(&slots, &rects, pointer(f64::NAN, 50.0)), None);
    }
}
