use std::rc::Rc;

use serde::{Deserialize, Serialize};

pub type CouponId = u32;

/// Partners cycled through when generating the catalog.
pub const PARTNERS: [&str; 5] = ["A 편의점", "B 편의점", "A 마트", "B 마트", "B 카페"];

/// Point labels cycled through when generating the catalog.
pub const LABELS: [&str; 3] = ["100점", "200점", "300점"];

/// Tile color for a partner. Unknown partners fall back to grey.
pub fn partner_color(partner: &str) -> &'static str {
    match partner {
        "A 편의점" => "#ef5350", // red
        "B 편의점" => "#ff7043", // orange
        "A 마트" => "#26a69a",   // teal
        "B 마트" => "#ffa726",   // amber
        "B 카페" => "#ab47bc",   // purple
        _ => "#9e9e9e",
    }
}

/// Numeric value of a point label: its ASCII digits read as one number.
/// Labels without digits, or whose digits overflow, are worth nothing.
pub fn parse_points(label: &str) -> u32 {
    let digits: String = label.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub label: String,
    pub partner: String,
    pub color: String,
}

impl Coupon {
    pub fn points(&self) -> u32 {
        parse_points(&self.label)
    }
}

/// The immutable set of coupons for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    coupons: Rc<[Coupon]>,
}

impl Catalog {
    /// Build `size` coupons with ids `1..=size`, cycling labels and partners
    /// by index. Ids stop at `CouponId::MAX`, so they never repeat.
    pub fn generate(size: usize) -> Self {
        let coupons = (0..size)
            .zip(1..=CouponId::MAX)
            .map(|(i, id)| {
                let partner = PARTNERS[i % PARTNERS.len()];
                Coupon {
                    id,
                    label: LABELS[i % LABELS.len()].to_string(),
                    partner: partner.to_string(),
                    color: partner_color(partner).to_string(),
                }
            })
            .collect::<Vec<_>>();
        Self::from_coupons(coupons)
    }

    pub fn from_coupons(coupons: Vec<Coupon>) -> Self {
        Catalog {
            coupons: coupons.into(),
        }
    }

    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    pub fn get(&self, id: CouponId) -> Option<&Coupon> {
        self.coupons.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }

    /// Distinct partners in first-seen order; used for the filter buttons.
    pub fn partners(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for c in self.coupons.iter() {
            if !out.contains(&c.partner.as_str()) {
                out.push(&c.partner);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn generated_catalog_cycles_labels_and_partners() {
        let catalog = Catalog::generate(30);
        assert_eq!(catalog.len(), 30);
        let first = &catalog.coupons()[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.label, "100점");
        assert_eq!(first.partner, "A 편의점");
        assert_eq!(first.color, "#ef5350");

        let c = catalog.get(7).unwrap();
        assert_eq!(c.label, "100점");
        assert_eq!(c.partner, "B 편의점");
        assert_eq!(catalog.get(31), None);
    }

    #[test]
    fn ids_are_unique() {
        let catalog = Catalog::generate(30);
        let ids: BTreeSet<_> = catalog.coupons().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 30);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&30));
    }

    #[test]
    fn partners_keep_generation_order() {
        let catalog = Catalog::generate(12);
        assert_eq!(catalog.partners(), PARTNERS.to_vec());
        assert_eq!(Catalog::generate(2).partners(), vec!["A 편의점", "B 편의점"]);
    }

    #[test]
    fn point_labels_parse_digits_only() {
        assert_eq!(parse_points("100점"), 100);
        assert_eq!(parse_points("3,000 points"), 3000);
        assert_eq!(parse_points("점수 없음"), 0);
        assert_eq!(parse_points(""), 0);
        assert_eq!(parse_points("99999999999999999999점"), 0);
    }
}
