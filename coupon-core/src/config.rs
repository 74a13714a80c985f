use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bounds for the size settings, checked before anything is allocated.
pub const MAX_SLOT_COUNT: usize = 50;
pub const MAX_CATALOG_SIZE: usize = 1_000;
pub const MAX_CODE_LENGTH: usize = 64;

/// Product variant. The two variants differ in completion rule, filtering
/// and whether issuing a reward freezes the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Full board of one partner earns a barcode; the board freezes.
    #[default]
    PartnerUniform,
    /// Any full board earns a completion message; the board stays editable.
    FullBoard,
}

impl Variant {
    pub fn freezes_on_reward(self) -> bool {
        matches!(self, Variant::PartnerUniform)
    }

    pub fn filters_by_partner(self) -> bool {
        matches!(self, Variant::PartnerUniform)
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "partner_uniform" | "partner" | "uniform" => Ok(Variant::PartnerUniform),
            "full_board" | "full" => Ok(Variant::FullBoard),
            _ => Err(ConfigError::InvalidValue {
                key: "variant".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Options handed to the external barcode renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarcodeStyle {
    pub format: String,
    pub line_color: String,
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub display_value: bool,
}

impl Default for BarcodeStyle {
    fn default() -> Self {
        BarcodeStyle {
            format: "CODE128".to_string(),
            line_color: "#000".to_string(),
            width: 2.0,
            height: 60.0,
            margin: 0.0,
            display_value: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    pub slot_count: usize,
    pub catalog_size: usize,
    pub code_length: usize,
    pub variant: Variant,
    pub barcode: BarcodeStyle,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            slot_count: 5,
            catalog_size: 30,
            code_length: 20,
            variant: Variant::default(),
            barcode: BarcodeStyle::default(),
        }
    }
}

impl BoardConfig {
    /// Parse a JSON config block. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_count == 0 {
            return Err(ConfigError::Zero("slotCount"));
        }
        if self.catalog_size == 0 {
            return Err(ConfigError::Zero("catalogSize"));
        }
        if self.code_length == 0 {
            return Err(ConfigError::Zero("codeLength"));
        }
        check_max("slotCount", self.slot_count, MAX_SLOT_COUNT)?;
        check_max("catalogSize", self.catalog_size, MAX_CATALOG_SIZE)?;
        check_max("codeLength", self.code_length, MAX_CODE_LENGTH)?;
        if self.slot_count > self.catalog_size {
            return Err(ConfigError::MoreSlotsThanCoupons {
                slots: self.slot_count,
                coupons: self.catalog_size,
            });
        }
        Ok(())
    }

    /// Apply one `key=value` override (URL query style). Unknown keys are
    /// ignored; an invalid value leaves the config unchanged.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = self.clone();
        match key {
            "variant" => next.variant = value.parse()?,
            "slots" => next.slot_count = parse_count(key, value)?,
            "coupons" => next.catalog_size = parse_count(key, value)?,
            "code" => next.code_length = parse_count(key, value)?,
            _ => return Ok(()),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Apply overrides in order, logging and skipping the invalid ones.
    pub fn with_overrides<'a, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in pairs {
            if let Err(err) = self.apply_override(key, value) {
                tracing::warn!(%key, %value, "ignoring config override: {err}");
            }
        }
        self
    }
}

fn check_max(key: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::TooLarge { key, value, max });
    }
    Ok(())
}

fn parse_count(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_board() {
        let c = BoardConfig::default();
        assert_eq!(c.slot_count, 5);
        assert_eq!(c.catalog_size, 30);
        assert_eq!(c.code_length, 20);
        assert_eq!(c.variant, Variant::PartnerUniform);
        assert_eq!(c.barcode.format, "CODE128");
        assert_eq!(c.barcode.height, 60.0);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let c = BoardConfig::from_json(r#"{"variant":"full_board","barcode":{"height":40}}"#)
            .unwrap();
        assert_eq!(c.variant, Variant::FullBoard);
        assert_eq!(c.slot_count, 5);
        assert_eq!(c.barcode.height, 40.0);
        assert_eq!(c.barcode.line_color, "#000");
    }

    #[test]
    fn json_rejects_zero_slots_and_garbage() {
        assert!(matches!(
            BoardConfig::from_json(r#"{"slotCount":0}"#),
            Err(ConfigError::Zero("slotCount"))
        ));
        assert!(matches!(
            BoardConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn overrides_apply_in_order_and_skip_invalid() {
        let c = BoardConfig::default().with_overrides([
            ("variant", "full"),
            ("slots", "7"),
            ("slots", "0"),
            ("coupons", "many"),
            ("lang", "ko"),
        ]);
        assert_eq!(c.variant, Variant::FullBoard);
        assert_eq!(c.slot_count, 7);
        assert_eq!(c.catalog_size, 30);
    }

    #[test]
    fn oversized_overrides_keep_previous_value() {
        let c = BoardConfig::default().with_overrides([
            ("coupons", "4294967297"),
            ("slots", "1000000000"),
            ("code", "1000000000"),
        ]);
        assert_eq!(c, BoardConfig::default());

        let mut c = BoardConfig::default();
        assert!(matches!(
            c.apply_override("coupons", "1001"),
            Err(ConfigError::TooLarge { key: "catalogSize", value: 1001, max: MAX_CATALOG_SIZE })
        ));
        assert!(c.apply_override("coupons", "1000").is_ok());
        assert_eq!(c.catalog_size, MAX_CATALOG_SIZE);
    }

    #[test]
    fn slots_cannot_outnumber_coupons() {
        let mut c = BoardConfig::default();
        assert!(matches!(
            c.apply_override("coupons", "4"),
            Err(ConfigError::MoreSlotsThanCoupons { slots: 5, coupons: 4 })
        ));
        assert_eq!(c.catalog_size, 30);
        assert!(matches!(
            BoardConfig::from_json(r#"{"slotCount":8,"catalogSize":6}"#),
            Err(ConfigError::MoreSlotsThanCoupons { .. })
        ));
        assert!(c.apply_override("coupons", "5").is_ok());
    }

    #[test]
    fn variant_names_are_lenient() {
        assert_eq!("Partner-Uniform".parse::<Variant>().unwrap(), Variant::PartnerUniform);
        assert_eq!(" full ".parse::<Variant>().unwrap(), Variant::FullBoard);
        assert!("diagonal".parse::<Variant>().is_err());
    }
}
