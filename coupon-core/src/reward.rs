use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Variant;

/// Display-only numeric code. Not secure and not unique.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardCode(String);

impl RewardCode {
    /// Build a `len`-digit code from a source of values in `[0, 1)`, such as
    /// `Math.random`.
    pub fn generate(len: usize, mut next_unit: impl FnMut() -> f64) -> Self {
        let code = (0..len)
            .map(|_| {
                let digit = (next_unit() * 10.0).floor().clamp(0.0, 9.0) as u8;
                char::from(b'0' + digit)
            })
            .collect();
        RewardCode(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RewardCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Barcode,
    Message,
}

impl RewardKind {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::PartnerUniform => RewardKind::Barcode,
            Variant::FullBoard => RewardKind::Message,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            RewardKind::Barcode => "할인 쿠폰이 생성되었어요!",
            RewardKind::Message => "쿠폰판을 모두 채웠어요!",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RewardKind::Barcode => "바코드를 확인해 주세요.",
            RewardKind::Message => "모은 포인트가 적립되었습니다.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub code: RewardCode,
    /// Point sum of the board at issuance.
    pub points: u32,
    pub kind: RewardKind,
}

/// Label for the claim button, e.g. `900점 할인 쿠폰 받기`.
pub fn claim_label(points: u32) -> String {
    format!("{points}점 할인 쿠폰 받기")
}
