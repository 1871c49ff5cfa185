//! 종합 점수 → 등급/추천 분류.
//!
//! | 범위 | 등급 | 추천 |
//! |---|---|---|
//! | < 20 | solid_investment | BUY |
//! | 20 ~ 39 | acceptable | BUY (빈티지) / HOLD |
//! | 40 ~ 59 | moderate_speculation | HOLD |
//! | 60 ~ 79 | high_speculation | SELL |
//! | ≥ 80 | mania | AVOID |

use serde::{Deserialize, Serialize};

use cardrisk_core::{Recommendation, SpeculationRating};

/// 분류 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub rating: SpeculationRating,
    pub recommendation: Recommendation,
}

/// 종합 점수에 해당하는 등급.
///
/// 100을 초과하는 값은 mania로 분류됩니다.
pub fn rating_for_total(total: u8) -> SpeculationRating {
    match total {
        0..=19 => SpeculationRating::SolidInvestment,
        20..=39 => SpeculationRating::Acceptable,
        40..=59 => SpeculationRating::ModerateSpeculation,
        60..=79 => SpeculationRating::HighSpeculation,
        _ => SpeculationRating::Mania,
    }
}

/// 등급에 해당하는 추천. acceptable 등급은 빈티지 카드면 BUY입니다.
pub fn recommendation_for(rating: SpeculationRating, is_vintage: bool) -> Recommendation {
    match rating {
        SpeculationRating::SolidInvestment => Recommendation::Buy,
        SpeculationRating::Acceptable if is_vintage => Recommendation::Buy,
        SpeculationRating::Acceptable => Recommendation::Hold,
        SpeculationRating::ModerateSpeculation => Recommendation::Hold,
        SpeculationRating::HighSpeculation => Recommendation::Sell,
        SpeculationRating::Mania => Recommendation::Avoid,
    }
}

/// 종합 점수를 등급과 추천으로 분류합니다.
pub fn classify(total: u8, is_vintage: bool) -> Classification {
    let rating = rating_for_total(total);
    Classification {
        rating,
        recommendation: recommendation_for(rating, is_vintage),
    }
}
