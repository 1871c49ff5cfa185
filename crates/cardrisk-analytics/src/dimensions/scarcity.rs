//! 희소성 차원 (Dimension 3).
//!
//! ```text
//! score = 0.4 × Rarity + 0.2 × Population + 0.2 × SupplyDemand + 0.2 × (50 + VintageBonus)
//! ```
//!
//! 결과는 0 ~ 100으로 제한됩니다.

use chrono::{Datelike, NaiveDate};

use cardrisk_core::{CardMetadata, Dimension, DimensionScore};

use super::set_catalog::release_year;
use super::{details, flag};
use crate::buckets::Buckets;

/// 레어도 라벨 → 점수 (소문자, 정확히 일치).
const RARITY_TABLE: &[(&str, f64)] = &[
    ("common", 5.0),
    ("uncommon", 10.0),
    ("rare", 25.0),
    ("rare holo", 45.0),
    ("holo rare", 45.0),
    ("reverse holo", 20.0),
    ("rare holo ex", 55.0),
    ("rare holo gx", 55.0),
    ("rare holo v", 55.0),
    ("double rare", 55.0),
    ("rare ultra", 60.0),
    ("ultra rare", 60.0),
    ("rare holo vmax", 60.0),
    ("rare holo vstar", 60.0),
    ("rare holo star", 80.0),
    ("gold star", 80.0),
    ("rare shining", 70.0),
    ("shining", 70.0),
    ("rare secret", 75.0),
    ("secret rare", 75.0),
    ("hyper rare", 75.0),
    ("rare rainbow", 75.0),
    ("illustration rare", 65.0),
    ("special illustration rare", 75.0),
    ("promo", 20.0),
];

/// 표에 없는 라벨의 키워드 대체. 단어 단위로 비교하며 앞선 항목이 우선합니다.
const RARITY_KEYWORDS: &[(&str, f64)] = &[
    ("secret", 75.0),
    ("hyper", 75.0),
    ("rainbow", 75.0),
    ("vstar", 60.0),
    ("vmax", 60.0),
    ("star", 80.0),
    ("shining", 70.0),
    ("ultra", 60.0),
    ("holo", 45.0),
    ("rare", 25.0),
    ("promo", 20.0),
];

/// 알 수 없는 레어도 점수.
pub const UNKNOWN_RARITY_SCORE: f64 = 30.0;
/// 개체수 정보가 없을 때의 점수.
pub const POPULATION_DEFAULT_SCORE: f64 = 50.0;
/// 유동성이 낮을 때의 수급 점수 하한.
pub const SUPPLY_DEMAND_FLOOR: f64 = 30.0;
/// 빈티지 보너스 상한 (년).
pub const MAX_VINTAGE_BONUS: f64 = 25.0;
/// 발매 연도를 알 수 없는 빈티지 카드의 보너스.
pub const UNKNOWN_YEAR_VINTAGE_BONUS: f64 = 15.0;

const POPULATION_BUCKETS: Buckets = Buckets::below(
    &[
        (100.0, 100.0),
        (500.0, 80.0),
        (1000.0, 60.0),
        (5000.0, 40.0),
        (10000.0, 20.0),
    ],
    10.0,
);
const SUPPLY_DEMAND_BUCKETS: Buckets = Buckets::at_least(
    &[(2.0, 100.0), (1.0, 80.0), (0.5, 60.0), (0.2, 40.0)],
    SUPPLY_DEMAND_FLOOR,
);

/// 희소성 점수 계산기.
#[derive(Debug, Clone, Copy)]
pub struct ScarcityScorer {
    weight: f64,
}

impl Default for ScarcityScorer {
    fn default() -> Self {
        Self::new(Dimension::Scarcity.default_weight())
    }
}

impl ScarcityScorer {
    /// 가중치를 지정하여 생성합니다.
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    /// 희소성 점수를 계산합니다.
    ///
    /// `population`은 개체수 제공자 값이 있으면 그 값, 없으면 메타데이터의 PSA 개체수입니다.
    /// 빈티지 연식은 `as_of`의 연도를 기준으로 계산합니다.
    pub fn score(
        &self,
        metadata: &CardMetadata,
        population: Option<u32>,
        as_of: NaiveDate,
    ) -> DimensionScore {
        let base_rarity = Self::rarity_score(&metadata.rarity);
        let name_override = Self::name_override(&metadata.name);
        let rarity = name_override.map_or(base_rarity, |o| base_rarity.max(o));

        let population_score = Self::population_score(population);
        let supply_demand =
            Self::supply_demand_score(metadata.active_listings, metadata.sold_listings_30d);

        let year = release_year(&metadata.set_id);
        let vintage_bonus = Self::vintage_bonus(year, metadata.is_vintage, as_of.year());

        let score = 0.4 * rarity
            + 0.2 * population_score
            + 0.2 * supply_demand
            + 0.2 * (50.0 + vintage_bonus);

        DimensionScore::new(
            Dimension::Scarcity,
            score.clamp(0.0, 100.0),
            self.weight,
            details([
                ("rarity_score", rarity),
                ("base_rarity_score", base_rarity),
                ("name_override", name_override.unwrap_or(0.0)),
                ("population", population.map(f64::from).unwrap_or(0.0)),
                ("population_score", population_score),
                ("population_default", flag(population.is_none())),
                ("supply_demand_score", supply_demand),
                ("release_year", year.map(f64::from).unwrap_or(0.0)),
                ("vintage_bonus", vintage_bonus),
            ]),
        )
        .with_degraded(population.is_none())
    }

    /// 레어도 라벨 점수 (대소문자 무시, 표 → 키워드 → 기본값 30).
    pub fn rarity_score(rarity: &str) -> f64 {
        let label = rarity.trim().to_lowercase();

        if let Some((_, score)) = RARITY_TABLE.iter().find(|(name, _)| *name == label) {
            return *score;
        }

        let words: Vec<&str> = label.split_whitespace().collect();
        RARITY_KEYWORDS
            .iter()
            .find(|(keyword, _)| words.contains(keyword))
            .map(|(_, score)| *score)
            .unwrap_or(UNKNOWN_RARITY_SCORE)
    }

    /// 카드 이름의 명명 관례가 암시하는 레어도 점수.
    ///
    /// 여러 관례가 겹치면 가장 높은 점수를 사용합니다.
    pub fn name_override(name: &str) -> Option<f64> {
        let name = name.to_lowercase();
        let tokens: Vec<&str> = name.split_whitespace().collect();
        let has_token = |t: &str| tokens.iter().any(|token| *token == t);

        let candidates = [
            (name.contains("gold star") || has_token("star") || name.contains('☆'), 80.0),
            (has_token("shining"), 70.0),
            (has_token("crystal"), 70.0),
            (has_token("lv.x"), 60.0),
            (has_token("legend"), 60.0),
            (has_token("ex"), 55.0),
            (has_token("prime"), 50.0),
        ];

        candidates
            .iter()
            .filter(|(matched, _)| *matched)
            .map(|(_, score)| *score)
            .reduce(f64::max)
    }

    /// 메타데이터 기준 최종 레어도 점수 (라벨과 이름 관례 중 높은 값).
    pub fn effective_rarity(metadata: &CardMetadata) -> f64 {
        let base = Self::rarity_score(&metadata.rarity);
        Self::name_override(&metadata.name).map_or(base, |o| base.max(o))
    }

    /// PSA 10 개체수 점수. 개체수가 적을수록 높습니다. 없으면 50.
    pub fn population_score(population: Option<u32>) -> f64 {
        population
            .map(|p| POPULATION_BUCKETS.score(f64::from(p)))
            .unwrap_or(POPULATION_DEFAULT_SCORE)
    }

    /// 30일 판매 / 현재 리스팅 비율 점수.
    ///
    /// 한쪽이라도 0이면 하한값 30을 사용합니다 (거래가 드문 빈티지 카드 보호).
    pub fn supply_demand_score(active: u32, sold_30d: u32) -> f64 {
        if active == 0 || sold_30d == 0 {
            return SUPPLY_DEMAND_FLOOR;
        }
        SUPPLY_DEMAND_BUCKETS.score(f64::from(sold_30d) / f64::from(active))
    }

    /// 발매 후 경과 연수 기반 빈티지 보너스 (최대 25).
    pub fn vintage_bonus(release_year: Option<i32>, is_vintage: bool, as_of_year: i32) -> f64 {
        match release_year {
            Some(year) => f64::from((as_of_year - year).max(0)).min(MAX_VINTAGE_BONUS),
            None if is_vintage => UNKNOWN_YEAR_VINTAGE_BONUS,
            None => 0.0,
        }
    }
}
