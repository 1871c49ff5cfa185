//! 빠른 점수 계산.
//!
//! 외부 데이터 없이 가격 시계열과 PSA 개체수만으로 근사 점수를 계산합니다.
//! 심리/매크로 차원은 중립값 50으로 고정합니다. 배치/오프라인 용도입니다.
//!
//! 변동성/성장은 전체 계산보다 거친 5구간 테이블을 사용합니다.

use serde::{Deserialize, Serialize};

use cardrisk_core::{valid_prices, CardId, DimensionWeights, PricePoint, SpeculationRating};

use crate::buckets::Buckets;
use crate::classifier::rating_for_total;
use crate::dimensions::{benchmark_pct, ScarcityScorer};
use crate::statistics::coefficient_of_variation;

/// 변동계수 계산에 사용하는 최근 포인트 수.
pub const QUICK_WINDOW_POINTS: usize = 90;

/// 심리/매크로 중립값.
const NEUTRAL_SCORE: f64 = 50.0;

const QUICK_CV_BUCKETS: Buckets = Buckets::below(
    &[(3.0, 15.0), (8.0, 35.0), (15.0, 55.0), (25.0, 75.0)],
    95.0,
);
const QUICK_RETURN_BUCKETS: Buckets = Buckets::below(
    &[(0.0, 10.0), (25.0, 30.0), (75.0, 50.0), (150.0, 75.0)],
    95.0,
);

const MIN_VOLATILITY_SCORE: f64 = 15.0;
const MIN_GROWTH_SCORE: f64 = 10.0;

/// 빠른 점수 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickScoreInput {
    /// 카드 식별자
    pub card_id: CardId,
    /// 가격 시계열
    #[serde(default)]
    pub prices: Vec<PricePoint>,
    /// PSA 10 개체수
    #[serde(default)]
    pub psa_population: Option<u32>,
    /// 빈티지 여부
    #[serde(default)]
    pub is_vintage: bool,
}

/// 빠른 점수 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickScoreResult {
    pub card_id: CardId,
    pub score: u8,
    pub rating: SpeculationRating,
}

/// 빠른 점수 (0 ~ 100). 외부 I/O 없음.
pub fn compute_quick_score(
    prices: &[PricePoint],
    psa_population: Option<u32>,
    is_vintage: bool,
) -> u8 {
    let values = valid_prices(prices);
    let recent = &values[values.len().saturating_sub(QUICK_WINDOW_POINTS)..];

    let volatility = quick_volatility(recent);
    let growth = quick_growth(recent, is_vintage);
    let scarcity = ScarcityScorer::population_score(psa_population);

    let weights = DimensionWeights::default();
    let total = weights.volatility * volatility
        + weights.growth * growth
        + weights.scarcity * scarcity
        + weights.sentiment * NEUTRAL_SCORE
        + weights.macro_environment * NEUTRAL_SCORE;

    total.round().clamp(0.0, 100.0) as u8
}

fn quick_volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return MIN_VOLATILITY_SCORE;
    }
    coefficient_of_variation(prices)
        .map(|cv| QUICK_CV_BUCKETS.score(cv))
        .unwrap_or(MIN_VOLATILITY_SCORE)
}

fn quick_growth(prices: &[f64], is_vintage: bool) -> f64 {
    let (first, last) = match prices {
        [first, .., last] if *first > 0.0 => (*first, *last),
        _ => return MIN_GROWTH_SCORE,
    };
    let simple_return = (last - first) / first * 100.0;
    QUICK_RETURN_BUCKETS.score(simple_return - benchmark_pct(is_vintage))
}

/// 여러 카드의 빠른 점수를 계산합니다. 입력 순서를 유지합니다.
pub fn quick_score_batch(inputs: &[QuickScoreInput]) -> Vec<QuickScoreResult> {
    inputs
        .iter()
        .map(|input| {
            let score = compute_quick_score(&input.prices, input.psa_population, input.is_vintage);
            QuickScoreResult {
                card_id: input.card_id.clone(),
                score,
                rating: rating_for_total(score),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                PricePoint::new(
                    start + Duration::days(i as i64),
                    Decimal::try_from(*p).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_flat_vintage_low_population() {
        // 0.25 × 15 + 0.25 × 10 + 0.2 × 100 + 0.15 × 50 + 0.15 × 50 = 41.25
        assert_eq!(compute_quick_score(&series(&[100.0; 90]), Some(50), true), 41);
    }

    #[test]
    fn test_empty_series_uses_minimums() {
        // 0.25 × 15 + 0.25 × 10 + 0.2 × 50 + 15 = 31.25
        assert_eq!(compute_quick_score(&[], None, false), 31);
    }

    #[test]
    fn test_pump_scores_higher_than_flat() {
        let mut pump = vec![100.0; 30];
        pump.extend([150.0, 220.0, 300.0, 280.0, 260.0]);
        let flat = compute_quick_score(&series(&[100.0; 35]), Some(5_000), false);
        let pumped = compute_quick_score(&series(&pump), Some(5_000), false);
        assert!(pumped > flat, "pumped = {}, flat = {}", pumped, flat);
    }

    #[test]
    fn test_deterministic() {
        let prices = series(&[10.0, 12.0, 9.0, 15.0, 14.0]);
        let first = compute_quick_score(&prices, Some(300), false);
        for _ in 0..10 {
            assert_eq!(compute_quick_score(&prices, Some(300), false), first);
        }
    }

    #[test]
    fn test_batch_keeps_order() {
        let inputs = vec![
            QuickScoreInput {
                card_id: CardId::new("b"),
                prices: series(&[100.0; 10]),
                psa_population: Some(20_000),
                is_vintage: false,
            },
            QuickScoreInput {
                card_id: CardId::new("a"),
                prices: vec![],
                psa_population: None,
                is_vintage: true,
            },
        ];
        let results = quick_score_batch(&inputs);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].card_id.as_str(), "b");
        assert_eq!(results[1].rating, rating_for_total(results[1].score));
    }
}
