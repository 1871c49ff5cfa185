//! 변동성 차원 (Dimension 1).
//!
//! 최근 30일 구간의 변동계수(CV)와 고저 비율(PTR), 그리고 최근 7일 변동폭의
//! 가속도를 조합합니다.
//!
//! ```text
//! score = 0.4 × CV + 0.3 × PTR + 0.3 × Acceleration
//! ```

use chrono::Duration;

use cardrisk_core::{valid_points, Dimension, DimensionScore, PricePoint};

use super::{details, flag};
use crate::buckets::Buckets;
use crate::statistics::{coefficient_of_variation, mean_abs, prices_to_returns};

/// 변동계수/고저 비율 계산 구간 (일).
pub const WINDOW_DAYS: i64 = 30;
/// 가속도 계산의 최근 구간 (수익률 개수).
pub const RECENT_RETURNS: usize = 7;
/// 가속도 계산의 이전 구간 최대 길이 (수익률 개수).
pub const PRIOR_RETURNS: usize = 60;

const CV_BUCKETS: Buckets = Buckets::below(&[(2.0, 10.0), (5.0, 40.0), (10.0, 70.0)], 100.0);
const PTR_BUCKETS: Buckets = Buckets::below(&[(5.0, 10.0), (15.0, 40.0), (30.0, 70.0)], 100.0);
const ACCELERATION_BUCKETS: Buckets =
    Buckets::below(&[(1.0, 10.0), (2.0, 40.0), (3.0, 70.0)], 100.0);

/// 데이터 부족 시 점수 (최저 구간).
const INSUFFICIENT_DATA_SCORE: f64 = 10.0;

/// 변동성 점수 계산기.
#[derive(Debug, Clone, Copy)]
pub struct VolatilityScorer {
    weight: f64,
}

impl Default for VolatilityScorer {
    fn default() -> Self {
        Self::new(Dimension::Volatility.default_weight())
    }
}

impl VolatilityScorer {
    /// 가중치를 지정하여 생성합니다.
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    /// 가격 시계열로 변동성 점수를 계산합니다.
    ///
    /// 유효 가격이 2개 미만이면 최저 구간 점수를 반환하고 `insufficient_data = 1`로 표시합니다.
    pub fn score(&self, prices: &[PricePoint]) -> DimensionScore {
        let points = valid_points(prices);
        let Some(last) = points.last().filter(|_| points.len() >= 2) else {
            return DimensionScore::new(
                Dimension::Volatility,
                INSUFFICIENT_DATA_SCORE,
                self.weight,
                details([("insufficient_data", 1.0), ("points", points.len() as f64)]),
            )
            .with_degraded(true);
        };

        let window_start = last.date - Duration::days(WINDOW_DAYS);
        let window: Vec<f64> = points
            .iter()
            .filter(|p| p.date > window_start)
            .map(|p| p.price_f64())
            .collect();

        let cv = coefficient_of_variation(&window).unwrap_or(0.0);
        let ptr = peak_to_trough(&window);

        let all_prices: Vec<f64> = points.iter().map(|p| p.price_f64()).collect();
        let acceleration = acceleration(&prices_to_returns(&all_prices));

        let cv_score = CV_BUCKETS.score(cv);
        let ptr_score = PTR_BUCKETS.score(ptr);
        let acceleration_score = ACCELERATION_BUCKETS.score(acceleration);

        let score = 0.4 * cv_score + 0.3 * ptr_score + 0.3 * acceleration_score;

        DimensionScore::new(
            Dimension::Volatility,
            score,
            self.weight,
            details([
                ("cv", cv),
                ("cv_score", cv_score),
                ("ptr", ptr),
                ("ptr_score", ptr_score),
                ("acceleration", acceleration),
                ("acceleration_score", acceleration_score),
                ("window_points", window.len() as f64),
                ("insufficient_data", flag(false)),
            ]),
        )
    }
}

/// 고저 비율 (%) = (최고 − 최저) / 최저 × 100.
///
/// 최저가가 0 이하이거나 빈 구간이면 0.
pub fn peak_to_trough(prices: &[f64]) -> f64 {
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);

    if prices.is_empty() || min <= 0.0 {
        return 0.0;
    }
    (max - min) / min * 100.0
}

/// 최근 7개 수익률의 평균 변동폭 / 이전 구간(최대 60개)의 평균 변동폭.
///
/// 이전 구간이 2개 미만이면 1.0 (중립), 이전 구간 평균이 0이면 0.0.
pub fn acceleration(returns: &[f64]) -> f64 {
    let recent_start = returns.len().saturating_sub(RECENT_RETURNS);
    let (before, recent) = returns.split_at(recent_start);
    let prior = &before[before.len().saturating_sub(PRIOR_RETURNS)..];

    if prior.len() < 2 {
        return 1.0;
    }

    let prior_mean = mean_abs(prior);
    if prior_mean == 0.0 {
        return 0.0;
    }
    mean_abs(recent) / prior_mean
}
