//! 성장 차원 (Dimension 2).
//!
//! ```text
//! score = 0.4 × ExcessReturn + 0.3 × PumpDump + 0.3 × CryptoCorrelation
//! ```
//!
//! - **ExcessReturn**: 최근 1년 연환산 수익률 − 벤치마크 (빈티지 18%, 모던 8%)
//! - **PumpDump**: 고점 전 연속 상승일 / 고점 후 연속 하락일 비율
//! - **CryptoCorrelation**: 카드/비트코인 일간 수익률 상관계수의 절대값

use chrono::Duration;

use cardrisk_core::{valid_points, Dimension, DimensionScore, PricePoint};

use super::{details, flag};
use crate::buckets::Buckets;

/// 빈티지 카드 벤치마크 연수익률 (%).
pub const VINTAGE_BENCHMARK_PCT: f64 = 18.0;
/// 모던 카드 벤치마크 연수익률 (%).
pub const MODERN_BENCHMARK_PCT: f64 = 8.0;

/// 비트코인 데이터가 없을 때의 중립 상관 점수.
pub const CRYPTO_DEFAULT_SCORE: f64 = 25.0;

const LOOKBACK_DAYS: i64 = 365;

/// 연환산 수익률 상한 (%). 짧은 구간의 급등은 거듭제곱으로 발산하므로 이 값으로 제한합니다.
/// 초과수익 구간 최상단(500%)보다 충분히 커서 점수에는 영향이 없습니다.
pub const MAX_ANNUALIZED_PCT: f64 = 10_000.0;

const EXCESS_BUCKETS: Buckets = Buckets::below(
    &[(0.0, 0.0), (100.0, 25.0), (200.0, 50.0), (500.0, 75.0)],
    100.0,
);
const CRYPTO_BUCKETS: Buckets = Buckets::above(&[(0.85, 70.0), (0.7, 45.0), (0.5, 25.0)], 0.0);

/// 빈티지 여부에 따른 벤치마크 수익률 (%).
pub fn benchmark_pct(is_vintage: bool) -> f64 {
    if is_vintage {
        VINTAGE_BENCHMARK_PCT
    } else {
        MODERN_BENCHMARK_PCT
    }
}

/// 고점 전후 상승/하락 구간 길이.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpDumpShape {
    /// 고점까지 연속 상승 일수
    pub rise: usize,
    /// 고점 이후 연속 하락 일수
    pub fall: usize,
}

impl PumpDumpShape {
    /// 가격 시계열에서 고점(최댓값의 첫 위치) 전후 구간을 측정합니다.
    pub fn from_prices(prices: &[f64]) -> Self {
        let Some(peak) = first_max_index(prices) else {
            return Self::default();
        };

        let rise = (1..=peak)
            .rev()
            .take_while(|&i| prices[i - 1] < prices[i])
            .count();
        let fall = (peak + 1..prices.len())
            .take_while(|&i| prices[i] < prices[i - 1])
            .count();

        Self { rise, fall }
    }

    /// 상승/하락 비율. 하락 구간이 없으면 `None` (무한대).
    pub fn ratio(&self) -> Option<f64> {
        if self.fall == 0 {
            None
        } else {
            Some(self.rise as f64 / self.fall as f64)
        }
    }

    /// 펌프앤덤프 점수.
    ///
    /// - 변동 없음: 10
    /// - 비율 < 0.5 (급등 후 완만한 하락): 40
    /// - 비율 > 5 또는 하락 없음 (지속 상승): 30
    /// - 그 외: 10
    pub fn score(&self) -> f64 {
        if self.rise == 0 && self.fall == 0 {
            return 10.0;
        }
        match self.ratio() {
            None => 30.0,
            Some(r) if r < 0.5 => 40.0,
            Some(r) if r > 5.0 => 30.0,
            Some(_) => 10.0,
        }
    }
}

fn first_max_index(prices: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &p) in prices.iter().enumerate() {
        match best {
            Some((_, max)) if p <= max => {}
            _ => best = Some((i, p)),
        }
    }
    best.map(|(i, _)| i)
}

/// 성장 점수 계산기.
#[derive(Debug, Clone, Copy)]
pub struct GrowthScorer {
    weight: f64,
}

impl Default for GrowthScorer {
    fn default() -> Self {
        Self::new(Dimension::Growth.default_weight())
    }
}

impl GrowthScorer {
    /// 가중치를 지정하여 생성합니다.
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    /// 성장 점수를 계산합니다.
    ///
    /// `crypto_correlation`은 카드/비트코인 수익률 상관계수입니다. 계산할 수 없으면 `None`을
    /// 전달하며, 이때 중립값 25를 사용하고 `crypto_default = 1`로 표시합니다.
    pub fn score(
        &self,
        prices: &[PricePoint],
        is_vintage: bool,
        crypto_correlation: Option<f64>,
    ) -> DimensionScore {
        let points = valid_points(prices);
        let benchmark = benchmark_pct(is_vintage);

        let raw_annualized = annualized_return(&points);
        let capped = raw_annualized.is_some_and(|r| r.is_nan() || r > MAX_ANNUALIZED_PCT);
        let annualized = raw_annualized.map(|r| r.min(MAX_ANNUALIZED_PCT));
        let excess = annualized.map(|r| r - benchmark);
        let excess_score = excess.map(|e| EXCESS_BUCKETS.score(e)).unwrap_or(0.0);

        let values: Vec<f64> = points.iter().map(|p| p.price_f64()).collect();
        let shape = PumpDumpShape::from_prices(&values);
        let pump_dump_score = shape.score();

        let crypto_default = crypto_correlation.is_none();
        let crypto_score = match crypto_correlation {
            Some(r) => CRYPTO_BUCKETS.score(r.abs()),
            None => CRYPTO_DEFAULT_SCORE,
        };

        let score = 0.4 * excess_score + 0.3 * pump_dump_score + 0.3 * crypto_score;

        DimensionScore::new(
            Dimension::Growth,
            score,
            self.weight,
            details([
                ("annualized_return", annualized.unwrap_or(0.0)),
                ("annualized_capped", flag(capped)),
                ("benchmark", benchmark),
                ("excess_return", excess.unwrap_or(0.0)),
                ("excess_score", excess_score),
                ("rise_days", shape.rise as f64),
                ("fall_days", shape.fall as f64),
                ("pump_dump_score", pump_dump_score),
                ("crypto_correlation", crypto_correlation.unwrap_or(0.0)),
                ("crypto_score", crypto_score),
                ("crypto_default", flag(crypto_default)),
            ]),
        )
        .with_degraded(crypto_default)
    }
}

/// 최근 1년 연환산 수익률 (%).
///
/// 기준가는 마지막 관측일 365일 전에 가장 가까운 관측값이며, 1년 미만 시계열은 첫 관측값입니다.
/// 유효 가격이 2개 미만이면 `None`. 결과는 발산할 수 있으므로 호출 측에서 상한을 적용합니다.
fn annualized_return(points: &[&PricePoint]) -> Option<f64> {
    let (first, last) = match points {
        [first, .., last] => (*first, *last),
        _ => return None,
    };

    let target = last.date - Duration::days(LOOKBACK_DAYS);
    let prior = if first.date >= target {
        first
    } else {
        points
            .iter()
            .copied()
            .min_by_key(|p| (p.date - target).num_days().abs())
            .unwrap_or(first)
    };

    let prior_price = prior.price_f64();
    if prior_price <= 0.0 {
        return None;
    }

    let days = (last.date - prior.date).num_days().max(1) as f64;
    let growth = last.price_f64() / prior_price;
    Some((growth.powf(LOOKBACK_DAYS as f64 / days) - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn series_from(start: NaiveDate, prices: &[f64]) -> Vec<PricePoint> {
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

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        series_from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), prices)
    }

    #[test]
    fn test_pump_dump_shape() {
        // 3일 상승 후 6일 하락 → 비율 0.5 (경계, 40 아님)
        let prices = [1.0, 2.0, 3.0, 4.0, 3.5, 3.0, 2.5, 2.0, 1.5, 1.2];
        let shape = PumpDumpShape::from_prices(&prices);
        assert_eq!(shape, PumpDumpShape { rise: 3, fall: 6 });
        assert_eq!(shape.score(), 10.0);

        // 1일 급등 후 3일 하락 → 비율 0.33
        let shape = PumpDumpShape::from_prices(&[1.0, 1.0, 5.0, 4.0, 3.0, 2.0]);
        assert_eq!(shape, PumpDumpShape { rise: 1, fall: 3 });
        assert_eq!(shape.score(), 40.0);

        // 지속 상승 (고점이 마지막)
        let shape = PumpDumpShape::from_prices(&[1.0, 2.0, 3.0]);
        assert_eq!(shape.ratio(), None);
        assert_eq!(shape.score(), 30.0);

        // 변동 없음
        assert_eq!(PumpDumpShape::from_prices(&[5.0; 10]).score(), 10.0);
        assert_eq!(PumpDumpShape::from_prices(&[]).score(), 10.0);
    }

    #[test]
    fn test_peak_uses_first_max() {
        let shape = PumpDumpShape::from_prices(&[1.0, 3.0, 2.0, 3.0, 1.0]);
        assert_eq!(shape, PumpDumpShape { rise: 1, fall: 1 });
    }

    #[test]
    fn test_flat_series_has_negative_excess() {
        let result = GrowthScorer::default().score(&series(&[100.0; 90]), true, None);
        assert_eq!(result.detail("annualized_return"), Some(0.0));
        assert_eq!(result.detail("excess_return"), Some(-18.0));
        assert_eq!(result.detail("excess_score"), Some(0.0));
        assert_eq!(result.detail("crypto_default"), Some(1.0));
        // 0.4 × 0 + 0.3 × 10 + 0.3 × 25
        assert!((result.score - 10.5).abs() < 1e-9);
        assert!(result.degraded);
    }

    #[test]
    fn test_prior_price_one_year_back() {
        // 2년 시계열: 1년 전 가격 100, 현재 가격 120 → 연 20%
        let mut prices = vec![50.0; 366];
        prices.extend(std::iter::repeat(100.0).take(365));
        prices.push(120.0);
        let result = GrowthScorer::default().score(&series(&prices), false, Some(0.9));

        let annualized = result.detail("annualized_return").unwrap();
        assert!((annualized - 20.0).abs() < 1e-6, "annualized = {}", annualized);
        assert_eq!(result.detail("excess_score"), Some(25.0));
        assert_eq!(result.detail("crypto_score"), Some(70.0));
        assert!(!result.degraded);
    }

    #[test]
    fn test_crypto_buckets_use_absolute_value() {
        let scorer = GrowthScorer::default();
        let prices = series(&[100.0, 101.0]);
        assert_eq!(
            scorer.score(&prices, false, Some(-0.75)).detail("crypto_score"),
            Some(45.0)
        );
        assert_eq!(
            scorer.score(&prices, false, Some(0.5)).detail("crypto_score"),
            Some(0.0)
        );
    }

    #[test]
    fn test_short_window_spike_is_capped() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let prices = series_from(start, &[1.0, 1000.0]);
        let result = GrowthScorer::default().score(&prices, false, Some(0.5));

        assert!(result.details.values().all(|v| v.is_finite()), "{:?}", result.details);
        assert_eq!(result.detail("annualized_return"), Some(MAX_ANNUALIZED_PCT));
        assert_eq!(result.detail("annualized_capped"), Some(1.0));
        assert_eq!(result.detail("excess_score"), Some(100.0));

        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("null"), "{}", json);
        let back: DimensionScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.detail("excess_return"), Some(MAX_ANNUALIZED_PCT - 8.0));
    }

    #[test]
    fn test_short_window_moderate_move_is_annualized() {
        // 30일간 10% 상승 → 1.1^(365/30) - 1 ≈ 219%
        let mut prices = vec![100.0; 30];
        prices.push(110.0);
        let result = GrowthScorer::default().score(&series(&prices), false, None);

        let annualized = result.detail("annualized_return").unwrap();
        let expected = (1.1f64.powf(365.0 / 30.0) - 1.0) * 100.0;
        assert!((annualized - expected).abs() < 1e-6, "annualized = {}", annualized);
        assert_eq!(result.detail("annualized_capped"), Some(0.0));
        assert_eq!(result.detail("excess_score"), Some(75.0));
    }

    #[test]
    fn test_single_point_has_no_return() {
        let result = GrowthScorer::default().score(&series(&[100.0]), false, None);
        assert_eq!(result.detail("excess_score"), Some(0.0));
        assert_eq!(result.detail("annualized_return"), Some(0.0));
    }
}
