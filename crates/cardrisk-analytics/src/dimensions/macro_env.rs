//! 매크로 차원 (Dimension 5).
//!
//! ```text
//! score = 0.3 × CryptoCorrelation + 0.3 × FearGreed + 0.2 × PolicyRate + 0.2 × Seasonality
//! ```
//!
//! 실시간 매크로 데이터가 없으면 정적 [`MacroSnapshot`]을 사용합니다.

use chrono::{Datelike, NaiveDate};

use cardrisk_core::{Dimension, DimensionScore, MacroSignal, MacroSnapshot};

use super::{details, flag};
use crate::buckets::Buckets;

const CRYPTO_BUCKETS: Buckets = Buckets::above(
    &[(0.85, 100.0), (0.7, 75.0), (0.5, 50.0), (0.3, 30.0)],
    15.0,
);
const FEAR_GREED_BUCKETS: Buckets = Buckets::at_least(
    &[(75.0, 100.0), (55.0, 75.0), (45.0, 50.0), (25.0, 30.0)],
    15.0,
);
const POLICY_RATE_BUCKETS: Buckets = Buckets::below(
    &[(1.0, 100.0), (2.5, 75.0), (4.0, 50.0), (5.5, 30.0)],
    15.0,
);

/// 월별 계절성 점수 (연말 시즌 최고, 여름 최저).
pub fn seasonal_score(month: u32) -> f64 {
    match month {
        11 | 12 => 80.0,
        1..=3 => 60.0,
        4 | 5 => 50.0,
        9 | 10 => 55.0,
        _ => 40.0,
    }
}

/// 매크로 점수 계산기.
#[derive(Debug, Clone)]
pub struct MacroScorer {
    weight: f64,
    defaults: MacroSnapshot,
}

impl Default for MacroScorer {
    fn default() -> Self {
        Self::new(Dimension::Macro.default_weight(), MacroSnapshot::current_environment())
    }
}

impl MacroScorer {
    /// 가중치와 기본 스냅샷을 지정하여 생성합니다.
    pub fn new(weight: f64, defaults: MacroSnapshot) -> Self {
        Self { weight, defaults }
    }

    /// 기본 스냅샷.
    pub fn defaults(&self) -> &MacroSnapshot {
        &self.defaults
    }

    /// 매크로 점수를 계산합니다.
    ///
    /// 상관계수 우선순위: `card_correlation` (카드/비트코인 수익률) → 신호의 상관계수 → 스냅샷.
    /// 신호가 없으면 `degraded`로 표시합니다.
    pub fn score(
        &self,
        signal: Option<&MacroSignal>,
        card_correlation: Option<f64>,
        as_of: NaiveDate,
    ) -> DimensionScore {
        let correlation = card_correlation
            .or_else(|| signal.and_then(|s| s.crypto_correlation))
            .unwrap_or(self.defaults.crypto_correlation);
        let fear_greed = signal
            .and_then(|s| s.fear_greed)
            .unwrap_or(self.defaults.fear_greed);
        let policy_rate = signal
            .and_then(|s| s.policy_rate_pct)
            .unwrap_or(self.defaults.policy_rate_pct);

        let crypto_score = CRYPTO_BUCKETS.score(correlation.abs());
        let fear_greed_score = FEAR_GREED_BUCKETS.score(f64::from(fear_greed));
        let rate_score = POLICY_RATE_BUCKETS.score(policy_rate);
        let seasonal = seasonal_score(as_of.month());

        let score = 0.3 * crypto_score + 0.3 * fear_greed_score + 0.2 * rate_score + 0.2 * seasonal;

        DimensionScore::new(
            Dimension::Macro,
            score,
            self.weight,
            details([
                ("crypto_correlation", correlation),
                ("crypto_score", crypto_score),
                ("fear_greed", f64::from(fear_greed)),
                ("fear_greed_score", fear_greed_score),
                ("policy_rate", policy_rate),
                ("rate_score", rate_score),
                ("month", f64::from(as_of.month())),
                ("seasonal_score", seasonal),
                ("snapshot_default", flag(signal.is_none())),
            ]),
        )
        .with_degraded(signal.is_none())
    }
}
