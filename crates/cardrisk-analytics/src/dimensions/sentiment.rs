//! 심리 차원 (Dimension 4).
//!
//! ```text
//! score = 0.4 × Buzz + 0.3 × OrderImbalance + 0.3 × Hype + PopularityBonus
//! ```
//!
//! 외부 신호에 의존하는 차원입니다. 신호가 없으면 중립값 50을 사용합니다.

use cardrisk_core::{CardMetadata, Dimension, DimensionScore, SentimentSignal};

use super::{details, flag, ScarcityScorer};
use crate::buckets::Buckets;

/// 신호가 없을 때의 중립 점수.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// 잘 알려진 캐릭터 이름 (인기 보너스 대상).
const POPULAR_NAMES: &[&str] = &[
    "charizard",
    "pikachu",
    "mewtwo",
    "lugia",
    "rayquaza",
    "umbreon",
    "gengar",
    "blastoise",
    "venusaur",
    "mew",
];

const POPULARITY_BONUS: f64 = 10.0;
const GRADED_HYPE_BONUS: f64 = 10.0;
const GRADED_RARITY_THRESHOLD: f64 = 60.0;

const BUZZ_BUCKETS: Buckets = Buckets::at_least(
    &[(1000.0, 100.0), (500.0, 80.0), (100.0, 60.0), (20.0, 40.0), (1.0, 20.0)],
    10.0,
);
const IMBALANCE_BUCKETS: Buckets = Buckets::at_least(
    &[(3.0, 100.0), (2.0, 75.0), (1.2, 50.0), (0.8, 30.0)],
    15.0,
);
const HYPE_BUCKETS: Buckets = Buckets::at_least(
    &[(200.0, 100.0), (100.0, 75.0), (50.0, 50.0), (0.0, 25.0)],
    10.0,
);
const HYPE_DEFAULT_SCORE: f64 = 25.0;

/// 심리 점수 계산기.
#[derive(Debug, Clone, Copy)]
pub struct SentimentScorer {
    weight: f64,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new(Dimension::Sentiment.default_weight())
    }
}

impl SentimentScorer {
    /// 가중치를 지정하여 생성합니다.
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    /// 심리 점수를 계산합니다. 신호가 없으면 정확히 50이며 `degraded = 1`입니다.
    pub fn score(
        &self,
        signal: Option<&SentimentSignal>,
        metadata: &CardMetadata,
    ) -> DimensionScore {
        let Some(signal) = signal else {
            return DimensionScore::new(
                Dimension::Sentiment,
                NEUTRAL_SCORE,
                self.weight,
                details([("degraded", 1.0)]),
            )
            .with_degraded(true);
        };

        let mentions = signal.total_mentions();
        let buzz = BUZZ_BUCKETS.score(mentions as f64);
        let imbalance = order_imbalance_score(signal.buy_orders, signal.sell_orders);

        let mut hype = signal
            .search_trend_pct
            .map(|pct| HYPE_BUCKETS.score(pct))
            .unwrap_or(HYPE_DEFAULT_SCORE);
        let graded_bonus = metadata.graded
            && ScarcityScorer::effective_rarity(metadata) >= GRADED_RARITY_THRESHOLD;
        if graded_bonus {
            hype += GRADED_HYPE_BONUS;
        }

        let popular = is_popular(&metadata.name);
        let bonus = if popular { POPULARITY_BONUS } else { 0.0 };

        let score = (0.4 * buzz + 0.3 * imbalance + 0.3 * hype + bonus).clamp(0.0, 100.0);

        DimensionScore::new(
            Dimension::Sentiment,
            score,
            self.weight,
            details([
                ("mentions", mentions as f64),
                ("buzz_score", buzz),
                ("buy_orders", f64::from(signal.buy_orders)),
                ("sell_orders", f64::from(signal.sell_orders)),
                ("imbalance_score", imbalance),
                ("search_trend_pct", signal.search_trend_pct.unwrap_or(0.0)),
                ("hype_score", hype),
                ("graded_bonus", flag(graded_bonus)),
                ("popularity_bonus", bonus),
                ("degraded", 0.0),
            ]),
        )
    }
}

/// 매수/매도 주문 불균형 점수.
fn order_imbalance_score(buy: u32, sell: u32) -> f64 {
    match (buy, sell) {
        (0, 0) => NEUTRAL_SCORE,
        (_, 0) => 100.0,
        (buy, sell) => IMBALANCE_BUCKETS.score(f64::from(buy) / f64::from(sell)),
    }
}

fn is_popular(name: &str) -> bool {
    let name = name.to_lowercase();
    POPULAR_NAMES.iter().any(|popular| name.contains(popular))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn signal(mentions: u32, buy: u32, sell: u32, trend: Option<f64>) -> SentimentSignal {
        SentimentSignal {
            mentions: BTreeMap::from([("reddit".to_string(), mentions)]),
            buy_orders: buy,
            sell_orders: sell,
            search_trend_pct: trend,
        }
    }

    #[test]
    fn test_missing_signal_is_neutral() {
        let metadata = CardMetadata::new("Charizard", "Rare Holo");
        let result = SentimentScorer::default().score(None, &metadata);
        assert_eq!(result.score, 50.0);
        assert_eq!(result.detail("degraded"), Some(1.0));
        assert!(result.degraded);
    }

    #[test]
    fn test_order_imbalance() {
        assert_eq!(order_imbalance_score(0, 0), 50.0);
        assert_eq!(order_imbalance_score(5, 0), 100.0);
        assert_eq!(order_imbalance_score(30, 10), 100.0);
        assert_eq!(order_imbalance_score(12, 10), 50.0);
        assert_eq!(order_imbalance_score(1, 10), 15.0);
    }

    #[test]
    fn test_hot_card_scores_high() {
        let metadata = CardMetadata::new("Umbreon VMAX", "Rare Holo VMAX");
        let result = SentimentScorer::default().score(
            Some(&signal(1500, 40, 10, Some(250.0))),
            &metadata,
        );
        // 0.4 × 100 + 0.3 × 100 + 0.3 × 100 + 10 → 100 제한
        assert_eq!(result.score, 100.0);
        assert_eq!(result.detail("popularity_bonus"), Some(10.0));
    }

    #[test]
    fn test_quiet_card() {
        let metadata = CardMetadata::new("Bidoof", "Common");
        let result =
            SentimentScorer::default().score(Some(&signal(0, 0, 0, None)), &metadata);
        // 0.4 × 10 + 0.3 × 50 + 0.3 × 25
        assert!((result.score - 26.5).abs() < 1e-9);
        assert!(!result.degraded);
    }

    #[test]
    fn test_graded_high_rarity_adds_hype() {
        let mut metadata = CardMetadata::new("Lapras", "Rare Ultra");
        metadata.graded = true;
        let result =
            SentimentScorer::default().score(Some(&signal(20, 1, 1, Some(10.0))), &metadata);
        assert_eq!(result.detail("hype_score"), Some(35.0));
        assert_eq!(result.detail("graded_bonus"), Some(1.0));
    }
}
