//! 종합 투기 점수 집계기.
//!
//! 5개 차원 점수를 고정 가중치로 합산하고 등급/추천으로 분류합니다.
//!
//! ```text
//! total = round(Σ weight_i × score_i)   (0 ~ 100)
//! ```
//!
//! 동일 입력에 대해 항상 동일한 결과를 반환합니다. 기준일(`as_of`)은 마지막 유효 가격의
//! 날짜이며, 현재 시각은 결과에 포함되지 않습니다.

use chrono::{NaiveDate, Utc};
use std::borrow::Cow;

use cardrisk_core::{
    last_valid_date, CardId, CardMetadata, CardRiskResult, Dimension, DimensionScore,
    DimensionWeights, ExternalSignals, FullSpeculationScore, MacroSnapshot, PricePoint,
};

use crate::classifier::classify;
use crate::dimensions::{
    crypto_correlation, GrowthScorer, MacroScorer, ScarcityScorer, SentimentScorer,
    VolatilityScorer,
};

/// 기본값 대체 차원 하나당 신뢰도 감소 폭 (5개 전부 대체 시 0.5).
const CONFIDENCE_PENALTY: f64 = 0.5;

/// 다차원 투기 점수 계산기.
///
/// 가중치는 생성 시점에 검증되며 이후 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct SpeculationScorer {
    weights: DimensionWeights,
    volatility: VolatilityScorer,
    growth: GrowthScorer,
    scarcity: ScarcityScorer,
    sentiment: SentimentScorer,
    macro_scorer: MacroScorer,
}

impl Default for SpeculationScorer {
    fn default() -> Self {
        Self::build(DimensionWeights::default(), MacroSnapshot::current_environment())
    }
}

impl SpeculationScorer {
    /// 가중치를 지정하여 생성합니다.
    ///
    /// # Errors
    ///
    /// 가중치가 음수/비유한 값이거나 합계가 1.0이 아니면 `CardRiskError::Config`.
    pub fn new(weights: DimensionWeights) -> CardRiskResult<Self> {
        weights.validate()?;
        Ok(Self::build(weights, MacroSnapshot::current_environment()))
    }

    /// 매크로 기본 스냅샷을 교체합니다.
    pub fn with_macro_defaults(mut self, defaults: MacroSnapshot) -> Self {
        self.macro_scorer = MacroScorer::new(self.weights.macro_environment, defaults);
        self
    }

    fn build(weights: DimensionWeights, macro_defaults: MacroSnapshot) -> Self {
        Self {
            weights,
            volatility: VolatilityScorer::new(weights.volatility),
            growth: GrowthScorer::new(weights.growth),
            scarcity: ScarcityScorer::new(weights.scarcity),
            sentiment: SentimentScorer::new(weights.sentiment),
            macro_scorer: MacroScorer::new(weights.macro_environment, macro_defaults),
        }
    }

    /// 가중치.
    pub fn weights(&self) -> &DimensionWeights {
        &self.weights
    }

    /// 종합 점수를 계산합니다.
    ///
    /// 기준일은 마지막 유효 가격 날짜이며, 가격이 없으면 오늘 날짜입니다.
    pub fn score(
        &self,
        card_id: &CardId,
        prices: &[PricePoint],
        metadata: &CardMetadata,
        signals: &ExternalSignals,
    ) -> FullSpeculationScore {
        let as_of = last_valid_date(prices).unwrap_or_else(|| Utc::now().date_naive());
        self.score_as_of(card_id, prices, metadata, signals, as_of)
    }

    /// 기준일을 지정하여 종합 점수를 계산합니다.
    ///
    /// 기준일은 계절성과 빈티지 연식 계산에만 사용됩니다. 메타데이터에 세트 식별자가 없으면
    /// 카드 식별자의 세트 부분(`base1-4` → `base1`)으로 발매 연도를 찾습니다.
    pub fn score_as_of(
        &self,
        card_id: &CardId,
        prices: &[PricePoint],
        metadata: &CardMetadata,
        signals: &ExternalSignals,
        as_of: NaiveDate,
    ) -> FullSpeculationScore {
        let metadata: Cow<'_, CardMetadata> = if metadata.set_id.trim().is_empty() {
            Cow::Owned(metadata.clone().with_set(card_id.set_prefix()))
        } else {
            Cow::Borrowed(metadata)
        };

        let macro_signal = signals.macro_signal.as_ref();
        let correlation =
            macro_signal.and_then(|m| crypto_correlation(prices, &m.bitcoin_prices));
        let population = signals.population.or(metadata.psa_population);

        let volatility = self.volatility.score(prices);
        let growth = self.growth.score(prices, metadata.is_vintage, correlation);
        let scarcity = self.scarcity.score(&metadata, population, as_of);
        let sentiment = self.sentiment.score(signals.sentiment.as_ref(), &metadata);
        let macro_environment = self.macro_scorer.score(macro_signal, correlation, as_of);

        let dimensions = [&volatility, &growth, &scarcity, &sentiment, &macro_environment];
        let weighted_sum: f64 = dimensions.iter().map(|d| d.weighted()).sum();
        let total_score = weighted_sum.round().clamp(0.0, 100.0) as u8;

        let classification = classify(total_score, metadata.is_vintage);

        let degraded_dimensions: Vec<Dimension> = dimensions
            .iter()
            .filter(|d| d.degraded)
            .map(|d| d.dimension)
            .collect();
        let confidence = 1.0
            - degraded_dimensions.len() as f64 / Dimension::ALL.len() as f64 * CONFIDENCE_PENALTY;

        let dominant = dominant_dimension(&dimensions);

        tracing::debug!(
            card_id = %card_id,
            total = total_score,
            rating = %classification.rating,
            degraded = degraded_dimensions.len(),
            "투기 점수 계산 완료"
        );

        let mut score = FullSpeculationScore {
            card_id: card_id.clone(),
            as_of,
            total_score,
            rating: classification.rating,
            recommendation: classification.recommendation,
            volatility,
            growth,
            scarcity,
            sentiment,
            macro_environment,
            confidence,
            degraded_dimensions,
            summary: String::new(),
        };
        score.summary = build_summary(&score, dominant);
        score
    }
}

/// 가중 기여도가 가장 큰 차원 (동점이면 집계 순서상 앞선 차원).
fn dominant_dimension(dimensions: &[&DimensionScore]) -> Dimension {
    dimensions
        .iter()
        .fold(None::<&DimensionScore>, |best, d| match best {
            Some(b) if b.weighted() >= d.weighted() => Some(b),
            _ => Some(*d),
        })
        .map(|d| d.dimension)
        .unwrap_or(Dimension::Volatility)
}

fn build_summary(score: &FullSpeculationScore, dominant: Dimension) -> String {
    let dominant_score = score.dimension(dominant);
    let mut lines = vec![
        format!(
            "종합 투기 점수 {}/100 - {} ({})",
            score.total_score,
            score.rating,
            score.rating.description()
        ),
        format!("추천: {}", score.recommendation),
        format!(
            "주요 요인: {} {:.0}점 (기여 {:.1})",
            dominant.label(),
            dominant_score.score,
            dominant_score.weighted()
        ),
    ];

    if !score.degraded_dimensions.is_empty() {
        let labels: Vec<&str> = score.degraded_dimensions.iter().map(|d| d.label()).collect();
        lines.push(format!(
            "기본값 사용: {} (신뢰도 {:.0}%)",
            labels.join(", "),
            score.confidence * 100.0
        ));
    }

    lines.join("\n")
}

/// 기본 가중치로 종합 점수를 계산합니다.
pub fn compute_full_score(
    card_id: &CardId,
    prices: &[PricePoint],
    metadata: &CardMetadata,
    signals: &ExternalSignals,
) -> FullSpeculationScore {
    SpeculationScorer::default().score(card_id, prices, metadata, signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardrisk_core::{CardRiskError, SpeculationRating};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn flat_series(days: i64) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..days)
            .map(|i| PricePoint::new(start + Duration::days(i), dec!(100)))
            .collect()
    }

    #[test]
    fn test_invalid_weights_fail_at_construction() {
        let weights = DimensionWeights {
            sentiment: 0.2,
            ..Default::default()
        };
        let err = SpeculationScorer::new(weights).unwrap_err();
        assert!(matches!(err, CardRiskError::Config(_)));
        assert!(SpeculationScorer::new(DimensionWeights::default()).is_ok());
    }

    #[test]
    fn test_total_is_rounded_weighted_sum() {
        let metadata = CardMetadata::new("Bulbasaur", "Common").with_set("base1");
        let score = compute_full_score(
            &CardId::new("base1-44"),
            &flat_series(90),
            &metadata,
            &ExternalSignals::none(),
        );

        let sum: f64 = score.dimensions().iter().map(|d| d.weighted()).sum();
        assert_eq!(score.total_score, sum.round() as u8);
        assert_eq!(score.as_of, NaiveDate::from_ymd_opt(2024, 3, 30).unwrap());
    }

    #[test]
    fn test_degraded_dimensions_reduce_confidence() {
        let metadata = CardMetadata::new("Bulbasaur", "Common");
        let score = compute_full_score(
            &CardId::new("x-1"),
            &[],
            &metadata,
            &ExternalSignals::none(),
        );

        // 가격/개체수/비트코인/심리/매크로 모두 없음
        assert_eq!(score.degraded_dimensions, Dimension::ALL.to_vec());
        assert!((score.confidence - 0.5).abs() < 1e-12);
        assert!(score.summary.contains("기본값 사용"));
    }

    #[test]
    fn test_population_signal_overrides_metadata() {
        let metadata = CardMetadata::new("Lugia", "Rare Holo").with_population(20_000);
        let signals = ExternalSignals {
            population: Some(40),
            ..Default::default()
        };
        let score =
            compute_full_score(&CardId::new("neo1-9"), &flat_series(30), &metadata, &signals);
        assert_eq!(score.scarcity.detail("population_score"), Some(100.0));
    }

    #[test]
    fn test_set_falls_back_to_card_id_prefix() {
        let metadata = CardMetadata::new("Charizard", "Rare Holo").vintage(true);
        let score = compute_full_score(
            &CardId::new("base1-4"),
            &flat_series(30),
            &metadata,
            &ExternalSignals::none(),
        );
        assert_eq!(score.scarcity.detail("release_year"), Some(1999.0));

        // 메타데이터의 세트가 우선
        let explicit = metadata.clone().with_set("neo1");
        let score = compute_full_score(
            &CardId::new("base1-4"),
            &flat_series(30),
            &explicit,
            &ExternalSignals::none(),
        );
        assert_eq!(score.scarcity.detail("release_year"), Some(2000.0));
    }

    #[test]
    fn test_summary_names_rating_and_dominant_dimension() {
        let metadata = CardMetadata::new("Charizard", "Rare Holo")
            .with_set("base1")
            .vintage(true)
            .with_population(50);
        let score = compute_full_score(
            &CardId::new("base1-4"),
            &flat_series(90),
            &metadata,
            &ExternalSignals::none(),
        );

        assert!(matches!(
            score.rating,
            SpeculationRating::SolidInvestment | SpeculationRating::Acceptable
        ));
        assert!(score.summary.contains(&score.rating.to_string()));
        assert!(score.summary.contains("희소성"));
    }

    #[test]
    fn test_custom_macro_defaults() {
        let hot = MacroSnapshot {
            crypto_correlation: 0.95,
            fear_greed: 90,
            policy_rate_pct: 0.25,
        };
        let scorer = SpeculationScorer::default().with_macro_defaults(hot);
        let metadata = CardMetadata::new("Pikachu", "Common");
        let base = SpeculationScorer::default().score(
            &CardId::new("a"),
            &flat_series(10),
            &metadata,
            &ExternalSignals::none(),
        );
        let heated = scorer.score(
            &CardId::new("a"),
            &flat_series(10),
            &metadata,
            &ExternalSignals::none(),
        );
        assert!(heated.macro_environment.score > base.macro_environment.score);
    }
}
