//! 차원별 점수와 종합 투기 점수.
//!
//! # 5개 차원 (가중치 합계 = 1.0)
//!
//! 1. **Volatility**: 0.25 - 변동계수, 고저 비율, 가속도
//! 2. **Growth**: 0.25 - 초과 수익률, 펌프앤덤프 비대칭, 비트코인 상관관계
//! 3. **Scarcity**: 0.20 - 레어도, PSA 개체수, 수급, 빈티지 보너스
//! 4. **Sentiment**: 0.15 - 소셜 언급량, 매수/매도 불균형, 검색 과열도
//! 5. **Macro**: 0.15 - 크립토 상관관계, 공포탐욕지수, 기준금리, 계절성

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CardRiskError, CardRiskResult};
use crate::types::CardId;

/// 가중치 합계 허용 오차.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// 점수 차원.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// 가격 변동성
    Volatility,
    /// 성장/수익률 패턴
    Growth,
    /// 희소성
    Scarcity,
    /// 시장 심리
    Sentiment,
    /// 거시 환경
    Macro,
}

impl Dimension {
    /// 모든 차원 (집계 순서).
    pub const ALL: [Dimension; 5] = [
        Dimension::Volatility,
        Dimension::Growth,
        Dimension::Scarcity,
        Dimension::Sentiment,
        Dimension::Macro,
    ];

    /// 기본 가중치.
    pub fn default_weight(self) -> f64 {
        match self {
            Self::Volatility => 0.25,
            Self::Growth => 0.25,
            Self::Scarcity => 0.20,
            Self::Sentiment => 0.15,
            Self::Macro => 0.15,
        }
    }

    /// 한글 라벨 (요약 문구용).
    pub fn label(self) -> &'static str {
        match self {
            Self::Volatility => "변동성",
            Self::Growth => "성장",
            Self::Scarcity => "희소성",
            Self::Sentiment => "심리",
            Self::Macro => "매크로",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Volatility => "volatility",
            Self::Growth => "growth",
            Self::Scarcity => "scarcity",
            Self::Sentiment => "sentiment",
            Self::Macro => "macro",
        };
        write!(f, "{}", s)
    }
}

/// 차원 가중치.
///
/// 생성 시 [`DimensionWeights::validate`]로 검증합니다. 잘못된 가중치는
/// 호출마다가 아니라 점수 계산기 생성 시점에 실패해야 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub volatility: f64,
    pub growth: f64,
    pub scarcity: f64,
    pub sentiment: f64,
    pub macro_environment: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            volatility: Dimension::Volatility.default_weight(),
            growth: Dimension::Growth.default_weight(),
            scarcity: Dimension::Scarcity.default_weight(),
            sentiment: Dimension::Sentiment.default_weight(),
            macro_environment: Dimension::Macro.default_weight(),
        }
    }
}

impl DimensionWeights {
    /// 차원별 가중치.
    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Volatility => self.volatility,
            Dimension::Growth => self.growth,
            Dimension::Scarcity => self.scarcity,
            Dimension::Sentiment => self.sentiment,
            Dimension::Macro => self.macro_environment,
        }
    }

    /// 가중치 합계.
    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.weight(*d)).sum()
    }

    /// 가중치 검증 (음수/비유한 값 금지, 합계 1.0).
    pub fn validate(&self) -> CardRiskResult<()> {
        for dimension in Dimension::ALL {
            let w = self.weight(dimension);
            if !w.is_finite() || w < 0.0 {
                return Err(CardRiskError::Config(format!(
                    "{} 가중치가 유효하지 않음: {}",
                    dimension, w
                )));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(CardRiskError::Config(format!(
                "가중치 합계가 1.0이 아님: {:.6}",
                sum
            )));
        }

        Ok(())
    }
}

/// 단일 차원 점수.
///
/// 점수 계산마다 새로 생성되며 생성 후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    /// 차원
    pub dimension: Dimension,
    /// 점수 (0 ~ 100)
    pub score: f64,
    /// 가중치
    pub weight: f64,
    /// 하위 지표 값 (예: "cv": 3.2, "cv_score": 40.0)
    pub details: BTreeMap<String, f64>,
    /// 외부 데이터 부재로 기본값이 사용되었는지 여부
    pub degraded: bool,
}

impl DimensionScore {
    /// 새 차원 점수를 생성합니다. 점수는 0 ~ 100으로 제한됩니다.
    pub fn new(
        dimension: Dimension,
        score: f64,
        weight: f64,
        details: BTreeMap<String, f64>,
    ) -> Self {
        let score = if score.is_finite() {
            score.clamp(0.0, 100.0)
        } else {
            0.0
        };
        // JSON에 null이 섞이지 않도록 유한하지 않은 하위 지표는 0으로 대체
        let mut details = details;
        for value in details.values_mut() {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
        Self {
            dimension,
            score,
            weight,
            details,
            degraded: false,
        }
    }

    /// 기본값 대체 여부를 표시합니다.
    pub fn with_degraded(mut self, degraded: bool) -> Self {
        self.degraded = degraded;
        self
    }

    /// 가중 기여도 (score × weight).
    pub fn weighted(&self) -> f64 {
        self.score * self.weight
    }

    /// 하위 지표 조회.
    pub fn detail(&self, key: &str) -> Option<f64> {
        self.details.get(key).copied()
    }
}

/// 투기 등급.
///
/// | 범위 | 등급 |
/// |---|---|
/// | < 20 | solid_investment |
/// | 20 ~ 39 | acceptable |
/// | 40 ~ 59 | moderate_speculation |
/// | 60 ~ 79 | high_speculation |
/// | ≥ 80 | mania |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeculationRating {
    /// 견실한 투자 대상
    SolidInvestment,
    /// 수용 가능
    Acceptable,
    /// 보통 수준의 투기
    ModerateSpeculation,
    /// 높은 투기
    HighSpeculation,
    /// 과열 (매니아)
    Mania,
}

impl SpeculationRating {
    /// 설명 문자열.
    pub fn description(self) -> &'static str {
        match self {
            Self::SolidInvestment => "견실한 투자 (가격 안정, 희소성 기반)",
            Self::Acceptable => "수용 가능 (일부 투기 신호)",
            Self::ModerateSpeculation => "보통 투기 (변동성/과열 신호 혼재)",
            Self::HighSpeculation => "높은 투기 (급등락 패턴)",
            Self::Mania => "과열 (펌프앤덤프 위험)",
        }
    }
}

impl fmt::Display for SpeculationRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SolidInvestment => "solid_investment",
            Self::Acceptable => "acceptable",
            Self::ModerateSpeculation => "moderate_speculation",
            Self::HighSpeculation => "high_speculation",
            Self::Mania => "mania",
        };
        write!(f, "{}", s)
    }
}

/// 매매 추천.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Buy,
    Hold,
    Sell,
    Avoid,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
            Self::Avoid => "AVOID",
        };
        write!(f, "{}", s)
    }
}

/// 종합 투기 점수.
///
/// 입력 (가격 시계열, 메타데이터, 외부 신호)에서 요청 시 계산되며 별도의 식별자가 없습니다.
/// 동일 입력에 대해 재계산 결과는 동일합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullSpeculationScore {
    /// 카드 식별자
    pub card_id: CardId,
    /// 점수 기준일 (계절성 및 빈티지 연식 계산 기준)
    pub as_of: NaiveDate,
    /// 종합 점수 (0 ~ 100)
    pub total_score: u8,
    /// 등급
    pub rating: SpeculationRating,
    /// 추천
    pub recommendation: Recommendation,
    /// 변동성 차원
    pub volatility: DimensionScore,
    /// 성장 차원
    pub growth: DimensionScore,
    /// 희소성 차원
    pub scarcity: DimensionScore,
    /// 심리 차원
    pub sentiment: DimensionScore,
    /// 매크로 차원
    pub macro_environment: DimensionScore,
    /// 신뢰도 (0.5 ~ 1.0, 기본값 대체 차원이 많을수록 낮음)
    pub confidence: f64,
    /// 기본값으로 대체된 차원 목록
    pub degraded_dimensions: Vec<Dimension>,
    /// 요약 문구
    pub summary: String,
}

impl FullSpeculationScore {
    /// 5개 차원 점수 (집계 순서).
    pub fn dimensions(&self) -> [&DimensionScore; 5] {
        [
            &self.volatility,
            &self.growth,
            &self.scarcity,
            &self.sentiment,
            &self.macro_environment,
        ]
    }

    /// 차원별 점수 조회.
    pub fn dimension(&self, dimension: Dimension) -> &DimensionScore {
        match dimension {
            Dimension::Volatility => &self.volatility,
            Dimension::Growth => &self.growth,
            Dimension::Scarcity => &self.scarcity,
            Dimension::Sentiment => &self.sentiment,
            Dimension::Macro => &self.macro_environment,
        }
    }

    /// 일부 차원이 기본값으로 대체되었는지 여부.
    pub fn is_degraded(&self) -> bool {
        !self.degraded_dimensions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = DimensionWeights::default();
        assert!((weights.sum() - 1.0).abs() < WEIGHT_TOLERANCE);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_invalid_weights_fail() {
        let weights = DimensionWeights {
            volatility: 0.30,
            ..Default::default()
        };
        let err = weights.validate().unwrap_err();
        assert!(matches!(err, CardRiskError::Config(_)));

        let negative = DimensionWeights {
            volatility: -0.25,
            growth: 0.75,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_dimension_score_is_clamped() {
        let high = DimensionScore::new(Dimension::Growth, 140.0, 0.25, BTreeMap::new());
        assert_eq!(high.score, 100.0);

        let nan = DimensionScore::new(Dimension::Growth, f64::NAN, 0.25, BTreeMap::new());
        assert_eq!(nan.score, 0.0);
        assert!((high.weighted() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_details_are_zeroed() {
        let details = BTreeMap::from([
            ("ratio".to_string(), f64::INFINITY),
            ("gap".to_string(), f64::NAN),
            ("cv".to_string(), 3.5),
        ]);
        let score = DimensionScore::new(Dimension::Volatility, 40.0, 0.25, details);
        assert_eq!(score.detail("ratio"), Some(0.0));
        assert_eq!(score.detail("gap"), Some(0.0));
        assert_eq!(score.detail("cv"), Some(3.5));

        let json = serde_json::to_string(&score).unwrap();
        let back: DimensionScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, score);
    }

    #[test]
    fn test_rating_serde_labels() {
        let json = serde_json::to_string(&SpeculationRating::HighSpeculation).unwrap();
        assert_eq!(json, "\"high_speculation\"");
        assert_eq!(SpeculationRating::Mania.to_string(), "mania");

        let json = serde_json::to_string(&Recommendation::Avoid).unwrap();
        assert_eq!(json, "\"AVOID\"");
    }

    proptest! {
        #[test]
        fn prop_rescaled_weights_validate(
            a in 0.01f64..1.0,
            b in 0.01f64..1.0,
            c in 0.01f64..1.0,
            d in 0.01f64..1.0,
            e in 0.01f64..1.0,
        ) {
            let total = a + b + c + d + e;
            let weights = DimensionWeights {
                volatility: a / total,
                growth: b / total,
                scarcity: c / total,
                sentiment: d / total,
                macro_environment: e / total,
            };
            prop_assert!(weights.validate().is_ok());
        }
    }
}
