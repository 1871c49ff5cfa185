//! 다차원 투기 점수 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 통계 기본 함수 (평균, 표준편차, 변동계수, Pearson 상관계수)
//! - 5개 차원 점수 계산기 (변동성, 성장, 희소성, 심리, 매크로)
//! - 가중 집계 및 등급 분류
//! - 외부 데이터 없이 동작하는 빠른 점수 계산
//! - 가격 시계열 정제 (중복 제거, 이상치 표시, 결측 보간)
//! - 제공자 주입 기반 비동기 점수 서비스 (동시 조회, 타임아웃, 배치)
//!
//! # 예시
//!
//! ```rust,ignore
//! use cardrisk_analytics::{compute_full_score, compute_quick_score};
//! use cardrisk_core::{CardId, CardMetadata, ExternalSignals};
//!
//! let metadata = CardMetadata::new("Charizard", "Rare Holo").with_set("base1").vintage(true);
//! let card = CardId::new("base1-4");
//! let score = compute_full_score(&card, &prices, &metadata, &ExternalSignals::none());
//! println!("{} → {} ({})", score.total_score, score.rating, score.recommendation);
//!
//! let quick = compute_quick_score(&prices, Some(120), true);
//! ```

pub mod aggregator;
pub mod buckets;
pub mod classifier;
pub mod dimensions;
pub mod quick;
pub mod sanitizer;
pub mod service;
pub mod statistics;

// Aggregator re-exports
pub use aggregator::{compute_full_score, SpeculationScorer};

// Classifier re-exports
pub use classifier::{classify, rating_for_total, recommendation_for, Classification};

// Dimension scorer re-exports
pub use dimensions::{
    GrowthScorer, MacroScorer, PumpDumpShape, ScarcityScorer, SentimentScorer, VolatilityScorer,
};

// Quick score re-exports
pub use quick::{compute_quick_score, quick_score_batch, QuickScoreInput, QuickScoreResult};

// Sanitizer re-exports
pub use sanitizer::{
    sanitize_by_card, sanitize_points, sanitize_price_series, RawPriceObservation, SanitizedSeries,
};

// Service re-exports
pub use service::{BatchReport, InMemoryScoreSink, ScoringService, ScoringServiceBuilder};

// Statistics re-exports
pub use statistics::{
    aligned_returns, coefficient_of_variation, mean, pearson_correlation, prices_to_returns,
    std_dev,
};
