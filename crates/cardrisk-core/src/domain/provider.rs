//! 외부 데이터 제공자 추상화.
//!
//! 점수 엔진은 데이터의 물리적 위치를 알지 못합니다. 호출자는 이 trait들의 구현체를
//! 주입하며, 테스트에서는 가짜 구현체를 사용합니다.
//!
//! - 필수: [`PriceHistoryProvider`], [`MetadataProvider`] (실패 시 해당 카드 점수 계산 실패)
//! - 선택: [`PopulationProvider`], [`SentimentProvider`], [`MacroProvider`]
//!   (실패/시간 초과 시 해당 차원만 기본값으로 대체)

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use super::{CardMetadata, FullSpeculationScore, MacroSignal, PricePoint, SentimentSignal};
use crate::types::CardId;

// =============================================================================
// 에러 타입
// =============================================================================

/// 데이터 제공자 에러.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 시간 초과
    #[error("시간 초과: {0:?}")]
    Timeout(Duration),

    /// 데이터 없음
    #[error("데이터 없음: {0}")]
    NotFound(String),

    /// 제공자 사용 불가
    #[error("제공자 사용 불가: {0}")]
    Unavailable(String),
}

// =============================================================================
// 필수 제공자
// =============================================================================

/// 가격 이력 제공자.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// 카드의 일별 가격 이력 조회. 이력이 없으면 빈 벡터.
    ///
    /// 반환 순서는 보장되지 않아도 됩니다. 서비스가 정제 단계에서 정렬합니다.
    async fn fetch_price_history(&self, card: &CardId) -> Result<Vec<PricePoint>, ProviderError>;
}

/// 카드 메타데이터 제공자.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// 카드 메타데이터 조회.
    ///
    /// # Errors
    ///
    /// - `ProviderError::NotFound`: 알 수 없는 카드
    async fn fetch_metadata(&self, card: &CardId) -> Result<CardMetadata, ProviderError>;
}

// =============================================================================
// 선택 제공자
// =============================================================================

/// PSA 개체수 제공자.
#[async_trait]
pub trait PopulationProvider: Send + Sync {
    /// PSA 10 개체수 조회. 알 수 없으면 `Ok(None)`.
    async fn fetch_population(&self, card: &CardId) -> Result<Option<u32>, ProviderError>;
}

/// 심리 신호 제공자.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// 언급량/주문 신호 조회. 데이터가 없으면 `Ok(None)`.
    async fn fetch_sentiment(
        &self,
        card: &CardId,
        metadata: &CardMetadata,
    ) -> Result<Option<SentimentSignal>, ProviderError>;
}

/// 매크로 신호 제공자.
#[async_trait]
pub trait MacroProvider: Send + Sync {
    /// 비트코인 시계열, 공포탐욕지수, 기준금리 조회. 데이터가 없으면 `Ok(None)`.
    async fn fetch_macro(&self) -> Result<Option<MacroSignal>, ProviderError>;

    /// 특정 카드에만 적용되는 매크로 신호. 있으면 공통 신호 대신 사용합니다.
    async fn fetch_card_macro(
        &self,
        _card: &CardId,
    ) -> Result<Option<MacroSignal>, ProviderError> {
        Ok(None)
    }
}

// =============================================================================
// 점수 저장소
// =============================================================================

/// 계산된 점수 저장소.
///
/// 카드별 독립 upsert입니다. 카드 간 순서나 트랜잭션 묶음은 보장하지 않습니다.
#[async_trait]
pub trait ScoreSink: Send + Sync {
    /// 카드 식별자를 키로 점수를 저장(덮어쓰기)합니다.
    async fn upsert(&self, score: &FullSpeculationScore) -> Result<(), ProviderError>;
}
