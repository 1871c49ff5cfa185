//! 점수 엔진의 에러 타입.
//!
//! 데이터 부족은 에러가 아닙니다. 각 하위 지표가 정의된 기본값으로 대체합니다.
//! 이 모듈의 에러는 설정 오류, 필수 입력 누락, 필수 제공자 실패에만 사용됩니다.

use thiserror::Error;

use crate::domain::ProviderError;

/// 점수 엔진 에러.
#[derive(Debug, Error)]
pub enum CardRiskError {
    /// 설정 에러 (가중치 합계 불일치 등). 생성 시점에 즉시 실패합니다.
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 필수 제공자(가격 이력, 메타데이터) 실패
    #[error("제공자 에러 ({provider}): {source}")]
    Provider {
        provider: &'static str,
        #[source]
        source: ProviderError,
    },

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 점수 엔진 작업을 위한 Result 타입.
pub type CardRiskResult<T> = Result<T, CardRiskError>;

impl CardRiskError {
    /// 필수 제공자 에러를 감쌉니다.
    pub fn provider(provider: &'static str, source: ProviderError) -> Self {
        Self::Provider { provider, source }
    }

    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CardRiskError::Provider {
                source: ProviderError::Network(_) | ProviderError::Timeout(_),
                ..
            }
        )
    }
}

impl From<serde_json::Error> for CardRiskError {
    fn from(err: serde_json::Error) -> Self {
        CardRiskError::Serialization(err.to_string())
    }
}
