//! # CardRisk Core
//!
//! 트레이딩 카드 투기 점수 엔진의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 점수 엔진 전반에서 사용되는 기본 타입을 제공합니다:
//! - 가격 시계열 및 카드 메타데이터
//! - 차원별 점수와 종합 투기 점수
//! - 외부 신호 스냅샷 (심리, 매크로)
//! - 외부 데이터 제공자 trait
//! - 설정 관리
//! - 로깅 인프라
//!
//! 점수 계산 로직은 `cardrisk-analytics`에 있습니다.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
