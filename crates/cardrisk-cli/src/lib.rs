//! 카드 투기 점수 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 단일 카드 픽스처 점수 계산
//! - 픽스처 디렉터리 배치 점수 계산 (파일 기반 제공자)
//! - 빠른 점수 계산
//! - 원시 가격 관측값 정제

pub mod commands;
