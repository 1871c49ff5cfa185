//! 가격 계산을 위한 Decimal 유틸리티.
//!
//! 가격은 `Decimal`로 보관하고, 통계 계산 직전에 `f64`로 변환합니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// 카드 가격 타입.
pub type Price = Decimal;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 양수인지 확인합니다.
    fn is_positive_price(&self) -> bool;

    /// 통계 계산용 `f64`로 변환합니다. 표현할 수 없으면 0.0.
    fn to_f64_lossy(&self) -> f64;

    /// 지정된 소수점 자릿수로 반올림합니다.
    fn round_price(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn is_positive_price(&self) -> bool {
        *self > Decimal::ZERO
    }

    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }

    fn round_price(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }
}
