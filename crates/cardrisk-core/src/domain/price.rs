//! 가격 시계열 타입.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{DecimalExt, Price};

/// 일별 가격 관측값.
///
/// 카드별 시계열은 날짜 오름차순입니다. 0 이하 가격은 결측으로 취급합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 관측 날짜
    pub date: NaiveDate,
    /// 가격
    pub price: Price,
}

impl PricePoint {
    /// 새 가격 포인트를 생성합니다.
    pub fn new(date: NaiveDate, price: Decimal) -> Self {
        Self { date, price }
    }

    /// 점수 계산에 사용할 수 있는 가격인지 확인합니다.
    pub fn is_valid(&self) -> bool {
        self.price.is_positive_price()
    }

    /// 통계 계산용 `f64` 가격.
    pub fn price_f64(&self) -> f64 {
        self.price.to_f64_lossy()
    }
}

/// 유효한(양수) 가격 포인트만 남깁니다. 순서는 유지됩니다.
pub fn valid_points(points: &[PricePoint]) -> Vec<&PricePoint> {
    points.iter().filter(|p| p.is_valid()).collect()
}

/// 유효한 가격을 `f64` 벡터로 추출합니다.
pub fn valid_prices(points: &[PricePoint]) -> Vec<f64> {
    points
        .iter()
        .filter(|p| p.is_valid())
        .map(PricePoint::price_f64)
        .collect()
}

/// 마지막 유효 관측 날짜.
pub fn last_valid_date(points: &[PricePoint]) -> Option<NaiveDate> {
    points.iter().rev().find(|p| p.is_valid()).map(|p| p.date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_invalid_prices_are_skipped() {
        let points = vec![
            PricePoint::new(day(1), dec!(10)),
            PricePoint::new(day(2), Decimal::ZERO),
            PricePoint::new(day(3), dec!(12)),
            PricePoint::new(day(4), dec!(-1)),
        ];

        assert_eq!(valid_prices(&points), vec![10.0, 12.0]);
        assert_eq!(valid_points(&points).len(), 2);
        assert_eq!(last_valid_date(&points), Some(day(3)));
        assert_eq!(last_valid_date(&[]), None);
    }
}
