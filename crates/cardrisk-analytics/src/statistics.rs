//! 통계 기본 함수.
//!
//! 모든 차원 점수 계산기가 공유하는 순수 함수입니다.
//!
//! # 주요 기능
//!
//! - **평균/표준편차**: 모집단 표준편차
//! - **변동계수 (CV)**: 표준편차 / 평균 × 100
//! - **Pearson 상관계수**: 두 수익률 시계열 간 선형 상관관계
//! - **수익률 변환**: 가격 시계열 → 일간 수익률
//!
//! 0으로 나누는 경우는 `None` 또는 0 기여로 명시적으로 처리하며 NaN을 전파하지 않습니다.

use std::collections::BTreeMap;

use cardrisk_core::PricePoint;

/// 산술 평균. 빈 입력이면 `None`.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// 모집단 표준편차. 빈 입력이면 `None`.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// 변동계수 (%).
///
/// 빈 입력이거나 평균이 0 이하이면 `None`.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    if avg <= 0.0 {
        return None;
    }
    let sd = std_dev(values)?;
    Some(sd / avg * 100.0)
}

/// Pearson 상관계수.
///
/// # 반환
///
/// 상관계수 (-1.0 ~ 1.0). 길이 불일치, 2개 미만, 분산 0이면 `None`
/// (호출자가 0 또는 기본값으로 처리).
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // 변동 없음
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    Some(r.clamp(-1.0, 1.0))
}

/// 가격 시계열을 일간 수익률로 변환.
///
/// 이전 가격이 0 이하이면 해당 수익률은 0입니다.
///
/// # 반환
///
/// 일간 수익률 벡터 (길이: prices.len() - 1)
pub fn prices_to_returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < 2 {
        return Vec::new();
    }

    prices
        .windows(2)
        .map(|w| if w[0] <= 0.0 { 0.0 } else { (w[1] - w[0]) / w[0] })
        .collect()
}

/// 두 가격 시계열을 날짜로 맞춘 뒤 각각의 수익률을 계산합니다.
///
/// 양쪽 모두 유효한 가격이 있는 날짜만 사용합니다.
pub fn aligned_returns(a: &[PricePoint], b: &[PricePoint]) -> (Vec<f64>, Vec<f64>) {
    let b_by_date: BTreeMap<_, f64> = b
        .iter()
        .filter(|p| p.is_valid())
        .map(|p| (p.date, p.price_f64()))
        .collect();

    let mut joined: BTreeMap<_, (f64, f64)> = BTreeMap::new();
    for point in a.iter().filter(|p| p.is_valid()) {
        if let Some(&other) = b_by_date.get(&point.date) {
            joined.insert(point.date, (point.price_f64(), other));
        }
    }

    let (left, right): (Vec<f64>, Vec<f64>) = joined.into_values().unzip();
    (prices_to_returns(&left), prices_to_returns(&right))
}

/// 평균 절대값 (일평균 변동폭). 빈 입력이면 0.
pub fn mean_abs(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64
}
