//! 5개 차원 점수 계산기.
//!
//! 각 계산기는 입력의 일부만 사용하여 0 ~ 100 점수와 진단용 하위 지표를 생성합니다.
//! 데이터가 부족하거나 외부 신호가 없으면 에러 대신 정해진 기본값을 사용하고,
//! `details`에 표시합니다.

mod growth;
mod macro_env;
mod scarcity;
mod sentiment;
mod set_catalog;
mod volatility;

pub use growth::{benchmark_pct, GrowthScorer, PumpDumpShape};
pub use macro_env::MacroScorer;
pub use scarcity::ScarcityScorer;
pub use sentiment::SentimentScorer;
pub use set_catalog::release_year;
pub use volatility::VolatilityScorer;

use std::collections::BTreeMap;

use cardrisk_core::PricePoint;

use crate::statistics::{aligned_returns, pearson_correlation};

/// 크립토 상관계수 계산에 필요한 최소 정렬 수익률 수.
pub const MIN_ALIGNED_RETURNS: usize = 3;

/// 카드 가격과 비트코인 가격의 일간 수익률 상관계수.
///
/// 비트코인 시계열이 없거나 날짜가 맞는 수익률이 부족하면 `None`.
pub fn crypto_correlation(prices: &[PricePoint], bitcoin: &[PricePoint]) -> Option<f64> {
    if bitcoin.is_empty() {
        return None;
    }
    let (card_returns, btc_returns) = aligned_returns(prices, bitcoin);
    if card_returns.len() < MIN_ALIGNED_RETURNS {
        return None;
    }
    pearson_correlation(&card_returns, &btc_returns)
}

/// bool 플래그를 상세 값(0/1)으로 변환.
pub(crate) fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// (이름, 값) 목록으로 상세 맵 생성.
pub(crate) fn details<const N: usize>(entries: [(&str, f64); N]) -> BTreeMap<String, f64> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
