//! 외부 신호 스냅샷 (개체수, 심리, 매크로).
//!
//! 각 신호는 선택적입니다. 제공자 호출이 실패하거나 시간 초과되면 `None`이 되고,
//! 해당 차원은 문서화된 기본값으로 대체됩니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PricePoint;

/// 소셜/거래 심리 신호.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    /// 채널별 최근 7일 언급 수 (예: "reddit": 120, "twitter": 340)
    #[serde(default)]
    pub mentions: BTreeMap<String, u32>,
    /// 매수 주문 수
    #[serde(default)]
    pub buy_orders: u32,
    /// 매도 주문 수
    #[serde(default)]
    pub sell_orders: u32,
    /// 검색량 추세 (최근 30일 변동률, %)
    #[serde(default)]
    pub search_trend_pct: Option<f64>,
}

impl SentimentSignal {
    /// 전체 채널 언급 수 합계.
    pub fn total_mentions(&self) -> u64 {
        self.mentions.values().map(|&m| u64::from(m)).sum()
    }
}

/// 거시 환경 신호.
///
/// 없는 필드는 [`MacroSnapshot`] 기본값으로 대체됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroSignal {
    /// 비트코인 일별 가격 (카드 시계열과 날짜로 정렬)
    #[serde(default)]
    pub bitcoin_prices: Vec<PricePoint>,
    /// 공포탐욕지수 (0 ~ 100)
    #[serde(default)]
    pub fear_greed: Option<u8>,
    /// 기준금리 (%)
    #[serde(default)]
    pub policy_rate_pct: Option<f64>,
    /// 외부에서 계산된 크립토 상관계수
    #[serde(default)]
    pub crypto_correlation: Option<f64>,
}

/// 정적 "현재 환경" 매크로 스냅샷.
///
/// 실시간 매크로 데이터가 없을 때 사용합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSnapshot {
    /// 크립토 상관계수
    pub crypto_correlation: f64,
    /// 공포탐욕지수
    pub fear_greed: u8,
    /// 기준금리 (%)
    pub policy_rate_pct: f64,
}

impl MacroSnapshot {
    /// 기본 "현재 환경" 스냅샷.
    pub fn current_environment() -> Self {
        Self {
            crypto_correlation: 0.55,
            fear_greed: 50,
            policy_rate_pct: 4.5,
        }
    }
}

impl Default for MacroSnapshot {
    fn default() -> Self {
        Self::current_environment()
    }
}

/// 한 번의 점수 계산에 사용되는 외부 신호 묶음.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalSignals {
    /// 개체수 제공자 값 (있으면 메타데이터의 PSA 개체수를 대체)
    #[serde(default)]
    pub population: Option<u32>,
    /// 심리 신호
    #[serde(default)]
    pub sentiment: Option<SentimentSignal>,
    /// 매크로 신호
    #[serde(default)]
    pub macro_signal: Option<MacroSignal>,
}

impl ExternalSignals {
    /// 외부 신호가 전혀 없는 상태 (모든 차원 기본값).
    pub fn none() -> Self {
        Self::default()
    }
}
