//! 카드 메타데이터.

use serde::{Deserialize, Serialize};

/// 점수 계산 시점의 카드 메타데이터 스냅샷.
///
/// 불변 입력이며 엔진 내부에서 저장되지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMetadata {
    /// 카드 이름 (예: "Charizard", "Umbreon Gold Star")
    pub name: String,
    /// 레어도 라벨 (자유 텍스트, 예: "Rare Holo")
    #[serde(default)]
    pub rarity: String,
    /// 세트 식별자 (예: "base1", "sv3pt5")
    #[serde(default)]
    pub set_id: String,
    /// 빈티지 여부
    #[serde(default)]
    pub is_vintage: bool,
    /// PSA 10 등급 개체수
    #[serde(default)]
    pub psa_population: Option<u32>,
    /// 현재 판매 중인 리스팅 수
    #[serde(default)]
    pub active_listings: u32,
    /// 최근 30일 판매 완료 리스팅 수
    #[serde(default)]
    pub sold_listings_30d: u32,
    /// 등급 카드 여부 (PSA/BGS 슬랩)
    #[serde(default)]
    pub graded: bool,
}

impl CardMetadata {
    /// 이름과 레어도로 메타데이터를 생성합니다.
    pub fn new(name: impl Into<String>, rarity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rarity: rarity.into(),
            ..Default::default()
        }
    }

    /// 세트 식별자를 설정합니다.
    pub fn with_set(mut self, set_id: impl Into<String>) -> Self {
        self.set_id = set_id.into();
        self
    }

    /// 빈티지 여부를 설정합니다.
    pub fn vintage(mut self, is_vintage: bool) -> Self {
        self.is_vintage = is_vintage;
        self
    }

    /// PSA 10 개체수를 설정합니다.
    pub fn with_population(mut self, population: u32) -> Self {
        self.psa_population = Some(population);
        self
    }

    /// 리스팅 수를 설정합니다.
    pub fn with_listings(mut self, active: u32, sold_30d: u32) -> Self {
        self.active_listings = active;
        self.sold_listings_30d = sold_30d;
        self
    }
}
