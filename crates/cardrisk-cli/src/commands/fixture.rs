//! 파일 기반 카드 픽스처와 제공자.
//!
//! 디렉터리 구조:
//!
//! ```text
//! fixtures/
//! ├── base1-4.json     # CardFixture (카드당 1개)
//! ├── sv4-89.json
//! └── macro.json       # MacroSignal (선택)
//! ```
//!
//! 카드 픽스처의 `signals.macro_signal`이 있으면 `macro.json`보다 우선합니다.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use cardrisk_core::{
    CardId, CardMetadata, CardRiskResult, ExternalSignals, MacroProvider, MacroSignal,
    MetadataProvider, PopulationProvider, PriceHistoryProvider, PricePoint, ProviderError,
    SentimentProvider, SentimentSignal,
};

use super::read_json;

/// 매크로 신호 파일 이름.
pub const MACRO_FILE: &str = "macro.json";

/// 단일 카드 픽스처.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardFixture {
    /// 카드 식별자
    pub card_id: CardId,
    /// 메타데이터
    pub metadata: CardMetadata,
    /// 가격 이력
    #[serde(default)]
    pub prices: Vec<PricePoint>,
    /// 외부 신호 (개체수/심리/매크로)
    #[serde(default)]
    pub signals: ExternalSignals,
}

impl CardFixture {
    /// 카드 식별자를 정규화하고 검증합니다.
    ///
    /// # Errors
    ///
    /// 식별자가 비어 있으면 `CardRiskError::InvalidInput`.
    pub fn validated(mut self) -> CardRiskResult<Self> {
        self.card_id = CardId::parse(self.card_id.as_str())?;
        Ok(self)
    }
}

/// 픽스처 디렉터리를 제공자로 노출합니다.
#[derive(Debug, Default)]
pub struct FixtureDirectory {
    cards: BTreeMap<CardId, CardFixture>,
    macro_signal: Option<MacroSignal>,
}

impl FixtureDirectory {
    /// 디렉터리의 모든 `*.json` 픽스처를 로드합니다.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut directory = Self::default();

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("디렉터리 읽기 실패: {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            if path.file_name().and_then(|n| n.to_str()) == Some(MACRO_FILE) {
                directory.macro_signal = Some(read_json(&path)?);
                continue;
            }

            let fixture: CardFixture = read_json(&path)?;
            let fixture = fixture
                .validated()
                .with_context(|| format!("잘못된 픽스처: {}", path.display()))?;
            directory.cards.insert(fixture.card_id.clone(), fixture);
        }

        tracing::info!(
            dir = %dir.display(),
            cards = directory.cards.len(),
            has_macro = directory.macro_signal.is_some(),
            "픽스처 로드"
        );
        Ok(directory)
    }

    /// 카드 식별자 목록 (정렬됨).
    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.keys().cloned().collect()
    }

    fn card(&self, card: &CardId) -> Result<&CardFixture, ProviderError> {
        self.cards
            .get(card)
            .ok_or_else(|| ProviderError::NotFound(card.to_string()))
    }
}

#[async_trait]
impl PriceHistoryProvider for FixtureDirectory {
    async fn fetch_price_history(&self, card: &CardId) -> Result<Vec<PricePoint>, ProviderError> {
        Ok(self.card(card)?.prices.clone())
    }
}

#[async_trait]
impl MetadataProvider for FixtureDirectory {
    async fn fetch_metadata(&self, card: &CardId) -> Result<CardMetadata, ProviderError> {
        Ok(self.card(card)?.metadata.clone())
    }
}

#[async_trait]
impl PopulationProvider for FixtureDirectory {
    async fn fetch_population(&self, card: &CardId) -> Result<Option<u32>, ProviderError> {
        Ok(self.card(card)?.signals.population)
    }
}

#[async_trait]
impl SentimentProvider for FixtureDirectory {
    async fn fetch_sentiment(
        &self,
        card: &CardId,
        _metadata: &CardMetadata,
    ) -> Result<Option<SentimentSignal>, ProviderError> {
        Ok(self.card(card)?.signals.sentiment.clone())
    }
}

#[async_trait]
impl MacroProvider for FixtureDirectory {
    async fn fetch_macro(&self) -> Result<Option<MacroSignal>, ProviderError> {
        Ok(self.macro_signal.clone())
    }

    async fn fetch_card_macro(
        &self,
        card: &CardId,
    ) -> Result<Option<MacroSignal>, ProviderError> {
        Ok(self.card(card)?.signals.macro_signal.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_skips_non_json_and_reads_macro() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base1-4.json"),
            r#"{"card_id": "base1-4", "metadata": {"name": "Charizard", "rarity": "Rare Holo"}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("macro.json"), r#"{"fear_greed": 70}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let directory = FixtureDirectory::load(dir.path()).unwrap();
        assert_eq!(directory.card_ids(), vec![CardId::new("base1-4")]);
        assert_eq!(directory.macro_signal.unwrap().fear_greed, Some(70));
    }

    #[test]
    fn test_blank_card_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("blank.json"),
            r#"{"card_id": "  ", "metadata": {"name": "Ditto"}}"#,
        )
        .unwrap();

        let err = FixtureDirectory::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("blank.json"));
        assert!(err
            .chain()
            .any(|cause| cause.to_string().contains("빈 카드 식별자")));
    }

    #[test]
    fn test_card_id_is_trimmed() {
        let json = r#"{"card_id": " sv4-89 ", "metadata": {"name": "Iron Valiant"}}"#;
        let fixture: CardFixture = serde_json::from_str(json).unwrap();
        assert_eq!(fixture.validated().unwrap().card_id.as_str(), "sv4-89");
    }

    #[tokio::test]
    async fn test_card_macro_comes_from_fixture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a-1.json"),
            r#"{"card_id": "a-1", "metadata": {"name": "A"}, "signals": {"macro_signal": {"fear_greed": 90}}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b-2.json"),
            r#"{"card_id": "b-2", "metadata": {"name": "B"}}"#,
        )
        .unwrap();

        let directory = FixtureDirectory::load(dir.path()).unwrap();
        let own = directory.fetch_card_macro(&CardId::new("a-1")).await.unwrap();
        assert_eq!(own.unwrap().fear_greed, Some(90));
        assert!(directory
            .fetch_card_macro(&CardId::new("b-2"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_card_is_not_found() {
        let directory = FixtureDirectory::default();
        let err = directory
            .fetch_metadata(&CardId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotFound(_)));
    }
}
