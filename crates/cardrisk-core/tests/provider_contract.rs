//! 제공자 trait 객체 및 도메인 직렬화 계약 테스트.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::Arc;

use cardrisk_core::{
    CardId, CardMetadata, CardRiskError, MacroProvider, MacroSignal, PriceHistoryProvider,
    PricePoint, ProviderError,
};

struct StaticHistory(Vec<PricePoint>);

#[async_trait]
impl PriceHistoryProvider for StaticHistory {
    async fn fetch_price_history(&self, _card: &CardId) -> Result<Vec<PricePoint>, ProviderError> {
        Ok(self.0.clone())
    }
}

struct Offline;

#[async_trait]
impl MacroProvider for Offline {
    async fn fetch_macro(&self) -> Result<Option<MacroSignal>, ProviderError> {
        Err(ProviderError::Unavailable("macro feed offline".to_string()))
    }
}

#[tokio::test]
async fn providers_are_object_safe() {
    let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let history: Arc<dyn PriceHistoryProvider> =
        Arc::new(StaticHistory(vec![PricePoint::new(day, dec!(42.50))]));
    let points = history
        .fetch_price_history(&CardId::new("base1-4"))
        .await
        .unwrap();
    assert_eq!(points.len(), 1);
    assert!(points[0].is_valid());

    let macro_provider: Arc<dyn MacroProvider> = Arc::new(Offline);
    let err = macro_provider.fetch_macro().await.unwrap_err();
    let wrapped = CardRiskError::provider("macro", err);
    assert!(!wrapped.is_retryable());
    assert!(wrapped.to_string().contains("macro"));
}

#[test]
fn price_points_accept_string_and_number_prices() {
    let points: Vec<PricePoint> = serde_json::from_str(
        r#"[{"date": "2024-02-01", "price": "42.50"}, {"date": "2024-02-02", "price": 43}]"#,
    )
    .unwrap();
    assert_eq!(points[0].price, dec!(42.50));
    assert_eq!(points[1].price, dec!(43));
}

#[test]
fn metadata_fields_default_when_absent() {
    let metadata: CardMetadata =
        serde_json::from_str(r#"{"name": "Lugia", "rarity": "Rare Holo"}"#).unwrap();
    assert_eq!(metadata.psa_population, None);
    assert_eq!(metadata.active_listings, 0);
    assert!(!metadata.is_vintage);
    assert!(!metadata.graded);
}

#[test]
fn card_id_serializes_transparently() {
    let id = CardId::new("neo1-9");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"neo1-9\"");
    let parsed: CardId = serde_json::from_str("\"neo1-9\"").unwrap();
    assert_eq!(parsed, id);
}
