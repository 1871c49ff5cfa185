//! 원시 가격 관측값 정제 명령.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use cardrisk_analytics::{sanitize_by_card, RawPriceObservation, SanitizedSeries};
use cardrisk_core::CardId;

use super::read_json;

/// 원시 관측값 파일을 카드별로 정제합니다.
pub fn sanitize_file(input: &Path) -> Result<BTreeMap<CardId, SanitizedSeries>> {
    let raw: Vec<RawPriceObservation> = read_json(input)?;
    let cleaned = sanitize_by_card(&raw);

    for series in cleaned.values() {
        tracing::info!(
            card_id = %series.card_id,
            points = series.len(),
            dropped_invalid = series.dropped_invalid,
            duplicates_removed = series.duplicates_removed,
            outliers = series.outlier_count(),
            interpolated = series.interpolated_count(),
            unfilled_gaps = series.unfilled_gaps,
            "정제 완료"
        );
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.json");
        std::fs::write(
            &path,
            r#"[
                {"card_id": "a", "date": "2024-01-01", "price": "100"},
                {"card_id": "a", "date": "2024-01-06", "price": "150"},
                {"card_id": "a", "date": "2024-01-06", "price": "155", "recorded_at": "2024-01-06T12:00:00Z"},
                {"card_id": "b", "date": "2024-01-01", "price": null}
            ]"#,
        )
        .unwrap();

        let cleaned = sanitize_file(&path).unwrap();
        let a = &cleaned[&CardId::new("a")];
        assert_eq!(a.len(), 6);
        assert_eq!(a.duplicates_removed, 1);
        assert_eq!(a.interpolated_count(), 4);

        let b = &cleaned[&CardId::new("b")];
        assert!(b.is_empty());
        assert_eq!(b.dropped_invalid, 1);
    }
}
