//! 단일 카드 점수 계산 명령.

use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;

use cardrisk_analytics::{sanitize_points, SpeculationScorer};
use cardrisk_core::{AppConfig, FullSpeculationScore};

use super::fixture::CardFixture;
use super::read_json;

/// 픽스처 파일의 카드 점수를 계산합니다.
///
/// 가격 이력은 배치 서비스와 같은 방식으로 정제(정렬, 중복 제거, 보간)한 뒤 사용합니다.
/// `as_of`가 주어지면 기준일로 사용하고, 없으면 마지막 가격 날짜를 사용합니다.
pub fn score_fixture(
    input: &Path,
    as_of: Option<NaiveDate>,
    config: &AppConfig,
) -> Result<FullSpeculationScore> {
    let fixture: CardFixture = read_json(input)?;
    let fixture = fixture.validated()?;
    let series = sanitize_points(&fixture.card_id, &fixture.prices);
    let prices = series.price_points(config.scoring.exclude_interpolated);
    let scorer =
        SpeculationScorer::default().with_macro_defaults(config.scoring.macro_defaults.clone());

    let score = match as_of {
        Some(date) => scorer.score_as_of(
            &fixture.card_id,
            &prices,
            &fixture.metadata,
            &fixture.signals,
            date,
        ),
        None => scorer.score(
            &fixture.card_id,
            &prices,
            &fixture.metadata,
            &fixture.signals,
        ),
    };

    tracing::info!(
        card_id = %score.card_id,
        total = score.total_score,
        rating = %score.rating,
        recommendation = %score.recommendation,
        "점수 계산 완료"
    );
    Ok(score)
}

/// 날짜 문자열 파싱 (YYYY-MM-DD).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("잘못된 날짜 형식 '{}': {} (YYYY-MM-DD)", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-11-03").unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 3).unwrap()
        );
        assert!(parse_date("03/11/2024").is_err());
    }

    #[test]
    fn test_score_fixture_with_as_of() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.json");
        std::fs::write(
            &path,
            r#"{
                "card_id": "base1-4",
                "metadata": {"name": "Charizard", "rarity": "Rare Holo", "set_id": "base1", "is_vintage": true},
                "prices": [
                    {"date": "2024-01-01", "price": "300"},
                    {"date": "2024-01-02", "price": "301"},
                    {"date": "2024-01-03", "price": "299"}
                ]
            }"#,
        )
        .unwrap();

        let as_of = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        let score = score_fixture(&path, Some(as_of), &AppConfig::default()).unwrap();
        assert_eq!(score.as_of, as_of);
        assert_eq!(score.macro_environment.detail("seasonal_score"), Some(80.0));

        let score = score_fixture(&path, None, &AppConfig::default()).unwrap();
        assert_eq!(score.as_of, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_unordered_prices_are_sanitized_before_scoring() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, prices: &str| {
            let path = dir.path().join(name);
            let json = format!(
                r#"{{"card_id": "sv4-89", "metadata": {{"name": "Iron Valiant ex"}}, "prices": [{}]}}"#,
                prices
            );
            std::fs::write(&path, json).unwrap();
            path
        };

        let sorted = write(
            "sorted.json",
            r#"{"date": "2024-03-01", "price": "40"},
               {"date": "2024-03-02", "price": "44"},
               {"date": "2024-03-03", "price": "41"}"#,
        );
        // 역순 + 같은 날짜 중복 (뒤의 값이 유지됨)
        let shuffled = write(
            "shuffled.json",
            r#"{"date": "2024-03-03", "price": "41"},
               {"date": "2024-03-02", "price": "99"},
               {"date": "2024-03-01", "price": "40"},
               {"date": "2024-03-02", "price": "44"}"#,
        );

        let config = AppConfig::default();
        let expected = score_fixture(&sorted, None, &config).unwrap();
        let actual = score_fixture(&shuffled, None, &config).unwrap();

        assert_eq!(actual.as_of, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(actual.volatility, expected.volatility);
        assert_eq!(actual.growth, expected.growth);
        assert_eq!(actual.total_score, expected.total_score);
    }

    #[test]
    fn test_blank_card_id_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.json");
        std::fs::write(&path, r#"{"card_id": "", "metadata": {"name": "Ditto"}}"#).unwrap();
        assert!(score_fixture(&path, None, &AppConfig::default()).is_err());
    }
}
