//! 빠른 점수 계산 명령.

use anyhow::Result;
use std::path::Path;

use cardrisk_analytics::{quick_score_batch, QuickScoreInput, QuickScoreResult};

use super::read_json;

/// JSON 배열 입력의 빠른 점수를 계산합니다.
pub fn quick_scores(input: &Path) -> Result<Vec<QuickScoreResult>> {
    let inputs: Vec<QuickScoreInput> = read_json(input)?;
    let results = quick_score_batch(&inputs);
    tracing::info!(cards = results.len(), "빠른 점수 계산 완료");
    Ok(results)
}

/// 결과 테이블 출력.
pub fn print_table(results: &[QuickScoreResult]) {
    println!("\n{:<24} {:>6}  {:<22}", "카드", "점수", "등급");
    println!("{}", "-".repeat(56));
    for result in results {
        println!(
            "{:<24} {:>6}  {:<22}",
            result.card_id.as_str(),
            result.score,
            result.rating.to_string()
        );
    }
    println!("{}", "-".repeat(56));
    println!("총 {}개 카드\n", results.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_scores_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.json");
        std::fs::write(
            &path,
            r#"[
                {"card_id": "base1-4", "prices": [], "psa_population": 50, "is_vintage": true},
                {"card_id": "sv4-89"}
            ]"#,
        )
        .unwrap();

        let results = quick_scores(&path).unwrap();
        assert_eq!(results.len(), 2);
        // 0.25 × 15 + 0.25 × 10 + 0.2 × 100 + 15 = 41.25
        assert_eq!(results[0].score, 41);
        assert_eq!(results[1].score, 31);
    }
}
