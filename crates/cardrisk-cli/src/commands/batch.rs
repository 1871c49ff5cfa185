//! 픽스처 디렉터리 배치 점수 계산 명령.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;

use cardrisk_analytics::{BatchReport, InMemoryScoreSink, ScoringService};
use cardrisk_core::AppConfig;

use super::fixture::FixtureDirectory;

/// 디렉터리의 모든 카드 픽스처를 비동기 서비스로 점수화합니다.
///
/// 계산된 점수는 메모리 저장소에 upsert되며, 보고서의 `scores`로 반환됩니다.
pub async fn run_batch(
    dir: &Path,
    config: &AppConfig,
    show_progress: bool,
) -> Result<BatchReport> {
    let fixtures = Arc::new(FixtureDirectory::load(dir)?);
    let cards = fixtures.card_ids();
    let sink = Arc::new(InMemoryScoreSink::new());

    let service = ScoringService::builder(fixtures.clone(), fixtures.clone())
        .population(fixtures.clone())
        .sentiment(fixtures.clone())
        .macro_provider(fixtures)
        .sink(sink.clone())
        .config(config)
        .build()
        .context("점수 서비스 생성 실패")?;

    let pb = if show_progress {
        let pb = ProgressBar::new(cards.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let report = service
        .score_batch_with_progress(&cards, |card, _ok| {
            if let Some(pb) = &pb {
                pb.set_message(card.to_string());
                pb.inc(1);
            }
        })
        .await;

    if let Some(pb) = pb {
        pb.finish_with_message(format!("{}/{} 완료", report.success, report.total));
    }

    report.log_summary("batch");
    tracing::debug!(stored = sink.len().await, "저장소 upsert");

    Ok(report)
}
