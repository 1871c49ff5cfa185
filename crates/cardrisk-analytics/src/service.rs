//! 비동기 점수 서비스.
//!
//! 주입된 제공자에서 데이터를 조회하여 점수를 계산합니다.
//!
//! # 흐름
//!
//! 1. 가격 이력 + 메타데이터 조회 (필수, 실패 시 해당 카드 에러)
//! 2. 가격 시계열 정제
//! 3. 개체수/심리/매크로 동시 조회 (`tokio::join!`, 호출별 타임아웃)
//!    - 실패/시간 초과 → `None` + `warn` 로그, 해당 차원만 기본값
//! 4. 점수 계산
//!
//! 배치 모드는 매크로 신호를 한 번만 조회하여 공유하고, 카드별 계산을
//! `buffer_unordered`로 병렬 실행합니다. 점수 저장소가 있으면 카드별로 독립 upsert합니다.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn, Instrument};

use cardrisk_core::{
    scoring_span, AppConfig, CardId, CardMetadata, CardRiskError, CardRiskResult,
    DimensionWeights, ExternalSignals, FullSpeculationScore, MacroProvider, MacroSignal,
    MacroSnapshot, MetadataProvider, PopulationProvider, PriceHistoryProvider, ProviderError,
    ScoreSink, SentimentProvider, SentimentSignal,
};

use crate::aggregator::SpeculationScorer;
use crate::sanitizer::sanitize_points;

const PRICE_HISTORY: &str = "price_history";
const METADATA: &str = "metadata";
const POPULATION: &str = "population";
const SENTIMENT: &str = "sentiment";
const MACRO: &str = "macro";

/// 배치 매크로 조회 로그용 식별자.
const BATCH_SCOPE: &str = "*";

/// 점수 서비스.
pub struct ScoringService {
    scorer: SpeculationScorer,
    price_history: Arc<dyn PriceHistoryProvider>,
    metadata: Arc<dyn MetadataProvider>,
    population: Option<Arc<dyn PopulationProvider>>,
    sentiment: Option<Arc<dyn SentimentProvider>>,
    macro_provider: Option<Arc<dyn MacroProvider>>,
    sink: Option<Arc<dyn ScoreSink>>,
    timeout: Duration,
    concurrency: usize,
    exclude_interpolated: bool,
}

/// 매크로 신호 출처.
enum MacroSource<'a> {
    /// 카드마다 조회
    Fetch,
    /// 배치에서 한 번 조회한 값 공유
    Shared(&'a Option<MacroSignal>),
}

impl ScoringService {
    /// 필수 제공자로 빌더를 생성합니다.
    pub fn builder(
        price_history: Arc<dyn PriceHistoryProvider>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> ScoringServiceBuilder {
        ScoringServiceBuilder::new(price_history, metadata)
    }

    /// 선택 제공자 호출 타임아웃.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 배치 동시성.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 단일 카드 점수를 계산합니다.
    ///
    /// # Errors
    ///
    /// 가격 이력 또는 메타데이터 제공자 실패 시 `CardRiskError::Provider`.
    /// 선택 제공자 실패는 에러가 아니며 해당 차원이 기본값으로 대체됩니다.
    pub async fn score_card(&self, card: &CardId) -> CardRiskResult<FullSpeculationScore> {
        self.score_with(card, MacroSource::Fetch)
            .instrument(scoring_span!("score_card", card))
            .await
    }

    /// 여러 카드의 점수를 계산합니다.
    pub async fn score_batch(&self, cards: &[CardId]) -> BatchReport {
        self.score_batch_with_progress(cards, |_, _| {}).await
    }

    /// 여러 카드의 점수를 계산하며 카드 하나가 끝날 때마다 `on_progress`를 호출합니다.
    ///
    /// 카드 간 순서는 보장되지 않습니다. 결과 목록은 카드 식별자 순으로 정렬됩니다.
    pub async fn score_batch_with_progress<F>(
        &self,
        cards: &[CardId],
        mut on_progress: F,
    ) -> BatchReport
    where
        F: FnMut(&CardId, bool),
    {
        let started = Instant::now();
        let mut report = BatchReport {
            total: cards.len(),
            ..Default::default()
        };

        let shared_macro = self.fetch_macro(BATCH_SCOPE).await;

        let mut results = stream::iter(cards)
            .map(|card| self.score_and_store(card, &shared_macro))
            .buffer_unordered(self.concurrency);

        while let Some((card, outcome)) = results.next().await {
            match outcome {
                Ok((score, sink_error)) => {
                    report.success += 1;
                    if score.is_degraded() {
                        report.degraded += 1;
                    }
                    if let Some(e) = sink_error {
                        report.sink_errors += 1;
                        report.failures.push((card.clone(), e.to_string()));
                    }
                    report.scores.push(score);
                    on_progress(card, true);
                }
                Err(e) => {
                    warn!(
                        card_id = %card,
                        error = %e,
                        retryable = e.is_retryable(),
                        "카드 점수 계산 실패"
                    );
                    report.errors += 1;
                    report.failures.push((card.clone(), e.to_string()));
                    on_progress(card, false);
                }
            }
        }

        report.scores.sort_by(|a, b| a.card_id.cmp(&b.card_id));
        report.failures.sort_by(|a, b| a.0.cmp(&b.0));
        report.elapsed = started.elapsed();
        report
    }

    async fn score_and_store<'a>(
        &self,
        card: &'a CardId,
        shared_macro: &Option<MacroSignal>,
    ) -> (
        &'a CardId,
        CardRiskResult<(FullSpeculationScore, Option<ProviderError>)>,
    ) {
        let scored = self
            .score_with(card, MacroSource::Shared(shared_macro))
            .instrument(scoring_span!("score_batch_item", card))
            .await;

        let outcome = match scored {
            Ok(score) => {
                let sink_error = match &self.sink {
                    Some(sink) => sink.upsert(&score).await.err(),
                    None => None,
                };
                if let Some(e) = &sink_error {
                    warn!(card_id = %card, error = %e, "점수 저장 실패");
                }
                Ok((score, sink_error))
            }
            Err(e) => Err(e),
        };
        (card, outcome)
    }

    async fn score_with(
        &self,
        card: &CardId,
        macro_source: MacroSource<'_>,
    ) -> CardRiskResult<FullSpeculationScore> {
        let (history, metadata) = tokio::try_join!(
            self.fetch_required(PRICE_HISTORY, self.price_history.fetch_price_history(card)),
            self.fetch_required(METADATA, self.metadata.fetch_metadata(card)),
        )?;

        let series = sanitize_points(card, &history);
        let prices = series.price_points(self.exclude_interpolated);

        let macro_future = async move {
            if let Some(signal) = self.fetch_card_macro(card).await {
                return Some(signal);
            }
            match macro_source {
                MacroSource::Fetch => self.fetch_macro(card.as_str()).await,
                MacroSource::Shared(signal) => signal.clone(),
            }
        };

        let (population, sentiment, macro_signal) = tokio::join!(
            self.fetch_population(card),
            self.fetch_sentiment(card, &metadata),
            macro_future,
        );

        let signals = ExternalSignals {
            population,
            sentiment,
            macro_signal,
        };

        let score = self.scorer.score(card, &prices, &metadata, &signals);
        debug!(
            total = score.total_score,
            rating = %score.rating,
            points = prices.len(),
            outliers = series.outlier_count(),
            interpolated = series.interpolated_count(),
            unfilled_gaps = series.unfilled_gaps,
            "점수 계산"
        );
        Ok(score)
    }

    async fn fetch_required<T, F>(&self, provider: &'static str, call: F) -> CardRiskResult<T>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(|e| CardRiskError::provider(provider, e)),
            Err(_) => Err(CardRiskError::provider(
                provider,
                ProviderError::Timeout(self.timeout),
            )),
        }
    }

    async fn fetch_population(&self, card: &CardId) -> Option<u32> {
        let provider = self.population.as_ref()?;
        guarded(POPULATION, card.as_str(), self.timeout, provider.fetch_population(card))
            .await
            .flatten()
    }

    async fn fetch_sentiment(
        &self,
        card: &CardId,
        metadata: &CardMetadata,
    ) -> Option<SentimentSignal> {
        let provider = self.sentiment.as_ref()?;
        guarded(
            SENTIMENT,
            card.as_str(),
            self.timeout,
            provider.fetch_sentiment(card, metadata),
        )
        .await
        .flatten()
    }

    async fn fetch_card_macro(&self, card: &CardId) -> Option<MacroSignal> {
        let provider = self.macro_provider.as_ref()?;
        guarded(MACRO, card.as_str(), self.timeout, provider.fetch_card_macro(card))
            .await
            .flatten()
    }

    async fn fetch_macro(&self, scope: &str) -> Option<MacroSignal> {
        let provider = self.macro_provider.as_ref()?;
        guarded(MACRO, scope, self.timeout, provider.fetch_macro())
            .await
            .flatten()
    }
}

/// 선택 제공자 호출. 에러/시간 초과는 `None`으로 변환하고 `warn` 로그를 남깁니다.
async fn guarded<T, F>(provider: &'static str, card_id: &str, limit: Duration, call: F) -> Option<T>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!(provider, card_id, error = %e, "선택 제공자 실패, 기본값 사용");
            None
        }
        Err(_) => {
            warn!(
                provider,
                card_id,
                timeout_ms = limit.as_millis() as u64,
                "선택 제공자 시간 초과, 기본값 사용"
            );
            None
        }
    }
}

// =============================================================================
// 빌더
// =============================================================================

/// [`ScoringService`] 빌더.
pub struct ScoringServiceBuilder {
    price_history: Arc<dyn PriceHistoryProvider>,
    metadata: Arc<dyn MetadataProvider>,
    population: Option<Arc<dyn PopulationProvider>>,
    sentiment: Option<Arc<dyn SentimentProvider>>,
    macro_provider: Option<Arc<dyn MacroProvider>>,
    sink: Option<Arc<dyn ScoreSink>>,
    weights: DimensionWeights,
    macro_defaults: MacroSnapshot,
    timeout: Duration,
    concurrency: usize,
    exclude_interpolated: bool,
}

impl ScoringServiceBuilder {
    fn new(
        price_history: Arc<dyn PriceHistoryProvider>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        let defaults = AppConfig::default();
        Self {
            price_history,
            metadata,
            population: None,
            sentiment: None,
            macro_provider: None,
            sink: None,
            weights: DimensionWeights::default(),
            macro_defaults: defaults.scoring.macro_defaults,
            timeout: defaults.providers.timeout(),
            concurrency: defaults.batch.effective_concurrency(),
            exclude_interpolated: defaults.scoring.exclude_interpolated,
        }
    }

    /// 설정 적용 (타임아웃, 동시성, 보간 제외, 매크로 기본값).
    pub fn config(mut self, config: &AppConfig) -> Self {
        self.timeout = config.providers.timeout();
        self.concurrency = config.batch.effective_concurrency();
        self.exclude_interpolated = config.scoring.exclude_interpolated;
        self.macro_defaults = config.scoring.macro_defaults.clone();
        self
    }

    /// PSA 개체수 제공자.
    pub fn population(mut self, provider: Arc<dyn PopulationProvider>) -> Self {
        self.population = Some(provider);
        self
    }

    /// 심리 신호 제공자.
    pub fn sentiment(mut self, provider: Arc<dyn SentimentProvider>) -> Self {
        self.sentiment = Some(provider);
        self
    }

    /// 매크로 신호 제공자.
    pub fn macro_provider(mut self, provider: Arc<dyn MacroProvider>) -> Self {
        self.macro_provider = Some(provider);
        self
    }

    /// 점수 저장소.
    pub fn sink(mut self, sink: Arc<dyn ScoreSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 차원 가중치 (`build`에서 검증).
    pub fn weights(mut self, weights: DimensionWeights) -> Self {
        self.weights = weights;
        self
    }

    /// 제공자 호출 타임아웃.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 배치 동시성 (최소 1).
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// 보간 포인트 제외 여부.
    pub fn exclude_interpolated(mut self, exclude: bool) -> Self {
        self.exclude_interpolated = exclude;
        self
    }

    /// 서비스를 생성합니다.
    ///
    /// # Errors
    ///
    /// 가중치가 유효하지 않으면 `CardRiskError::Config`.
    pub fn build(self) -> CardRiskResult<ScoringService> {
        let scorer = SpeculationScorer::new(self.weights)?.with_macro_defaults(self.macro_defaults);
        Ok(ScoringService {
            scorer,
            price_history: self.price_history,
            metadata: self.metadata,
            population: self.population,
            sentiment: self.sentiment,
            macro_provider: self.macro_provider,
            sink: self.sink,
            timeout: self.timeout,
            concurrency: self.concurrency,
            exclude_interpolated: self.exclude_interpolated,
        })
    }
}

// =============================================================================
// 배치 결과
// =============================================================================

/// 배치 점수 계산 결과.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// 전체 카드 수
    pub total: usize,
    /// 점수 계산 성공 수
    pub success: usize,
    /// 점수 계산 실패 수 (필수 제공자 실패)
    pub errors: usize,
    /// 일부 차원이 기본값으로 대체된 수
    pub degraded: usize,
    /// 저장 실패 수
    pub sink_errors: usize,
    /// 실패 목록 (카드, 에러 메시지)
    pub failures: Vec<(CardId, String)>,
    /// 계산된 점수 (카드 식별자 순)
    pub scores: Vec<FullSpeculationScore>,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl BatchReport {
    /// 성공률 (%).
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 요약 로그 출력.
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            degraded = self.degraded,
            sink_errors = self.sink_errors,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "배치 점수 계산 완료"
        );
    }
}

// =============================================================================
// 메모리 저장소
// =============================================================================

/// 카드 식별자를 키로 점수를 보관하는 메모리 저장소.
#[derive(Debug, Default)]
pub struct InMemoryScoreSink {
    scores: RwLock<BTreeMap<CardId, FullSpeculationScore>>,
}

impl InMemoryScoreSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 카드 점수 조회.
    pub async fn get(&self, card: &CardId) -> Option<FullSpeculationScore> {
        self.scores.read().await.get(card).cloned()
    }

    /// 저장된 점수 수.
    pub async fn len(&self) -> usize {
        self.scores.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.scores.read().await.is_empty()
    }

    /// 저장된 모든 점수 (카드 식별자 순).
    pub async fn snapshot(&self) -> Vec<FullSpeculationScore> {
        self.scores.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl ScoreSink for InMemoryScoreSink {
    async fn upsert(&self, score: &FullSpeculationScore) -> Result<(), ProviderError> {
        self.scores
            .write()
            .await
            .insert(score.card_id.clone(), score.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cardrisk_core::PricePoint;
    use rust_decimal_macros::dec;

    struct FixedHistory;

    #[async_trait]
    impl PriceHistoryProvider for FixedHistory {
        async fn fetch_price_history(
            &self,
            card: &CardId,
        ) -> Result<Vec<PricePoint>, ProviderError> {
            if card.as_str() == "missing" {
                return Err(ProviderError::NotFound(card.to_string()));
            }
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            Ok((0..30)
                .map(|i| PricePoint::new(start + chrono::Duration::days(i), dec!(50)))
                .collect())
        }
    }

    struct FixedMetadata;

    #[async_trait]
    impl MetadataProvider for FixedMetadata {
        async fn fetch_metadata(&self, _card: &CardId) -> Result<CardMetadata, ProviderError> {
            Ok(CardMetadata::new("Eevee", "Common"))
        }
    }

    fn service() -> ScoringService {
        ScoringService::builder(Arc::new(FixedHistory), Arc::new(FixedMetadata))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_required_provider_failure_is_error() {
        let err = service().score_card(&CardId::new("missing")).await.unwrap_err();
        assert!(matches!(err, CardRiskError::Provider { provider: "price_history", .. }));
    }

    #[tokio::test]
    async fn test_no_optional_providers_degrades() {
        let score = service().score_card(&CardId::new("x-1")).await.unwrap();
        assert!(score.is_degraded());
        assert_eq!(score.sentiment.score, 50.0);
    }

    #[test]
    fn test_builder_rejects_invalid_weights() {
        let result = ScoringService::builder(Arc::new(FixedHistory), Arc::new(FixedMetadata))
            .weights(DimensionWeights {
                macro_environment: 0.5,
                ..Default::default()
            })
            .build();
        assert!(matches!(result, Err(CardRiskError::Config(_))));
    }

    #[test]
    fn test_builder_applies_config() {
        let mut config = AppConfig::default();
        config.providers.timeout_ms = 250;
        config.batch.concurrency = 0;
        let service = ScoringService::builder(Arc::new(FixedHistory), Arc::new(FixedMetadata))
            .config(&config)
            .build()
            .unwrap();
        assert_eq!(service.timeout(), Duration::from_millis(250));
        assert_eq!(service.concurrency(), 1);
    }

    #[test]
    fn test_report_success_rate() {
        let report = BatchReport {
            total: 4,
            success: 3,
            errors: 1,
            ..Default::default()
        };
        assert!((report.success_rate() - 75.0).abs() < 1e-12);
        assert_eq!(BatchReport::default().success_rate(), 0.0);
    }
}
