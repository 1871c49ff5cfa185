//! 설정 관리.
//!
//! 파일(TOML)과 `CARDRISK__` 접두사 환경 변수에서 애플리케이션 설정을 로드합니다.
//! 모든 필드는 기본값을 가지므로 설정 파일 없이도 동작합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::MacroSnapshot;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 외부 제공자 호출 설정
    #[serde(default)]
    pub providers: ProviderConfig,
    /// 배치 점수 계산 설정
    #[serde(default)]
    pub batch: BatchConfig,
    /// 점수 계산 설정
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// span 진입/종료 이벤트 출력
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
        }
    }
}

/// 외부 제공자 호출 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// 선택적 제공자(개체수, 심리, 매크로) 호출당 타임아웃 (밀리초)
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_provider_timeout_ms() -> u64 {
    3000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_provider_timeout_ms(),
        }
    }
}

impl ProviderConfig {
    /// 호출 타임아웃.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// 배치 점수 계산 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    /// 동시에 계산할 카드 수
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    8
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl BatchConfig {
    /// 유효 동시성 (최소 1).
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// 점수 계산 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoringConfig {
    /// 보간된 가격 포인트를 점수 계산에서 제외할지 여부
    #[serde(default)]
    pub exclude_interpolated: bool,
    /// 매크로 데이터가 없을 때 사용할 정적 스냅샷
    #[serde(default = "MacroSnapshot::current_environment")]
    pub macro_defaults: MacroSnapshot,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            exclude_interpolated: false,
            macro_defaults: MacroSnapshot::current_environment(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path.as_ref()).required(true))
    }

    /// 기본 경로에서 설정을 로드합니다. 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name("config/default").required(false))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let builder = config::Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(file)
            // 환경 변수로 오버라이드 (예: CARDRISK__BATCH__CONCURRENCY=16)
            .add_source(
                config::Environment::with_prefix("CARDRISK")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}
