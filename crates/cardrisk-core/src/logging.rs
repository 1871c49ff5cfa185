//! tracing 기반 로깅 초기화.
//!
//! 설정 파일의 `[logging]` 섹션으로 레벨과 형식을 정하고, `RUST_LOG`가 있으면 레벨을 덮어씁니다.
//! 로그는 stderr로 출력합니다. stdout은 점수 JSON 전용입니다.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;
use crate::error::{CardRiskError, CardRiskResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 색상이 포함된 여러 줄 형식
    #[default]
    Pretty,
    /// 배치 로그 수집용 JSON
    Json,
    /// 한 줄 형식
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = CardRiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(CardRiskError::Config(format!("알 수 없는 로그 형식: {}", other))),
        }
    }
}

/// 로깅을 초기화합니다.
///
/// `format_override`가 있으면 설정 파일의 형식 대신 사용합니다 (CLI의 `LOG_FORMAT`).
///
/// # Errors
///
/// - 형식 문자열이나 레벨 필터가 잘못되면 `CardRiskError::Config`
/// - 전역 subscriber가 이미 설치되어 있으면 `CardRiskError::Internal`
pub fn init_logging(
    config: &LoggingConfig,
    format_override: Option<LogFormat>,
) -> CardRiskResult<()> {
    let format = match format_override {
        Some(format) => format,
        None => config.format.parse()?,
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| CardRiskError::Config(format!("로그 레벨 '{}': {}", config.level, e)))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer(format, config.span_events))
        .try_init()
        .map_err(|e| CardRiskError::Internal(format!("로깅 초기화: {}", e)))?;

    tracing::debug!(?format, level = %config.level, "로깅 초기화 완료");
    Ok(())
}

fn fmt_layer<S>(format: LogFormat, span_events: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let span_events = if span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_span_events(span_events);

    match format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base.json().boxed(),
        LogFormat::Compact => base.compact().boxed(),
    }
}

/// 카드 식별자 필드가 포함된 점수 계산 span.
#[macro_export]
macro_rules! scoring_span {
    ($name:expr, $card_id:expr) => {
        tracing::info_span!($name, card_id = %$card_id)
    };
}
