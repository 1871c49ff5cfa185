//! 카드 투기 점수 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 단일 카드 픽스처 점수
//! cardrisk score --input fixtures/base1-4.json
//!
//! # 기준일 지정 (계절성/연식 계산)
//! cardrisk score --input fixtures/base1-4.json --as-of 2024-12-01
//!
//! # 디렉터리 배치 점수 (macro.json 선택)
//! cardrisk batch --dir fixtures/ --output scores.json
//!
//! # 빠른 점수 (외부 신호 없음)
//! cardrisk quick --input batch.json
//!
//! # 원시 가격 정제
//! cardrisk sanitize --input raw.json --output clean.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use cardrisk_cli::commands::{batch, quick, sanitize, score, write_json};
use cardrisk_core::{init_logging, AppConfig, LogFormat};

#[derive(Parser)]
#[command(name = "cardrisk")]
#[command(about = "Trading card speculation scoring engine - 트레이딩 카드 투기 점수 계산", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (없으면 config/default.toml + 환경 변수)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 단일 카드 픽스처의 종합 점수 계산 (JSON 출력)
    Score {
        /// 카드 픽스처 파일 (card_id, metadata, prices, signals)
        #[arg(short, long)]
        input: PathBuf,

        /// 기준일 (YYYY-MM-DD, 기본: 마지막 가격 날짜)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// 픽스처 디렉터리 배치 점수 계산
    Batch {
        /// 픽스처 디렉터리 (카드당 JSON 1개, macro.json 선택)
        #[arg(short, long)]
        dir: PathBuf,

        /// 결과 파일 (없으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 진행 표시줄 숨김
        #[arg(long, default_value = "false")]
        quiet: bool,
    },

    /// 빠른 점수 계산 (심리/매크로 중립값)
    Quick {
        /// QuickScoreInput JSON 배열 파일
        #[arg(short, long)]
        input: PathBuf,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 원시 가격 관측값 정제 (중복 제거, 이상치 표시, 보간)
    Sanitize {
        /// RawPriceObservation JSON 배열 파일
        #[arg(short, long)]
        input: PathBuf,

        /// 결과 파일 (없으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("설정 로드 실패: {}", path.display())),
        None => AppConfig::load_default().context("기본 설정 로드 실패"),
    }
}

fn init_tracing(config: &AppConfig) -> Result<()> {
    // LOG_FORMAT 환경 변수가 설정 파일보다 우선 (RUST_LOG는 EnvFilter가 처리)
    let format_override = match std::env::var("LOG_FORMAT") {
        Ok(value) => Some(value.parse::<LogFormat>()?),
        Err(_) => None,
    };
    init_logging(&config.logging, format_override).context("로깅 초기화 실패")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config)?;

    match cli.command {
        Commands::Score { input, as_of } => {
            let as_of = as_of.as_deref().map(score::parse_date).transpose()?;
            let result = score::score_fixture(&input, as_of, &config)?;
            write_json(&result, None)?;
        }

        Commands::Batch { dir, output, quiet } => {
            let report = batch::run_batch(&dir, &config, !quiet).await?;
            for (card, error) in &report.failures {
                tracing::warn!(card_id = %card, error = %error, "실패");
            }
            write_json(&report.scores, output.as_deref())?;
            info!(
                success = report.success,
                errors = report.errors,
                success_rate = format!("{:.1}%", report.success_rate()),
                "배치 완료"
            );
        }

        Commands::Quick { input, format } => {
            let results = quick::quick_scores(&input)?;
            match format.to_lowercase().as_str() {
                "json" => write_json(&results, None)?,
                _ => quick::print_table(&results),
            }
        }

        Commands::Sanitize { input, output } => {
            let cleaned = sanitize::sanitize_file(&input)?;
            write_json(&cleaned, output.as_deref())?;
        }
    }

    Ok(())
}
