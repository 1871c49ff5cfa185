//! CLI 명령어 구현 모듈.

pub mod batch;
pub mod fixture;
pub mod quick;
pub mod sanitize;
pub mod score;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// JSON 파일을 읽어 역직렬화합니다.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("파일 읽기 실패: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("JSON 파싱 실패: {}", path.display()))
}

/// 값을 JSON으로 파일에 쓰거나, 경로가 없으면 stdout에 출력합니다.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("JSON 직렬화 실패")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("파일 쓰기 실패: {}", path.display()))?;
            tracing::info!(path = %path.display(), "결과 저장");
        }
        None => println!("{}", json),
    }
    Ok(())
}
