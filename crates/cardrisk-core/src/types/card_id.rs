//! 카드 식별자.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CardRiskError, CardRiskResult};

/// 카드 식별자 (예: "base1-4", "sv3pt5-199").
///
/// 배치 저장 시 upsert 키로 사용됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// 새 카드 식별자를 생성합니다. 앞뒤 공백은 제거됩니다.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    /// 외부 입력의 식별자를 정규화하고 검증합니다.
    ///
    /// # Errors
    ///
    /// 공백 제거 후 비어 있으면 `CardRiskError::InvalidInput`.
    pub fn parse(id: &str) -> CardRiskResult<Self> {
        let id = Self::new(id);
        if id.0.is_empty() {
            return Err(CardRiskError::InvalidInput("빈 카드 식별자".to_string()));
        }
        Ok(id)
    }

    /// 문자열 참조를 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 세트 식별자 부분 (마지막 '-' 앞). 구분자가 없으면 전체.
    pub fn set_prefix(&self) -> &str {
        match self.0.rsplit_once('-') {
            Some((set, _)) => set,
            None => &self.0,
        }
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new("  base1-4 ");
        assert_eq!(id.as_str(), "base1-4");
        assert_eq!(id.set_prefix(), "base1");
        assert_eq!(id.to_string(), "base1-4");
        assert_eq!(CardId::from("promo").set_prefix(), "promo");
    }

    #[test]
    fn test_parse_rejects_blank_id() {
        assert_eq!(CardId::parse(" sv4-89 ").unwrap().as_str(), "sv4-89");
        assert!(matches!(
            CardId::parse("   "),
            Err(CardRiskError::InvalidInput(_))
        ));
    }
}
