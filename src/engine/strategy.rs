//! 검색 전략 - 닫힌 열거형

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SearchError;

/// 검색 전략
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// 다중 키워드 정확 포함
    Exact,
    /// AND/OR/NOT 확장 Boolean
    Extended,
    /// TF-IDF 코사인 랭킹
    Lexical,
    /// 임베딩 코사인 랭킹
    Semantic,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Exact,
        Strategy::Extended,
        Strategy::Lexical,
        Strategy::Semantic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::Extended => "extended",
            Strategy::Lexical => "lexical",
            Strategy::Semantic => "semantic",
        }
    }

    /// 점수가 있는 랭킹 전략인지 여부
    pub fn is_ranked(&self) -> bool {
        matches!(self, Strategy::Lexical | Strategy::Semantic)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    /// 웹 폼에서 쓰던 이름(boolean, extended_boolean, vector, bert)도 허용
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" | "boolean" => Ok(Strategy::Exact),
            "extended" | "extended_boolean" => Ok(Strategy::Extended),
            "lexical" | "vector" | "vsm" | "tfidf" => Ok(Strategy::Lexical),
            "semantic" | "bert" => Ok(Strategy::Semantic),
            _ => Err(SearchError::UnsupportedStrategy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("exact".parse::<Strategy>().unwrap(), Strategy::Exact);
        assert_eq!("boolean".parse::<Strategy>().unwrap(), Strategy::Exact);
        assert_eq!("extended_boolean".parse::<Strategy>().unwrap(), Strategy::Extended);
        assert_eq!("Vector".parse::<Strategy>().unwrap(), Strategy::Lexical);
        assert_eq!("bert".parse::<Strategy>().unwrap(), Strategy::Semantic);
    }

    #[test]
    fn test_unknown_strategy() {
        let err = "fuzzy".parse::<Strategy>().unwrap_err();
        assert_eq!(err, SearchError::UnsupportedStrategy("fuzzy".to_string()));
    }

    #[test]
    fn test_only_ranking_strategies_are_ranked() {
        assert!(Strategy::Lexical.is_ranked());
        assert!(Strategy::Semantic.is_ranked());
        assert!(!Strategy::Exact.is_ranked());
        assert!(!Strategy::Extended.is_ranked());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }
}
