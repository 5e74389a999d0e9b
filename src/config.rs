//! 설정 모듈
//!
//! 데이터 디렉토리, DB 경로, 기본 결과 수, 인코더 타임아웃을 관리합니다.
//! 환경변수로 기본값을 덮어쓸 수 있습니다.

use std::path::PathBuf;
use std::time::Duration;

/// DB 경로 환경변수
pub const ENV_DB_PATH: &str = "FAQ_SEARCH_DB";
/// 기본 결과 수 환경변수
pub const ENV_TOP_N: &str = "FAQ_SEARCH_TOP_N";
/// 인코더 타임아웃 환경변수 (초)
pub const ENV_ENCODER_TIMEOUT: &str = "FAQ_SEARCH_ENCODER_TIMEOUT_SECS";

/// 기본 결과 수
pub const DEFAULT_TOP_N: usize = 5;
/// 기본 인코더 타임아웃
pub const DEFAULT_ENCODER_TIMEOUT: Duration = Duration::from_secs(120);

/// 데이터 디렉토리 경로 (~/.faq-search/)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".faq-search")
}

/// 검색 엔진 설정
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// SQLite DB 파일 경로
    pub db_path: PathBuf,
    /// 기본 결과 수 (lexical/semantic)
    pub top_n: usize,
    /// 인코더 호출 타임아웃 (리로드, 질의 임베딩 각각)
    pub encoder_timeout: Duration,
    /// 임베딩 차원
    pub embedding_dimension: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            db_path: get_data_dir().join("faqs.db"),
            top_n: DEFAULT_TOP_N,
            encoder_timeout: DEFAULT_ENCODER_TIMEOUT,
            embedding_dimension: crate::embedding::DEFAULT_DIMENSION,
        }
    }
}

impl SearchConfig {
    /// 환경변수를 반영한 설정
    ///
    /// 잘못된 값은 경고 후 기본값을 유지합니다.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = env_value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(raw) = env_value(ENV_TOP_N) {
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => config.top_n = n,
                _ => tracing::warn!("Ignoring invalid {}={}", ENV_TOP_N, raw),
            }
        }

        if let Some(raw) = env_value(ENV_ENCODER_TIMEOUT) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.encoder_timeout = Duration::from_secs(secs),
                _ => tracing::warn!("Ignoring invalid {}={}", ENV_ENCODER_TIMEOUT, raw),
            }
        }

        config
    }

    /// 테스트/임베디드 용도: 인코더 타임아웃만 지정
    pub fn with_encoder_timeout(mut self, timeout: Duration) -> Self {
        self.encoder_timeout = timeout;
        self
    }
}

/// 비어있지 않은 환경변수 값
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.encoder_timeout, Duration::from_secs(120));
        assert!(config.db_path.ends_with("faqs.db"));
    }

    #[test]
    fn test_with_encoder_timeout() {
        let config = SearchConfig::default().with_encoder_timeout(Duration::from_millis(50));
        assert_eq!(config.encoder_timeout, Duration::from_millis(50));
    }

    #[test]
    fn test_data_dir_name() {
        assert!(get_data_dir().ends_with(".faq-search"));
    }
}
