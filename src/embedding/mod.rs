//! 임베딩 모듈 - 외부 인코더 추상화
//!
//! 검색 엔진은 임베딩을 직접 만들지 않고 주입된 `Encoder`에게 요청합니다.
//! - `encode_corpus`: 리로드마다 한 번, 레코드별 벡터 (순서 일치)
//! - `encode_query`: 시맨틱 검색마다 한 번
//!
//! ## 사용법
//! ```rust,ignore
//! let encoder = GeminiEmbedding::from_env()?;
//! let vector = encoder.encode_query("Dubai visa").await?;
//! ```

mod gemini;

use anyhow::Result;
use async_trait::async_trait;

pub use gemini::{GeminiEmbedding, TaskType, VALID_DIMENSIONS};

/// 기본 임베딩 차원
pub const DEFAULT_DIMENSION: usize = 768;

// ============================================================================
// Encoder Trait
// ============================================================================

/// 인코더 트레이트
///
/// 텍스트를 고정 차원 벡터로 변환하는 외부 협력자 인터페이스입니다.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// 질의 텍스트 임베딩
    async fn encode_query(&self, text: &str) -> Result<Vec<f32>>;

    /// 코퍼스 문서 임베딩 (기본 구현: 순차 호출)
    async fn encode_corpus(&self, documents: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(documents.len());
        for document in documents {
            results.push(self.encode_query(document).await?);
        }
        Ok(results)
    }

    /// 임베딩 차원 수
    fn dimension(&self) -> usize;

    /// 인코더 이름
    fn name(&self) -> &str;
}

// ============================================================================
// API Key Management
// ============================================================================

const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_AI_API_KEY"];

/// API 키 로드 (환경변수에서)
///
/// 우선순위:
/// 1. `GEMINI_API_KEY` 환경변수
/// 2. `GOOGLE_AI_API_KEY` 환경변수
pub fn get_api_key() -> Result<String> {
    for var in API_KEY_VARS {
        if let Ok(key) = std::env::var(var) {
            if !key.is_empty() {
                tracing::debug!("Using API key from {}", var);
                return Ok(key);
            }
        }
    }

    anyhow::bail!(
        "API key not found. Set GEMINI_API_KEY or GOOGLE_AI_API_KEY environment variable.\n\
         Get your API key at: https://aistudio.google.com/app/apikey"
    )
}

/// API 키 존재 여부 확인
pub fn has_api_key() -> bool {
    API_KEY_VARS
        .iter()
        .any(|var| std::env::var(var).map(|k| !k.is_empty()).unwrap_or(false))
}

// ============================================================================
// Factory Function
// ============================================================================

/// 차원을 지정하여 Gemini 인코더 생성
pub fn create_encoder(dimension: usize) -> Result<GeminiEmbedding> {
    if !has_api_key() {
        anyhow::bail!(
            "GEMINI_API_KEY or GOOGLE_AI_API_KEY not set.\n\
             Set: export GEMINI_API_KEY=your-api-key\n\
             Get your API key at: https://aistudio.google.com/app/apikey"
        );
    }

    let encoder = GeminiEmbedding::from_env_with_dimension(dimension)?;
    tracing::info!(
        "Using Gemini API encoder (dimension: {})",
        encoder.dimension()
    );
    Ok(encoder)
}
