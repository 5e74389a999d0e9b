//! 에러 타입 - 검색 엔진 공통 에러 분류
//!
//! 질의 단위 에러(Validation, UnsupportedStrategy, QueryEvaluation)는
//! 검색 진입점에서 빈 결과로 복구되고, 리로드/인코더 에러는 호출자에게 전달됩니다.

use thiserror::Error;

/// 검색 엔진 에러
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// 입력 검증 실패 (빈 질문/답변 등)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 지원하지 않는 검색 전략
    #[error("Unsupported strategy: {0}")]
    UnsupportedStrategy(String),

    /// 확장 Boolean 질의 평가 실패
    #[error("Query evaluation failed: {0}")]
    QueryEvaluation(String),

    /// 벡터 차원 불일치
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// 외부 인코더 실패 (에러 또는 타임아웃)
    #[error("Encoder failure: {0}")]
    EncoderFailure(String),

    /// 코퍼스 저장소 실패
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SearchError {
    /// 검색 진입점에서 빈 결과로 복구 가능한 에러인지 여부
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SearchError::Validation(_)
                | SearchError::UnsupportedStrategy(_)
                | SearchError::QueryEvaluation(_)
                | SearchError::DimensionMismatch { .. }
                | SearchError::EncoderFailure(_)
        )
    }

    /// anyhow 에러 체인을 저장소 에러로 변환
    ///
    /// 체인 안에 이미 `SearchError`가 있으면 그대로 꺼냅니다 (예: insert 검증 실패).
    pub(crate) fn storage(err: anyhow::Error) -> Self {
        match err.downcast::<SearchError>() {
            Ok(inner) => inner,
            Err(err) => SearchError::Storage(format!("{:#}", err)),
        }
    }

    /// anyhow 에러 체인을 인코더 에러로 변환
    pub(crate) fn encoder(err: anyhow::Error) -> Self {
        SearchError::EncoderFailure(format!("{:#}", err))
    }
}
