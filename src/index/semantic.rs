//! Semantic Index - 외부 인코더가 만든 임베딩 벡터 랭킹
//!
//! 이 인덱스는 텍스트를 직접 인코딩하지 않습니다.
//! 벡터 내부 구조는 코사인 비교 이외에는 해석하지 않습니다.

use crate::error::SearchError;

use super::ranking::{cosine_similarity, top_n, RankedIndex};

/// 임베딩 인덱스 (코퍼스 순서와 위치 일치)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticIndex {
    embeddings: Vec<Vec<f32>>,
    /// 빈 인덱스면 None
    dimension: Option<usize>,
}

impl SemanticIndex {
    /// 임베딩 목록으로 인덱스 생성
    ///
    /// 모든 벡터의 차원이 같아야 합니다.
    pub fn new(embeddings: Vec<Vec<f32>>) -> Result<Self, SearchError> {
        let dimension = embeddings.first().map(Vec::len);

        if let Some(expected) = dimension {
            if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
                return Err(SearchError::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }

        Ok(Self {
            embeddings,
            dimension,
        })
    }

    /// 코퍼스 크기에 맞춘 인덱스 생성
    ///
    /// 벡터 수가 `corpus_len`과 다르면 `DimensionMismatch`로 실패합니다
    /// (expected = 코퍼스 크기, actual = 벡터 수).
    pub fn for_corpus(embeddings: Vec<Vec<f32>>, corpus_len: usize) -> Result<Self, SearchError> {
        if embeddings.len() != corpus_len {
            return Err(SearchError::DimensionMismatch {
                expected: corpus_len,
                actual: embeddings.len(),
            });
        }

        Self::new(embeddings)
    }

    /// 빈 인덱스
    pub fn empty() -> Self {
        Self::default()
    }

    /// 질의 임베딩과 모든 저장 임베딩의 코사인 유사도 Top-N
    ///
    /// 질의 차원이 저장된 차원과 다르면 `DimensionMismatch`로 실패합니다.
    /// 인덱스가 비어있으면 빈 목록을 반환합니다.
    pub fn rank(&self, query: &[f32], top: usize) -> Result<Vec<RankedIndex>, SearchError> {
        let Some(expected) = self.dimension else {
            return Ok(Vec::new());
        };

        if query.len() != expected {
            return Err(SearchError::DimensionMismatch {
                expected,
                actual: query.len(),
            });
        }

        Ok(top_n(
            self.embeddings.iter().map(|e| cosine_similarity(e, query)),
            top,
        ))
    }

    /// 임베딩 차원 (빈 인덱스면 None)
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}
