//! 검색 엔진 - 랭킹 오케스트레이터 + 리로드 코디네이터
//!
//! 코퍼스 스냅샷과 두 인덱스(lexical, semantic)를 하나의 `Snapshot`으로 묶어
//! `Arc`로 교체합니다. 읽기는 현재 스냅샷의 `Arc`를 복제해서 진행하므로
//! 교체 도중에도 완전한 이전 상태 또는 완전한 새 상태만 관찰됩니다.
//!
//! 쓰기(insert, load, reload)는 단일 writer 락으로 직렬화되며,
//! 코퍼스 변경 + 인덱스 재빌드 + 교체가 한 트랜잭션입니다.

mod strategy;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::config::SearchConfig;
use crate::corpus::{Corpus, CorpusStore, NewRecord, Record};
use crate::embedding::Encoder;
use crate::error::SearchError;
use crate::index::{LexicalIndex, RankedIndex, SemanticIndex, Tokenizer};
use crate::query::{boolean_search, extended_boolean_search};

pub use strategy::Strategy;

// ============================================================================
// Types
// ============================================================================

/// 검색 결과 항목
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub record: Record,
    /// Boolean 전략은 None, 랭킹 전략은 -1.0 ~ 1.0
    pub score: Option<f32>,
}

/// 검색 응답
///
/// 질의 단위 에러는 빈 결과 + 에러 상세로 복구됩니다.
/// 직렬화 시 에러는 메시지 문자열로 기록됩니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub strategy: Option<Strategy>,
    pub hits: Vec<SearchHit>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<SearchError>,
}

fn serialize_error<S: Serializer>(
    error: &Option<SearchError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

impl SearchResponse {
    fn failed(strategy: Option<Strategy>, error: SearchError) -> Self {
        Self {
            strategy,
            hits: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// 결과 레코드 ID 목록
    pub fn ids(&self) -> Vec<i64> {
        self.hits.iter().map(|hit| hit.record.id).collect()
    }
}

/// 코퍼스 스냅샷 + 파생 인덱스 (항상 같은 스냅샷에서 함께 빌드됨)
#[derive(Debug)]
pub struct Snapshot {
    corpus: Corpus,
    lexical: LexicalIndex,
    semantic: SemanticIndex,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            corpus: Vec::new(),
            lexical: LexicalIndex::empty(),
            semantic: SemanticIndex::empty(),
        }
    }

    pub fn corpus(&self) -> &[Record] {
        &self.corpus
    }

    pub fn lexical(&self) -> &LexicalIndex {
        &self.lexical
    }

    pub fn semantic(&self) -> &SemanticIndex {
        &self.semantic
    }

    fn hits(&self, ranked: Vec<RankedIndex>) -> Vec<SearchHit> {
        ranked
            .into_iter()
            .map(|(index, score)| SearchHit {
                record: self.corpus[index].clone(),
                score: Some(score),
            })
            .collect()
    }
}

/// 엔진 통계
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub record_count: usize,
    pub vocabulary_size: usize,
    pub embedding_dimension: Option<usize>,
    /// 인코더 없이 열린 엔진이면 None
    pub encoder: Option<String>,
}

// ============================================================================
// SearchEngine
// ============================================================================

/// FAQ 검색 엔진
///
/// 인코더 없이 열면 시맨틱 인덱스를 만들지 않고, semantic 전략은
/// `EncoderFailure`로 복구됩니다. 나머지 전략은 인코더 상태와 무관합니다.
pub struct SearchEngine {
    store: CorpusStore,
    encoder: Option<Arc<dyn Encoder>>,
    config: SearchConfig,
    snapshot: RwLock<Arc<Snapshot>>,
    writer: tokio::sync::Mutex<()>,
}

impl SearchEngine {
    /// 엔진 생성 + 최초 리로드
    ///
    /// # Arguments
    /// * `store` - 코퍼스 저장소
    /// * `encoder` - 외부 임베딩 인코더
    /// * `config` - 엔진 설정
    pub async fn open(
        store: CorpusStore,
        encoder: Arc<dyn Encoder>,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        Self::build(store, Some(encoder), config).await
    }

    /// 인코더 없이 엔진 생성 (exact, extended, lexical 전용)
    pub async fn open_lexical(store: CorpusStore, config: SearchConfig) -> Result<Self, SearchError> {
        Self::build(store, None, config).await
    }

    async fn build(
        store: CorpusStore,
        encoder: Option<Arc<dyn Encoder>>,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        let engine = Self {
            store,
            encoder,
            config,
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
            writer: tokio::sync::Mutex::new(()),
        };

        engine.reload().await?;
        Ok(engine)
    }

    pub fn store(&self) -> &CorpusStore {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// 현재 스냅샷
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, SearchError> {
        self.snapshot
            .read()
            .map(|guard| Arc::clone(&guard))
            .map_err(|e| SearchError::Storage(format!("Lock error: {}", e)))
    }

    fn swap(&self, next: Snapshot) -> Result<(), SearchError> {
        let mut guard = self
            .snapshot
            .write()
            .map_err(|e| SearchError::Storage(format!("Lock error: {}", e)))?;
        *guard = Arc::new(next);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// 인덱스 전체 재빌드 후 원자적 교체
    ///
    /// 실패하면 이전 스냅샷이 그대로 유지되고 에러가 반환됩니다.
    pub async fn reload(&self) -> Result<(), SearchError> {
        let _writer = self.writer.lock().await;
        self.rebuild_and_swap().await
    }

    /// 레코드 추가 + 리로드 (한 트랜잭션)
    ///
    /// 재빌드가 실패해도 레코드는 저장소에 남고, 다음 리로드에서 반영됩니다.
    pub async fn insert(&self, question: &str, answer: &str) -> Result<i64, SearchError> {
        let _writer = self.writer.lock().await;

        let id = self
            .store
            .insert(question, answer)
            .map_err(SearchError::storage)?;

        self.rebuild_and_swap().await?;
        Ok(id)
    }

    /// 코퍼스 전체 교체 + 리로드
    pub async fn load(&self, records: &[NewRecord]) -> Result<usize, SearchError> {
        let _writer = self.writer.lock().await;

        let corpus = self.store.load(records).map_err(SearchError::storage)?;
        self.rebuild_and_swap().await?;
        Ok(corpus.len())
    }

    /// writer 락을 잡은 상태에서만 호출
    async fn rebuild_and_swap(&self) -> Result<(), SearchError> {
        let corpus = self.store.corpus().map_err(SearchError::storage)?;
        let documents: Vec<String> = corpus.iter().map(Record::document_text).collect();

        let lexical = LexicalIndex::build(&documents, Tokenizer::english());
        tracing::info!(
            "TF-IDF matrix built: {} documents, {} terms",
            lexical.len(),
            lexical.vocabulary_size()
        );

        let semantic = match &self.encoder {
            Some(encoder) if !documents.is_empty() => {
                let embeddings = self
                    .with_timeout(encoder.encode_corpus(&documents), "encode_corpus")
                    .await?;
                let semantic = SemanticIndex::for_corpus(embeddings, corpus.len())?;
                tracing::info!(
                    "Embeddings built: {} vectors (dimension: {:?})",
                    semantic.len(),
                    semantic.dimension()
                );
                semantic
            }
            Some(_) => SemanticIndex::empty(),
            None => {
                tracing::debug!("No encoder configured, skipping embeddings");
                SemanticIndex::empty()
            }
        };

        self.swap(Snapshot {
            corpus,
            lexical,
            semantic,
        })?;

        tracing::info!("Reloaded search indexes");
        Ok(())
    }

    async fn with_timeout<T>(
        &self,
        fut: impl std::future::Future<Output = anyhow::Result<T>>,
        operation: &str,
    ) -> Result<T, SearchError> {
        let timeout: Duration = self.config.encoder_timeout;
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result.map_err(|e| SearchError::encoder(e.context(format!("{} failed", operation)))),
            Err(_) => Err(SearchError::EncoderFailure(format!(
                "{} timed out after {:?}",
                operation, timeout
            ))),
        }
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// 검색 (질의 단위 에러는 빈 결과로 복구)
    pub async fn search(&self, query: &str, strategy: Strategy, top_n: usize) -> SearchResponse {
        match self.try_search(query, strategy, top_n).await {
            Ok(hits) => SearchResponse {
                strategy: Some(strategy),
                hits,
                error: None,
            },
            Err(err) => {
                if err.is_recoverable() {
                    tracing::warn!("{} search failed for {:?}: {}", strategy, query, err);
                } else {
                    tracing::error!("{} search failed for {:?}: {}", strategy, query, err);
                }
                SearchResponse::failed(Some(strategy), err)
            }
        }
    }

    /// 전략 이름으로 검색
    pub async fn search_by_name(&self, query: &str, strategy: &str, top_n: usize) -> SearchResponse {
        match strategy.parse::<Strategy>() {
            Ok(strategy) => self.search(query, strategy, top_n).await,
            Err(err) => {
                tracing::warn!("Unknown search algorithm selected: {}", strategy);
                SearchResponse::failed(None, err)
            }
        }
    }

    /// 검색 (에러를 그대로 반환)
    pub async fn try_search(
        &self,
        query: &str,
        strategy: Strategy,
        top_n: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let snapshot = self.snapshot()?;
        tracing::info!("Performing {} search for query: {}", strategy, query);

        let hits = match strategy {
            Strategy::Exact => to_hits(boolean_search(&snapshot.corpus, query)),
            Strategy::Extended => to_hits(extended_boolean_search(&snapshot.corpus, query)?),
            Strategy::Lexical => {
                let vector = snapshot.lexical.transform(query);
                snapshot.hits(snapshot.lexical.similarity(&vector, top_n))
            }
            Strategy::Semantic => {
                let Some(encoder) = &self.encoder else {
                    return Err(SearchError::EncoderFailure(
                        "no encoder configured for semantic search".to_string(),
                    ));
                };

                if snapshot.semantic.is_empty() {
                    Vec::new()
                } else {
                    let embedding = self
                        .with_timeout(encoder.encode_query(query), "encode_query")
                        .await?;
                    snapshot.hits(snapshot.semantic.rank(&embedding, top_n)?)
                }
            }
        };

        tracing::info!("{} search found {} results", strategy, hits.len());
        Ok(hits)
    }

    /// 미리 계산된 질의 임베딩으로 시맨틱 검색
    pub fn semantic_search_with_vector(
        &self,
        embedding: &[f32],
        top_n: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let snapshot = self.snapshot()?;
        let ranked = snapshot.semantic.rank(embedding, top_n)?;
        Ok(snapshot.hits(ranked))
    }

    /// 엔진 통계
    pub fn stats(&self) -> Result<EngineStats, SearchError> {
        let snapshot = self.snapshot()?;
        Ok(EngineStats {
            record_count: snapshot.corpus.len(),
            vocabulary_size: snapshot.lexical.vocabulary_size(),
            embedding_dimension: snapshot.semantic.dimension(),
            encoder: self.encoder.as_ref().map(|e| e.name().to_string()),
        })
    }
}

fn to_hits(records: Vec<&Record>) -> Vec<SearchHit> {
    records
        .into_iter()
        .map(|record| SearchHit {
            record: record.clone(),
            score: None,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
