//! faq-search - FAQ 검색 엔진
//!
//! 질문/답변 코퍼스에 대해 네 가지 검색 전략을 제공합니다.
//!
//! - exact: 다중 키워드 포함 검색
//! - extended: AND/OR/NOT 확장 Boolean 검색
//! - lexical: TF-IDF 코사인 랭킹
//! - semantic: 외부 인코더 임베딩 코사인 랭킹
//!
//! 코퍼스가 바뀌면 두 인덱스를 다시 빌드해 원자적으로 교체합니다.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod index;
pub mod query;

// Re-exports
pub use config::{get_data_dir, SearchConfig};
pub use corpus::{Corpus, CorpusStore, NewRecord, Record, StoreStats};
pub use embedding::{create_encoder, get_api_key, has_api_key, Encoder, GeminiEmbedding};
pub use engine::{EngineStats, SearchEngine, SearchHit, SearchResponse, Snapshot, Strategy};
pub use error::SearchError;
pub use index::{LexicalIndex, LexicalVector, SemanticIndex, Tokenizer};
pub use query::{boolean_search, extended_boolean_search, BooleanExpression};
