//! Corpus 모듈 - FAQ 레코드 저장소
//!
//! - SQLite: 질문/답변 레코드 저장 (id = 삽입 순서)
//! - JSON: 코퍼스 일괄 교체용 가져오기 형식

mod store;

// Re-exports
pub use store::{
    read_json_records, validate_record, Corpus, CorpusStore, NewRecord, Record, StoreStats,
};
