//! Index 모듈 - 코퍼스에서 파생되는 랭킹 인덱스
//!
//! - Lexical: TF-IDF 희소 벡터 + 코사인 유사도
//! - Semantic: 외부 인코더 임베딩 + 코사인 유사도
//! - 두 인덱스는 항상 같은 코퍼스 스냅샷에서 함께 빌드됩니다

mod lexical;
mod ranking;
mod semantic;
mod tokenizer;

// Re-exports
pub use lexical::{LexicalIndex, LexicalVector};
pub use ranking::{cosine_similarity, l2_norm, top_n, RankedIndex};
pub use semantic::SemanticIndex;
pub use tokenizer::{Tokenizer, ENGLISH_STOP_WORDS};
