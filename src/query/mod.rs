//! Query 모듈 - Boolean 질의 언어
//!
//! - Exact: 모든 키워드 포함 여부
//! - Extended: AND / OR / NOT 왼쪽→오른쪽 접기

mod boolean;

// Re-exports
pub use boolean::{boolean_search, extended_boolean_search, BooleanExpression, BooleanOp};
