//! Lexical Index - TF-IDF 가중치 + 코사인 유사도
//!
//! 리로드마다 어휘(vocabulary)와 모든 문서 벡터를 처음부터 다시 계산합니다.
//! 가중치: `tf(t, d) * ln(N / df(t))`
//!
//! ref: https://en.wikipedia.org/wiki/Tf%E2%80%93idf

use std::collections::{BTreeMap, HashMap};

use super::ranking::{clamp_score, top_n, RankedIndex};
use super::tokenizer::Tokenizer;

// ============================================================================
// LexicalVector
// ============================================================================

/// 희소 TF-IDF 벡터 (열 인덱스 오름차순, 0 가중치 제외)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexicalVector {
    entries: Vec<(usize, f32)>,
    norm: f32,
}

impl LexicalVector {
    fn from_counts(counts: BTreeMap<usize, u32>, idf: &[f32]) -> Self {
        let entries: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(col, tf)| (col, tf as f32 * idf[col]))
            .filter(|(_, weight)| *weight != 0.0)
            .collect();

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();

        Self { entries, norm }
    }

    /// (열 인덱스, 가중치) 목록
    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    /// 모든 가중치가 0인지 여부
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// 희소 코사인 유사도 (한쪽이 영벡터면 0)
    pub fn cosine(&self, other: &LexicalVector) -> f32 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }

        // 두 목록 모두 열 오름차순이므로 병합 순회
        let (mut i, mut j) = (0, 0);
        let mut dot = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (col_a, w_a) = self.entries[i];
            let (col_b, w_b) = other.entries[j];
            match col_a.cmp(&col_b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += w_a * w_b;
                    i += 1;
                    j += 1;
                }
            }
        }

        clamp_score(dot / (self.norm * other.norm))
    }
}

// ============================================================================
// LexicalIndex
// ============================================================================

/// TF-IDF 인덱스
///
/// 문서 벡터는 빌드 시점 코퍼스 순서와 위치가 일치합니다.
#[derive(Debug, Clone)]
pub struct LexicalIndex {
    tokenizer: Tokenizer,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    vectors: Vec<LexicalVector>,
}

impl LexicalIndex {
    /// 문서 목록으로 인덱스 빌드
    ///
    /// 어휘는 사전순으로 열 인덱스를 배정합니다.
    pub fn build<S: AsRef<str>>(documents: &[S], tokenizer: Tokenizer) -> Self {
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| tokenizer.tokenize(doc.as_ref()))
            .collect();

        // term -> 문서 빈도
        let mut document_frequency: BTreeMap<&str, u32> = BTreeMap::new();
        for tokens in &tokenized {
            let mut seen: Vec<&str> = tokens.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (col, (term, df)) in document_frequency.iter().enumerate() {
            vocabulary.insert((*term).to_string(), col);
            idf.push((n / *df as f32).ln());
        }

        let vectors = tokenized
            .iter()
            .map(|tokens| LexicalVector::from_counts(count_terms(tokens, &vocabulary), &idf))
            .collect();

        tracing::debug!(
            "TF-IDF matrix built: {} documents x {} terms",
            documents.len(),
            vocabulary.len()
        );

        Self {
            tokenizer,
            vocabulary,
            idf,
            vectors,
        }
    }

    /// 빈 인덱스
    pub fn empty() -> Self {
        Self::build::<&str>(&[], Tokenizer::english())
    }

    /// 질의 텍스트를 같은 파이프라인으로 벡터화
    ///
    /// 어휘에 없는 단어는 가중치 0으로 무시됩니다.
    pub fn transform(&self, query: &str) -> LexicalVector {
        let tokens = self.tokenizer.tokenize(query);
        LexicalVector::from_counts(count_terms(&tokens, &self.vocabulary), &self.idf)
    }

    /// 질의 벡터와 모든 문서 벡터의 코사인 유사도 Top-N
    pub fn similarity(&self, query: &LexicalVector, top: usize) -> Vec<RankedIndex> {
        top_n(self.vectors.iter().map(|doc| doc.cosine(query)), top)
    }

    /// 문서 수
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// 어휘 크기
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// 단어의 열 인덱스
    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// 문서 벡터 (코퍼스 순서)
    pub fn vectors(&self) -> &[LexicalVector] {
        &self.vectors
    }
}

/// 어휘에 있는 단어만 열 인덱스별로 카운트
fn count_terms(tokens: &[String], vocabulary: &HashMap<String, usize>) -> BTreeMap<usize, u32> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        if let Some(&col) = vocabulary.get(token) {
            *counts.entry(col).or_insert(0) += 1;
        }
    }
    counts
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn build(docs: &[&str]) -> LexicalIndex {
        LexicalIndex::build(docs, Tokenizer::english())
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let index = build(&["zebra apple", "mango"]);
        assert_eq!(index.vocabulary_size(), 3);
        assert_eq!(index.column("apple"), Some(0));
        assert_eq!(index.column("mango"), Some(1));
        assert_eq!(index.column("zebra"), Some(2));
        assert_eq!(index.column("the"), None);
    }

    #[test]
    fn test_tfidf_weights() {
        let index = build(&["visa visa dubai", "dubai weather"]);

        // dubai는 모든 문서에 등장 -> idf = ln(1) = 0
        let visa = index.column("visa").unwrap();
        let entries = index.vectors()[0].entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, visa);
        assert!((entries[0].1 - 2.0 * 2.0f32.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_transform_ignores_unknown_terms() {
        let index = build(&["dubai visa requirements", "dubai weather"]);
        let vector = index.transform("kangaroo");
        assert!(vector.is_zero());
    }

    #[test]
    fn test_similarity_ranks_matching_document_first() {
        let index = build(&[
            "Dubai weather in summer",
            "Dubai visa requirements for tourists",
            "Abu Dhabi hotels",
        ]);

        let query = index.transform("visa requirements");
        let ranked = index.similarity(&query, 3);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].0, 1);
        assert!(ranked[0].1 > 0.0);
        assert!(ranked[0].1 <= 1.0);
        // 나머지는 동점(0) -> 코퍼스 순서
        assert_eq!(ranked[1], (0, 0.0));
        assert_eq!(ranked[2], (2, 0.0));
    }

    #[test]
    fn test_similarity_top_n_truncates() {
        let index = build(&["alpha beta", "beta gamma", "gamma delta"]);
        let query = index.transform("gamma");
        assert_eq!(index.similarity(&query, 1).len(), 1);
        assert_eq!(index.similarity(&query, 10).len(), 3);
    }

    #[test]
    fn test_empty_query_ties_in_corpus_order() {
        let index = build(&["alpha beta", "beta gamma"]);
        let ranked = index.similarity(&index.transform(""), 5);
        assert_eq!(ranked, vec![(0, 0.0), (1, 0.0)]);
    }

    #[test]
    fn test_empty_index() {
        let index = LexicalIndex::empty();
        assert!(index.is_empty());
        assert!(index.similarity(&index.transform("anything"), 5).is_empty());
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let docs = ["Dubai visa requirements", "Dubai weather", "Visa fees"];
        let a = build(&docs);
        let b = build(&docs);
        assert_eq!(a.vectors(), b.vectors());

        let query = "dubai visa";
        assert_eq!(
            a.similarity(&a.transform(query), 3),
            b.similarity(&b.transform(query), 3)
        );
    }

    #[test]
    fn test_sparse_cosine_matches_self() {
        let index = build(&["alpha beta beta", "gamma"]);
        let v = &index.vectors()[0];
        assert!((v.cosine(v) - 1.0).abs() < 1e-6);
    }
}
