//! Boolean 질의 평가기 - 정확 일치(exact) 및 확장(AND/OR/NOT) 모드
//!
//! 두 모드 모두 대소문자 무시 부분 문자열 포함 여부를 기반으로 합니다.
//! 인덱스를 거치지 않고 레코드 원문을 직접 평가합니다.
//!
//! 확장 모드는 트리가 아닌 평평한 연산 목록을 왼쪽에서 오른쪽으로 한 번에 접습니다.
//! AND/OR 사이 우선순위는 없습니다: `a or b and c` = `(a or b) and c`.

use crate::corpus::Record;
use crate::error::SearchError;

// ============================================================================
// Exact mode
// ============================================================================

/// 정확 일치 검색
///
/// 질의를 공백으로 나눈 모든 키워드가 `question + " " + answer`
/// (소문자)에 부분 문자열로 포함된 레코드만 코퍼스 순서로 반환합니다.
/// 키워드가 없으면 모든 레코드가 일치합니다.
pub fn boolean_search<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    let lowered = query.to_lowercase();
    let keywords: Vec<&str> = lowered.split_whitespace().collect();

    records
        .iter()
        .filter(|record| {
            let text = format!(
                "{} {}",
                record.question.to_lowercase(),
                record.answer.to_lowercase()
            );
            keywords.iter().all(|keyword| text.contains(keyword))
        })
        .collect()
}

// ============================================================================
// Extended mode
// ============================================================================

/// 확장 Boolean 연산
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BooleanOp {
    /// 질문 또는 답변이 단어를 포함
    Contains(String),
    /// 질문과 답변 모두 단어를 포함하지 않음
    Not(String),
    /// 다음 조건을 직전 조건과 AND로 결합
    JoinAnd,
    /// 다음 조건을 직전 조건과 OR로 결합
    JoinOr,
}

/// 확장 Boolean 식
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BooleanExpression {
    /// 연산자가 없는 질의: 전체 문자열 하나를 포함 여부로 검사
    Phrase(String),
    /// 연산 목록 (왼쪽에서 오른쪽으로 접기)
    Ops(Vec<BooleanOp>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    And,
    Or,
}

impl BooleanExpression {
    /// 질의 파싱
    ///
    /// 원문에 `AND`, `OR`, `NOT`(대문자 그대로)이 하나도 없으면 `Phrase`,
    /// 있으면 소문자화 후 공백 단위 토큰을 연산으로 변환합니다.
    /// 구조 검증은 `validate`/`matches`에서 수행합니다.
    pub fn parse(query: &str) -> Self {
        if !query.contains("AND") && !query.contains("OR") && !query.contains("NOT") {
            return BooleanExpression::Phrase(query.to_lowercase());
        }

        let lowered = query.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        let mut ops = Vec::with_capacity(tokens.len());

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                "and" => ops.push(BooleanOp::JoinAnd),
                "or" => ops.push(BooleanOp::JoinOr),
                "not" if i + 1 < tokens.len() => {
                    ops.push(BooleanOp::Not(tokens[i + 1].to_string()));
                    i += 1;
                }
                word => ops.push(BooleanOp::Contains(word.to_string())),
            }
            i += 1;
        }

        BooleanExpression::Ops(ops)
    }

    /// 구조 검증 (레코드 없이도 잘못된 식을 감지)
    pub fn validate(&self) -> Result<(), SearchError> {
        self.fold(|_: &str| true).map(|_| ())
    }

    /// 레코드가 식을 만족하는지 평가
    pub fn matches(&self, record: &Record) -> Result<bool, SearchError> {
        let question = record.question.to_lowercase();
        let answer = record.answer.to_lowercase();
        let contains = |term: &str| question.contains(term) || answer.contains(term);

        match self {
            BooleanExpression::Phrase(phrase) => Ok(contains(phrase.as_str())),
            BooleanExpression::Ops(_) => self.fold(contains),
        }
    }

    /// 연산 목록을 한 번의 선형 순회로 접기
    ///
    /// 첫 조건이 누산기를 초기화하고, 이후 조건은 대기 중인 결합자가 있으면
    /// 그것으로, 없으면 AND로 누산기와 결합합니다.
    fn fold(&self, contains: impl Fn(&str) -> bool) -> Result<bool, SearchError> {
        let ops = match self {
            BooleanExpression::Phrase(phrase) => return Ok(contains(phrase.as_str())),
            BooleanExpression::Ops(ops) => ops,
        };

        let mut acc: Option<bool> = None;
        let mut pending: Option<Join> = None;

        for op in ops {
            let value = match op {
                BooleanOp::Contains(term) => contains(term.as_str()),
                BooleanOp::Not(term) => !contains(term.as_str()),
                BooleanOp::JoinAnd | BooleanOp::JoinOr => {
                    let join = if *op == BooleanOp::JoinAnd {
                        Join::And
                    } else {
                        Join::Or
                    };
                    if acc.is_none() {
                        return Err(SearchError::QueryEvaluation(format!(
                            "{} without a preceding term",
                            join_name(join)
                        )));
                    }
                    if let Some(previous) = pending {
                        return Err(SearchError::QueryEvaluation(format!(
                            "{} directly after {}",
                            join_name(join),
                            join_name(previous)
                        )));
                    }
                    pending = Some(join);
                    continue;
                }
            };

            acc = Some(match (acc, pending.take()) {
                (None, _) => value,
                (Some(prev), Some(Join::Or)) => prev || value,
                (Some(prev), Some(Join::And)) | (Some(prev), None) => prev && value,
            });
        }

        if let Some(join) = pending {
            return Err(SearchError::QueryEvaluation(format!(
                "trailing {} with no following term",
                join_name(join)
            )));
        }

        acc.ok_or_else(|| SearchError::QueryEvaluation("empty expression".to_string()))
    }
}

fn join_name(join: Join) -> &'static str {
    match join {
        Join::And => "AND",
        Join::Or => "OR",
    }
}

/// 확장 Boolean 검색
///
/// 식이 잘못되었으면 `QueryEvaluation`으로 실패합니다.
pub fn extended_boolean_search<'a>(
    records: &'a [Record],
    query: &str,
) -> Result<Vec<&'a Record>, SearchError> {
    let expression = BooleanExpression::parse(query);
    expression.validate()?;

    let mut matched = Vec::new();
    for record in records {
        if expression.matches(record)? {
            matched.push(record);
        }
    }

    Ok(matched)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, question: &str, answer: &str) -> Record {
        Record {
            id,
            question: question.to_string(),
            answer: answer.to_string(),
        }
    }

    fn dubai_corpus() -> Vec<Record> {
        vec![
            record(1, "Dubai visa requirements", "Apply online before travel."),
            record(2, "Dubai weather", "Hot and sunny most of the year."),
        ]
    }

    fn ids(records: &[&Record]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_exact_all_keywords_required() {
        let corpus = dubai_corpus();
        assert_eq!(ids(&boolean_search(&corpus, "Dubai visa")), vec![1]);
        assert_eq!(ids(&boolean_search(&corpus, "dubai")), vec![1, 2]);
        assert!(boolean_search(&corpus, "dubai snow").is_empty());
    }

    #[test]
    fn test_exact_matches_across_question_and_answer() {
        let corpus = dubai_corpus();
        assert_eq!(ids(&boolean_search(&corpus, "weather sunny")), vec![2]);
    }

    #[test]
    fn test_exact_substring_semantics() {
        let corpus = dubai_corpus();
        assert_eq!(ids(&boolean_search(&corpus, "REQUIRE")), vec![1]);
    }

    #[test]
    fn test_exact_empty_query_matches_all() {
        let corpus = dubai_corpus();
        assert_eq!(ids(&boolean_search(&corpus, "   ")), vec![1, 2]);
    }

    #[test]
    fn test_parse_phrase_without_operators() {
        assert_eq!(
            BooleanExpression::parse("Dubai visa"),
            BooleanExpression::Phrase("dubai visa".to_string())
        );
        // 소문자 연산자는 연산자로 인식하지 않음
        assert_eq!(
            BooleanExpression::parse("dubai and visa"),
            BooleanExpression::Phrase("dubai and visa".to_string())
        );
    }

    #[test]
    fn test_parse_operators() {
        assert_eq!(
            BooleanExpression::parse("Dubai AND travel NOT requirements"),
            BooleanExpression::Ops(vec![
                BooleanOp::Contains("dubai".into()),
                BooleanOp::JoinAnd,
                BooleanOp::Contains("travel".into()),
                BooleanOp::Not("requirements".into()),
            ])
        );
    }

    #[test]
    fn test_parse_trailing_not_is_a_word() {
        assert_eq!(
            BooleanExpression::parse("visa NOT"),
            BooleanExpression::Ops(vec![
                BooleanOp::Contains("visa".into()),
                BooleanOp::Contains("not".into()),
            ])
        );
    }

    #[test]
    fn test_extended_and() {
        let corpus = dubai_corpus();
        let result = extended_boolean_search(&corpus, "dubai AND visa").unwrap();
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_extended_not() {
        let corpus = dubai_corpus();
        let result = extended_boolean_search(&corpus, "dubai NOT weather").unwrap();
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_extended_or() {
        let corpus = dubai_corpus();
        let result = extended_boolean_search(&corpus, "visa OR weather").unwrap();
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_extended_phrase_no_match() {
        let corpus = dubai_corpus();
        assert!(extended_boolean_search(&corpus, "snow").unwrap().is_empty());
    }

    #[test]
    fn test_extended_empty_query_matches_all() {
        let corpus = dubai_corpus();
        assert_eq!(ids(&extended_boolean_search(&corpus, "").unwrap()), vec![1, 2]);
    }

    #[test]
    fn test_extended_left_to_right_without_precedence() {
        let corpus = vec![
            record(1, "alpha", "x"),
            record(2, "beta gamma", "x"),
            record(3, "gamma", "x"),
        ];

        // (alpha OR beta) AND gamma
        let result = extended_boolean_search(&corpus, "alpha OR beta AND gamma").unwrap();
        assert_eq!(ids(&result), vec![2]);

        // (gamma AND beta) OR alpha
        let result = extended_boolean_search(&corpus, "gamma AND beta OR alpha").unwrap();
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_extended_join_applies_to_not() {
        let corpus = dubai_corpus();
        let result = extended_boolean_search(&corpus, "snow OR NOT weather").unwrap();
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_extended_malformed_expressions() {
        let corpus = dubai_corpus();

        for query in ["dubai AND", "AND dubai", "dubai AND OR visa", "OR"] {
            let err = extended_boolean_search(&corpus, query).unwrap_err();
            assert!(
                matches!(err, SearchError::QueryEvaluation(_)),
                "query {:?} should fail",
                query
            );
        }
    }

    #[test]
    fn test_malformed_expression_fails_even_on_empty_corpus() {
        let err = extended_boolean_search(&[], "visa AND").unwrap_err();
        assert!(matches!(err, SearchError::QueryEvaluation(_)));
    }
}
