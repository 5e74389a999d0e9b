//! 랭킹 유틸리티 - 코사인 유사도 및 Top-N 선택
//!
//! 두 인덱스(lexical, semantic)가 같은 Top-N / 동점 처리 규칙을 공유합니다.

use std::cmp::Ordering;

/// 랭킹 결과 한 건: (코퍼스 위치, 스코어)
pub type RankedIndex = (usize, f32);

/// 코사인 유사도 계산
///
/// 두 벡터 간의 코사인 유사도를 계산합니다.
/// 길이가 다르거나, 비어있거나, 한쪽 노름이 0이면 0.0을 반환합니다.
///
/// # Returns
/// 코사인 유사도 (-1.0 ~ 1.0)
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    clamp_score(dot_product / (norm_a * norm_b))
}

/// L2 노름
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// 부동소수점 오차로 [-1, 1]을 벗어난 값 보정
pub(crate) fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(-1.0, 1.0)
    }
}

/// 스코어 내림차순 Top-N
///
/// 동점은 코퍼스 위치 오름차순으로 정렬되어 결과가 결정적입니다.
/// `top_n`이 전체 개수보다 크면 전체를 정렬해 반환합니다.
pub fn top_n(scores: impl IntoIterator<Item = f32>, top_n: usize) -> Vec<RankedIndex> {
    let mut ranked: Vec<RankedIndex> = scores.into_iter().enumerate().collect();

    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(top_n);

    ranked
}

// ============================================================================
// Tests
// ============================================================================
