//! 토크나이저 - 소문자화 + 비영숫자 경계 분할 + 불용어 제거
//!
//! 두 글자 미만 토큰은 버립니다.
//! ref: https://scikit-learn.org/stable/modules/feature_extraction.html#stop-words

use std::collections::HashSet;

use regex::Regex;

/// 영어 불용어 목록
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together",
    "too", "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// 텍스트 토크나이저
#[derive(Debug, Clone)]
pub struct Tokenizer {
    token_pattern: Regex,
    stop_words: HashSet<&'static str>,
}

impl Tokenizer {
    /// 영어 불용어를 사용하는 기본 토크나이저
    pub fn english() -> Self {
        Self::with_stop_words(ENGLISH_STOP_WORDS)
    }

    /// 불용어 목록 지정
    pub fn with_stop_words(stop_words: &[&'static str]) -> Self {
        // 밑줄을 제외한 단어 문자 2개 이상 = 영숫자 토큰
        let token_pattern = Regex::new(r"[^\W_]{2,}").expect("static token pattern");

        Self {
            token_pattern,
            stop_words: stop_words.iter().copied().collect(),
        }
    }

    /// 텍스트를 정규화된 토큰 목록으로 변환 (등장 순서 유지)
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();

        self.token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }

    /// 불용어 여부
    pub fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let tokenizer = Tokenizer::english();
        assert_eq!(
            tokenizer.tokenize("Dubai VISA-requirements, 2024!"),
            vec!["dubai", "visa", "requirements", "2024"]
        );
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokenizer = Tokenizer::english();
        assert_eq!(
            tokenizer.tokenize("What is the weather in a city?"),
            vec!["weather", "city"]
        );
    }

    #[test]
    fn test_tokenize_underscore_is_boundary() {
        let tokenizer = Tokenizer::english();
        assert_eq!(tokenizer.tokenize("snake_case"), vec!["snake", "case"]);
    }

    #[test]
    fn test_tokenize_empty() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   ").is_empty());
    }

    #[test]
    fn test_is_stop_word() {
        let tokenizer = Tokenizer::english();
        assert!(tokenizer.is_stop_word("the"));
        assert!(!tokenizer.is_stop_word("dubai"));
    }
}
