//! 禁止主题的词项展开与命中检查
//!
//! 复合主题名（如 "분수와 소수"）会被拆成可单独匹配的子串，
//! 提高生成文本中越界内容的检出率。

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// 主题名内部的分隔符：空白 / · - + ( ) ,
static DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s/·\-\+\(\),]").expect("delimiter pattern"));

/// 韩语连接助词：와 과 및 의
static PARTICLES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[와과및의]").expect("particle pattern"));

/// 片段和子片段最少字符数；整体主题名不受此限制
const MIN_SUB_FRAGMENT_CHARS: usize = 2;

/// 去重并按 字符数降序 → 字典序 排列
pub fn sort_terms<I>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let unique: HashSet<String> = terms.into_iter().collect();
    let mut sorted: Vec<String> = unique.into_iter().collect();
    sorted.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    sorted
}

/// 展开主题列表
///
/// 对每个主题：
/// 1. 加入去掉首尾空白的整体
/// 2. 按分隔符拆分，加入字符数 >= 2 的片段
/// 3. 再按连接助词拆分片段，加入字符数 >= 2 的子片段
///
/// "덧셈과 뺄셈(1)" 中的 "1"、"세 자리 수" 中的 "수" 这类单字片段不加入，
/// 否则 `[Problem 1]` 之类的格式文本也会被判为越界。
///
/// 空白主题直接跳过。
pub fn expand_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    let mut tokens = Vec::new();

    for term in terms {
        let term = term.as_ref().trim();
        if term.is_empty() {
            continue;
        }
        tokens.push(term.to_string());

        for fragment in DELIMITERS.split(term) {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }
            if fragment.chars().count() >= MIN_SUB_FRAGMENT_CHARS {
                tokens.push(fragment.to_string());
            }

            for sub in PARTICLES.split(fragment) {
                let sub = sub.trim();
                if sub.chars().count() >= MIN_SUB_FRAGMENT_CHARS {
                    tokens.push(sub.to_string());
                }
            }
        }
    }

    sort_terms(tokens)
}

/// 返回文本中第一个命中的禁止词（大小写不敏感的子串匹配）
pub fn find_banned_term<'a, S: AsRef<str>>(text: &str, banned_terms: &'a [S]) -> Option<&'a str> {
    let lowered = text.to_lowercase();
    banned_terms
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| !t.is_empty())
        .find(|t| lowered.contains(&t.to_lowercase()))
}

/// 文本中是否包含任一禁止词
pub fn contains_banned<S: AsRef<str>>(text: &str, banned_terms: &[S]) -> bool {
    find_banned_term(text, banned_terms).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_term_is_unchanged() {
        assert_eq!(expand_terms(&["분수"]), vec!["분수"]);
    }

    #[test]
    fn test_expand_compound_term() {
        let expanded = expand_terms(&["분수와 소수"]);
        assert!(expanded.contains(&"분수와 소수".to_string()));
        assert!(expanded.contains(&"분수와".to_string()));
        assert!(expanded.contains(&"분수".to_string()));
        assert!(expanded.contains(&"소수".to_string()));
        // 最长的排在最前
        assert_eq!(expanded[0], "분수와 소수");
    }

    #[test]
    fn test_expand_with_delimiters() {
        let expanded = expand_terms(&["곱셈구구(2단-5단)", "평면도형/입체도형"]);
        assert!(expanded.contains(&"곱셈구구".to_string()));
        assert!(expanded.contains(&"2단".to_string()));
        assert!(!expanded.contains(&"5단)".to_string()));
        assert!(expanded.contains(&"5단".to_string()));
        assert!(expanded.contains(&"평면도형".to_string()));
        assert!(expanded.contains(&"입체도형".to_string()));
    }

    #[test]
    fn test_short_particle_fragments_dropped() {
        // "원의 넓이" → 片段 "원의" 拆出的 "원" 只有一个字，不加入
        let expanded = expand_terms(&["원의 넓이"]);
        assert!(expanded.contains(&"원의".to_string()));
        assert!(expanded.contains(&"넓이".to_string()));
        assert!(!expanded.contains(&"원".to_string()));
    }

    #[test]
    fn test_single_char_fragments_dropped() {
        let expanded = expand_terms(&["덧셈과 뺄셈(1)", "세 자리 수"]);
        assert!(expanded.contains(&"덧셈과 뺄셈(1)".to_string()));
        assert!(expanded.contains(&"뺄셈".to_string()));
        assert!(expanded.contains(&"자리".to_string()));
        assert!(expanded.iter().all(|t| t.chars().count() >= 2));
        assert!(!contains_banned("[Problem 1] 2 + 3 = ?\n[AnswerKey]\n1) B", &expanded));
    }

    #[test]
    fn test_single_char_whole_term_kept() {
        assert_eq!(expand_terms(&["원"]), vec!["원"]);
    }

    #[test]
    fn test_blank_terms_skipped() {
        let expanded = expand_terms(&["", "   ", "덧셈"]);
        assert_eq!(expanded, vec!["덧셈"]);
    }

    #[test]
    fn test_expansion_is_deduplicated() {
        let expanded = expand_terms(&["분수", "분수", " 분수 "]);
        assert_eq!(expanded, vec!["분수"]);
    }

    #[test]
    fn test_contains_banned_is_case_insensitive() {
        assert!(contains_banned("This has FRACTION stuff", &["fraction"]));
        assert!(contains_banned("this has fraction stuff", &["FRACTION"]));
        assert!(!contains_banned("only addition", &["fraction"]));
    }

    #[test]
    fn test_empty_banned_term_never_matches() {
        assert!(!contains_banned("anything", &[""]));
        let none: [&str; 0] = [];
        assert!(!contains_banned("anything", &none));
    }

    #[test]
    fn test_find_banned_term_reports_match() {
        let terms = expand_terms(&["분수와 소수"]);
        assert_eq!(find_banned_term("3/4는 분수입니다", &terms), Some("분수"));
    }

    #[test]
    fn test_sort_terms_order() {
        let sorted = sort_terms(vec!["가나".to_string(), "가나다".to_string(), "가".to_string(), "나다".to_string()]);
        assert_eq!(sorted, vec!["가나다", "가나", "나다", "가"]);
    }
}
