//! 学生作答文本解析
//!
//! 每行形如 `3번 답: C`（空白宽松，字母大小写不敏感）。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::problem::{ChoiceLetter, StudentResponseMap};

static RESPONSE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*번\s*답\s*:\s*([ABCD])").expect("response line pattern")
});

/// 解析学生作答，同一题号出现多次时以最后一行为准
pub fn parse_responses(raw: &str) -> StudentResponseMap {
    let mut responses = StudentResponseMap::new();

    for line in raw.lines() {
        let Some(caps) = RESPONSE_LINE.captures(line) else {
            continue;
        };
        let Ok(number) = caps[1].parse::<u32>() else {
            continue;
        };
        if let Some(letter) = ChoiceLetter::parse(&caps[2]) {
            if let Some(previous) = responses.insert(number, letter) {
                debug!("第 {} 题重复作答: {} → {}", number, previous, letter);
            }
        }
    }

    responses
}
