//! 卷子文本解析
//!
//! 生成器输出的是带标记的半结构化文本：
//!
//! ```text
//! [Worksheet]
//! [Problem 1] 1 + 1 = ?
//! Choices: A) 1 B) 2 C) 3 D) 4
//! [AnswerKey]
//! 1) B
//! ```
//!
//! 解析尽量宽容：对不上模式的块或行直接跳过，不报错。

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::models::problem::{AnswerKey, ChoiceLetter, Choices, ParsedWorksheet, Problem};

pub const WORKSHEET_MARKER: &str = "[Worksheet]";
pub const ANSWER_KEY_MARKER: &str = "[AnswerKey]";
pub const CHOICES_MARKER: &str = "Choices:";

static PROBLEM_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[Problem\s*(\d+)\]\s*").expect("problem marker pattern"));

static CHOICE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([ABCD])\)\s*").expect("choice marker pattern"));

static ANSWER_KEY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)\)\s*([ABCD])").expect("answer key pattern"));

/// 拆出卷面部分和答案部分
///
/// - 有 `[Worksheet]` 时只取最后一个标记之后的内容
/// - 其中有 `[AnswerKey]` 时在第一个标记处切开
///
/// 返回 (卷面文本, 答案文本)，都已去掉首尾空白。
pub fn split_sections(raw: &str) -> (&str, &str) {
    let body = match raw.rfind(WORKSHEET_MARKER) {
        Some(pos) => &raw[pos + WORKSHEET_MARKER.len()..],
        None => raw,
    };

    match body.split_once(ANSWER_KEY_MARKER) {
        Some((worksheet, key)) => (worksheet.trim(), key.trim()),
        None => (body.trim(), ""),
    }
}

/// 解析整段文本为题目列表和答案表
pub fn parse_worksheet(raw: &str) -> ParsedWorksheet {
    let (worksheet, key_text) = split_sections(raw);
    let problems = parse_problems(worksheet);
    let answer_key = parse_answer_key(key_text);

    debug!(
        "卷子解析完成: {} 道题, 答案 {} 条",
        problems.len(),
        answer_key.len()
    );

    ParsedWorksheet {
        problems,
        answer_key,
    }
}

/// 按 `[Problem n]` 标记切块并解析每道题
///
/// 题号重复时按题号"后者覆盖"：保留后出现的块，位置也取后者。
pub fn parse_problems(worksheet: &str) -> Vec<Problem> {
    let markers: Vec<(usize, usize, &str)> = PROBLEM_MARKER
        .captures_iter(worksheet)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let digits = caps.get(1)?;
            Some((whole.start(), whole.end(), digits.as_str()))
        })
        .collect();

    let mut problems: Vec<Problem> = Vec::with_capacity(markers.len());

    for (idx, &(_, body_start, digits)) in markers.iter().enumerate() {
        let body_end = markers
            .get(idx + 1)
            .map(|(next_start, _, _)| *next_start)
            .unwrap_or(worksheet.len());
        let block = worksheet[body_start..body_end].trim();

        let number = match digits.parse::<u32>() {
            Ok(n) => n,
            Err(e) => {
                let fallback = (idx + 1) as u32;
                warn!("题号 '{}' 无法解析 ({})，按位置记为第 {} 题", digits, e, fallback);
                fallback
            }
        };

        let (stem, choices_text) = match block.split_once(CHOICES_MARKER) {
            Some((stem, choices)) => (stem.trim(), choices),
            None => (block, ""),
        };

        let problem = Problem {
            number,
            stem: stem.to_string(),
            choices: parse_choices(choices_text),
        };

        if let Some(pos) = problems.iter().position(|p| p.number == number) {
            warn!("⚠️ 题号 {} 重复出现，保留后出现的题目", number);
            problems.remove(pos);
        }
        problems.push(problem);
    }

    problems
}

/// 解析选项区
///
/// 每个字母的内容从 `X)` 之后一直到下一个任意字母标记或文本末尾。
/// 同一字母出现多次时取第一次。缺失的字母为空字符串。
pub fn parse_choices(choices_text: &str) -> Choices {
    let markers: Vec<(ChoiceLetter, usize, usize)> = CHOICE_MARKER
        .captures_iter(choices_text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let letter = ChoiceLetter::parse(caps.get(1)?.as_str())?;
            Some((letter, whole.start(), whole.end()))
        })
        .collect();

    let mut choices = Choices::default();
    let mut seen: Vec<ChoiceLetter> = Vec::with_capacity(4);

    for (idx, &(letter, _, value_start)) in markers.iter().enumerate() {
        if seen.contains(&letter) {
            continue;
        }
        seen.push(letter);

        let value_end = markers
            .get(idx + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(choices_text.len());
        choices.set(letter, choices_text[value_start..value_end].trim());
    }

    choices
}

/// 逐行解析答案表，形如 `1) B`
///
/// 字母大小写不敏感，统一存为大写。同一题号出现多次时后者覆盖。
pub fn parse_answer_key(key_text: &str) -> AnswerKey {
    let mut key = AnswerKey::new();

    for line in key_text.lines() {
        let Some(caps) = ANSWER_KEY_LINE.captures(line.trim()) else {
            continue;
        };
        let Ok(number) = caps[1].parse::<u32>() else {
            continue;
        };
        if let Some(letter) = ChoiceLetter::parse(&caps[2]) {
            key.insert(number, letter);
        }
    }

    key
}
