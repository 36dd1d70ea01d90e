//! 解析生成器返回的逐题解析文本，形如 `2) 해설: ...`

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EXPLANATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\)\s*해설\s*:\s*(.+)").expect("explanation line pattern")
});

/// 题号 → 解析正文；对不上格式的行忽略
pub fn parse_explanations(raw: &str) -> BTreeMap<u32, String> {
    let mut bodies = BTreeMap::new();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(caps) = EXPLANATION_LINE.captures(line) else {
            continue;
        };
        if let Ok(number) = caps[1].parse::<u32>() {
            let body = caps[2].trim();
            if !body.is_empty() {
                bodies.insert(number, body.to_string());
            }
        }
    }

    bodies
}
