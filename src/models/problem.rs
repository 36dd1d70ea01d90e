use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 四选一的选项字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChoiceLetter {
    A,
    B,
    C,
    D,
}

impl ChoiceLetter {
    pub const ALL: [ChoiceLetter; 4] = [
        ChoiceLetter::A,
        ChoiceLetter::B,
        ChoiceLetter::C,
        ChoiceLetter::D,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChoiceLetter::A => "A",
            ChoiceLetter::B => "B",
            ChoiceLetter::C => "C",
            ChoiceLetter::D => "D",
        }
    }

    /// 从单个字符解析（大小写不敏感）
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(ChoiceLetter::A),
            'B' => Some(ChoiceLetter::B),
            'C' => Some(ChoiceLetter::C),
            'D' => Some(ChoiceLetter::D),
            _ => None,
        }
    }

    /// 从字符串解析，只接受恰好一个字母
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }
}

impl fmt::Display for ChoiceLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 四个选项的文本，缺失的选项为空字符串
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choices {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl Choices {
    pub fn get(&self, letter: ChoiceLetter) -> &str {
        match letter {
            ChoiceLetter::A => &self.a,
            ChoiceLetter::B => &self.b,
            ChoiceLetter::C => &self.c,
            ChoiceLetter::D => &self.d,
        }
    }

    pub fn set(&mut self, letter: ChoiceLetter, text: impl Into<String>) {
        let slot = match letter {
            ChoiceLetter::A => &mut self.a,
            ChoiceLetter::B => &mut self.b,
            ChoiceLetter::C => &mut self.c,
            ChoiceLetter::D => &mut self.d,
        };
        *slot = text.into();
    }

    pub fn is_empty(&self) -> bool {
        ChoiceLetter::ALL.iter().all(|l| self.get(*l).is_empty())
    }
}

/// 一道选择题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// 题号（从 1 开始，在一张卷子内唯一）
    pub number: u32,
    /// 题干
    pub stem: String,
    pub choices: Choices,
}

/// 题号 → 正确选项
pub type AnswerKey = BTreeMap<u32, ChoiceLetter>;

/// 题号 → 学生选择的选项；缺失即未作答
pub type StudentResponseMap = BTreeMap<u32, ChoiceLetter>;

/// 解析后的卷子
///
/// `problems` 按标记在原文中出现的顺序排列，不保证按题号升序。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedWorksheet {
    pub problems: Vec<Problem>,
    pub answer_key: AnswerKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_parse() {
        assert_eq!(ChoiceLetter::parse("b"), Some(ChoiceLetter::B));
        assert_eq!(ChoiceLetter::parse(" D "), Some(ChoiceLetter::D));
        assert_eq!(ChoiceLetter::parse("E"), None);
        assert_eq!(ChoiceLetter::parse("AB"), None);
        assert_eq!(ChoiceLetter::parse(""), None);
    }

    #[test]
    fn test_choices_get_set() {
        let mut choices = Choices::default();
        assert!(choices.is_empty());
        choices.set(ChoiceLetter::C, "3");
        assert_eq!(choices.get(ChoiceLetter::C), "3");
        assert_eq!(choices.get(ChoiceLetter::A), "");
        assert!(!choices.is_empty());
    }

    #[test]
    fn test_choices_serialize_uppercase_keys() {
        let mut choices = Choices::default();
        choices.set(ChoiceLetter::A, "x");
        let json = serde_json::to_value(&choices).unwrap();
        assert_eq!(json["A"], "x");
        assert_eq!(json["D"], "");
    }
}
