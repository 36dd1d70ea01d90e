//! 文本协议解析层
//!
//! 生成器和学生都只给出文本；这里把文本立即转换为类型化的数据，
//! 下游只处理 `ParsedWorksheet` / `StudentResponseMap`，不再回头扫描原文。

pub mod explanations;
pub mod responses;
pub mod worksheet;

pub use explanations::parse_explanations;
pub use responses::parse_responses;
pub use worksheet::{parse_answer_key, parse_choices, parse_problems, parse_worksheet, split_sections};
