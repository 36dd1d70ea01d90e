//! 评分层
//!
//! - `grader` - 确定性评分，产出 `ScoreReport`
//! - `report` - 四段式文本输出和分档反馈

pub mod grader;
pub mod report;

pub use grader::{grade, score_percent};
pub use report::{feedback_for, render_report, Feedback};
