//! 出题范围控制
//!
//! - `terms`  - 禁止词展开与命中检查
//! - `topics` - 按课程表划分允许/禁止主题

pub mod terms;
pub mod topics;

pub use terms::{contains_banned, expand_terms, find_banned_term};
pub use topics::{allowed_topics, banned_topics, select_topic, topic_policy, FALLBACK_TOPIC};
