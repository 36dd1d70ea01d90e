pub mod curriculum;
pub mod loaders;
pub mod problem;
pub mod report;

pub use curriculum::{CurriculumRow, CurriculumTable, TopicPolicy};
pub use loaders::{load_curriculum, load_curriculum_or_empty};
pub use problem::{AnswerKey, ChoiceLetter, Choices, ParsedWorksheet, Problem, StudentResponseMap};
pub use report::{Explanation, FeedbackTier, GradedItem, ScoreReport};
